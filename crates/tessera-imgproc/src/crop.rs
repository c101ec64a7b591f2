use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use tessera_image::{mask::FOREGROUND, BoundingBox, Image, ImageSize, Mask};

use crate::{
    error::ImgprocError,
    padding::{pad_constant, Padding2D},
    segmentation::{segment, SegmentationMode, DEFAULT_THRESHOLD},
};

/// Crop an image to a specified region.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Examples
///
/// ```rust
/// use tessera_image::{Image, ImageSize};
/// use tessera_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImgprocError>
where
    T: Copy + Send + Sync,
{
    if x + dst.cols() > src.cols() || y + dst.rows() > src.rows() {
        return Err(ImgprocError::InvalidCropRegion(
            x,
            y,
            dst.size(),
            src.size(),
        ));
    }

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src.cols() * C + x * C;
            let src_slice = &src.as_slice()[offset..offset + dst_cols * C];

            // copy the slice to the destination
            dst_row.copy_from_slice(src_slice);
        });

    Ok(())
}

/// Smallest box enclosing the foreground of a mask.
///
/// # Errors
///
/// Returns [`ImgprocError::EmptyForeground`] if the mask has no foreground pixel.
pub fn foreground_bbox(mask: &Mask) -> Result<BoundingBox, ImgprocError> {
    BoundingBox::from_mask(mask, FOREGROUND).ok_or(ImgprocError::EmptyForeground)
}

/// Crop an image to the bounding box of its foreground.
///
/// The color of the top-left pixel is taken as the background. The image is first
/// grown by `border` pixels per axis with that color (`border / 2` before, the
/// rest after) so the flood fill can go around objects touching the edges. The
/// foreground bounding box is then expanded by `border / 2` on each side.
///
/// # Arguments
///
/// * `src` - The image to crop.
/// * `border` - Extra margin around the foreground.
///
/// # Errors
///
/// Returns [`ImgprocError::EmptyForeground`] if the whole image is background.
///
/// # Examples
///
/// ```
/// use tessera_image::{Image, ImageSize};
/// use tessera_imgproc::crop::auto_crop;
///
/// #[rustfmt::skip]
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 3 }, vec![
///     0, 0, 0, 0,
///     0, 200, 200, 0,
///     0, 0, 0, 0,
/// ]).unwrap();
///
/// let cropped = auto_crop(&image, 0).unwrap();
/// assert_eq!(cropped.size(), ImageSize { width: 2, height: 1 });
///
/// let framed = auto_crop(&image, 2).unwrap();
/// assert_eq!(framed.size(), ImageSize { width: 4, height: 3 });
/// ```
pub fn auto_crop<const C: usize>(
    src: &Image<u8, C>,
    border: usize,
) -> Result<Image<u8, C>, ImgprocError> {
    let mut background = [0u8; C];
    background.copy_from_slice(src.pixel(0, 0)?);

    let canvas = pad_constant(src, &Padding2D::split(border), &background)?;

    let mask = segment(&canvas, DEFAULT_THRESHOLD, (0, 0), SegmentationMode::Fill)?;
    let bbox = foreground_bbox(&mask)?.expand(border / 2, canvas.size());

    log::debug!(
        "auto crop {} with border {}: {:?}",
        src.size(),
        border,
        bbox
    );

    let mut dst = Image::from_size_val(
        ImageSize {
            width: bbox.width(),
            height: bbox.height(),
        },
        0u8,
    )?;
    crop_image(&canvas, &mut dst, bbox.x_min, bbox.y_min)?;

    Ok(dst)
}
