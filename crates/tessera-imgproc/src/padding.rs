use rayon::prelude::*;

use tessera_image::{geometry, Image, ImageError, ImageSize};

use crate::error::ImgprocError;

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// Split `total` extra pixels per axis, `total / 2` before and the rest after.
    pub fn split(total: usize) -> Self {
        let before = total / 2;
        let after = total - before;
        Self {
            top: before,
            bottom: after,
            left: before,
            right: after,
        }
    }

    /// Size of an image of `size` once padded.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }
}

/// Pad an image with a constant color into a preallocated destination.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image, sized as `src` plus `padding`.
/// * `padding` - The amount of padding on each side.
/// * `color` - The pixel value written in the padded area.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the padded size of `src`.
pub fn spatial_padding<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    padding: &Padding2D,
    color: &[u8; C],
) -> Result<(), ImgprocError> {
    let expected = padding.padded_size(src.size());
    if expected != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        )
        .into());
    }

    dst.as_slice_mut()
        .chunks_exact_mut(C)
        .for_each(|chunk| chunk.copy_from_slice(color));

    let new_stride = dst.width() * C;
    let old_stride = src.width() * C;
    if old_stride == 0 || src.height() == 0 {
        return Ok(());
    }

    // copy old image data as center of new image data
    let col_offset = padding.left * C;
    dst.as_slice_mut()
        .par_chunks_exact_mut(new_stride)
        .skip(padding.top)
        .zip(src.as_slice().par_chunks_exact(old_stride))
        .for_each(|(dst_row, src_row)| {
            dst_row[col_offset..col_offset + old_stride].copy_from_slice(src_row);
        });

    Ok(())
}

/// Pad an image with a constant color.
///
/// # Examples
///
/// ```
/// use tessera_image::{Image, ImageSize};
/// use tessera_imgproc::padding::{pad_constant, Padding2D};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 1, height: 1 }, vec![5]).unwrap();
/// let padding = Padding2D { top: 1, bottom: 0, left: 0, right: 1 };
///
/// let padded = pad_constant(&image, &padding, &[0]).unwrap();
/// assert_eq!(padded.as_slice(), &[0, 0, 5, 0]);
/// ```
pub fn pad_constant<const C: usize>(
    src: &Image<u8, C>,
    padding: &Padding2D,
    color: &[u8; C],
) -> Result<Image<u8, C>, ImgprocError> {
    let mut dst = Image::from_size_val(padding.padded_size(src.size()), 0u8)?;
    spatial_padding(src, &mut dst, padding, color)?;
    Ok(dst)
}

/// Center an image inside a larger canvas filled with its top-left color.
///
/// The image is written at floor((target - size) / 2) on each axis, so when the
/// difference is odd the extra pixel of padding is at the bottom or right.
///
/// # Arguments
///
/// * `src` - The image to center. Must not be empty.
/// * `target` - The size of the canvas.
///
/// # Errors
///
/// Returns [`ImgprocError::TargetTooSmall`] if `target` is smaller than `src`
/// on any axis.
///
/// # Examples
///
/// ```
/// use tessera_image::{Image, ImageSize};
/// use tessera_imgproc::padding::pad_to_center;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![1, 2]).unwrap();
///
/// let padded = pad_to_center(&image, ImageSize { width: 3, height: 2 }).unwrap();
/// assert_eq!(padded.as_slice(), &[1, 2, 1, 1, 1, 1]);
/// ```
pub fn pad_to_center<const C: usize>(
    src: &Image<u8, C>,
    target: ImageSize,
) -> Result<Image<u8, C>, ImgprocError> {
    let (left, top) = geometry::center_offset(src.size(), target)
        .ok_or(ImgprocError::TargetTooSmall(src.size(), target))?;

    let mut color = [0u8; C];
    color.copy_from_slice(src.pixel(0, 0)?);

    let padding = Padding2D {
        top,
        bottom: target.height - src.height() - top,
        left,
        right: target.width - src.width() - left,
    };

    pad_constant(src, &padding, &color)
}
