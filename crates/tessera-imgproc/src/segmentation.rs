use std::collections::VecDeque;

use tessera_image::{
    mask::{BACKGROUND, FOREGROUND},
    Image, Mask,
};

use crate::{
    core::{check_rgb_convertible, copy_rgb, pixel_distance},
    error::ImgprocError,
    parallel,
};

/// Default tolerance used to detect the background color.
pub const DEFAULT_THRESHOLD: f32 = 10.0;

/// How the pixels similar to the seed are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentationMode {
    /// Grow a 4-connected region from the seed.
    #[default]
    Fill,
    /// Threshold every pixel of the image against the seed value.
    Value,
}

/// Parameters of the background segmentation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentationParams {
    /// Maximum Euclidean distance to the seed value for a pixel to be background.
    pub threshold: f32,
    /// Seed position as (row, col).
    pub seed: (usize, usize),
    /// Fill or value mode.
    pub mode: SegmentationMode,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            seed: (0, 0),
            mode: SegmentationMode::Fill,
        }
    }
}

/// Compute a background mask from the color found at a seed position.
///
/// The distance of a pixel is the Euclidean distance over all channels between the
/// pixel and the seed pixel. Pixels at a distance `<= threshold` are background.
/// In [`SegmentationMode::Fill`] only the background pixels 4-connected to the seed
/// through other background pixels are kept; the tolerance is always measured
/// against the seed value, never between neighbours.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `threshold` - The background tolerance. Must be non-negative.
/// * `seed` - The (row, col) position of the background color.
/// * `mode` - The segmentation mode.
///
/// # Returns
///
/// A mask of the same size as `src` with background pixels set to 0 and
/// foreground pixels set to 255.
///
/// # Examples
///
/// ```
/// use tessera_image::{Image, ImageSize};
/// use tessera_imgproc::segmentation::{segment, SegmentationMode};
///
/// #[rustfmt::skip]
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 3 }, vec![
///     0, 0, 0,
///     0, 200, 0,
///     0, 0, 0,
/// ]).unwrap();
///
/// let mask = segment(&image, 10.0, (0, 0), SegmentationMode::Fill).unwrap();
/// assert_eq!(mask.as_slice(), &[0, 0, 0, 0, 255, 0, 0, 0, 0]);
/// ```
pub fn segment<const C: usize>(
    src: &Image<u8, C>,
    threshold: f32,
    seed: (usize, usize),
    mode: SegmentationMode,
) -> Result<Mask, ImgprocError> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(ImgprocError::InvalidThreshold(threshold));
    }

    let (row, col) = seed;
    if row >= src.rows() || col >= src.cols() {
        return Err(ImgprocError::OutOfBounds(row, col, src.cols(), src.rows()));
    }

    let mut seed_value = [0u8; C];
    seed_value.copy_from_slice(src.pixel(row, col)?);

    let mask = match mode {
        SegmentationMode::Fill => flood_fill(src, threshold, seed, &seed_value)?,
        SegmentationMode::Value => {
            let mut mask = Mask::from_size_val(src.size(), FOREGROUND)?;
            parallel::par_iter_rows(src, &mut mask, |pixel, out| {
                out[0] = if pixel_distance(pixel, &seed_value) <= threshold {
                    BACKGROUND
                } else {
                    FOREGROUND
                };
            });
            mask
        }
    };

    Ok(mask)
}

/// Same as [`segment`] with the parameters grouped in a [`SegmentationParams`].
pub fn segment_with<const C: usize>(
    src: &Image<u8, C>,
    params: &SegmentationParams,
) -> Result<Mask, ImgprocError> {
    segment(src, params.threshold, params.seed, params.mode)
}

// breadth-first region growing over the 4-neighbourhood
fn flood_fill<const C: usize>(
    src: &Image<u8, C>,
    threshold: f32,
    seed: (usize, usize),
    seed_value: &[u8; C],
) -> Result<Mask, ImgprocError> {
    let (rows, cols) = (src.rows(), src.cols());
    let data = src.as_slice();
    let mut mask = Mask::from_size_val(src.size(), FOREGROUND)?;
    let out = mask.as_slice_mut();

    let is_background = |idx: usize| {
        pixel_distance(&data[idx * C..(idx + 1) * C], seed_value) <= threshold
    };

    let mut queue = VecDeque::new();
    let start = seed.0 * cols + seed.1;
    out[start] = BACKGROUND;
    queue.push_back(seed);

    while let Some((y, x)) = queue.pop_front() {
        let mut visit = |ny: usize, nx: usize| {
            let idx = ny * cols + nx;
            if out[idx] == FOREGROUND && is_background(idx) {
                out[idx] = BACKGROUND;
                queue.push_back((ny, nx));
            }
        };

        if y > 0 {
            visit(y - 1, x);
        }
        if y + 1 < rows {
            visit(y + 1, x);
        }
        if x > 0 {
            visit(y, x - 1);
        }
        if x + 1 < cols {
            visit(y, x + 1);
        }
    }

    log::debug!(
        "flood fill from {:?}: {} background pixels",
        seed,
        out.iter().filter(|&&v| v == BACKGROUND).count()
    );

    Ok(mask)
}

/// Remove the background of an image into its alpha channel.
///
/// The background is detected with [`segment`]. The RGB channels of the output
/// copy the first three channels of `src` (gray images are replicated) and the
/// alpha channel is the mask: 0 on the background, 255 on the foreground.
///
/// # Returns
///
/// The RGBA image and the mask used for its alpha channel.
///
/// # Examples
///
/// ```
/// use tessera_image::{Image, ImageSize};
/// use tessera_imgproc::segmentation::{remove_background, SegmentationMode};
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![255, 255, 255, 10, 20, 30],
/// ).unwrap();
///
/// let (rgba, mask) = remove_background(&image, 10.0, (0, 0), SegmentationMode::Fill).unwrap();
/// assert_eq!(mask.as_slice(), &[0, 255]);
/// assert_eq!(rgba.as_slice(), &[255, 255, 255, 0, 10, 20, 30, 255]);
/// ```
pub fn remove_background<const C: usize>(
    src: &Image<u8, C>,
    threshold: f32,
    seed: (usize, usize),
    mode: SegmentationMode,
) -> Result<(Image<u8, 4>, Mask), ImgprocError> {
    check_rgb_convertible::<C>()?;

    let mask = segment(src, threshold, seed, mode)?;

    let mut rgba = Image::<u8, 4>::from_size_val(src.size(), 0)?;
    parallel::par_iter_rows_two(src, &mask, &mut rgba, |pixel, alpha, out| {
        copy_rgb(pixel, &mut out[..3]);
        out[3] = alpha[0];
    });

    Ok((rgba, mask))
}
