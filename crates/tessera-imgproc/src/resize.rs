use fast_image_resize as fr;
use tessera_image::{geometry, Image, ImageError, ImageSize};

use crate::error::ImgprocError;

/// Interpolation mode for the resize operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation.
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation.
    Nearest,
}

/// The size requested from [`resize`], given by exactly one sizing mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeTarget {
    /// Explicit output size.
    Dimensions(ImageSize),
    /// Width over height. The height is kept and the width derived from it.
    RatioFraction(f64),
    /// Ratio given by its two components. The height is kept and the width is
    /// `height * width_component / height_component`.
    RatioPair {
        /// Height component of the ratio.
        height: f64,
        /// Width component of the ratio.
        width: f64,
    },
    /// Uniform scale factor applied to both axes.
    Scale(f64),
}

impl ResizeTarget {
    /// Build a target from optional sizing modes, as handed over by a command line.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::AmbiguousSizing`] unless exactly one option is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_imgproc::resize::ResizeTarget;
    ///
    /// let target = ResizeTarget::from_options(None, None, None, Some(0.5)).unwrap();
    /// assert_eq!(target, ResizeTarget::Scale(0.5));
    ///
    /// assert!(ResizeTarget::from_options(None, Some(1.5), None, Some(0.5)).is_err());
    /// ```
    pub fn from_options(
        dimensions: Option<ImageSize>,
        ratio_fraction: Option<f64>,
        ratio_pair: Option<(f64, f64)>,
        scale: Option<f64>,
    ) -> Result<Self, ImgprocError> {
        let targets = [
            dimensions.map(ResizeTarget::Dimensions),
            ratio_fraction.map(ResizeTarget::RatioFraction),
            ratio_pair.map(|(height, width)| ResizeTarget::RatioPair { height, width }),
            scale.map(ResizeTarget::Scale),
        ];

        let mut selected = targets.into_iter().flatten();
        match (selected.next(), selected.count()) {
            (Some(target), 0) => Ok(target),
            (None, _) => Err(ImgprocError::AmbiguousSizing(0)),
            (Some(_), rest) => Err(ImgprocError::AmbiguousSizing(rest + 1)),
        }
    }

    /// Compute the output size for an input of size `src`.
    ///
    /// Fractional sizes are truncated.
    ///
    /// # Errors
    ///
    /// * [`ImgprocError::InvalidRatio`] or [`ImgprocError::InvalidScale`] for
    ///   zero, negative or non-finite factors.
    /// * [`ImageError::InvalidImageSize`] if an axis truncates to zero.
    /// * [`ImageError::CastError`] if an axis does not fit the 32-bit sizes of
    ///   the resampling backend.
    pub fn output_size(&self, src: ImageSize) -> Result<ImageSize, ImgprocError> {
        let size = match *self {
            ResizeTarget::Dimensions(size) => size,
            ResizeTarget::RatioFraction(ratio) => {
                if !ratio.is_finite() || ratio <= 0.0 {
                    return Err(ImgprocError::InvalidRatio(ratio, 1.0));
                }
                with_ratio(src, ratio)?
            }
            ResizeTarget::RatioPair { height, width } => {
                // a zero width component yields a zero ratio and is rejected below
                let ratio = geometry::ratio(width, height)
                    .map_err(|_| ImgprocError::InvalidRatio(width, height))?;
                if ratio <= 0.0 {
                    return Err(ImgprocError::InvalidRatio(width, height));
                }
                with_ratio(src, ratio)?
            }
            ResizeTarget::Scale(scale) => {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(ImgprocError::InvalidScale(scale));
                }
                src.scaled(scale).ok_or(ImageError::CastError)?
            }
        };

        if size.is_empty() {
            return Err(ImageError::InvalidImageSize(
                size.width,
                size.height,
                src.width,
                src.height,
            )
            .into());
        }

        to_u32(size.width)?;
        to_u32(size.height)?;

        Ok(size)
    }
}

// the vertical extent is kept, only the width follows the ratio
fn with_ratio(src: ImageSize, ratio: f64) -> Result<ImageSize, ImageError> {
    let width = num_traits::cast((src.height as f64 * ratio).floor())
        .ok_or(ImageError::CastError)?;
    Ok(ImageSize {
        width,
        height: src.height,
    })
}

fn pixel_type<const C: usize>() -> Result<fr::PixelType, ImgprocError> {
    match C {
        1 => Ok(fr::PixelType::U8),
        2 => Ok(fr::PixelType::U8x2),
        3 => Ok(fr::PixelType::U8x3),
        4 => Ok(fr::PixelType::U8x4),
        _ => Err(ImgprocError::UnsupportedChannels(C)),
    }
}

fn to_u32(value: usize) -> Result<u32, ImageError> {
    num_traits::cast(value).ok_or(ImageError::CastError)
}

/// Resize an image into a preallocated destination using the
/// [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// The output size is the size of `dst`.
///
/// # Errors
///
/// The function returns an error if either image is empty or the number of
/// channels is not supported.
pub fn resize_fast<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImgprocError> {
    if src.size().is_empty() || dst.size().is_empty() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        )
        .into());
    }

    let pixel_type = pixel_type::<C>()?;

    if src.size() == dst.size() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let src_image = fr::images::ImageRef::new(
        to_u32(src.width())?,
        to_u32(src.height())?,
        src.as_slice(),
        pixel_type,
    )?;

    let mut dst_image = fr::images::Image::new(
        to_u32(dst.width())?,
        to_u32(dst.height())?,
        pixel_type,
    );

    // alpha is resampled as an independent channel
    let options = fr::ResizeOptions::new()
        .resize_alg(match interpolation {
            InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
        })
        .use_alpha(false);

    fr::Resizer::new().resize(&src_image, &mut dst_image, &options)?;

    dst.as_slice_mut().copy_from_slice(dst_image.buffer());

    Ok(())
}

/// Resize an image with bilinear interpolation.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `target` - The requested output size.
///
/// # Returns
///
/// A new image with the same number of channels as `src`.
///
/// # Example
///
/// ```
/// use tessera_image::{Image, ImageSize};
/// use tessera_imgproc::resize::{resize, ResizeTarget};
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 5 }, 0).unwrap();
///
/// let resized = resize(&image, ResizeTarget::RatioFraction(2.0)).unwrap();
/// assert_eq!(resized.num_channels(), 3);
/// assert_eq!(resized.size(), ImageSize { width: 10, height: 5 });
/// ```
pub fn resize<const C: usize>(
    src: &Image<u8, C>,
    target: ResizeTarget,
) -> Result<Image<u8, C>, ImgprocError> {
    resize_with(src, target, InterpolationMode::Bilinear)
}

/// Resize an image with the given interpolation mode.
pub fn resize_with<const C: usize>(
    src: &Image<u8, C>,
    target: ResizeTarget,
    interpolation: InterpolationMode,
) -> Result<Image<u8, C>, ImgprocError> {
    let new_size = target.output_size(src.size())?;
    log::debug!("resize {} -> {} ({:?})", src.size(), new_size, interpolation);

    let mut dst = Image::from_size_val(new_size, 0u8)?;
    resize_fast(src, &mut dst, interpolation)?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_dimensions() -> Result<(), ImgprocError> {
        let image = Image::<u8, 4>::from_size_val([4, 5].into(), 7)?;
        let resized = resize(&image, ResizeTarget::Dimensions([2, 3].into()))?;
        assert_eq!(resized.num_channels(), 4);
        assert_eq!(resized.size(), ImageSize::from([2, 3]));
        Ok(())
    }

    #[test]
    fn resize_constant_image_is_constant() -> Result<(), ImgprocError> {
        let image = Image::<u8, 3>::from_size_pixel([8, 6].into(), &[10, 100, 200])?;
        for mode in [InterpolationMode::Bilinear, InterpolationMode::Nearest] {
            let resized = resize_with(&image, ResizeTarget::Dimensions([5, 3].into()), mode)?;
            for (v, expected) in resized.as_slice().iter().zip([10u8, 100, 200].iter().cycle()) {
                assert!(v.abs_diff(*expected) <= 1);
            }
        }
        Ok(())
    }

    #[test]
    fn resize_scale_one_keeps_size() -> Result<(), ImgprocError> {
        let data = (0..7 * 3).map(|v| v as u8).collect();
        let image = Image::<u8, 1>::new([7, 3].into(), data)?;
        let resized = resize(&image, ResizeTarget::Scale(1.0))?;
        assert_eq!(resized.size(), image.size());
        Ok(())
    }

    #[test]
    fn resize_scale_truncates() -> Result<(), ImgprocError> {
        let image = Image::<u8, 3>::from_size_val([5, 3].into(), 0)?;
        let resized = resize(&image, ResizeTarget::Scale(1.5))?;
        assert_eq!(resized.size(), ImageSize::from([7, 4]));
        Ok(())
    }

    #[test]
    fn resize_ratio_keeps_height() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 30,
            height: 20,
        };
        assert_eq!(
            ResizeTarget::RatioFraction(0.5).output_size(size)?,
            ImageSize::from([10, 20])
        );
        assert_eq!(
            ResizeTarget::RatioPair {
                height: 4.0,
                width: 3.0
            }
            .output_size(size)?,
            ImageSize::from([15, 20])
        );
        Ok(())
    }

    #[test]
    fn resize_invalid_requests() {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        assert!(matches!(
            ResizeTarget::RatioPair {
                height: 1.0,
                width: 0.0
            }
            .output_size(size),
            Err(ImgprocError::InvalidRatio(_, _))
        ));
        assert!(matches!(
            ResizeTarget::RatioPair {
                height: 0.0,
                width: 1.0
            }
            .output_size(size),
            Err(ImgprocError::InvalidRatio(_, _))
        ));
        assert!(matches!(
            ResizeTarget::Scale(-1.0).output_size(size),
            Err(ImgprocError::InvalidScale(_))
        ));
        assert!(matches!(
            ResizeTarget::Scale(0.1).output_size(size),
            Err(ImgprocError::Image(ImageError::InvalidImageSize(0, 0, 3, 2)))
        ));
    }

    #[test]
    fn resize_output_too_large() -> Result<(), ImgprocError> {
        let image = Image::<u8, 3>::from_size_val([4, 4].into(), 1)?;
        assert!(matches!(
            resize(&image, ResizeTarget::Scale(1e30)),
            Err(ImgprocError::Image(ImageError::CastError))
        ));
        assert!(matches!(
            resize(
                &image,
                ResizeTarget::Dimensions(ImageSize {
                    width: usize::MAX,
                    height: 2
                })
            ),
            Err(ImgprocError::Image(ImageError::CastError))
        ));
        assert!(matches!(
            resize(&image, ResizeTarget::RatioFraction(f64::MAX)),
            Err(ImgprocError::Image(ImageError::CastError))
        ));
        Ok(())
    }

    #[test]
    fn resize_from_options() {
        assert!(matches!(
            ResizeTarget::from_options(None, None, None, None),
            Err(ImgprocError::AmbiguousSizing(0))
        ));
        assert!(matches!(
            ResizeTarget::from_options(Some([1, 1].into()), Some(1.0), Some((1.0, 2.0)), None),
            Err(ImgprocError::AmbiguousSizing(3))
        ));
        assert_eq!(
            ResizeTarget::from_options(None, None, Some((3.0, 4.0)), None).ok(),
            Some(ResizeTarget::RatioPair {
                height: 3.0,
                width: 4.0
            })
        );
    }

    #[test]
    fn resize_unsupported_channels() -> Result<(), ImgprocError> {
        let image = Image::<u8, 5>::from_size_val([2, 2].into(), 0)?;
        assert!(matches!(
            resize(&image, ResizeTarget::Scale(2.0)),
            Err(ImgprocError::UnsupportedChannels(5))
        ));
        Ok(())
    }
}
