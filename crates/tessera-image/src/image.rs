use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use tessera_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// assert_eq!(image_size.area(), 200);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Number of samples of an image with `channels` channels, or `None` on overflow.
    pub fn num_samples(&self, channels: usize) -> Option<usize> {
        self.width.checked_mul(self.height)?.checked_mul(channels)
    }

    /// Returns true if either axis is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if the size is not larger than `other` on any axis.
    pub fn fits_within(&self, other: &ImageSize) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Multiply both axes by `factor`, truncating to whole pixels.
    ///
    /// Returns `None` if either product is negative, not finite or does not
    /// fit in a `usize`.
    pub fn scaled(&self, factor: f64) -> Option<ImageSize> {
        Some(ImageSize {
            width: num_traits::cast((self.width as f64 * factor).floor())?,
            height: num_traits::cast((self.height as f64 * factor).floor())?,
        })
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored row-major with shape (H, W, C), where H is the height of the image,
/// W is the width and C the number of interleaved channels.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Returns
    ///
    /// A new image with the given pixel data.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, or the
    /// size overflows the number of addressable samples, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let num_samples = size
            .num_samples(CHANNELS)
            .ok_or(ImageError::SizeOverflow(size.width, size.height, CHANNELS))?;

        // check if the data length matches the image size
        if data.len() != num_samples {
            return Err(ImageError::InvalidChannelShape(data.len(), num_samples));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The value every sample of the image is set to.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   }, 0u8).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let num_samples = size
            .num_samples(CHANNELS)
            .ok_or(ImageError::SizeOverflow(size.width, size.height, CHANNELS))?;
        Image::new(size, vec![val; num_samples])
    }

    /// Create a new image with every pixel set to `pixel`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_pixel(
    ///     ImageSize { width: 2, height: 1 },
    ///     &[1, 2, 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.as_slice(), &[1, 2, 3, 1, 2, 3]);
    /// ```
    pub fn from_size_pixel(size: ImageSize, pixel: &[T; CHANNELS]) -> Result<Self, ImageError>
    where
        T: Copy,
    {
        let num_samples = size
            .num_samples(CHANNELS)
            .ok_or(ImageError::SizeOverflow(size.width, size.height, CHANNELS))?;
        let mut data = Vec::with_capacity(num_samples);
        for _ in 0..size.area() {
            data.extend_from_slice(pixel);
        }
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get all the channels of the pixel at (`row`, `col`).
    ///
    /// # Errors
    ///
    /// If the pixel is outside of the image, an error is returned.
    pub fn pixel(&self, row: usize, col: usize) -> Result<&[T], ImageError> {
        if row >= self.height() || col >= self.width() {
            return Err(ImageError::PixelIndexOutOfBounds(
                col,
                row,
                self.width(),
                self.height(),
            ));
        }
        let offset = (row * self.width() + col) * CHANNELS;
        Ok(&self.data[offset..offset + CHANNELS])
    }
}
