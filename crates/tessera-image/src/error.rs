/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size ({0}x{1}), expected ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the number of samples of an image does not fit in memory.
    #[error("Image size ({0}x{1}) with {2} channels overflows the sample count")]
    SizeOverflow(usize, usize, usize),

    /// Error when a size cannot be represented in the target integer type.
    #[error("Failed to cast image size")]
    CastError,

    /// Error when a ratio has a zero or non-finite denominator.
    #[error("Invalid ratio {0}/{1}")]
    InvalidRatio(f64, f64),
}
