use tessera_image::{ImageError, ImageSize};

/// An error type for the image processing operations.
#[derive(thiserror::Error, Debug)]
pub enum ImgprocError {
    /// Error coming from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The seed position lies outside of the image.
    #[error("Seed position ({0}, {1}) is outside of the image ({2}x{3})")]
    OutOfBounds(usize, usize, usize, usize),

    /// The segmentation found no foreground pixel.
    #[error("No foreground pixel found, the crop region is undefined")]
    EmptyForeground,

    /// The resize request did not select exactly one sizing mode.
    #[error("Exactly one sizing mode must be given, got {0}")]
    AmbiguousSizing(usize),

    /// The resize ratio is zero, negative or not finite.
    #[error("Invalid ratio {0}/{1}")]
    InvalidRatio(f64, f64),

    /// The resize scale is zero, negative or not finite.
    #[error("Invalid scale factor {0}")]
    InvalidScale(f64),

    /// The segmentation threshold is negative or NaN.
    #[error("Invalid threshold {0}, expected a non-negative value")]
    InvalidThreshold(f32),

    /// The padding target is smaller than the source image.
    #[error("Target size {1} is smaller than the image size {0}")]
    TargetTooSmall(ImageSize, ImageSize),

    /// The mosaic grid cannot hold all the images.
    #[error("A {0}x{1} grid cannot hold {2} images")]
    GridTooSmall(usize, usize, usize),

    /// The mosaic options are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The crop window does not fit inside the source image.
    #[error("Crop window {2} at ({0}, {1}) does not fit in the image {3}")]
    InvalidCropRegion(usize, usize, ImageSize, ImageSize),

    /// The operation does not support this number of channels.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannels(usize),

    /// The resampling backend rejected the image buffer.
    #[error("Invalid resize buffer: {0}")]
    ResizeBuffer(#[from] fast_image_resize::ImageBufferError),

    /// The resampling backend failed.
    #[error("Resize failed: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),
}
