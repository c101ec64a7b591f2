#![deny(missing_docs)]
//! Image types and geometry helpers for pixel-buffer processing

/// image representation for pixel-buffer processing.
pub mod image;

/// Error types for the image module.
pub mod error;

/// shape, ratio and bounding box arithmetic.
pub mod geometry;

/// binary background/foreground masks.
pub mod mask;

pub use crate::error::ImageError;
pub use crate::geometry::BoundingBox;
pub use crate::image::{Image, ImageSize};
pub use crate::mask::Mask;
