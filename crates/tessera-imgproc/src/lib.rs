#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// per-pixel channel helpers shared by the operations.
pub mod core;

/// image cropping module.
pub mod crop;

/// Error types for the image processing operations.
pub mod error;

/// grid composition of several images.
pub mod mosaic;

/// image padding module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// background segmentation module.
pub mod segmentation;

pub use crate::error::ImgprocError;
