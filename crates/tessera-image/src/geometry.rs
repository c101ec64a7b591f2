use crate::{error::ImageError, image::ImageSize, mask::Mask};

/// Compute the aspect ratio of a size as width / height.
///
/// # Errors
///
/// Returns [`ImageError::InvalidRatio`] if the height is zero.
///
/// # Examples
///
/// ```
/// use tessera_image::{geometry::aspect_ratio, ImageSize};
///
/// let ratio = aspect_ratio(ImageSize { width: 200, height: 100 }).unwrap();
/// assert_eq!(ratio, 2.0);
/// ```
pub fn aspect_ratio(size: ImageSize) -> Result<f64, ImageError> {
    ratio(size.width as f64, size.height as f64)
}

/// Divide `numerator` by `denominator`, rejecting zero or non-finite denominators.
pub fn ratio(numerator: f64, denominator: f64) -> Result<f64, ImageError> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return Err(ImageError::InvalidRatio(numerator, denominator));
    }
    Ok(numerator / denominator)
}

/// Offset (x, y) that centers `inner` inside `outer`.
///
/// Each axis uses floor((outer - inner) / 2), so an odd remainder is left on the
/// trailing side. Returns `None` if `inner` does not fit inside `outer`.
///
/// # Examples
///
/// ```
/// use tessera_image::{geometry::center_offset, ImageSize};
///
/// let offset = center_offset([3, 2].into(), [6, 6].into());
/// assert_eq!(offset, Some((1, 2)));
/// ```
pub fn center_offset(inner: ImageSize, outer: ImageSize) -> Option<(usize, usize)> {
    if !inner.fits_within(&outer) {
        return None;
    }
    Some((
        (outer.width - inner.width) / 2,
        (outer.height - inner.height) / 2,
    ))
}

/// An axis-aligned bounding box with inclusive pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Leftmost column.
    pub x_min: usize,
    /// Topmost row.
    pub y_min: usize,
    /// Rightmost column.
    pub x_max: usize,
    /// Bottom row.
    pub y_max: usize,
}

impl BoundingBox {
    /// Smallest box enclosing every pixel of `mask` equal to `value`.
    ///
    /// Returns `None` if no pixel matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_image::{BoundingBox, Image, ImageSize};
    ///
    /// #[rustfmt::skip]
    /// let mask = Image::<u8, 1>::new(ImageSize { width: 3, height: 3 }, vec![
    ///     0, 0, 0,
    ///     0, 255, 255,
    ///     0, 0, 0,
    /// ]).unwrap();
    ///
    /// let bbox = BoundingBox::from_mask(&mask, 255).unwrap();
    /// assert_eq!((bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max), (1, 1, 2, 1));
    /// ```
    pub fn from_mask(mask: &Mask, value: u8) -> Option<Self> {
        let cols = mask.cols();
        if cols == 0 {
            return None;
        }

        let mut bbox: Option<BoundingBox> = None;
        for (y, row) in mask.as_slice().chunks_exact(cols).enumerate() {
            let first = row.iter().position(|&v| v == value);
            let last = row.iter().rposition(|&v| v == value);
            if let (Some(x0), Some(x1)) = (first, last) {
                bbox = Some(match bbox {
                    None => BoundingBox {
                        x_min: x0,
                        y_min: y,
                        x_max: x1,
                        y_max: y,
                    },
                    Some(b) => BoundingBox {
                        x_min: b.x_min.min(x0),
                        y_min: b.y_min,
                        x_max: b.x_max.max(x1),
                        y_max: y,
                    },
                });
            }
        }
        bbox
    }

    /// Width of the box in pixels.
    pub fn width(&self) -> usize {
        self.x_max - self.x_min + 1
    }

    /// Height of the box in pixels.
    pub fn height(&self) -> usize {
        self.y_max - self.y_min + 1
    }

    /// Size of the box in pixels.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Grow the box by `margin` pixels on every side, clamped to `bounds`.
    pub fn expand(&self, margin: usize, bounds: ImageSize) -> Self {
        BoundingBox {
            x_min: self.x_min.saturating_sub(margin),
            y_min: self.y_min.saturating_sub(margin),
            x_max: (self.x_max + margin).min(bounds.width.saturating_sub(1)),
            y_max: (self.y_max + margin).min(bounds.height.saturating_sub(1)),
        }
    }
}
