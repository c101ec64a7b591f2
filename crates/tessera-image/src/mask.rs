use crate::image::Image;

/// A single channel mask with values in `{BACKGROUND, FOREGROUND}`.
pub type Mask = Image<u8, 1>;

/// Mask value of background pixels.
pub const BACKGROUND: u8 = 0;

/// Mask value of foreground pixels.
pub const FOREGROUND: u8 = 255;

/// Returns true if every value of the mask is either background or foreground.
pub fn is_binary(mask: &Mask) -> bool {
    mask.as_slice()
        .iter()
        .all(|&v| v == BACKGROUND || v == FOREGROUND)
}

/// Number of mask pixels equal to `value`.
pub fn count(mask: &Mask, value: u8) -> usize {
    mask.as_slice().iter().filter(|&&v| v == value).count()
}
