use crate::error::ImgprocError;

/// Euclidean distance between two pixels over all their channels.
///
/// # Examples
///
/// ```
/// use tessera_imgproc::core::pixel_distance;
///
/// assert_eq!(pixel_distance(&[0, 0, 0], &[3, 4, 0]), 5.0);
/// ```
pub fn pixel_distance(a: &[u8], b: &[u8]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f32 - y as f32;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

/// Fails unless `C` channels can be reduced to RGB (gray, RGB or RGBA).
pub fn check_rgb_convertible<const C: usize>() -> Result<(), ImgprocError> {
    match C {
        1 | 3 | 4 => Ok(()),
        _ => Err(ImgprocError::UnsupportedChannels(C)),
    }
}

/// Write the RGB part of `pixel` into `rgb`.
///
/// Gray pixels are replicated into the three channels and any channel past the
/// third (alpha) is dropped. Call [`check_rgb_convertible`] first.
#[inline]
pub fn copy_rgb(pixel: &[u8], rgb: &mut [u8]) {
    if pixel.len() == 1 {
        rgb[..3].fill(pixel[0]);
    } else {
        rgb[..3].copy_from_slice(&pixel[..3]);
    }
}
