//! PSNR image comparison.

use mic_rs::{Error, Result, RgbImage};

/// Peak signal-to-noise ratio between two same-size images, in dB.
///
/// Identical images compare as infinity.
pub fn psnr(a: &RgbImage, b: &RgbImage) -> Result<f64> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(Error::SizeMismatch);
    }

    let total: u64 = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| {
            let diff = i64::from(x) - i64::from(y);
            (diff * diff) as u64
        })
        .sum();
    let mse = total as f64 / a.data().len() as f64;
    Ok(20.0 * (255.0 / mse.sqrt()).log10())
}
