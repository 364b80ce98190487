//! 4:2:2 chroma resampling filters.
//!
//! Both filters work on single rows: the decimator takes the full-width
//! unclamped chroma produced by the color matrix, the interpolator takes
//! the half-width decoded plane. Source indices past either edge are
//! clamped to the row.

/// Decimate one full-width chroma row to half width.
///
/// Symmetric 7-tap low-pass kernel (22, −52, 159, 256, 159, −52, 22)/512
/// over every even column, rounded before the shift and clamped to
/// [0, 255].
pub fn downsample_chroma_row(src: &[i32], dst: &mut [u8]) {
    let width = src.len();
    debug_assert_eq!(width % 2, 0);
    debug_assert_eq!(width / 2, dst.len());

    for (half, out) in dst.iter_mut().enumerate() {
        let j = half * 2;
        let at = |index: usize| src[index.min(width - 1)];
        let sum = 22 * at(j.saturating_sub(5)) - 52 * at(j.saturating_sub(3))
            + 159 * at(j.saturating_sub(1))
            + 256 * at(j)
            + 159 * at(j + 1)
            - 52 * at(j + 3)
            + 22 * at(j + 5);
        *out = ((sum + 256) >> 9).clamp(0, 255) as u8;
    }
}

/// Interpolate one half-width chroma row back to full width.
///
/// Even output columns copy the co-sited sample. Odd columns apply the
/// 6-tap kernel (21, −52, 159, 159, −52, 21)/256 across the neighboring
/// samples. The output is not clamped here; the color matrix clamps.
pub fn upsample_chroma_row(src: &[u8], dst: &mut [i32]) {
    let half_width = src.len();
    debug_assert_eq!(half_width * 2, dst.len());

    for (j, out) in dst.iter_mut().enumerate() {
        let h = j / 2;
        if j % 2 == 0 {
            *out = i32::from(src[h]);
        } else {
            let at = |index: usize| i32::from(src[index.min(half_width - 1)]);
            let sum = 21 * at(h.saturating_sub(2)) - 52 * at(h.saturating_sub(1))
                + 159 * at(h)
                + 159 * at(h + 1)
                - 52 * at(h + 2)
                + 21 * at(h + 3);
            *out = (sum + 128) >> 8;
        }
    }
}
