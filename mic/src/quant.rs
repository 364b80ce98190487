//! Position-dependent quantization and dequantization.

use crate::types::{Block, Format};

/// Right-shift applied on the diagonal `d = i + j` under `format`.
///
/// The decoder's multiplier table mirrors this one exactly, including the
/// DC position, which uses a shift of 3 in every format.
fn shift_for(format: Format, d: usize) -> u32 {
    match format {
        Format::Q0 => {
            if d >= 8 {
                6
            } else if d >= 6 {
                5
            } else if d >= 4 {
                4
            } else if d >= 2 {
                3
            } else if d >= 1 {
                2
            } else {
                3
            }
        }
        Format::Q1 => {
            if d >= 8 {
                5
            } else if d >= 6 {
                4
            } else if d >= 4 {
                3
            } else if d >= 2 {
                2
            } else if d >= 1 {
                2
            } else {
                3
            }
        }
        Format::Q2 => {
            if d >= 8 {
                4
            } else if d >= 6 {
                3
            } else if d >= 4 {
                2
            } else if d >= 2 {
                1
            } else if d >= 1 {
                1
            } else {
                3
            }
        }
    }
}

/// Quantize a transformed block in place.
///
/// Divides by the position's power of two with round-to-nearest (ties
/// toward +∞) and clamps to the 9-bit coded range.
pub fn quantize_block(block: &mut Block, format: Format) {
    for i in 0..8 {
        for j in 0..8 {
            let s = shift_for(format, i + j);
            let q = (block[i][j] + (1 << (s - 1))) >> s;
            block[i][j] = q.clamp(-256, 255);
        }
    }
}

/// Dequantization multiplier for the row-major position `pos`.
pub fn multiplier(format: Format, pos: usize) -> i32 {
    1 << shift_for(format, pos / 8 + pos % 8)
}
