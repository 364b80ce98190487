//! Run-length and variable-length coding of quantized blocks.

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::quant;
use crate::scan::SCAN_PATTERN;
use crate::types::{Block, Format};
use std::io::Read;

// 2-bit symbol tags, shared with the hardware tables.
const ZERO_RUN: u32 = 0;
const CODE_9: u32 = 1;
const CODE_3: u32 = 2;
const BLOCK_END: u32 = 3;

/// Entropy-encode one quantized block into the writer.
///
/// The block is walked in zigzag order. Zero runs of up to eight are coded
/// in 5 bits (a run field of 0 meaning eight), coefficients in [−4, 3] in
/// 5 bits, any other coefficient in 11 bits, and a 2-bit end code covers
/// every trailing zero.
pub fn encode_block(block: &Block, writer: &mut BitWriter) {
    let mut scanned = [0i32; 64];
    for (value, &pos) in scanned.iter_mut().zip(SCAN_PATTERN.iter()) {
        *value = block[pos / 8][pos % 8];
    }

    let mut i = 0;
    while i < 64 {
        let mut j = 0;
        while i + j < 64 && scanned[i + j] == 0 {
            j += 1;
        }
        if i + j < 64 {
            let mut run = j as u32;
            while run >= 8 {
                writer.write_bits(ZERO_RUN << 3, 5);
                run -= 8;
            }
            if run > 0 {
                writer.write_bits((ZERO_RUN << 3) | run, 5);
            }

            let value = scanned[i + j];
            if (-4..4).contains(&value) {
                writer.write_bits((CODE_3 << 3) | (value as u32 & 0x7), 5);
            } else {
                writer.write_bits((CODE_9 << 9) | (value as u32 & 0x1FF), 11);
            }
        } else {
            writer.write_bits(BLOCK_END, 2);
        }
        i += j + 1;
    }
}

/// Decode one block from the reader, dequantizing coefficients as they
/// arrive.
///
/// Streams are not required to be canonically encoded: any mix of runs,
/// coefficients and an end code that fills the 64 zigzag positions is
/// accepted, and a run reaching past the last position simply completes
/// the block.
pub fn decode_block<R: Read>(reader: &mut BitReader<R>, format: Format) -> Result<Block> {
    let mut block: Block = [[0; 8]; 8];
    let mut k = 0;
    while k < 64 {
        let tag: u32 = reader.read_bits(2)?;
        match tag {
            ZERO_RUN => {
                let run: u32 = reader.read_bits(3)?;
                let run = if run == 0 { 8 } else { run as usize };
                k = (k + run).min(64);
            }
            CODE_9 => {
                let value: i32 = reader.read_signed_bits(9)?;
                if !(-256..=255).contains(&value) {
                    return Err(Error::CoefficientOutOfRange);
                }
                let pos = SCAN_PATTERN[k];
                block[pos / 8][pos % 8] = value * quant::multiplier(format, pos);
                k += 1;
            }
            CODE_3 => {
                let value: i32 = reader.read_signed_bits(3)?;
                let pos = SCAN_PATTERN[k];
                block[pos / 8][pos % 8] = value * quant::multiplier(format, pos);
                k += 1;
            }
            BLOCK_END => {
                k = 64;
            }
            _ => return Err(Error::InvalidCode),
        }
    }
    Ok(block)
}
