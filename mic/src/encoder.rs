//! MIC encoding pipeline.

use crate::bitio::BitWriter;
use crate::container::{self, HEADER_LEN};
use crate::dct;
use crate::entropy;
use crate::error::{Error, Result};
use crate::quant;
use crate::types::{Block, Format, PlaneId, PlaneOffset, RgbImage, StreamHeader, Yuv422Image};

/// Compress an RGB image into a complete MIC stream.
///
/// The image dimensions must be non-zero multiples of 16, so that every
/// plane — chroma included, at half width — tiles into whole 8×8 blocks.
pub fn encode(image: &RgbImage, format: Format) -> Result<Vec<u8>> {
    check_dimensions(image.width(), image.height())?;

    let yuv = downconvert(image);

    let mut writer = BitWriter::new();
    let mut offsets = [PlaneOffset { byte: 0, bit: 0 }; 3];
    for plane in PlaneId::ALL {
        let (byte, bit) = writer.position();
        offsets[plane.index()] = PlaneOffset {
            byte: (HEADER_LEN + byte) as u32,
            bit,
        };
        encode_plane(
            &mut writer,
            yuv.plane(plane),
            yuv.plane_width(plane),
            yuv.height(),
            format,
        );
    }
    let body = writer.finish();

    let header = StreamHeader {
        format,
        rows: image.height() as u16,
        cols: image.width() as u16,
        offsets,
    };
    let mut stream = Vec::with_capacity(HEADER_LEN + body.len());
    container::write_header(&mut stream, &header)?;
    stream.extend_from_slice(&body);
    Ok(stream)
}

pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<()> {
    let legal = |n: usize| n != 0 && n % 16 == 0 && n <= usize::from(u16::MAX);
    if legal(width) && legal(height) {
        Ok(())
    } else {
        Err(Error::InvalidDimensions(width, height))
    }
}

/// Convert to YUV and decimate the chroma planes to half width.
///
/// The chroma rows keep their pre-filter headroom between the matrix and
/// the decimator, so they travel as i32 until filtered.
fn downconvert(image: &RgbImage) -> Yuv422Image {
    let (width, height) = (image.width(), image.height());
    let mut yuv = Yuv422Image::new(width, height);
    let mut u = vec![0i32; width];
    let mut v = vec![0i32; width];
    for row in 0..height {
        mic_rs_yuv::rgb_row_to_yuv(image.row(row), yuv.y_row_mut(row), &mut u, &mut v);
        mic_rs_yuv::downsample_chroma_row(&u, yuv.u_row_mut(row));
        mic_rs_yuv::downsample_chroma_row(&v, yuv.v_row_mut(row));
    }
    yuv
}

fn encode_plane(
    writer: &mut BitWriter,
    plane: &[u8],
    width: usize,
    height: usize,
    format: Format,
) {
    for block_row in 0..height / 8 {
        for block_col in 0..width / 8 {
            let mut block = fetch_block(plane, width, block_row, block_col);
            dct::forward_block(&mut block);
            quant::quantize_block(&mut block, format);
            entropy::encode_block(&block, writer);
        }
    }
}

fn fetch_block(plane: &[u8], width: usize, block_row: usize, block_col: usize) -> Block {
    let mut block: Block = [[0; 8]; 8];
    for (i, row) in block.iter_mut().enumerate() {
        let base = (block_row * 8 + i) * width + block_col * 8;
        for (j, sample) in row.iter_mut().enumerate() {
            *sample = i32::from(plane[base + j]);
        }
    }
    block
}
