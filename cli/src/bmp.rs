//! Uncompressed 24-bit BMP parsing for the `parse` verb.

use byteorder::{LittleEndian, ReadBytesExt};
use mic_rs::{Error, Result, RgbImage};
use std::io::Read;

/// Parse an uncompressed 24-bit BMP image.
///
/// Handles the common BITMAPINFOHEADER layout: bottom-up (positive height)
/// or top-down rows, BGR sample order, rows padded to four bytes.
pub fn read_bmp<R: Read>(reader: &mut R) -> Result<RgbImage> {
    let mut magic = [0u8; 2];
    reader
        .read_exact(&mut magic)
        .map_err(|_| Error::InvalidBmpHeader)?;
    if &magic != b"BM" {
        return Err(Error::InvalidBmpHeader);
    }
    let _file_size = reader.read_u32::<LittleEndian>()?;
    let _reserved = reader.read_u32::<LittleEndian>()?;
    let data_offset = reader.read_u32::<LittleEndian>()? as usize;

    let dib_size = reader.read_u32::<LittleEndian>()?;
    if dib_size < 40 {
        return Err(Error::UnsupportedBmp);
    }
    let width = reader.read_i32::<LittleEndian>()?;
    let height = reader.read_i32::<LittleEndian>()?;
    let planes = reader.read_u16::<LittleEndian>()?;
    let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
    let compression = reader.read_u32::<LittleEndian>()?;
    if planes != 1 || bits_per_pixel != 24 || compression != 0 {
        return Err(Error::UnsupportedBmp);
    }
    if width <= 0 || height == 0 || width > 65535 || height.unsigned_abs() > 65535 {
        return Err(Error::InvalidBmpHeader);
    }
    let top_down = height < 0;
    let width = width as usize;
    let height = height.unsigned_abs() as usize;

    // skip the rest of the DIB header and any palette up to the pixel array
    let consumed = 14 + 20;
    if data_offset < consumed {
        return Err(Error::InvalidBmpHeader);
    }
    skip(reader, data_offset - consumed)?;

    let row_bytes = width * 3;
    let padding = (4 - row_bytes % 4) % 4;
    let mut image = RgbImage::new(width, height);
    let mut row = vec![0u8; row_bytes + padding];
    for index in 0..height {
        reader.read_exact(&mut row).map_err(|_| Error::EndOfStream)?;
        let target = if top_down { index } else { height - 1 - index };
        for (pixel, bgr) in image
            .row_mut(target)
            .chunks_exact_mut(3)
            .zip(row.chunks_exact(3))
        {
            pixel[0] = bgr[2];
            pixel[1] = bgr[1];
            pixel[2] = bgr[0];
        }
    }
    Ok(image)
}

fn skip<R: Read>(reader: &mut R, mut count: usize) -> Result<()> {
    let mut chunk = [0u8; 64];
    while count > 0 {
        let step = count.min(chunk.len());
        reader
            .read_exact(&mut chunk[..step])
            .map_err(|_| Error::InvalidBmpHeader)?;
        count -= step;
    }
    Ok(())
}
