//! Binary PPM (P6) reading and writing.

use byteorder::ReadBytesExt;
use mic_rs::{Error, Result, RgbImage};
use std::io::{Read, Write};

/// Parse a binary P6 image with 8-bit samples.
///
/// The header is a whitespace-separated token stream — `P6`, width,
/// height, then a maxval that must be 255 — with exactly one whitespace
/// byte between the maxval and the sample data.
pub fn read_ppm<R: Read>(reader: &mut R) -> Result<RgbImage> {
    if read_token(reader)? != "P6" {
        return Err(Error::InvalidPpmHeader);
    }
    let width = read_dimension(reader)?;
    let height = read_dimension(reader)?;
    if read_token(reader)? != "255" {
        return Err(Error::InvalidPpmHeader);
    }

    // the token scan consumed the single whitespace byte after the maxval
    let mut data = vec![0u8; width * height * 3];
    reader.read_exact(&mut data)?;
    Ok(RgbImage::from_raw(width, height, data))
}

/// Write a binary P6 image with 8-bit samples.
pub fn write_ppm<W: Write>(writer: &mut W, image: &RgbImage) -> Result<()> {
    write!(writer, "P6\n{} {}\n255\n", image.width(), image.height())?;
    writer.write_all(image.data())?;
    Ok(())
}

/// Read one whitespace-delimited ASCII token, consuming the delimiter that
/// ends it.
fn read_token<R: Read>(reader: &mut R) -> Result<String> {
    let mut byte = reader.read_u8().map_err(|_| Error::InvalidPpmHeader)?;
    while byte.is_ascii_whitespace() {
        byte = reader.read_u8().map_err(|_| Error::InvalidPpmHeader)?;
    }

    let mut token = String::new();
    while !byte.is_ascii_whitespace() {
        token.push(char::from(byte));
        byte = reader.read_u8().map_err(|_| Error::InvalidPpmHeader)?;
    }
    Ok(token)
}

fn read_dimension<R: Read>(reader: &mut R) -> Result<usize> {
    let value: usize = read_token(reader)?
        .parse()
        .map_err(|_| Error::InvalidPpmHeader)?;
    if value == 0 || value > usize::from(u16::MAX) {
        return Err(Error::InvalidPpmHeader);
    }
    Ok(value)
}
