//! MIC container framing.
//!
//! A stream is a fixed 20-byte header followed by the entropy-coded color
//! data, Y then U then V, padded to a 16-bit word. All multi-byte fields
//! are big-endian; each plane offset packs a 24-bit absolute byte position
//! with an 8-bit bit position.

use crate::error::{Error, Result};
use crate::types::{Format, PlaneOffset, StreamHeader};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, ErrorKind, Read, Write};

/// Length of the fixed stream header in bytes.
pub const HEADER_LEN: usize = 20;

const MAGIC: [u8; 3] = [0xEC, 0xE7, 0x44];

fn short_header(error: io::Error) -> Error {
    if error.kind() == ErrorKind::UnexpectedEof {
        Error::EndOfStream
    } else {
        error.into()
    }
}

/// Parse the stream header.
///
/// Only the low two bits of the format byte are interpreted; the residual
/// value 3 names no quantization table and is rejected.
pub fn read_header<R: Read>(reader: &mut R) -> Result<StreamHeader> {
    let mut magic = [0u8; 3];
    reader.read_exact(&mut magic).map_err(short_header)?;
    if magic != MAGIC {
        return Err(Error::BadMagic);
    }

    let format = Format::from_value(reader.read_u8().map_err(short_header)? & 0x03)?;
    let rows = reader.read_u16::<BigEndian>().map_err(short_header)?;
    let cols = reader.read_u16::<BigEndian>().map_err(short_header)?;

    let mut offsets = [PlaneOffset { byte: 0, bit: 0 }; 3];
    for offset in offsets.iter_mut() {
        let packed = reader.read_u32::<BigEndian>().map_err(short_header)?;
        *offset = PlaneOffset {
            byte: packed >> 8,
            bit: (packed & 0xFF) as u8,
        };
    }

    Ok(StreamHeader {
        format,
        rows,
        cols,
        offsets,
    })
}

/// Serialize the stream header.
pub fn write_header<W: Write>(writer: &mut W, header: &StreamHeader) -> Result<()> {
    writer.write_all(&MAGIC)?;
    writer.write_u8(header.format.as_value())?;
    writer.write_u16::<BigEndian>(header.rows)?;
    writer.write_u16::<BigEndian>(header.cols)?;
    for offset in header.offsets.iter() {
        writer.write_u32::<BigEndian>((offset.byte << 8) | u32::from(offset.bit))?;
    }
    Ok(())
}
