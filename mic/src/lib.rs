//! Pure-Rust codec for the McMaster Image Codec (MIC) format.
//!
//! The encoder turns 24-bit RGB images into MIC streams (YUV 4:2:2
//! conversion, 8×8 DCT, position-keyed quantization, zigzag run-length
//! coding); the decoder reverses the process. All arithmetic is fixed-point
//! integer and bit-exact against the companion hardware implementation.

mod bitio;
mod container;
mod dct;
mod decoder;
mod encoder;
mod entropy;
mod error;
mod quant;
mod scan;
mod traits;
mod types;

pub use container::{read_header, write_header, HEADER_LEN};
pub use decoder::{decode, DecodedImage, OffsetMismatch};
pub use encoder::encode;
pub use error::{Error, Result};
pub use types::{Format, PlaneId, PlaneOffset, RgbImage, StreamHeader, Yuv422Image};
