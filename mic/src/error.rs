//! Error types for MIC encoding and decoding.

use thiserror::Error;

/// Any error that may occur while encoding or decoding a MIC stream.
///
/// Every error is fatal: the codec is a bulk transform and never attempts
/// recovery or partial output.
#[derive(Debug, Error)]
pub enum Error {
    /// The image handed to the encoder, or claimed by a stream header, has
    /// dimensions the format cannot carry. Rows and columns must be non-zero
    /// multiples of 16 no larger than 65535.
    #[error("image dimensions {0}x{1} are not non-zero multiples of 16")]
    InvalidDimensions(usize, usize),

    /// The source file is not a binary P6 PPM image with 8-bit samples.
    #[error("invalid PPM header")]
    InvalidPpmHeader,

    /// The source file is not a BMP image.
    #[error("invalid BMP header")]
    InvalidBmpHeader,

    /// The BMP is real but uses a variant the parser does not handle.
    #[error("unsupported BMP variant (expected uncompressed 24-bit)")]
    UnsupportedBmp,

    /// The stream does not start with the MIC magic sequence.
    #[error("not a MIC stream")]
    BadMagic,

    /// The format field selects a quantization table that does not exist.
    #[error("unsupported compression format {0}")]
    BadFormat(u8),

    /// The stream ended in the middle of a coded block.
    #[error("premature end of stream")]
    EndOfStream,

    /// A tag that is not part of the entropy code was read.
    #[error("unrecognized code in bitstream")]
    InvalidCode,

    /// A decoded coefficient fell outside the 9-bit quantized range.
    #[error("coefficient outside the representable 9-bit range")]
    CoefficientOutOfRange,

    /// The images handed to the comparator have different dimensions.
    #[error("size mismatch between compared images")]
    SizeMismatch,

    /// The codec violated one of its own invariants. This is a bug in the
    /// codec, not bad input.
    #[error("internal codec error")]
    InternalCodecError,

    /// A raw I/O error surfaced by the underlying reader or writer.
    #[error("unhandled I/O error: {0}")]
    UnhandledIoError(#[from] std::io::Error),
}

/// A `Result` that defaults to this crate's `Error` type.
pub type Result<T> = std::result::Result<T, Error>;
