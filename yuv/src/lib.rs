//! Pixel-format conversion for the MIC codec: the integer RGB↔YUV
//! matrices and the 4:2:2 chroma resampling filters, all bit-exact against
//! the companion hardware datapath.

mod bt601;
mod chroma;

pub use bt601::{rgb_row_to_yuv, yuv_row_to_rgb};
pub use chroma::{downsample_chroma_row, upsample_chroma_row};
