//! MIC decoding pipeline.

use crate::bitio::BitReader;
use crate::container::{self, HEADER_LEN};
use crate::dct;
use crate::encoder::check_dimensions;
use crate::entropy;
use crate::error::Result;
use crate::types::{Block, Format, PlaneId, PlaneOffset, RgbImage, Yuv422Image};
use std::io::Read;

/// A fully decoded image plus the offset diagnostics gathered on the way.
#[derive(Debug)]
pub struct DecodedImage {
    /// The reconstructed RGB image.
    pub image: RgbImage,

    /// Planes whose recorded header offset disagreed with the position at
    /// which their data was actually found. Mismatches never affect the
    /// pixel output — the stream is decoded serially — they flag a
    /// disagreement between the header and the coded data.
    pub offset_mismatches: Vec<OffsetMismatch>,
}

/// A disagreement between a header offset record and the observed stream
/// position of a plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OffsetMismatch {
    pub plane: PlaneId,
    pub recorded: PlaneOffset,
    pub observed: PlaneOffset,
}

/// Decompress a MIC stream into an RGB image.
pub fn decode<R: Read>(mut source: R) -> Result<DecodedImage> {
    let header = container::read_header(&mut source)?;
    let width = usize::from(header.cols);
    let height = usize::from(header.rows);
    check_dimensions(width, height)?;

    let mut reader = BitReader::from_source(source);
    let mut yuv = Yuv422Image::new(width, height);
    let mut offset_mismatches = Vec::new();
    for plane in PlaneId::ALL {
        let observed = stream_position(&reader);
        let recorded = header.offsets[plane.index()];
        if recorded != observed {
            offset_mismatches.push(OffsetMismatch {
                plane,
                recorded,
                observed,
            });
        }
        decode_plane(&mut reader, &mut yuv, plane, header.format)?;
    }

    Ok(DecodedImage {
        image: upconvert(&yuv),
        offset_mismatches,
    })
}

fn stream_position<R: Read>(reader: &BitReader<R>) -> PlaneOffset {
    let bits = reader.consumed_bits();
    PlaneOffset {
        byte: HEADER_LEN as u32 + (bits / 8) as u32,
        bit: (bits % 8) as u8,
    }
}

fn decode_plane<R: Read>(
    reader: &mut BitReader<R>,
    yuv: &mut Yuv422Image,
    plane: PlaneId,
    format: Format,
) -> Result<()> {
    let width = yuv.plane_width(plane);
    let height = yuv.height();
    for block_row in 0..height / 8 {
        for block_col in 0..width / 8 {
            let mut block = entropy::decode_block(reader, format)?;
            dct::inverse_block(&mut block);
            write_block(yuv.plane_mut(plane), width, block_row, block_col, &block);
        }
    }
    Ok(())
}

fn write_block(plane: &mut [u8], width: usize, block_row: usize, block_col: usize, block: &Block) {
    for (i, row) in block.iter().enumerate() {
        let base = (block_row * 8 + i) * width + block_col * 8;
        for (j, sample) in row.iter().enumerate() {
            plane[base + j] = *sample as u8;
        }
    }
}

/// Interpolate the chroma planes back to full width and convert to RGB.
///
/// The interpolated chroma stays unclamped on its way into the color
/// matrix; only the final RGB channels are clamped.
fn upconvert(yuv: &Yuv422Image) -> RgbImage {
    let (width, height) = (yuv.width(), yuv.height());
    let mut image = RgbImage::new(width, height);
    let mut u = vec![0i32; width];
    let mut v = vec![0i32; width];
    for row in 0..height {
        mic_rs_yuv::upsample_chroma_row(yuv.u_row(row), &mut u);
        mic_rs_yuv::upsample_chroma_row(yuv.v_row(row), &mut v);
        mic_rs_yuv::yuv_row_to_rgb(yuv.y_row(row), &u, &v, image.row_mut(row));
    }
    image
}

#[cfg(test)]
mod tests {
    use super::{decode, OffsetMismatch};
    use crate::encoder::encode;
    use crate::error::Error;
    use crate::types::{Format, PlaneId, PlaneOffset, RgbImage};

    fn solid_image(width: usize, height: usize, rgb: [u8; 3]) -> RgbImage {
        let mut image = RgbImage::new(width, height);
        for row in 0..height {
            for pixel in image.row_mut(row).chunks_exact_mut(3) {
                pixel.copy_from_slice(&rgb);
            }
        }
        image
    }

    fn pixel(image: &RgbImage, x: usize, y: usize) -> [u8; 3] {
        let row = image.row(y);
        [row[x * 3], row[x * 3 + 1], row[x * 3 + 2]]
    }

    fn psnr(a: &RgbImage, b: &RgbImage) -> f64 {
        let total: u64 = a
            .data()
            .iter()
            .zip(b.data())
            .map(|(&x, &y)| {
                let d = i64::from(x) - i64::from(y);
                (d * d) as u64
            })
            .sum();
        let mse = total as f64 / a.data().len() as f64;
        20.0 * (255.0 / mse.sqrt()).log10()
    }

    /// A smooth ramp with mild multiplicative texture; enough detail that
    /// the three formats produce strictly distinct streams.
    fn textured_image() -> RgbImage {
        let mut image = RgbImage::new(64, 64);
        for i in 0..64 {
            let row = image.row_mut(i);
            for j in 0..64 {
                let r = ((i * 4).min(255) as i32 + (((i * j) >> 3) & 15) as i32 - 8)
                    .clamp(0, 255) as u8;
                let g = (j * 4).min(255) as u8;
                let b = ((i + j) * 2).min(255) as u8;
                row[j * 3..j * 3 + 3].copy_from_slice(&[r, g, b]);
            }
        }
        image
    }

    fn two_tone_image() -> RgbImage {
        let mut image = RgbImage::new(16, 16);
        for y in 0..16 {
            let row = image.row_mut(y);
            for x in 0..16 {
                let px = [
                    ((x / 2) * 32 % 256) as u8,
                    (y * 16 % 256) as u8,
                    ((x + y) * 8 % 256) as u8,
                ];
                row[x * 3..x * 3 + 3].copy_from_slice(&px);
            }
        }
        image
    }

    #[test]
    fn uniform_gray_round_trips_to_its_quantized_gray() {
        let image = solid_image(16, 16, [128, 128, 128]);
        let stream = encode(&image, Format::Q0).unwrap();
        let decoded = decode(&stream[..]).unwrap();

        assert!(decoded.offset_mismatches.is_empty());
        for chunk in decoded.image.data().chunks_exact(3) {
            assert_eq!([126, 126, 126], chunk[..]);
        }
    }

    #[test]
    fn solid_black_round_trips_exactly() {
        let image = solid_image(16, 16, [0, 0, 0]);
        let stream = encode(&image, Format::Q0).unwrap();
        let decoded = decode(&stream[..]).unwrap();
        assert_eq!(image.data(), decoded.image.data());
    }

    #[test]
    fn a_single_red_pixel_survives_in_the_corner() {
        let mut image = solid_image(16, 16, [0, 0, 0]);
        image.row_mut(0)[..3].copy_from_slice(&[255, 0, 0]);
        let stream = encode(&image, Format::Q0).unwrap();
        let decoded = decode(&stream[..]).unwrap();

        // the exact reconstruction of the reference pipeline
        assert_eq!([144, 10, 37], pixel(&decoded.image, 0, 0));
        assert_eq!([87, 0, 6], pixel(&decoded.image, 1, 0));
        assert_eq!([56, 5, 10], pixel(&decoded.image, 0, 1));
        assert_eq!([17, 0, 0], pixel(&decoded.image, 1, 1));

        // the energy stays in the corner: chroma ringing is bounded and
        // the background barely lifts off black
        for y in 0..16 {
            for x in 0..16 {
                let [r, g, b] = pixel(&decoded.image, x, y);
                assert!(g <= 37 && b <= 37, "({}, {})", x, y);
                if x > 3 || y > 3 {
                    assert!(r <= 13, "({}, {})", x, y);
                }
            }
        }
        assert!(psnr(&image, &decoded.image) >= 32.0);
    }

    #[test]
    fn a_horizontal_gradient_stays_monotonic() {
        let mut image = RgbImage::new(32, 16);
        for y in 0..16 {
            let row = image.row_mut(y);
            for x in 0..32 {
                row[x * 3] = (x * 8).min(255) as u8;
            }
        }
        let stream = encode(&image, Format::Q1).unwrap();
        let decoded = decode(&stream[..]).unwrap();

        assert_eq!(
            [
                3, 7, 15, 24, 32, 40, 49, 56, 66, 72, 81, 90, 98, 103, 111, 119, 129, 135, 143,
                152, 159, 168, 176, 184, 192, 199, 208, 217, 225, 234, 239, 242,
            ],
            core::array::from_fn::<u8, 32, _>(|x| pixel(&decoded.image, x, 0)[0])
        );
        for y in 0..16 {
            for x in 0..31 {
                assert!(
                    pixel(&decoded.image, x, y)[0] <= pixel(&decoded.image, x + 1, y)[0],
                    "({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn formats_trade_size_for_fidelity() {
        let image = textured_image();
        let mut sizes = Vec::new();
        let mut ratios = Vec::new();
        for format in [Format::Q0, Format::Q1, Format::Q2] {
            let stream = encode(&image, format).unwrap();
            let decoded = decode(&stream[..]).unwrap();
            assert!(decoded.offset_mismatches.is_empty());
            sizes.push(stream.len());
            ratios.push(psnr(&image, &decoded.image));
        }

        assert_eq!(vec![614, 804, 1116], sizes);
        assert!(ratios[0] < ratios[1] && ratios[1] < ratios[2]);
        assert!(ratios[0] >= 35.0);
        assert!(ratios[1] >= 32.0);
        assert!(ratios[2] >= 28.0);
    }

    #[test]
    fn a_tampered_offset_is_diagnosed_but_harmless() {
        let image = two_tone_image();
        let stream = encode(&image, Format::Q2).unwrap();
        let reference = decode(&stream[..]).unwrap();
        assert!(reference.offset_mismatches.is_empty());

        // nudge the U plane's recorded bit offset by three
        let mut tampered = stream.clone();
        assert_eq!(3, tampered[15]);
        tampered[15] += 3;
        let decoded = decode(&tampered[..]).unwrap();

        assert_eq!(
            vec![OffsetMismatch {
                plane: PlaneId::U,
                recorded: PlaneOffset { byte: 67, bit: 6 },
                observed: PlaneOffset { byte: 67, bit: 3 },
            }],
            decoded.offset_mismatches
        );
        assert_eq!(reference.image.data(), decoded.image.data());
    }

    #[test]
    fn truncation_is_a_premature_end_of_stream() {
        let image = solid_image(16, 16, [128, 128, 128]);
        let stream = encode(&image, Format::Q0).unwrap();

        let error = decode(&stream[..25]).unwrap_err();
        assert!(matches!(error, Error::EndOfStream));
        assert_eq!("premature end of stream", error.to_string());
    }

    #[test]
    fn a_flipped_magic_byte_is_rejected() {
        let image = solid_image(16, 16, [128, 128, 128]);
        let mut stream = encode(&image, Format::Q0).unwrap();
        stream[0] = 0xEB;
        assert!(matches!(decode(&stream[..]), Err(Error::BadMagic)));
    }

    #[test]
    fn off_grid_header_dimensions_are_rejected() {
        let image = solid_image(16, 16, [128, 128, 128]);
        let mut stream = encode(&image, Format::Q0).unwrap();
        stream[5] = 0x18; // rows = 24
        assert!(matches!(
            decode(&stream[..]),
            Err(Error::InvalidDimensions(16, 24))
        ));
    }

    #[test]
    fn residual_header_format_is_rejected() {
        let image = solid_image(16, 16, [128, 128, 128]);
        let mut stream = encode(&image, Format::Q0).unwrap();
        stream[3] = 0x03;
        assert!(matches!(decode(&stream[..]), Err(Error::BadFormat(3))));
    }
}
