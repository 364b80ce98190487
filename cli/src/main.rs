//! Command-line driver for the MIC codec tools.

mod bmp;
mod compare;
mod ppm;

use clap::{Parser, Subcommand};
use mic_rs::{Format, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "mic", about = "McMaster Image Codec encoder, decoder and helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an uncompressed 24-bit BMP image into a binary PPM image
    Parse { input: PathBuf, output: PathBuf },

    /// Compress a PPM image into a MIC stream
    Encode {
        input: PathBuf,
        /// Compression format (0 = smallest file, 2 = highest fidelity)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=2))]
        format: u8,
        output: PathBuf,
    },

    /// Decompress a MIC stream into a PPM image
    Decode { input: PathBuf, output: PathBuf },

    /// Report the PSNR between two same-size PPM images
    Compare { a: PathBuf, b: PathBuf },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse { input, output } => {
            let image = bmp::read_bmp(&mut BufReader::new(File::open(input)?))?;
            ppm::write_ppm(&mut BufWriter::new(File::create(output)?), &image)
        }
        Command::Encode {
            input,
            format,
            output,
        } => {
            let image = ppm::read_ppm(&mut BufReader::new(File::open(input)?))?;
            let stream = mic_rs::encode(&image, Format::from_value(format)?)?;
            std::fs::write(output, stream)?;
            Ok(())
        }
        Command::Decode { input, output } => {
            let decoded = mic_rs::decode(BufReader::new(File::open(input)?))?;
            for mismatch in &decoded.offset_mismatches {
                eprintln!(
                    "warning: plane {} recorded at byte {} bit {} but found at byte {} bit {}",
                    mismatch.plane,
                    mismatch.recorded.byte,
                    mismatch.recorded.bit,
                    mismatch.observed.byte,
                    mismatch.observed.bit,
                );
            }
            ppm::write_ppm(&mut BufWriter::new(File::create(output)?), &decoded.image)
        }
        Command::Compare { a, b } => {
            let first = ppm::read_ppm(&mut BufReader::new(File::open(a)?))?;
            let second = ppm::read_ppm(&mut BufReader::new(File::open(b)?))?;
            let psnr = compare::psnr(&first, &second)?;
            println!(
                "Compared {} pixels, PSNR: {:.4}",
                first.width() * first.height(),
                psnr
            );
            Ok(())
        }
    }
}
