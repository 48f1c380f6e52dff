//! stego-jpeg CLI — encode a hidden message into a baseline JPEG, decode it
//! back out, or inspect a stego JPEG's headers without a password.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use stego_jpeg::Config;

#[derive(Parser)]
#[command(name = "stego-jpeg")]
#[command(author = "stego-jpeg contributors")]
#[command(version)]
#[command(about = "Baseline JPEG codec with DCT-domain steganographic embedding", long_about = None)]
#[command(after_help = "EXAMPLES:
    stego-jpeg encode -i cover.ppm -o out.jpg -m \"hello world\" -p secret
    stego-jpeg decode -i out.jpg -p secret
    stego-jpeg analyze -i out.jpg")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message in a PPM cover image, writing a stego JPEG
    #[command(visible_alias = "e")]
    Encode {
        /// Cover image, PPM (P6) format
        #[arg(short, long)]
        input: PathBuf,
        /// Output stego JPEG path
        #[arg(short, long)]
        output: PathBuf,
        /// Message to hide
        #[arg(short, long)]
        message: String,
        /// Password to store (obfuscated) alongside the message
        #[arg(short, long)]
        password: String,
        /// JPEG quality, 1-100
        #[arg(short, long, default_value = "80")]
        quality: u32,
    },

    /// Recover the hidden message from a stego JPEG
    #[command(visible_alias = "d")]
    Decode {
        /// Stego JPEG path
        #[arg(short, long)]
        input: PathBuf,
        /// Password to check against the stored one
        #[arg(short, long)]
        password: String,
    },

    /// Report header facts about a stego JPEG without a password
    #[command(visible_alias = "a")]
    Analyze {
        /// Stego JPEG path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            message,
            password,
            quality,
        } => encode_command(&input, &output, &message, &password, quality),
        Commands::Decode { input, password } => decode_command(&input, &password),
        Commands::Analyze { input } => analyze_command(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn encode_command(
    input: &PathBuf,
    output: &PathBuf,
    message: &str,
    password: &str,
    quality: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let (rgb, width, height) = read_ppm(input)?;
    let config = Config::from_env();
    let bytes = stego_jpeg::encode(&rgb, width, height, message, password, quality, &config)?;
    fs::write(output, &bytes)?;
    println!("encoded {width}x{height} cover to {output:?} ({} bytes)", bytes.len());
    Ok(())
}

fn decode_command(input: &PathBuf, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let config = Config::from_env();
    let message = stego_jpeg::decode(&data, password, &config)?;
    println!("{message}");
    Ok(())
}

fn analyze_command(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let report = stego_jpeg::analyze(&data)?;
    println!(
        "{}x{} ({} x {} MCUs); message_length={} has_password={} used_mcus={} capacity={}",
        report.width,
        report.height,
        report.mcu_cols,
        report.mcu_rows,
        report.message_length_bytes,
        report.has_password,
        report.used_mcus,
        report.total_capacity,
    );
    Ok(())
}

/// Reads a binary PPM (P6) file into an interleaved RGB raster.
fn read_ppm(path: &PathBuf) -> Result<(Vec<u8>, u32, u32), Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    let mut cursor = 0usize;
    let magic = read_ppm_token(&bytes, &mut cursor)?;
    if magic != "P6" {
        return Err("only binary PPM (P6) covers are supported".into());
    }
    let width: u32 = read_ppm_token(&bytes, &mut cursor)?.parse()?;
    let height: u32 = read_ppm_token(&bytes, &mut cursor)?.parse()?;
    let max_value: u32 = read_ppm_token(&bytes, &mut cursor)?.parse()?;
    if max_value != 255 {
        return Err("only 8-bit (maxval 255) PPM covers are supported".into());
    }
    cursor += 1; // single whitespace byte separating the header from pixel data
    let pixel_bytes = (width * height * 3) as usize;
    let pixels = bytes
        .get(cursor..cursor + pixel_bytes)
        .ok_or("PPM pixel data shorter than width*height*3")?
        .to_vec();
    Ok((pixels, width, height))
}

fn read_ppm_token(bytes: &[u8], cursor: &mut usize) -> Result<String, Box<dyn std::error::Error>> {
    while *cursor < bytes.len() && bytes[*cursor].is_ascii_whitespace() {
        *cursor += 1;
    }
    let start = *cursor;
    while *cursor < bytes.len() && !bytes[*cursor].is_ascii_whitespace() {
        *cursor += 1;
    }
    if start == *cursor {
        return Err("truncated PPM header".into());
    }
    Ok(String::from_utf8(bytes[start..*cursor].to_vec())?)
}

/// Writes an interleaved RGB raster as a binary PPM (P6) file. Used by
/// demo tooling that needs to inspect a decoded/generated raster; the core
/// pipeline itself never reconstructs pixels (see crate docs).
#[allow(dead_code)]
fn write_ppm(
    path: &PathBuf,
    rgb: &[u8],
    width: u32,
    height: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = format!("P6\n{width} {height}\n255\n").into_bytes();
    out.extend_from_slice(rgb);
    fs::write(path, out)?;
    Ok(())
}
