/*!
# stego-jpeg

A baseline JPEG (ITU-T T.81) encoder/decoder that hides a byte payload in
the least-significant bits of quantised DCT coefficients of the Cb plane.

## What's here

- A from-scratch baseline JPEG codec: forward DCT, quality-scaled
  quantisation, zigzag, canonical Huffman encode/decode, byte-stuffed
  bitstream, and full SOI..EOI segment I/O.
- A pattern-cycling LSB embed/extract scheme tied to [`config::EMBED_PATTERNS`].
- Two obfuscation layers that are part of the on-disk format, not
  cryptographic protection: a position-dependent Caesar shift for the
  payload, and AES-128-CBC/Base64 for the password comment.

## Safety

No `unsafe`. The codec never reconstructs pixels on decode (no IDCT, no
chroma upsampling) — analysis and extraction only need the quantised
coefficients.
*/

pub mod bitstream;
pub mod caesar;
pub mod component;
pub mod config;
pub mod crypto;
pub mod dct;
pub mod decoder;
pub mod embed;
pub mod encoder;
pub mod error;
pub mod huffman;
pub mod marker;
pub mod quantization;
pub mod stream_reader;
pub mod stream_writer;
pub mod zigzag;

pub use component::{EncodeComponent, DecodeComponent};
pub use config::Config;
pub use decoder::AnalyzeReport;
pub use error::{Result, StegoError};

/// Encodes an RGB raster into a stego baseline JPEG. See
/// [`encoder::encode`] for the full pipeline.
pub fn encode(
    rgb: &[u8],
    width: u32,
    height: u32,
    message: &str,
    password: &str,
    quality: u32,
    config: &Config,
) -> Result<Vec<u8>> {
    encoder::encode(rgb, width, height, message, password, quality, config)
}

/// Decodes a stego baseline JPEG's hidden message, checking `password`
/// against the stored one first. See [`decoder::decode`].
pub fn decode(jpeg_bytes: &[u8], password: &str, config: &Config) -> Result<String> {
    decoder::decode(jpeg_bytes, password, config)
}

/// Parses headers and reports capacity/length facts without checking a
/// password. See [`decoder::analyze`].
pub fn analyze(jpeg_bytes: &[u8]) -> Result<AnalyzeReport> {
    decoder::analyze(jpeg_bytes)
}

/// `(w/8) * (h/8) * 2` bytes: the maximum payload a raster of this size
/// can carry.
pub fn capacity(width: u32, height: u32) -> usize {
    encoder::capacity(width, height)
}
