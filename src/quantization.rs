//! Quantisation matrix construction and application.

use crate::config::BLOCK_DIM;

/// ITU-T T.81 Annex K.1 luminance quantisation matrix, in row-major order
/// (quality 50). This codec uses this single matrix for luma and chroma
/// alike — see [`scaled_quant_table`] and the two-DQT-segments note in
/// the segment writer.
pub const BASE_LUMINANCE_QUANT_TABLE: [u8; BLOCK_DIM] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Scales [`BASE_LUMINANCE_QUANT_TABLE`] by the IJG quality formula:
/// `scale = quality < 50 ? 5000/quality : 200 - 2*quality`,
/// `q = clamp(round((scale * base + 50) / 100), 1, 255)`.
///
/// `quality` is expected in `1..=100`; callers are responsible for clamping
/// before calling (the orchestrator validates this at the API boundary).
pub fn scaled_quant_table(quality: u32) -> [u8; BLOCK_DIM] {
    let quality = quality.clamp(1, 100);
    let scale = if quality < 50 {
        5000 / quality
    } else {
        200 - 2 * quality
    };

    let mut table = [0u8; BLOCK_DIM];
    for (dst, &base) in table.iter_mut().zip(BASE_LUMINANCE_QUANT_TABLE.iter()) {
        let val = (base as u32 * scale + 50) / 100;
        *dst = val.clamp(1, 255) as u8;
    }
    table
}

/// Quantises a row-major 8x8 block of DCT coefficients: `q = round(f / Q)`.
pub fn quantize(coeffs: &[i16; BLOCK_DIM], table: &[u8; BLOCK_DIM]) -> [i16; BLOCK_DIM] {
    let mut out = [0i16; BLOCK_DIM];
    for i in 0..BLOCK_DIM {
        let f = coeffs[i] as f64;
        let q = table[i] as f64;
        out[i] = (f / q).round() as i16;
    }
    out
}

/// Inverse of [`quantize`], used only by third-party conformance checks;
/// the decoder pipeline itself never reconstructs pixels.
pub fn dequantize(coeffs: &[i16; BLOCK_DIM], table: &[u8; BLOCK_DIM]) -> [i16; BLOCK_DIM] {
    let mut out = [0i16; BLOCK_DIM];
    for i in 0..BLOCK_DIM {
        out[i] = (coeffs[i] as i32 * table[i] as i32) as i16;
    }
    out
}
