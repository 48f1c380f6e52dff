//! Forward 8x8 DCT with pre-computed separable coefficients.
//!
//! `F = C * B * C^T` where `C[0][j] = 1/sqrt(8)` and, for `i >= 1`,
//! `C[i][j] = sqrt(2/8) * cos((2j+1) i pi / 16)`. The input is the
//! level-shifted (`pixel - 128`) 8x8 pixel block; the output is rounded
//! half-away-from-zero to `i16`.

use crate::config::{BLOCK_DIM, BLOCK_SIZE};
use std::f64::consts::PI;
use std::sync::OnceLock;

fn cosine_matrix() -> &'static [[f64; BLOCK_SIZE]; BLOCK_SIZE] {
    static MATRIX: OnceLock<[[f64; BLOCK_SIZE]; BLOCK_SIZE]> = OnceLock::new();
    MATRIX.get_or_init(|| {
        let mut c = [[0.0f64; BLOCK_SIZE]; BLOCK_SIZE];
        for (i, row) in c.iter_mut().enumerate() {
            let scale = if i == 0 {
                1.0 / (BLOCK_SIZE as f64).sqrt()
            } else {
                (2.0 / BLOCK_SIZE as f64).sqrt()
            };
            for (j, cell) in row.iter_mut().enumerate() {
                let angle = ((2 * j + 1) * i) as f64 * PI / (2.0 * BLOCK_SIZE as f64);
                *cell = scale * angle.cos();
            }
        }
        c
    })
}

fn round_half_away_from_zero(v: f64) -> i16 {
    let rounded = if v >= 0.0 {
        (v + 0.5).floor()
    } else {
        (v - 0.5).ceil()
    };
    rounded.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Forward DCT of a level-shifted 8x8 pixel block, row-major in both input
/// and output.
pub fn fdct(block: &[i16; BLOCK_DIM]) -> [i16; BLOCK_DIM] {
    let c = cosine_matrix();
    let mut input = [0.0f64; BLOCK_DIM];
    for (i, v) in block.iter().enumerate() {
        input[i] = *v as f64;
    }

    // Row pass: tmp = C * B
    let mut tmp = [0.0f64; BLOCK_DIM];
    for u in 0..BLOCK_SIZE {
        for col in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for x in 0..BLOCK_SIZE {
                sum += c[u][x] * input[x * BLOCK_SIZE + col];
            }
            tmp[u * BLOCK_SIZE + col] = sum;
        }
    }

    // Column pass: F = tmp * C^T
    let mut out = [0i16; BLOCK_DIM];
    for row in 0..BLOCK_SIZE {
        for v in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for y in 0..BLOCK_SIZE {
                sum += tmp[row * BLOCK_SIZE + y] * c[v][y];
            }
            out[row * BLOCK_SIZE + v] = round_half_away_from_zero(sum);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_block_has_only_a_dc_term() {
        let block = [0i16; BLOCK_DIM]; // pixel 128 level-shifted to 0
        let coeffs = fdct(&block);
        assert_eq!(coeffs, [0i16; BLOCK_DIM]);
    }

    #[test]
    fn constant_negative_block_has_maximal_dc() {
        let block = [-128i16; BLOCK_DIM];
        let coeffs = fdct(&block);
        assert_eq!(coeffs[0], -1024); // -128 * 8 (sum of 1/sqrt(8) * 1/sqrt(8) * 64 terms)
        for &c in &coeffs[1..] {
            assert_eq!(c, 0);
        }
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_half_away_from_zero(2.5), 3);
        assert_eq!(round_half_away_from_zero(-2.5), -3);
        assert_eq!(round_half_away_from_zero(2.4), 2);
    }
}
