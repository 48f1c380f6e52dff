//! Zigzag permutation between an 8x8 coefficient matrix (row-major) and its
//! 64-element linear, diagonal-traversal order.

use crate::config::BLOCK_DIM;

/// Maps linear zigzag index -> row-major matrix index.
pub const ZIGZAG_ORDER: [usize; BLOCK_DIM] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Reorders a row-major 8x8 matrix into zigzag (diagonal-traversal) order.
pub fn zigzag(matrix: &[i16; BLOCK_DIM]) -> [i16; BLOCK_DIM] {
    let mut out = [0i16; BLOCK_DIM];
    for (i, &src) in ZIGZAG_ORDER.iter().enumerate() {
        out[i] = matrix[src];
    }
    out
}

/// Inverse of [`zigzag`]: recovers the row-major matrix from zigzag order.
pub fn inverse_zigzag(linear: &[i16; BLOCK_DIM]) -> [i16; BLOCK_DIM] {
    let mut out = [0i16; BLOCK_DIM];
    for (i, &dst) in ZIGZAG_ORDER.iter().enumerate() {
        out[dst] = linear[i];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_is_an_involution() {
        let mut matrix = [0i16; BLOCK_DIM];
        for (i, v) in matrix.iter_mut().enumerate() {
            *v = i as i16 - 32;
        }
        let zz = zigzag(&matrix);
        assert_eq!(inverse_zigzag(&zz), matrix);
    }

    #[test]
    fn zigzag_order_is_a_permutation() {
        let mut seen = [false; BLOCK_DIM];
        for &idx in ZIGZAG_ORDER.iter() {
            assert!(!seen[idx], "index {idx} repeated");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn dc_position_is_unchanged() {
        let mut matrix = [5i16; BLOCK_DIM];
        matrix[0] = 42;
        let zz = zigzag(&matrix);
        assert_eq!(zz[0], 42);
    }
}
