//! Canonical Huffman code construction and per-block encoding for the
//! fixed standard JPEG luminance/chrominance tables.

use crate::huffman::tables::{
    EOB, STD_CHROMINANCE_AC_LENGTHS, STD_CHROMINANCE_AC_VALUES, STD_CHROMINANCE_DC_LENGTHS,
    STD_CHROMINANCE_DC_VALUES, STD_LUMINANCE_AC_LENGTHS, STD_LUMINANCE_AC_VALUES,
    STD_LUMINANCE_DC_LENGTHS, STD_LUMINANCE_DC_VALUES, ZRL,
};

/// A code and its bit length, as assigned by the canonical construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Code {
    pub bits: u16,
    pub size: u8,
}

/// A canonical Huffman encoding table: a 256-entry symbol -> code lookup.
#[derive(Debug, Clone)]
pub struct EncodeTable {
    codes: [Code; 256],
}

impl EncodeTable {
    /// Builds the canonical table from the standard per-length symbol
    /// counts and symbol values, following the three-step JPEG procedure:
    /// generate sizes, generate codes, scatter into a symbol-indexed table.
    pub fn build(lengths: &[u8; 16], values: &[u8]) -> Self {
        // Step 1: generate sizes — expand bit-length counts into a linear
        // sequence of code lengths, one per symbol in `values` order.
        let mut sizes: Vec<u8> = Vec::with_capacity(values.len());
        for (len_index, &count) in lengths.iter().enumerate() {
            for _ in 0..count {
                sizes.push((len_index + 1) as u8);
            }
        }
        debug_assert_eq!(sizes.len(), values.len());

        // Step 2: generate codes — start at 0; emit the current code for
        // each symbol at this length, increment, and left-shift whenever
        // the length advances.
        let mut codes_by_symbol_order: Vec<u16> = Vec::with_capacity(sizes.len());
        let mut code: u16 = 0;
        let mut size_index = 0;
        while size_index < sizes.len() {
            let current_size = sizes[size_index];
            while size_index < sizes.len() && sizes[size_index] == current_size {
                codes_by_symbol_order.push(code);
                code += 1;
                size_index += 1;
            }
            code <<= 1;
        }

        // Step 3: scatter into the 256-entry symbol-indexed table.
        let mut codes = [Code::default(); 256];
        for i in 0..values.len() {
            codes[values[i] as usize] = Code {
                bits: codes_by_symbol_order[i],
                size: sizes[i],
            };
        }

        Self { codes }
    }

    pub fn code_for(&self, symbol: u8) -> Code {
        self.codes[symbol as usize]
    }

    pub fn standard_luminance_dc() -> Self {
        Self::build(&STD_LUMINANCE_DC_LENGTHS, &STD_LUMINANCE_DC_VALUES)
    }
    pub fn standard_luminance_ac() -> Self {
        Self::build(&STD_LUMINANCE_AC_LENGTHS, &STD_LUMINANCE_AC_VALUES)
    }
    pub fn standard_chrominance_dc() -> Self {
        Self::build(&STD_CHROMINANCE_DC_LENGTHS, &STD_CHROMINANCE_DC_VALUES)
    }
    pub fn standard_chrominance_ac() -> Self {
        Self::build(&STD_CHROMINANCE_AC_LENGTHS, &STD_CHROMINANCE_AC_VALUES)
    }
}

/// Number of bits needed to represent `|v|` (0 for `v == 0`), i.e. the
/// JPEG "category" of a DC difference or AC magnitude.
pub fn category(v: i16) -> u8 {
    if v == 0 {
        return 0;
    }
    (16 - (v.unsigned_abs()).leading_zeros()) as u8
}

/// Encodes `v` into its `category`-bit magnitude representation: positive
/// values as-is, negative values as `v + (1 << category) - 1`.
pub fn magnitude_bits(v: i16, cat: u8) -> (u16, u8) {
    if cat == 0 {
        return (0, 0);
    }
    if v >= 0 {
        (v as u16, cat)
    } else {
        ((v + (1i16 << cat) - 1) as u16, cat)
    }
}

/// Everything needed to Huffman-encode one 8x8 block's quantised,
/// zigzag-ordered coefficients, writing bits through `emit`.
pub struct BlockEncoder<'a> {
    pub dc_table: &'a EncodeTable,
    pub ac_table: &'a EncodeTable,
}

impl<'a> BlockEncoder<'a> {
    /// `zigzag_coeffs` must already be in zigzag order (DC at index 0).
    /// `dc_pred` is the running DC prediction for this component; updated
    /// in place. `emit(bits, size)` is called once per code/magnitude.
    pub fn encode_block(
        &self,
        zigzag_coeffs: &[i16; 64],
        dc_pred: &mut i16,
        mut emit: impl FnMut(u16, u8),
    ) {
        let dc_val = zigzag_coeffs[0];
        let diff = dc_val.wrapping_sub(*dc_pred);
        *dc_pred = dc_val;

        let dc_cat = category(diff);
        let dc_code = self.dc_table.code_for(dc_cat);
        emit(dc_code.bits, dc_code.size);
        let (dc_bits, dc_len) = magnitude_bits(diff, dc_cat);
        emit(dc_bits, dc_len);

        let mut run = 0u32;
        for k in 1..64 {
            let v = zigzag_coeffs[k];
            if v == 0 {
                run += 1;
                continue;
            }
            while run >= 16 {
                let zrl = self.ac_table.code_for(ZRL);
                emit(zrl.bits, zrl.size);
                run -= 16;
            }
            let cat = category(v);
            let symbol = ((run as u8) << 4) | cat;
            let ac_code = self.ac_table.code_for(symbol);
            emit(ac_code.bits, ac_code.size);
            let (bits, len) = magnitude_bits(v, cat);
            emit(bits, len);
            run = 0;
        }
        if run > 0 {
            let eob = self.ac_table.code_for(EOB);
            emit(eob.bits, eob.size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_matches_bit_length() {
        assert_eq!(category(0), 0);
        assert_eq!(category(1), 1);
        assert_eq!(category(-1), 1);
        assert_eq!(category(4), 3);
        assert_eq!(category(-4), 3);
        assert_eq!(category(255), 8);
    }

    #[test]
    fn magnitude_bits_round_trip_sign() {
        let (bits, size) = magnitude_bits(-5, category(-5));
        assert_eq!(size, 3);
        // -5 + (1<<3) - 1 = 2
        assert_eq!(bits, 2);
    }

    #[test]
    fn canonical_table_assigns_shorter_codes_to_more_frequent_lengths() {
        let table = EncodeTable::standard_luminance_dc();
        // Category 2 has the shortest DC luminance code length (2 bits).
        let code = table.code_for(2);
        assert_eq!(code.size, 2);
    }

    #[test]
    fn encode_block_emits_only_eob_for_all_zero_ac() {
        let mut zigzag = [0i16; 64];
        zigzag[0] = 5;
        let dc_table = EncodeTable::standard_luminance_dc();
        let ac_table = EncodeTable::standard_luminance_ac();
        let enc = BlockEncoder {
            dc_table: &dc_table,
            ac_table: &ac_table,
        };
        let mut dc_pred = 0i16;
        let mut emitted = Vec::new();
        enc.encode_block(&zigzag, &mut dc_pred, |bits, size| emitted.push((bits, size)));
        // DC code + DC magnitude + EOB = 3 emissions.
        assert_eq!(emitted.len(), 3);
        assert_eq!(dc_pred, 5);
    }
}
