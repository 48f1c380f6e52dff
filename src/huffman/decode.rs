//! Canonical Huffman decode tables: a 9-bit fast lookup plus a slow path
//! (left-aligned 16-bit peek against per-length `max_code`/`delta`) for
//! codes longer than 9 bits.

use crate::bitstream::BitReader;
use crate::error::{Result, StegoError};

const FAST_BITS: u32 = 9;
const FAST_SIZE: usize = 1 << FAST_BITS;

/// A fast-table entry. `length == 0` means "no code of <= 9 bits has this
/// prefix"; the decoder must fall back to the slow path.
#[derive(Debug, Clone, Copy, Default)]
struct FastEntry {
    symbol: u8,
    length: u8,
}

/// Canonical decode table built from a DHT payload's 16 bit-length counts
/// and symbol-value array.
#[derive(Debug, Clone)]
pub struct DecodeTable {
    fast: Vec<FastEntry>,
    // Indexed by code length 1..=16 (index 0 unused).
    max_code: [i32; 17],
    delta: [i32; 17],
    values: Vec<u8>,
}

impl DecodeTable {
    /// Builds the fast table and the per-length slow-path bounds from the
    /// same bit-length counts and value array a DHT segment carries.
    pub fn build(lengths: &[u8; 16], values: &[u8]) -> Self {
        // Expand into a linear (code, size) sequence in symbol order, same
        // canonical construction the encoder uses.
        let mut sizes: Vec<u8> = Vec::with_capacity(values.len());
        for (len_index, &count) in lengths.iter().enumerate() {
            for _ in 0..count {
                sizes.push((len_index + 1) as u8);
            }
        }

        let mut codes: Vec<u16> = Vec::with_capacity(sizes.len());
        let mut code: u16 = 0;
        let mut i = 0;
        while i < sizes.len() {
            let size = sizes[i];
            while i < sizes.len() && sizes[i] == size {
                codes.push(code);
                code += 1;
                i += 1;
            }
            code <<= 1;
        }

        let mut max_code = [-1i32; 17];
        let mut delta = [0i32; 17];
        let mut val_ptr = 0usize;
        for len in 1..=16usize {
            let count = lengths[len - 1] as usize;
            if count == 0 {
                continue;
            }
            let first_code = codes[val_ptr] as i32;
            let last_code = codes[val_ptr + count - 1] as i32;
            let shift = 16 - len as u32;
            max_code[len] = (last_code << shift) | ((1i32 << shift) - 1);
            delta[len] = val_ptr as i32 - first_code;
            val_ptr += count;
        }

        let mut fast = vec![FastEntry::default(); FAST_SIZE];
        for (sym_index, (&size, &sym_code)) in sizes.iter().zip(codes.iter()).enumerate() {
            if size as u32 > FAST_BITS {
                continue;
            }
            let shift = FAST_BITS as u8 - size;
            let base = (sym_code as usize) << shift;
            for suffix in 0..(1usize << shift) {
                fast[base | suffix] = FastEntry {
                    symbol: values[sym_index],
                    length: size,
                };
            }
        }

        Self {
            fast,
            max_code,
            delta,
            values,
        }
    }

    pub fn standard_luminance_dc() -> Self {
        Self::build(
            &super::tables::STD_LUMINANCE_DC_LENGTHS,
            &super::tables::STD_LUMINANCE_DC_VALUES,
        )
    }
    pub fn standard_luminance_ac() -> Self {
        Self::build(
            &super::tables::STD_LUMINANCE_AC_LENGTHS,
            &super::tables::STD_LUMINANCE_AC_VALUES,
        )
    }
    pub fn standard_chrominance_dc() -> Self {
        Self::build(
            &super::tables::STD_CHROMINANCE_DC_LENGTHS,
            &super::tables::STD_CHROMINANCE_DC_VALUES,
        )
    }
    pub fn standard_chrominance_ac() -> Self {
        Self::build(
            &super::tables::STD_CHROMINANCE_AC_LENGTHS,
            &super::tables::STD_CHROMINANCE_AC_VALUES,
        )
    }

    /// Decodes one symbol, consuming its code's bits from `reader`.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u8> {
        let peek9 = reader.peek_bits(FAST_BITS as u8)? as usize;
        let entry = self.fast[peek9];
        if entry.length != 0 {
            reader.consume_bits(entry.length);
            return Ok(entry.symbol);
        }

        let peek16 = reader.peek_bits(16)? as i32;
        for len in 1..=16usize {
            if self.max_code[len] >= 0 && peek16 <= self.max_code[len] {
                let shift = 16 - len as u32;
                let code = peek16 >> shift;
                let idx = code + self.delta[len];
                reader.consume_bits(len as u8);
                return Ok(self.values[idx as usize]);
            }
        }
        Err(StegoError::MalformedStream(
            "no Huffman code matched the bit stream".into(),
        ))
    }
}

/// Sign-extends an `s`-bit magnitude code back into a signed value:
/// values `< 1 << (s-1)` are negative, per the JPEG magnitude encoding
/// (inverse of [`crate::huffman::encode::magnitude_bits`]).
pub fn sign_extend(bits: u16, size: u8) -> i16 {
    if size == 0 {
        return 0;
    }
    let threshold = 1u16 << (size - 1);
    if bits < threshold {
        bits as i16 - ((1i16 << size) - 1)
    } else {
        bits as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::encode::EncodeTable;
    use crate::huffman::tables::{
        STD_LUMINANCE_AC_LENGTHS, STD_LUMINANCE_AC_VALUES, STD_LUMINANCE_DC_LENGTHS,
        STD_LUMINANCE_DC_VALUES,
    };

    fn encode_bits(symbol: u8, table: &EncodeTable, out: &mut Vec<(u16, u8)>) {
        let code = table.code_for(symbol);
        out.push((code.bits, code.size));
    }

    fn pack_bits(codes: &[(u16, u8)]) -> Vec<u8> {
        let mut writer = crate::bitstream::BitWriter::new();
        for &(bits, size) in codes {
            writer.write_bits(bits, size);
        }
        writer.flush();
        writer.into_bytes()
    }

    #[test]
    fn fast_table_decodes_every_dc_symbol() {
        let enc = EncodeTable::standard_luminance_dc();
        let dec = DecodeTable::standard_luminance_dc();
        for symbol in 0..=11u8 {
            let mut codes = Vec::new();
            encode_bits(symbol, &enc, &mut codes);
            let bytes = pack_bits(&codes);
            let mut reader = BitReader::new(&bytes);
            let decoded = dec.decode(&mut reader).unwrap();
            assert_eq!(decoded, symbol, "symbol {symbol} round-tripped incorrectly");
        }
    }

    #[test]
    fn slow_path_decodes_longest_ac_codes() {
        let enc = EncodeTable::standard_luminance_ac();
        let dec = DecodeTable::standard_luminance_ac();
        // The luminance AC table's longest codes (16 bits) live in the last
        // bit-length bucket; 0xFA is the final symbol in that bucket.
        let symbol = *STD_LUMINANCE_AC_VALUES.last().unwrap();
        let mut codes = Vec::new();
        encode_bits(symbol, &enc, &mut codes);
        let bytes = pack_bits(&codes);
        let mut reader = BitReader::new(&bytes);
        assert_eq!(dec.decode(&mut reader).unwrap(), symbol);
    }

    #[test]
    fn sequential_symbols_decode_in_order() {
        let enc = EncodeTable::standard_luminance_dc();
        let dec = DecodeTable::standard_luminance_dc();
        let sequence = [0u8, 5, 11, 2, 9];
        let mut codes = Vec::new();
        for &s in &sequence {
            encode_bits(s, &enc, &mut codes);
        }
        let bytes = pack_bits(&codes);
        let mut reader = BitReader::new(&bytes);
        for &expected in &sequence {
            assert_eq!(dec.decode(&mut reader).unwrap(), expected);
        }
    }

    #[test]
    fn every_length_bucket_round_trips() {
        // Exercise every (length, count) bucket in the table, not just
        // specific symbols, by decoding the full value list in order.
        let enc = EncodeTable::build(&STD_LUMINANCE_AC_LENGTHS, &STD_LUMINANCE_AC_VALUES);
        let dec = DecodeTable::build(&STD_LUMINANCE_AC_LENGTHS, &STD_LUMINANCE_AC_VALUES);
        let mut codes = Vec::new();
        for &symbol in STD_LUMINANCE_AC_VALUES.iter() {
            encode_bits(symbol, &enc, &mut codes);
        }
        let bytes = pack_bits(&codes);
        let mut reader = BitReader::new(&bytes);
        for &expected in STD_LUMINANCE_AC_VALUES.iter() {
            assert_eq!(dec.decode(&mut reader).unwrap(), expected);
        }
    }

    #[test]
    fn sign_extend_matches_magnitude_bits_inverse() {
        use crate::huffman::encode::{category, magnitude_bits};
        for v in [-300i16, -5, -1, 0, 1, 5, 300] {
            let cat = category(v);
            let (bits, size) = magnitude_bits(v, cat);
            assert_eq!(sign_extend(bits, size), v);
        }
    }
}
