//! Per-plane state for the encode and decode pipelines. Kept as two
//! distinct types rather than one struct with optional fields: the two
//! pipelines need disjoint state (encode holds borrowed Huffman tables and
//! already-embedded coefficients; decode holds table IDs resolved from DHT
//! segments and raw decoded coefficients).

use crate::huffman::EncodeTable;

/// Component identifiers used in SOF0/SOS, fixed by the 1:1:1 sampling the
/// core supports.
pub const COMPONENT_ID_Y: u8 = 1;
pub const COMPONENT_ID_CB: u8 = 2;
pub const COMPONENT_ID_CR: u8 = 3;

/// One colour plane's state during encoding: its quantised, zigzag-ordered
/// blocks (Cb's already carry the embedded payload by the time the entropy
/// coder sees them), the running DC predictor, and the Huffman tables it
/// encodes against.
pub struct EncodeComponent<'a> {
    pub id: u8,
    pub quant_table_number: u8,
    pub blocks: Vec<[i16; 64]>,
    pub dc_pred: i16,
    pub dc_table: &'a EncodeTable,
    pub ac_table: &'a EncodeTable,
}

impl<'a> EncodeComponent<'a> {
    pub fn new(
        id: u8,
        quant_table_number: u8,
        blocks: Vec<[i16; 64]>,
        dc_table: &'a EncodeTable,
        ac_table: &'a EncodeTable,
    ) -> Self {
        Self {
            id,
            quant_table_number,
            blocks,
            dc_pred: 0,
            dc_table,
            ac_table,
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// One colour plane's state during decoding: the Huffman/quant table IDs
/// resolved from the SOS component selector, the running DC predictor, and
/// the flat buffer of decoded (still quantised, zigzag-ordered) blocks.
pub struct DecodeComponent {
    pub id: u8,
    pub quant_table_id: u8,
    pub dc_huffman_id: u8,
    pub ac_huffman_id: u8,
    pub dc_pred: i16,
    pub blocks: Vec<[i16; 64]>,
}

impl DecodeComponent {
    pub fn new(id: u8, quant_table_id: u8, dc_huffman_id: u8, ac_huffman_id: u8) -> Self {
        Self {
            id,
            quant_table_id,
            dc_huffman_id,
            ac_huffman_id,
            dc_pred: 0,
            blocks: Vec::new(),
        }
    }

    /// Resets per-restart state: DC prediction only.
    pub fn reset_dc_prediction(&mut self) {
        self.dc_pred = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::EncodeTable;

    #[test]
    fn encode_component_tracks_block_count() {
        let dc = EncodeTable::standard_luminance_dc();
        let ac = EncodeTable::standard_luminance_ac();
        let blocks = vec![[0i16; 64]; 4];
        let comp = EncodeComponent::new(COMPONENT_ID_Y, 0, blocks, &dc, &ac);
        assert_eq!(comp.block_count(), 4);
        assert_eq!(comp.dc_pred, 0);
    }

    #[test]
    fn decode_component_resets_only_dc_prediction() {
        let mut comp = DecodeComponent::new(COMPONENT_ID_CB, 0, 1, 1);
        comp.dc_pred = 42;
        comp.blocks.push([1i16; 64]);
        comp.reset_dc_prediction();
        assert_eq!(comp.dc_pred, 0);
        assert_eq!(comp.blocks.len(), 1);
    }
}
