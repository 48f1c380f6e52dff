//! Decode pipeline: stego baseline JPEG bytes -> hidden message bytes.
//!
//! Scan decoding stops at quantised, zigzag-ordered coefficients; there is
//! no IDCT or chroma upsampling here (the core never needs reconstructed
//! pixels, only the embedded LSBs).

use crate::bitstream::BitReader;
use crate::component::DecodeComponent;
use crate::config::CB_COMPONENT_INDEX;
use crate::crypto;
use crate::embed::extract;
use crate::error::{Result, StegoError};
use crate::huffman::sign_extend;
use crate::marker::is_restart;
use crate::stream_reader::{parse_header, ParsedHeader};
use crate::Config;

/// Report produced by [`analyze`]: header facts with no password check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeReport {
    pub width: u16,
    pub height: u16,
    pub mcu_cols: u16,
    pub mcu_rows: u16,
    pub message_length_bytes: i32,
    pub has_password: bool,
    pub used_mcus: usize,
    pub total_capacity: usize,
}

/// Decodes all MCU rows of a parsed header's scan into one flat,
/// zigzag-ordered coefficient buffer per component (SOF order).
fn decode_scan(header: &ParsedHeader) -> Result<Vec<Vec<[i16; 64]>>> {
    let mcu_cols = header.width as usize / 8;
    let mcu_rows = header.height as usize / 8;
    let total_mcus = mcu_cols * mcu_rows;

    let mut components: Vec<DecodeComponent> = header
        .components
        .iter()
        .map(|c| DecodeComponent::new(c.id, c.quant_table_id, c.dc_huffman_id, c.ac_huffman_id))
        .collect();
    for comp in components.iter_mut() {
        comp.blocks = Vec::with_capacity(total_mcus);
    }

    let mut reader = BitReader::new(header.scan_data);
    let mut mcus_since_restart = 0u16;
    let mut next_restart_code = 0u8;

    for _ in 0..total_mcus {
        if header.restart_interval > 0 && mcus_since_restart == header.restart_interval {
            let marker = reader
                .pending_marker()
                .ok_or_else(|| StegoError::MalformedStream("expected RSTn marker".into()))?;
            if !is_restart(marker) {
                return Err(StegoError::MalformedStream(
                    "expected a restart marker but found another one".into(),
                ));
            }
            reader.take_marker()?;
            let expected = 0xD0 + (next_restart_code % 8);
            if marker != expected {
                return Err(StegoError::MalformedStream(
                    "restart markers are out of sequence".into(),
                ));
            }
            next_restart_code = next_restart_code.wrapping_add(1);
            mcus_since_restart = 0;
            for comp in components.iter_mut() {
                comp.reset_dc_prediction();
            }
        }

        for comp_index in 0..components.len() {
            let dc_id = components[comp_index].dc_huffman_id as usize;
            let ac_id = components[comp_index].ac_huffman_id as usize;
            let dc_table = header.dc_tables[dc_id]
                .as_ref()
                .ok_or_else(|| StegoError::InvalidImage("missing DC Huffman table".into()))?;
            let ac_table = header.ac_tables[ac_id]
                .as_ref()
                .ok_or_else(|| StegoError::InvalidImage("missing AC Huffman table".into()))?;

            let block = decode_block(&mut reader, dc_table, ac_table, &mut components[comp_index].dc_pred)?;
            components[comp_index].blocks.push(block);
        }
        mcus_since_restart += 1;
    }

    Ok(components.into_iter().map(|c| c.blocks).collect())
}

fn decode_block(
    reader: &mut BitReader,
    dc_table: &crate::huffman::DecodeTable,
    ac_table: &crate::huffman::DecodeTable,
    dc_pred: &mut i16,
) -> Result<[i16; 64]> {
    let mut block = [0i16; 64];

    let dc_cat = dc_table.decode(reader)?;
    let dc_bits = reader.read_bits(dc_cat)?;
    let diff = sign_extend(dc_bits, dc_cat);
    *dc_pred = dc_pred.wrapping_add(diff);
    block[0] = *dc_pred;

    let mut k = 1usize;
    while k < 64 {
        let rs = ac_table.decode(reader)?;
        let run = (rs >> 4) as usize;
        let size = rs & 0x0F;
        if size == 0 {
            if rs == 0xF0 {
                // ZRL: skip 16 zero coefficients and keep going.
                k += 16;
                continue;
            }
            // EOB: remaining coefficients stay zero.
            break;
        }
        k += run;
        if k >= 64 {
            return Err(StegoError::MalformedStream(
                "AC run overran the block".into(),
            ));
        }
        let bits = reader.read_bits(size)?;
        block[k] = sign_extend(bits, size);
        k += 1;
    }

    Ok(block)
}

/// Decodes `jpeg_bytes` and returns the hidden message as a UTF-8 string,
/// after checking `password` against the stored (AES-decrypted) password.
pub fn decode(jpeg_bytes: &[u8], password: &str, config: &Config) -> Result<String> {
    let header = parse_header(jpeg_bytes)?;

    let stored = header
        .stored_password_base64
        .as_deref()
        .ok_or_else(|| StegoError::InvalidImage("missing type-2 COM password segment".into()))?;
    let matches = crypto::decrypt_and_compare(stored, password, &config.aes_key, &config.aes_iv)?;
    if !matches {
        return Err(StegoError::InvalidPassword);
    }

    let message_length = header.message_length;
    if message_length.is_none() || message_length.unwrap() <= 0 {
        return Err(StegoError::NoHiddenMessage);
    }
    let message_length = message_length.unwrap() as usize;

    let components = decode_scan(&header)?;
    let cb_blocks = &components[CB_COMPONENT_INDEX];
    let obfuscated_payload = extract(cb_blocks, message_length);
    let payload = crate::caesar::decrypt(&obfuscated_payload, config.caesar_key);

    String::from_utf8(payload)
        .map_err(|_| StegoError::MalformedStream("decoded payload is not valid UTF-8".into()))
}

/// Parses headers only (no password check, no scan decode of the message)
/// and reports the facts `analyze` exposes.
pub fn analyze(jpeg_bytes: &[u8]) -> Result<AnalyzeReport> {
    let header = parse_header(jpeg_bytes)?;
    let mcu_cols = header.width / 8;
    let mcu_rows = header.height / 8;
    let message_length_bytes = header.message_length.unwrap_or(0);
    let used_mcus = if message_length_bytes > 0 {
        crate::embed::used_mcus(message_length_bytes as usize)
    } else {
        0
    };
    Ok(AnalyzeReport {
        width: header.width,
        height: header.height,
        mcu_cols,
        mcu_rows,
        message_length_bytes,
        has_password: header.stored_password_base64.is_some(),
        used_mcus,
        total_capacity: mcu_cols as usize * mcu_rows as usize * 2,
    })
}
