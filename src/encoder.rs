//! Encode pipeline: RGB raster -> stego baseline JPEG bytes.

use crate::bitstream::BitWriter;
use crate::component::{EncodeComponent, COMPONENT_ID_CB, COMPONENT_ID_CR, COMPONENT_ID_Y};
use crate::config::{ATTRIBUTION_TEXT, BLOCK_DIM, BLOCK_SIZE, COMPONENT_COUNT};
use crate::dct::fdct;
use crate::embed::embed;
use crate::error::{Result, StegoError};
use crate::huffman::{BlockEncoder, EncodeTable};
use crate::quantization::{quantize, scaled_quant_table};
use crate::stream_writer::SegmentWriter;
use crate::zigzag::zigzag;
use crate::{caesar, crypto, Config};

/// `(w/8) * (h/8) * 2` bytes: the payload capacity at the given raster
/// dimensions (cropped to multiples of 8 by the caller before this math).
pub fn capacity(width: u32, height: u32) -> usize {
    ((width / 8) * (height / 8) * 2) as usize
}

/// Encodes an RGB raster (row-major, 3 bytes/pixel) into a stego baseline
/// JPEG carrying `message` obfuscated under `password`.
pub fn encode(
    rgb: &[u8],
    width: u32,
    height: u32,
    message: &str,
    password: &str,
    quality: u32,
    config: &Config,
) -> Result<Vec<u8>> {
    let crop_w = (width / BLOCK_SIZE as u32) * BLOCK_SIZE as u32;
    let crop_h = (height / BLOCK_SIZE as u32) * BLOCK_SIZE as u32;
    if crop_w == 0 || crop_h == 0 {
        return Err(StegoError::InvalidImage(
            "raster must be at least 8x8 after cropping to a multiple of 8".into(),
        ));
    }
    if rgb.len() < (width as usize) * (height as usize) * 3 {
        return Err(StegoError::InvalidImage(
            "raster buffer is shorter than width*height*3".into(),
        ));
    }

    let payload = message.as_bytes();
    let cap = capacity(crop_w as u32, crop_h as u32);
    if payload.len() > cap {
        return Err(StegoError::MessageTooLong {
            len: payload.len(),
            capacity: cap,
        });
    }

    let obfuscated_payload = caesar::encrypt(payload, config.caesar_key);
    let encrypted_password = crypto::encrypt_password(password, &config.aes_key, &config.aes_iv);

    let mcu_cols = (crop_w / BLOCK_SIZE as u32) as usize;
    let mcu_rows = (crop_h / BLOCK_SIZE as u32) as usize;
    let block_count = mcu_cols * mcu_rows;

    let quant_table = scaled_quant_table(quality);
    let mut y_blocks = Vec::with_capacity(block_count);
    let mut cb_blocks = Vec::with_capacity(block_count);
    let mut cr_blocks = Vec::with_capacity(block_count);

    for block_row in 0..mcu_rows {
        for block_col in 0..mcu_cols {
            let (y_block, cb_block, cr_block) =
                extract_ycbcr_block(rgb, width as usize, block_row, block_col);
            y_blocks.push(zigzag(&quantize(&fdct(&y_block), &quant_table)));
            cb_blocks.push(zigzag(&quantize(&fdct(&cb_block), &quant_table)));
            cr_blocks.push(zigzag(&quantize(&fdct(&cr_block), &quant_table)));
        }
    }

    embed(&mut cb_blocks, &obfuscated_payload);

    let dc_luma = EncodeTable::standard_luminance_dc();
    let ac_luma = EncodeTable::standard_luminance_ac();
    let dc_chroma = EncodeTable::standard_chrominance_dc();
    let ac_chroma = EncodeTable::standard_chrominance_ac();

    let mut y = EncodeComponent::new(COMPONENT_ID_Y, 0, y_blocks, &dc_luma, &ac_luma);
    let mut cb = EncodeComponent::new(COMPONENT_ID_CB, 1, cb_blocks, &dc_chroma, &ac_chroma);
    let mut cr = EncodeComponent::new(COMPONENT_ID_CR, 1, cr_blocks, &dc_chroma, &ac_chroma);

    let mut bits = BitWriter::new();
    for i in 0..block_count {
        encode_block(&mut bits, &mut y, i);
        encode_block(&mut bits, &mut cb, i);
        encode_block(&mut bits, &mut cr, i);
    }
    bits.flush();
    let scan_bytes = bits.into_bytes();

    let mut w = SegmentWriter::new();
    w.write_start_of_image();
    w.write_app0_jfif();
    w.write_com_attribution(ATTRIBUTION_TEXT);
    w.write_com_message_length(payload.len() as u32);
    w.write_com_password(&encrypted_password);
    w.write_dqt(0, &quant_table);
    w.write_dqt(1, &quant_table);
    w.write_sof0(crop_w as u16, crop_h as u16, &[0, 1, 1]);
    w.write_dht(
        0,
        0,
        &crate::huffman::tables::STD_LUMINANCE_DC_LENGTHS,
        &crate::huffman::tables::STD_LUMINANCE_DC_VALUES,
    );
    w.write_dht(
        1,
        0,
        &crate::huffman::tables::STD_LUMINANCE_AC_LENGTHS,
        &crate::huffman::tables::STD_LUMINANCE_AC_VALUES,
    );
    w.write_dht(
        0,
        1,
        &crate::huffman::tables::STD_CHROMINANCE_DC_LENGTHS,
        &crate::huffman::tables::STD_CHROMINANCE_DC_VALUES,
    );
    w.write_dht(
        1,
        1,
        &crate::huffman::tables::STD_CHROMINANCE_AC_LENGTHS,
        &crate::huffman::tables::STD_CHROMINANCE_AC_VALUES,
    );
    w.write_sos(&[(0, 0), (1, 1), (1, 1)]);
    w.write_entropy_coded_data(&scan_bytes);
    w.write_end_of_image();

    debug_assert_eq!(COMPONENT_COUNT, 3);
    Ok(w.into_bytes())
}

fn encode_block(bits: &mut BitWriter, component: &mut EncodeComponent, block_index: usize) {
    let encoder = BlockEncoder {
        dc_table: component.dc_table,
        ac_table: component.ac_table,
    };
    let block = component.blocks[block_index];
    let mut dc_pred = component.dc_pred;
    encoder.encode_block(&block, &mut dc_pred, |value, size| bits.write_bits(value, size));
    component.dc_pred = dc_pred;
}

/// Reads one 8x8 pixel block at `(block_row, block_col)` out of an
/// interleaved RGB raster, converts to YCbCr, and level-shifts by -128.
fn extract_ycbcr_block(
    rgb: &[u8],
    width: usize,
    block_row: usize,
    block_col: usize,
) -> ([i16; BLOCK_DIM], [i16; BLOCK_DIM], [i16; BLOCK_DIM]) {
    let mut y = [0i16; BLOCK_DIM];
    let mut cb = [0i16; BLOCK_DIM];
    let mut cr = [0i16; BLOCK_DIM];

    for row in 0..BLOCK_SIZE {
        for col in 0..BLOCK_SIZE {
            let px = block_col * BLOCK_SIZE + col;
            let py = block_row * BLOCK_SIZE + row;
            let offset = (py * width + px) * 3;
            let r = rgb[offset] as f64;
            let g = rgb[offset + 1] as f64;
            let b = rgb[offset + 2] as f64;

            let y_val = 0.299 * r + 0.587 * g + 0.114 * b;
            let cb_val = -0.1687 * r - 0.3313 * g + 0.5 * b + 128.0;
            let cr_val = 0.5 * r - 0.4187 * g - 0.0813 * b + 128.0;

            let idx = row * BLOCK_SIZE + col;
            y[idx] = (y_val.clamp(0.0, 255.0).round() as i16) - 128;
            cb[idx] = (cb_val.clamp(0.0, 255.0).round() as i16) - 128;
            cr[idx] = (cr_val.clamp(0.0, 255.0).round() as i16) - 128;
        }
    }
    (y, cb, cr)
}
