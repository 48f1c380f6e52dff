//! JPEG segment parser. Walks SOI..SOS, building the quantisation and
//! Huffman decode tables and component list the scan decoder needs, and
//! surfacing the three COM payloads the embedding format defines.

use crate::component::DecodeComponent;
use crate::config::{COM_TYPE_ATTRIBUTION, COM_TYPE_MESSAGE_LENGTH, COM_TYPE_PASSWORD};
use crate::error::{Result, StegoError};
use crate::huffman::DecodeTable;
use crate::marker::JpegMarkerCode;

/// Everything decoded from the segments preceding (and including) SOS.
pub struct ParsedHeader<'a> {
    pub width: u16,
    pub height: u16,
    pub components: Vec<DecodeComponent>,
    pub quant_tables: [Option<[u8; 64]>; 4],
    pub dc_tables: [Option<DecodeTable>; 4],
    pub ac_tables: [Option<DecodeTable>; 4],
    pub restart_interval: u16,
    pub message_length: Option<i32>,
    pub stored_password_base64: Option<String>,
    /// Entropy-coded scan bytes, positioned right after the SOS header.
    pub scan_data: &'a [u8],
}

struct Cursor<'a> {
    source: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn read_u8(&mut self) -> Result<u8> {
        let b = *self
            .source
            .get(self.position)
            .ok_or_else(|| StegoError::InvalidImage("truncated segment".into()))?;
        self.position += 1;
        Ok(b)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let hi = self.read_u8()? as u16;
        let lo = self.read_u8()? as u16;
        Ok((hi << 8) | lo)
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self.position + count;
        let slice = self
            .source
            .get(self.position..end)
            .ok_or_else(|| StegoError::InvalidImage("truncated segment".into()))?;
        self.position = end;
        Ok(slice)
    }

    fn read_marker(&mut self) -> Result<JpegMarkerCode> {
        let ff = self.read_u8()?;
        if ff != 0xFF {
            return Err(StegoError::InvalidImage(format!(
                "expected marker prefix 0xFF, found 0x{ff:02X}"
            )));
        }
        let code = self.read_u8()?;
        JpegMarkerCode::try_from(code)
            .map_err(|_| StegoError::InvalidImage(format!("unrecognised marker 0x{code:02X}")))
    }

    fn skip_segment(&mut self) -> Result<()> {
        let length = self.read_u16()?;
        if length < 2 {
            return Err(StegoError::InvalidImage("segment length < 2".into()));
        }
        self.position += length as usize - 2;
        Ok(())
    }
}

pub fn parse_header(source: &[u8]) -> Result<ParsedHeader<'_>> {
    let mut cur = Cursor { source, position: 0 };

    if cur.read_marker()? != JpegMarkerCode::StartOfImage {
        return Err(StegoError::InvalidImage("missing SOI".into()));
    }

    let mut width = 0u16;
    let mut height = 0u16;
    let mut components: Vec<DecodeComponent> = Vec::new();
    let mut quant_tables: [Option<[u8; 64]>; 4] = [None, None, None, None];
    let mut dc_tables: [Option<DecodeTable>; 4] = [None, None, None, None];
    let mut ac_tables: [Option<DecodeTable>; 4] = [None, None, None, None];
    let mut restart_interval = 0u16;
    let mut message_length: Option<i32> = None;
    let mut stored_password_base64: Option<String> = None;
    let mut sof_seen = false;

    loop {
        let marker = cur.read_marker()?;
        match marker {
            JpegMarkerCode::StartOfScan => {
                if !sof_seen {
                    return Err(StegoError::InvalidImage("SOS before SOF0".into()));
                }
                read_sos(&mut cur, &mut components)?;
                break;
            }
            JpegMarkerCode::Application(_) => {
                cur.skip_segment()?;
            }
            JpegMarkerCode::Comment => {
                read_com(&mut cur, &mut message_length, &mut stored_password_base64)?;
            }
            JpegMarkerCode::DefineQuantizationTable => {
                read_dqt(&mut cur, &mut quant_tables)?;
            }
            JpegMarkerCode::DefineHuffmanTable => {
                read_dht(&mut cur, &mut dc_tables, &mut ac_tables)?;
            }
            JpegMarkerCode::DefineRestartInterval => {
                let length = cur.read_u16()?;
                if length != 4 {
                    return Err(StegoError::InvalidImage("malformed DRI length".into()));
                }
                restart_interval = cur.read_u16()?;
            }
            JpegMarkerCode::StartOfFrameBaseline | JpegMarkerCode::StartOfFrameExtendedSequential => {
                let (w, h, comps) = read_sof(&mut cur)?;
                width = w;
                height = h;
                components = comps;
                sof_seen = true;
            }
            JpegMarkerCode::StartOfFrameProgressive => {
                return Err(StegoError::InvalidImage(
                    "progressive JPEG (SOF2) is not supported".into(),
                ));
            }
            JpegMarkerCode::EndOfImage => {
                return Err(StegoError::InvalidImage("EOI before SOS".into()));
            }
            JpegMarkerCode::Restart(_) => {
                return Err(StegoError::InvalidImage("RSTn before SOS".into()));
            }
            JpegMarkerCode::StartOfImage => {
                return Err(StegoError::InvalidImage("duplicate SOI".into()));
            }
        }
    }

    if !sof_seen {
        return Err(StegoError::InvalidImage("missing SOF0".into()));
    }

    Ok(ParsedHeader {
        width,
        height,
        components,
        quant_tables,
        dc_tables,
        ac_tables,
        restart_interval,
        message_length,
        stored_password_base64,
        scan_data: &source[cur.position..],
    })
}

fn read_com(
    cur: &mut Cursor,
    message_length: &mut Option<i32>,
    stored_password_base64: &mut Option<String>,
) -> Result<()> {
    let length = cur.read_u16()?;
    if length < 3 {
        return Err(StegoError::InvalidImage("COM segment too short".into()));
    }
    let body_len = length as usize - 3;
    let type_id = cur.read_u8()?;
    let body = cur.read_bytes(body_len)?;
    match type_id {
        t if t == COM_TYPE_ATTRIBUTION => {}
        t if t == COM_TYPE_MESSAGE_LENGTH => {
            if body.len() != 4 {
                return Err(StegoError::InvalidImage(
                    "type-1 COM payload must be 4 bytes".into(),
                ));
            }
            *message_length = Some(i32::from_be_bytes([body[0], body[1], body[2], body[3]]));
        }
        t if t == COM_TYPE_PASSWORD => {
            let text = std::str::from_utf8(body)
                .map_err(|_| StegoError::InvalidImage("type-2 COM payload is not UTF-8".into()))?;
            *stored_password_base64 = Some(text.to_string());
        }
        _ => {}
    }
    Ok(())
}

fn read_dqt(cur: &mut Cursor, quant_tables: &mut [Option<[u8; 64]>; 4]) -> Result<()> {
    let length = cur.read_u16()?;
    let mut remaining = length as i32 - 2;
    while remaining > 0 {
        let header = cur.read_u8()?;
        let precision = header >> 4;
        let id = (header & 0x0F) as usize;
        if precision != 0 {
            return Err(StegoError::InvalidImage(
                "only 8-bit quantisation tables are supported".into(),
            ));
        }
        if id >= quant_tables.len() {
            return Err(StegoError::InvalidImage("quantisation table ID out of range".into()));
        }
        let values = cur.read_bytes(64)?;
        let mut table = [0u8; 64];
        table.copy_from_slice(values);
        quant_tables[id] = Some(table);
        remaining -= 1 + 64;
    }
    Ok(())
}

fn read_dht(
    cur: &mut Cursor,
    dc_tables: &mut [Option<DecodeTable>; 4],
    ac_tables: &mut [Option<DecodeTable>; 4],
) -> Result<()> {
    let length = cur.read_u16()?;
    let mut remaining = length as i32 - 2;
    while remaining > 0 {
        let header = cur.read_u8()?;
        let class = header >> 4;
        let id = (header & 0x0F) as usize;
        if id >= dc_tables.len() {
            return Err(StegoError::InvalidImage("Huffman table ID out of range".into()));
        }
        let length_bytes = cur.read_bytes(16)?;
        let mut lengths = [0u8; 16];
        lengths.copy_from_slice(length_bytes);
        let symbol_count: usize = lengths.iter().map(|&c| c as usize).sum();
        let values = cur.read_bytes(symbol_count)?.to_vec();
        let table = DecodeTable::build(&lengths, &values);
        if class == 0 {
            dc_tables[id] = Some(table);
        } else {
            ac_tables[id] = Some(table);
        }
        remaining -= 1 + 16 + symbol_count as i32;
    }
    Ok(())
}

fn read_sof(cur: &mut Cursor) -> Result<(u16, u16, Vec<DecodeComponent>)> {
    let _length = cur.read_u16()?;
    let precision = cur.read_u8()?;
    if precision != 8 {
        return Err(StegoError::InvalidImage("only 8-bit samples are supported".into()));
    }
    let height = cur.read_u16()?;
    let width = cur.read_u16()?;
    let component_count = cur.read_u8()? as usize;
    if component_count != 3 {
        return Err(StegoError::InvalidImage(
            "only 3-component (Y/Cb/Cr) frames are supported".into(),
        ));
    }
    let mut components = Vec::with_capacity(component_count);
    for _ in 0..component_count {
        let id = cur.read_u8()?;
        let sampling = cur.read_u8()?;
        if sampling != 0x11 {
            return Err(StegoError::InvalidImage(
                "only 1x1 chroma sampling is supported".into(),
            ));
        }
        let quant_table_id = cur.read_u8()?;
        components.push(DecodeComponent::new(id, quant_table_id, 0, 0));
    }
    Ok((width, height, components))
}

fn read_sos(cur: &mut Cursor, components: &mut [DecodeComponent]) -> Result<()> {
    let _length = cur.read_u16()?;
    let component_count = cur.read_u8()? as usize;
    if component_count != components.len() {
        return Err(StegoError::InvalidImage(
            "SOS component count does not match SOF0".into(),
        ));
    }
    for _ in 0..component_count {
        let selector = cur.read_u8()?;
        let tables = cur.read_u8()?;
        let dc_id = tables >> 4;
        let ac_id = tables & 0x0F;
        let component = components
            .iter_mut()
            .find(|c| c.id == selector)
            .ok_or_else(|| StegoError::InvalidImage("SOS selector matches no SOF0 component".into()))?;
        component.dc_huffman_id = dc_id;
        component.ac_huffman_id = ac_id;
    }
    let ss = cur.read_u8()?;
    let se = cur.read_u8()?;
    let ah_al = cur.read_u8()?;
    if ss != 0 || se != 63 || ah_al != 0 {
        return Err(StegoError::InvalidImage(
            "SOS spectral selection must be Ss=0, Se=63, Ah=Al=0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream_writer::SegmentWriter;

    fn minimal_headers(width: u16, height: u16) -> Vec<u8> {
        let mut w = SegmentWriter::new();
        w.write_start_of_image();
        w.write_app0_jfif();
        w.write_com_attribution("test");
        w.write_com_message_length(5);
        w.write_com_password("Zm9v");
        w.write_dqt(0, &[1u8; 64]);
        w.write_dqt(1, &[1u8; 64]);
        w.write_sof0(width, height, &[0, 1, 1]);
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
        w.into_bytes()
    }

    #[test]
    fn parses_dimensions_and_component_tables() {
        let bytes = minimal_headers(64, 32);
        let parsed = parse_header(&bytes).unwrap();
        assert_eq!(parsed.width, 64);
        assert_eq!(parsed.height, 32);
        assert_eq!(parsed.components.len(), 3);
        assert_eq!(parsed.message_length, Some(5));
        assert_eq!(parsed.stored_password_base64.as_deref(), Some("Zm9v"));
        assert!(parsed.quant_tables[0].is_some());
        assert!(parsed.dc_tables[0].is_some());
        assert!(parsed.ac_tables[1].is_some());
    }

    #[test]
    fn missing_soi_is_rejected() {
        let err = parse_header(&[0x00, 0x01]).unwrap_err();
        assert!(matches!(err, StegoError::InvalidImage(_)));
    }

    #[test]
    fn sos_before_sof0_is_rejected() {
        let mut w = SegmentWriter::new();
        w.write_start_of_image();
        w.write_sos(&[(0, 0), (1, 1), (1, 1)]);
        let bytes = w.into_bytes();
        let err = parse_header(&bytes).unwrap_err();
        assert!(matches!(err, StegoError::InvalidImage(_)));
    }
}
