//! JPEG marker codes used by the segment writer/reader. Unlike a full
//! codec's marker set this only names what a baseline SOI..EOI stream with
//! APPn/COM/DQT/DHT/SOF0/SOF1/SOF2/DRI/RSTn actually needs.

/// A JPEG marker byte (the byte following 0xFF in a marker pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegMarkerCode {
    StartOfImage,
    EndOfImage,
    StartOfScan,
    DefineRestartInterval,
    Comment,
    DefineQuantizationTable,
    DefineHuffmanTable,
    StartOfFrameBaseline,
    StartOfFrameExtendedSequential,
    StartOfFrameProgressive,
    Restart(u8),
    Application(u8),
}

impl JpegMarkerCode {
    pub fn to_byte(self) -> u8 {
        match self {
            JpegMarkerCode::StartOfImage => 0xD8,
            JpegMarkerCode::EndOfImage => 0xD9,
            JpegMarkerCode::StartOfScan => 0xDA,
            JpegMarkerCode::DefineRestartInterval => 0xDD,
            JpegMarkerCode::Comment => 0xFE,
            JpegMarkerCode::DefineQuantizationTable => 0xDB,
            JpegMarkerCode::DefineHuffmanTable => 0xC4,
            JpegMarkerCode::StartOfFrameBaseline => 0xC0,
            JpegMarkerCode::StartOfFrameExtendedSequential => 0xC1,
            JpegMarkerCode::StartOfFrameProgressive => 0xC2,
            JpegMarkerCode::Restart(n) => 0xD0 + n,
            JpegMarkerCode::Application(n) => 0xE0 + n,
        }
    }
}

impl TryFrom<u8> for JpegMarkerCode {
    type Error = ();

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0xD8 => JpegMarkerCode::StartOfImage,
            0xD9 => JpegMarkerCode::EndOfImage,
            0xDA => JpegMarkerCode::StartOfScan,
            0xDD => JpegMarkerCode::DefineRestartInterval,
            0xFE => JpegMarkerCode::Comment,
            0xDB => JpegMarkerCode::DefineQuantizationTable,
            0xC4 => JpegMarkerCode::DefineHuffmanTable,
            0xC0 => JpegMarkerCode::StartOfFrameBaseline,
            0xC1 => JpegMarkerCode::StartOfFrameExtendedSequential,
            0xC2 => JpegMarkerCode::StartOfFrameProgressive,
            0xD0..=0xD7 => JpegMarkerCode::Restart(byte - 0xD0),
            0xE0..=0xEF => JpegMarkerCode::Application(byte - 0xE0),
            _ => return Err(()),
        })
    }
}

/// `true` for RST0..RST7.
pub fn is_restart(byte: u8) -> bool {
    (0xD0..=0xD7).contains(&byte)
}
