//! Process-wide constants and the small set of environment-driven overrides
//! the core recognises.

/// Side length of a DCT/quantisation block.
pub const BLOCK_SIZE: usize = 8;
/// Pixels (and coefficients) per block.
pub const BLOCK_DIM: usize = BLOCK_SIZE * BLOCK_SIZE;
/// Y, Cb, Cr.
pub const COMPONENT_COUNT: usize = 3;
/// Index of the Cb plane within the per-image component array.
pub const CB_COMPONENT_INDEX: usize = 1;
/// Payload bits carried by one MCU (16 mid-frequency Cb coefficients, one
/// LSB each).
pub const BITS_PER_MCU: usize = 16;

/// Zigzag positions 25..=40, in the four fixed cycling orders described by
/// the embedding scheme. Each is a permutation of the same 16 indices.
pub const EMBED_PATTERNS: [[usize; 16]; 4] = [
    [25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40],
    [40, 39, 38, 37, 36, 35, 34, 33, 32, 31, 30, 29, 28, 27, 26, 25],
    [28, 27, 26, 25, 29, 30, 31, 32, 33, 34, 35, 36, 40, 39, 38, 37],
    [25, 26, 27, 28, 36, 35, 34, 33, 32, 31, 30, 29, 37, 38, 39, 40],
];

/// COM payload type tags.
pub const COM_TYPE_ATTRIBUTION: u8 = 0;
pub const COM_TYPE_MESSAGE_LENGTH: u8 = 1;
pub const COM_TYPE_PASSWORD: u8 = 2;

/// Attribution string written into the type-0 COM segment.
pub const ATTRIBUTION_TEXT: &str = "stego-jpeg";

const DEFAULT_AES_KEY: &str = "juccqhjyodhhfymt";
const DEFAULT_AES_IV: &str = "blnzllpshgivhxjk";
const DEFAULT_CAESAR_KEY: u8 = 2;

/// Recognised configuration, resolved once per orchestrator call from the
/// environment. Non-16-byte AES values and non-numeric Caesar keys fall
/// back to the documented default per field rather than rejecting the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub aes_key: [u8; 16],
    pub aes_iv: [u8; 16],
    pub caesar_key: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aes_key: to_key_bytes(DEFAULT_AES_KEY),
            aes_iv: to_key_bytes(DEFAULT_AES_IV),
            caesar_key: DEFAULT_CAESAR_KEY,
        }
    }
}

impl Config {
    /// Reads `STEGO_AES_KEY`, `STEGO_AES_IV`, `STEGO_CAESAR_KEY` from the
    /// process environment, falling back to defaults per-field.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let aes_key = std::env::var("STEGO_AES_KEY")
            .ok()
            .and_then(|v| valid_key_bytes(&v))
            .unwrap_or(defaults.aes_key);
        let aes_iv = std::env::var("STEGO_AES_IV")
            .ok()
            .and_then(|v| valid_key_bytes(&v))
            .unwrap_or(defaults.aes_iv);
        let caesar_key = std::env::var("STEGO_CAESAR_KEY")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .filter(|v| *v <= 255)
            .map(|v| v as u8)
            .unwrap_or(defaults.caesar_key);
        Self {
            aes_key,
            aes_iv,
            caesar_key,
        }
    }
}

fn to_key_bytes(s: &str) -> [u8; 16] {
    valid_key_bytes(s).expect("built-in default must be exactly 16 UTF-8 bytes")
}

fn valid_key_bytes(s: &str) -> Option<[u8; 16]> {
    let bytes = s.as_bytes();
    if bytes.len() != 16 {
        return None;
    }
    let mut out = [0u8; 16];
    out.copy_from_slice(bytes);
    Some(out)
}
