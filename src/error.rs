use thiserror::Error;

/// Error taxonomy for the stego-JPEG codec core.
///
/// Every variant corresponds to exactly one row of the error taxonomy: a
/// decode or encode failure is terminal for that call, never a partial
/// result. `InvalidPassword` is an equality-check failure against a stored
/// blob, not a cryptographic authentication failure — neither obfuscation
/// layer is intended to resist a motivated attacker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// Input raster unreadable, a post-crop dimension is 0, the decoder
    /// never reaches SOI/SOF0, the frame is progressive (SOF2), samples are
    /// not 8-bit, a segment length is malformed, or the component count is
    /// unsupported. Also covers AES init/transform failures on a malformed
    /// stored blob.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Payload length exceeds the embedding capacity of the cover image.
    #[error("message too long: {len} bytes exceeds capacity of {capacity} bytes")]
    MessageTooLong { len: usize, capacity: usize },

    /// Stored password AES-decrypts but does not byte-equal the supplied
    /// password.
    #[error("invalid password")]
    InvalidPassword,

    /// Decode succeeded but no type-1 COM segment was present, or the
    /// recorded message length was not positive.
    #[error("no hidden message")]
    NoHiddenMessage,

    /// A Huffman code could not be resolved, a marker appeared where none
    /// was expected, or a segment was truncated mid-read.
    #[error("malformed stream: {0}")]
    MalformedStream(String),
}

pub type Result<T> = std::result::Result<T, StegoError>;
