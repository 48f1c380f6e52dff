//! AES-128-CBC + Base64 wrapper for the password string carried in the
//! type-2 COM segment. This is an obfuscation layer, not an authentication
//! mechanism: `decrypt_and_compare` reports equality against a stored blob,
//! never cryptographic identity.

use aes::Aes128;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{Result, StegoError};

type Encryptor = cbc::Encryptor<Aes128>;
type Decryptor = cbc::Decryptor<Aes128>;

/// Encrypts `password` with AES-128-CBC/PKCS7 under `key`/`iv` and
/// Base64-encodes the ciphertext — the exact bytes stored in the type-2
/// COM payload.
pub fn encrypt_password(password: &str, key: &[u8; 16], iv: &[u8; 16]) -> String {
    let cipher = Encryptor::new(key.into(), iv.into());
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(password.as_bytes());
    BASE64.encode(ciphertext)
}

/// Decrypts a Base64 AES-128-CBC blob back into its plaintext bytes. Any
/// failure (bad Base64, bad padding, short ciphertext) is surfaced as
/// `InvalidImage` per the `crypto-failure` mapping in the error taxonomy.
pub fn decrypt_password(encoded: &str, key: &[u8; 16], iv: &[u8; 16]) -> Result<Vec<u8>> {
    let ciphertext = BASE64
        .decode(encoded)
        .map_err(|e| StegoError::InvalidImage(format!("bad password blob base64: {e}")))?;
    let cipher = Decryptor::new(key.into(), iv.into());
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|e| StegoError::InvalidImage(format!("bad password blob padding: {e}")))
}

/// Decrypts `stored` and compares it byte-for-byte against `supplied`.
/// `Ok(false)` means the blob decrypted cleanly but did not match;
/// `Err` means the blob itself was unreadable.
pub fn decrypt_and_compare(stored: &str, supplied: &str, key: &[u8; 16], iv: &[u8; 16]) -> Result<bool> {
    let plaintext = decrypt_password(stored, key, iv)?;
    Ok(plaintext == supplied.as_bytes())
}
