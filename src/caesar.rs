//! Position-dependent byte shift used to obfuscate the payload before
//! embedding. Length-preserving; not intended as cryptographic protection.

/// `out[i] = (in[i] + key + i) mod 256`.
pub fn encrypt(data: &[u8], key: u8) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, &b)| shift(b, key, i))
        .collect()
}

/// Inverse of [`encrypt`]: `out[i] = (in[i] - key - i) mod 256`.
pub fn decrypt(data: &[u8], key: u8) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, &b)| unshift(b, key, i))
        .collect()
}

fn shift(byte: u8, key: u8, index: usize) -> u8 {
    let offset = (key as usize + index) % 256;
    byte.wrapping_add(offset as u8)
}

fn unshift(byte: u8, key: u8, index: usize) -> u8 {
    let offset = (key as usize + index) % 256;
    byte.wrapping_sub(offset as u8)
}
