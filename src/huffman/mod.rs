//! Huffman coding: standard tables, canonical encode-table construction,
//! and the two-tier (fast 9-bit / slow 16-bit) canonical decoder.

pub mod decode;
pub mod encode;
pub mod tables;

pub use decode::{sign_extend, DecodeTable};
pub use encode::{BlockEncoder, EncodeTable};
