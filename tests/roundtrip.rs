//! End-to-end round-trip and conformance scenarios.

use stego_jpeg::{analyze, capacity, decode, encode, Config, StegoError};

fn flat_raster(width: u32, height: u32, r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..(width * height) {
        out.push(r);
        out.push(g);
        out.push(b);
    }
    out
}

fn gradient_raster(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            out.push(((x * 3 + y) % 256) as u8);
            out.push(((x + y * 5) % 256) as u8);
            out.push(((x * 7 + y * 2) % 256) as u8);
        }
    }
    out
}

#[test]
fn scenario_1_64x64_hello_world() {
    let config = Config::default();
    let raster = flat_raster(64, 64, 128, 64, 200);
    let bytes = encode(&raster, 64, 64, "hello world", "test1234", 80, &config).unwrap();
    assert_eq!(decode(&bytes, "test1234", &config).unwrap(), "hello world");
}

#[test]
fn scenario_2_64x64_punctuation_message() {
    let config = Config::default();
    let raster = gradient_raster(64, 64);
    let bytes = encode(&raster, 64, 64, "Hello World 123! @#$%", "pass", 80, &config).unwrap();
    assert_eq!(decode(&bytes, "pass", &config).unwrap(), "Hello World 123! @#$%");
}

#[test]
fn scenario_3_128x128_longer_ascii_message() {
    let config = Config::default();
    let raster = gradient_raster(128, 128);
    let message: String = (0..77).map(|i| (b'a' + (i % 26) as u8) as char).collect();
    let bytes = encode(&raster, 128, 128, &message, "longpass", 50, &config).unwrap();
    assert_eq!(decode(&bytes, "longpass", &config).unwrap(), message);
}

#[test]
fn scenario_4_single_character_message() {
    let config = Config::default();
    let raster = flat_raster(64, 64, 10, 200, 30);
    let bytes = encode(&raster, 64, 64, "A", "x", 90, &config).unwrap();
    assert_eq!(decode(&bytes, "x", &config).unwrap(), "A");
}

#[test]
fn scenario_5_non_square_low_quality() {
    let config = Config::default();
    let raster = gradient_raster(128, 64);
    let bytes = encode(&raster, 128, 64, "non-square", "nsq", 10, &config).unwrap();
    assert_eq!(decode(&bytes, "nsq", &config).unwrap(), "non-square");
}

#[test]
fn scenario_6_wrong_password_fails() {
    let config = Config::default();
    let raster = flat_raster(64, 64, 5, 5, 5);
    let bytes = encode(&raster, 64, 64, "secret", "right", 80, &config).unwrap();
    let err = decode(&bytes, "wrong", &config).unwrap_err();
    assert!(matches!(err, StegoError::InvalidPassword));
}

#[test]
fn capacity_formula_matches_the_spec() {
    assert_eq!(capacity(64, 64), 8 * 8 * 2);
    assert_eq!(capacity(128, 128), 16 * 16 * 2);
    assert_eq!(capacity(128, 64), 16 * 8 * 2);
    // Non-multiple-of-8 dimensions floor-divide, per `capacity(w,h) = floor(w/8)*floor(h/8)*2`.
    assert_eq!(capacity(65, 64), 8 * 8 * 2);
}

#[test]
fn analyze_reports_used_mcus_for_a_100_byte_message() {
    let config = Config::default();
    let raster = gradient_raster(128, 128);
    let message: String = (0..100).map(|i| (b'0' + (i % 10) as u8) as char).collect();
    let bytes = encode(&raster, 128, 128, &message, "pw", 80, &config).unwrap();
    let report = analyze(&bytes).unwrap();
    assert_eq!(report.message_length_bytes, 100);
    assert_eq!(report.used_mcus, 50);
    assert!(report.has_password);
}

#[test]
fn message_too_long_is_rejected_before_any_bytes_are_written() {
    let config = Config::default();
    let raster = flat_raster(8, 8, 1, 1, 1);
    let long_message = "x".repeat(100);
    let err = encode(&raster, 8, 8, &long_message, "pw", 80, &config).unwrap_err();
    assert!(matches!(err, StegoError::MessageTooLong { .. }));
}

#[test]
fn varied_quality_levels_all_round_trip() {
    let config = Config::default();
    let raster = gradient_raster(64, 64);
    for quality in [1u32, 10, 50, 80, 99, 100] {
        let bytes = encode(&raster, 64, 64, "quality check", "pw", quality, &config).unwrap();
        assert_eq!(
            decode(&bytes, "pw", &config).unwrap(),
            "quality check",
            "round-trip failed at quality {quality}"
        );
    }
}

#[test]
fn decoded_stream_is_a_well_formed_baseline_jpeg() {
    let config = Config::default();
    let raster = gradient_raster(64, 64);
    let bytes = encode(&raster, 64, 64, "conformance", "pw", 80, &config).unwrap();
    assert_eq!(&bytes[0..2], &[0xFF, 0xD8], "missing SOI");
    assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9], "missing EOI");
    // SOF0 (0xFFC0) must appear once before SOS (0xFFDA).
    let sof0_pos = find_marker(&bytes, 0xC0).expect("missing SOF0");
    let sos_pos = find_marker(&bytes, 0xDA).expect("missing SOS");
    assert!(sof0_pos < sos_pos);
}

fn find_marker(bytes: &[u8], marker: u8) -> Option<usize> {
    bytes
        .windows(2)
        .position(|w| w[0] == 0xFF && w[1] == marker)
}
