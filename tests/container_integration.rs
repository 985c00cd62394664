//! Integration tests for container shapes.
//!
//! Every test starts from a full-size course plaintext, seals it in one of
//! the three container shapes and checks what comes back out.

use course_codec::container::cipher::{CourseCipher, KeyDerivation, KEY_SIZE, SEED_SIZE};
use course_codec::container::{compress_raw, decompress_raw, ContainerCodec};
use course_codec::format::{
    ContainerFormat, CONTAINER_HEADER_SIZE, CONTAINER_MAGIC, ENCRYPTED_CONTAINER_SIZE,
    PLAINTEXT_SIZE,
};
use course_codec::{Config, CourseError, Level, LevelHeader};

const KEY: [u8; KEY_SIZE] = *b"course-test-key!";

fn sample_level() -> Level {
    Level {
        header: LevelHeader {
            name: "Sealed".to_string(),
            timer: 500,
            ..LevelHeader::default()
        },
        ..Level::default()
    }
}

fn assert_container_error(err: &CourseError, expected: ContainerFormat) {
    match err {
        CourseError::ContainerDecodeError { format, .. } => assert_eq!(*format, expected),
        other => panic!("expected a container error, got {other:?}"),
    }
}

// ============================================================================
// Shape Tests
// ============================================================================

#[test]
fn test_every_shape_round_trips_a_level() {
    let codec = ContainerCodec::with_static_key(KEY);
    let level = sample_level();

    for format in ContainerFormat::ALL {
        let sealed = level.to_container(format, &codec).unwrap();
        let opened = Level::from_container(&sealed, format, &codec).unwrap();
        assert_eq!(opened, level, "{format}");
    }
}

#[test]
fn test_bcd_container_size_and_magic() {
    let codec = ContainerCodec::with_static_key(KEY);
    let sealed = sample_level()
        .to_container(ContainerFormat::Bcd, &codec)
        .unwrap();

    assert_eq!(sealed.len(), ENCRYPTED_CONTAINER_SIZE);
    assert_eq!(&sealed[0x0C..CONTAINER_HEADER_SIZE], CONTAINER_MAGIC);
    assert_eq!(
        &sealed[0x08..0x0C],
        &crc32fast::hash(&sample_level().encode()).to_le_bytes()
    );
}

#[test]
fn test_zcd_is_deflated_bcd() {
    let codec = ContainerCodec::with_static_key(KEY);
    let plaintext = sample_level().encode();

    let zcd = codec.seal(&plaintext, ContainerFormat::Zcd).unwrap();
    let inner = decompress_raw(&zcd).unwrap();
    assert_eq!(inner.len(), ENCRYPTED_CONTAINER_SIZE);
    assert_eq!(codec.open(&inner, ContainerFormat::Bcd).unwrap(), plaintext);
}

#[test]
fn test_zlib_needs_no_key() {
    let keyed = ContainerCodec::with_static_key(KEY);
    let keyless = ContainerCodec::without_cipher();
    let plaintext = sample_level().encode();

    let sealed = keyless.seal(&plaintext, ContainerFormat::Zlib).unwrap();
    assert!(sealed.len() < PLAINTEXT_SIZE);
    assert_eq!(keyed.open(&sealed, ContainerFormat::Zlib).unwrap(), plaintext);
}

#[test]
fn test_encrypted_shapes_need_a_key() {
    let keyless = ContainerCodec::without_cipher();
    let plaintext = sample_level().encode();

    for format in [ContainerFormat::Bcd, ContainerFormat::Zcd] {
        let err = keyless.seal(&plaintext, format).unwrap_err();
        assert_container_error(&err, format);
    }
}

#[test]
fn test_sealing_twice_uses_fresh_iv() {
    let codec = ContainerCodec::with_static_key(KEY);
    let plaintext = sample_level().encode();

    let first = codec.seal(&plaintext, ContainerFormat::Bcd).unwrap();
    let second = codec.seal(&plaintext, ContainerFormat::Bcd).unwrap();
    assert_ne!(first, second);
    assert_eq!(codec.open(&second, ContainerFormat::Bcd).unwrap(), plaintext);
}

// ============================================================================
// Corruption Tests
// ============================================================================

#[test]
fn test_wrong_key_is_detected() {
    let writer = ContainerCodec::with_static_key(KEY);
    let reader = ContainerCodec::with_static_key([0x5A; KEY_SIZE]);
    let sealed = writer
        .seal(&sample_level().encode(), ContainerFormat::Bcd)
        .unwrap();

    let err = reader.open(&sealed, ContainerFormat::Bcd).unwrap_err();
    assert_container_error(&err, ContainerFormat::Bcd);
    assert!(err.to_string().contains("checksum"));
}

#[test]
fn test_crc_mismatch_is_detected() {
    let codec = ContainerCodec::with_static_key(KEY);
    let mut sealed = codec
        .seal(&sample_level().encode(), ContainerFormat::Bcd)
        .unwrap();
    sealed[0x08] ^= 0xFF;

    let err = codec.open(&sealed, ContainerFormat::Bcd).unwrap_err();
    assert!(err.to_string().contains("checksum"));
}

#[test]
fn test_flipped_ciphertext_byte_is_detected() {
    let codec = ContainerCodec::with_static_key(KEY);
    let mut sealed = codec
        .seal(&sample_level().encode(), ContainerFormat::Bcd)
        .unwrap();
    sealed[CONTAINER_HEADER_SIZE + 0x100] ^= 0x01;

    assert!(codec.open(&sealed, ContainerFormat::Bcd).is_err());
}

#[test]
fn test_zcd_with_garbage_stream() {
    let codec = ContainerCodec::with_static_key(KEY);
    let err = codec
        .open(&[0xFF; 64], ContainerFormat::Zcd)
        .unwrap_err();
    assert_container_error(&err, ContainerFormat::Zcd);
}

#[test]
fn test_zlib_with_truncated_stream() {
    let codec = ContainerCodec::without_cipher();
    let sealed = codec
        .seal(&sample_level().encode(), ContainerFormat::Zlib)
        .unwrap();

    let result = codec.open(&sealed[..sealed.len() / 2], ContainerFormat::Zlib);
    assert!(result.is_err());
}

#[test]
fn test_short_plaintext_inside_valid_container() {
    let codec = ContainerCodec::with_static_key(KEY);
    let sealed = codec.seal(&[0u8; 0x100], ContainerFormat::Bcd).unwrap();

    let err = Level::from_container(&sealed, ContainerFormat::Bcd, &codec).unwrap_err();
    assert!(err.is_underrun());
}

#[test]
fn test_raw_deflate_round_trip_of_container() {
    let codec = ContainerCodec::with_static_key(KEY);
    let bcd = codec
        .seal(&sample_level().encode(), ContainerFormat::Bcd)
        .unwrap();
    let deflated = compress_raw(&bcd).unwrap();
    assert_eq!(
        codec.open(&deflated, ContainerFormat::Zcd).unwrap(),
        sample_level().encode()
    );
}

// ============================================================================
// Key Schedule Tests
// ============================================================================

/// Mixes the seed into a base key, like a per-file key schedule would.
struct SeededKey([u8; KEY_SIZE]);

impl KeyDerivation for SeededKey {
    fn derive_key(&self, seed: &[u8; SEED_SIZE]) -> [u8; KEY_SIZE] {
        let mut key = self.0;
        for (k, s) in key.iter_mut().zip(seed.iter().rev()) {
            *k = k.rotate_left(3) ^ s;
        }
        key
    }
}

#[test]
fn test_custom_key_derivation() {
    let codec = ContainerCodec::new(CourseCipher::new(SeededKey(KEY)));
    let level = sample_level();

    let sealed = level.to_container(ContainerFormat::Zcd, &codec).unwrap();
    assert_eq!(
        Level::from_container(&sealed, ContainerFormat::Zcd, &codec).unwrap(),
        level
    );

    let static_codec = ContainerCodec::with_static_key(KEY);
    assert!(Level::from_container(&sealed, ContainerFormat::Zcd, &static_codec).is_err());
}

#[test]
fn test_codec_from_config() {
    let config = Config::from_json(&format!(r#"{{ "course_key": "{}" }}"#, hex::encode(KEY)))
        .unwrap();
    let codec = config.codec().unwrap();

    let sealed = ContainerCodec::with_static_key(KEY)
        .seal(&sample_level().encode(), ContainerFormat::Bcd)
        .unwrap();
    assert_eq!(
        Level::from_container(&sealed, ContainerFormat::Bcd, &codec).unwrap(),
        sample_level()
    );
}
