//! Integration tests for the course plaintext codec.
//!
//! Courses are built in memory, encoded, mutated at the byte level where a
//! test needs a malformed or unusual buffer, and decoded again.

use course_codec::enums::{
    ClearCondition, GameStyle, GameVersion, IcicleKind, Name, ObjectKind, Theme,
};
use course_codec::format::{AREA_SIZE, HEADER_SIZE, PLAINTEXT_SIZE};
use course_codec::level::{Ground, Icicle, LevelObject, Sound, Track};
use course_codec::{decode, encode, Area, CourseError, Level, LevelHeader};
use proptest::prelude::*;

/// Offset of the ground count inside an area header.
const GROUND_COUNT_OFFSET: usize = 0x3C;

/// Offset of the object count inside an area header.
const OBJECT_COUNT_OFFSET: usize = 0x1C;

fn sample_level() -> Level {
    let mut level = Level {
        header: LevelHeader {
            name: "Castle Rush".to_string(),
            description: "Run through the castle before time runs out".to_string(),
            game_style: GameStyle::Smw,
            game_version: GameVersion::V300,
            timer: 200,
            year: 2021,
            month: 4,
            day: 23,
            hour: 18,
            minute: 5,
            clear_condition: ClearCondition(4_293_354_249),
            clear_condition_magnitude: 2,
            upload_id: 0x0123_4567_89AB_CDEF,
            ..LevelHeader::default()
        },
        overworld: Area {
            theme: Theme::Castle,
            boundary_right: 240 * 16,
            boundary_top: 27 * 16,
            ..Area::default()
        },
        subworld: Area {
            theme: Theme::Underground,
            boundary_right: 60 * 16,
            boundary_top: 27 * 16,
            ..Area::default()
        },
    };

    for x in 0..40u8 {
        level
            .overworld
            .ground
            .push(Ground {
                x,
                y: 0,
                kind: 1,
                background_kind: 0,
            })
            .unwrap();
    }
    level
        .overworld
        .objects
        .push(LevelObject {
            x: 800,
            y: 240,
            width: 1,
            height: 1,
            kind: ObjectKind::Goomba,
            child_kind: -1,
            link_id: -1,
            sound_id: -1,
            ..LevelObject::default()
        })
        .unwrap();
    level
        .overworld
        .sounds
        .push(Sound {
            kind: 3,
            x: 10,
            y: 4,
            reserved: 0,
        })
        .unwrap();
    level
        .overworld
        .tracks
        .push(Track {
            x: 12,
            y: 6,
            kind: 2,
            ..Track::default()
        })
        .unwrap();
    level
        .subworld
        .icicles
        .push(Icicle {
            x: 5,
            y: 20,
            kind: IcicleKind::Fixed,
            reserved: 0,
        })
        .unwrap();

    level
}

fn write_u32_at(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

// ============================================================================
// Round Trip Tests
// ============================================================================

#[test]
fn test_sample_level_round_trip() {
    let level = sample_level();
    let encoded = encode(&level);

    assert_eq!(encoded.len(), PLAINTEXT_SIZE);
    assert_eq!(decode(&encoded).unwrap(), level);
}

#[test]
fn test_default_level_encodes_to_fixed_size() {
    let encoded = Level::default().encode();
    assert_eq!(encoded.len(), PLAINTEXT_SIZE);
    assert_eq!(Level::decode(&encoded).unwrap(), Level::default());
}

#[test]
fn test_reencode_is_byte_identical() {
    let encoded = encode(&sample_level());
    let decoded = decode(&encoded).unwrap();
    assert_eq!(encode(&decoded), encoded);
}

#[test]
fn test_full_width_name_round_trips() {
    let mut level = sample_level();
    level
        .header
        .set_name(format!("{}🍄", "a".repeat(31)))
        .unwrap();

    let decoded = decode(&encode(&level)).unwrap();
    assert_eq!(decoded.header.name.encode_utf16().count(), 33);
    assert_eq!(decoded, level);
}

#[test]
fn test_json_with_overlong_name_is_rejected() {
    let mut json = serde_json::to_value(sample_level()).unwrap();
    json["header"]["name"] = serde_json::Value::String(format!("{}🍄", "a".repeat(32)));

    let err = serde_json::from_value::<Level>(json).unwrap_err();
    assert!(err.to_string().contains("name code units"));
}

#[test]
fn test_json_round_trip() {
    let level = sample_level();
    let json = serde_json::to_string(&level).unwrap();
    let parsed: Level = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, level);
}

// ============================================================================
// Slot Handling Tests
// ============================================================================

#[test]
fn test_zero_ground_count_still_consumes_slots() {
    let level = sample_level();
    let mut encoded = encode(&level);
    write_u32_at(&mut encoded, HEADER_SIZE + GROUND_COUNT_OFFSET, 0);

    let decoded = decode(&encoded).unwrap();
    assert!(decoded.overworld.ground.is_empty());
    assert_eq!(decoded.overworld.tracks, level.overworld.tracks);
    assert_eq!(decoded.subworld, level.subworld);
}

#[test]
fn test_garbage_in_unused_slots_is_ignored() {
    let level = sample_level();
    let mut encoded = encode(&level);

    // Claim zero objects; the one written object becomes an unused slot.
    write_u32_at(&mut encoded, HEADER_SIZE + OBJECT_COUNT_OFFSET, 0);
    let decoded = decode(&encoded).unwrap();

    assert!(decoded.overworld.objects.is_empty());
    assert_eq!(decoded.overworld.ground, level.overworld.ground);
    assert_ne!(encode(&decoded), encoded);
}

#[test]
fn test_oversized_count_is_clamped() {
    let level = sample_level();
    let mut encoded = encode(&level);
    write_u32_at(&mut encoded, HEADER_SIZE + GROUND_COUNT_OFFSET, u32::MAX);

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded.overworld.ground.len(), 4000);
    assert_eq!(decoded.overworld.ground.as_slice()[..40], *level.overworld.ground.as_slice());
    assert_eq!(decoded.subworld, level.subworld);
}

// ============================================================================
// Truncation Tests
// ============================================================================

fn decode_error(len: usize) -> CourseError {
    let encoded = encode(&sample_level());
    decode(&encoded[..len]).unwrap_err()
}

#[test]
fn test_truncated_header() {
    let err = decode_error(HEADER_SIZE - 1);
    assert!(err.is_underrun());
    assert!(matches!(
        err,
        CourseError::LevelDecodeError {
            section: "header",
            ..
        }
    ));
}

#[test]
fn test_truncated_overworld() {
    let err = decode_error(HEADER_SIZE + 0x20);
    assert!(err.is_underrun());
    assert!(matches!(
        err,
        CourseError::LevelDecodeError {
            section: "overworld",
            ..
        }
    ));
}

#[test]
fn test_truncated_subworld() {
    let err = decode_error(PLAINTEXT_SIZE - 1);
    assert!(err.is_underrun());
    assert!(matches!(
        err,
        CourseError::LevelDecodeError {
            section: "subworld",
            ..
        }
    ));
}

#[test]
fn test_empty_buffer() {
    assert!(decode(&[]).unwrap_err().is_underrun());
}

#[test]
fn test_trailing_bytes_are_ignored() {
    let level = sample_level();
    let mut encoded = encode(&level);
    encoded.extend_from_slice(&[0xEE; 64]);
    assert_eq!(decode(&encoded).unwrap(), level);
}

#[test]
fn test_area_boundary_offsets() {
    let encoded = encode(&sample_level());
    assert_eq!(encoded[HEADER_SIZE], Theme::Castle.code());
    assert_eq!(encoded[HEADER_SIZE + AREA_SIZE], Theme::Underground.code());
}

// ============================================================================
// Enumeration Tests
// ============================================================================

#[test]
fn test_clear_condition_survives_round_trip() {
    let decoded = decode(&encode(&sample_level())).unwrap();
    assert_eq!(
        decoded.header.clear_condition.name(),
        Name::Known("Reach the goal after defeating at least/all (n) Banzai Bill(s).")
    );
    assert_eq!(
        decoded.header.clear_condition_text(),
        "Reach the goal after defeating at least/all 2 Banzai Bill(s)."
    );
}

#[test]
fn test_clear_condition_zero_is_none() {
    let decoded = Level::decode(&Level::default().encode()).unwrap();
    assert_eq!(decoded.header.clear_condition, ClearCondition::NONE);
    assert_eq!(decoded.header.clear_condition.name(), Name::Known("None"));
}

#[test]
fn test_unknown_codes_are_preserved() {
    let mut level = sample_level();
    level.overworld.theme = Theme::from_code(0xC8);
    level.header.game_style = GameStyle::from_code(0x4242);
    level.overworld.objects.as_mut_slice()[0].kind = ObjectKind::from_code(999);

    let decoded = decode(&encode(&level)).unwrap();
    assert_eq!(decoded.overworld.theme.name(), Name::Unknown(0xC8));
    assert_eq!(decoded.header.game_style.code(), 0x4242);
    assert_eq!(decoded.overworld.objects.as_slice()[0].kind.code(), 999);
    assert_eq!(decoded, level);
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_object() -> impl Strategy<Value = LevelObject> {
    (
        any::<i32>(),
        any::<i32>(),
        any::<u8>(),
        any::<u8>(),
        any::<u32>(),
        any::<u16>(),
        any::<i16>(),
        any::<i16>(),
    )
        .prop_map(|(x, y, width, height, flags, kind, child_kind, link_id)| LevelObject {
            x,
            y,
            width,
            height,
            flags,
            kind: ObjectKind::from_code(kind),
            child_kind,
            link_id,
            ..LevelObject::default()
        })
}

fn arb_ground() -> impl Strategy<Value = Ground> {
    any::<[u8; 4]>().prop_map(|[x, y, kind, background_kind]| Ground {
        x,
        y,
        kind,
        background_kind,
    })
}

fn arb_area() -> impl Strategy<Value = Area> {
    (
        any::<u8>(),
        any::<i32>(),
        any::<i32>(),
        any::<u32>(),
        prop::collection::vec(arb_object(), 0..40),
        prop::collection::vec(arb_ground(), 0..80),
    )
        .prop_map(|(theme, right, top, flags, objects, ground)| Area {
            theme: Theme::from_code(theme),
            boundary_right: right,
            boundary_top: top,
            flags,
            objects: objects.try_into().unwrap(),
            ground: ground.try_into().unwrap(),
            ..Area::default()
        })
}

/// Names up to the full 33 code units, mixing in characters outside the
/// BMP that take two units each.
fn arb_name() -> impl Strategy<Value = String> {
    (
        "[A-Za-z0-9 !?]{0,17}",
        prop::collection::vec(prop::sample::select(vec!['コ', 'ー', 'ス', '🍄', '⭐', '👻']), 0..=8),
    )
        .prop_map(|(ascii, wide)| ascii.chars().chain(wide).collect())
}

fn arb_header() -> impl Strategy<Value = LevelHeader> {
    (
        arb_name(),
        "[A-Za-z0-9 .,コース]{0,101}",
        any::<u16>(),
        any::<u32>(),
        any::<i16>(),
        any::<u64>(),
        prop::collection::vec(any::<u8>(), 189),
    )
        .prop_map(
            |(name, description, style, condition, timer, upload_id, reserved)| LevelHeader {
                name,
                description,
                game_style: GameStyle::from_code(style),
                clear_condition: ClearCondition(condition),
                timer,
                upload_id,
                reserved,
                ..LevelHeader::default()
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_round_trip_property(
        header in arb_header(),
        overworld in arb_area(),
        subworld in arb_area(),
    ) {
        let level = Level { header, overworld, subworld };
        prop_assert!(level.validate().is_ok());
        let encoded = encode(&level);

        prop_assert_eq!(encoded.len(), PLAINTEXT_SIZE);
        prop_assert_eq!(decode(&encoded).unwrap(), level);
    }

    #[test]
    fn test_decode_never_panics_on_short_input(len in 0usize..HEADER_SIZE + 0x100) {
        let encoded = encode(&Level::default());
        let result = decode(&encoded[..len]);
        prop_assert!(result.unwrap_err().is_underrun());
    }
}
