use exifnotes_core::location::{decode, encode};
use exifnotes_core::{Location, MalformedLocation};
use proptest::prelude::*;

#[test]
fn helsinki_roundtrips_exactly() {
    let text = encode(60.1699, 24.9384);
    assert_eq!(text, "60.1699 24.9384");
    assert_eq!(decode(&text), Some(Location::new(60.1699, 24.9384)));
}

#[test]
fn southern_and_western_hemispheres_roundtrip() {
    for (lat, lng) in [(-33.8688, 151.2093), (40.7128, -74.006), (-54.8019, -68.303)] {
        assert_eq!(decode(&encode(lat, lng)), Some(Location::new(lat, lng)));
    }
}

#[test]
fn absent_and_garbage_values_decode_to_none() {
    assert_eq!(decode(""), None);
    assert_eq!(decode("null"), None);
    assert_eq!(decode("garbage"), None);
    assert_eq!(decode("  "), None);
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(decode(" 1.5 2.5\n"), Some(Location::new(1.5, 2.5)));
}

#[test]
fn out_of_range_values_are_rejected() {
    assert_eq!(
        "91 0".parse::<Location>(),
        Err(MalformedLocation::OutOfRange)
    );
    assert_eq!(decode("0 -180.5"), None);
    assert_eq!(decode("-90 180"), Some(Location::new(-90.0, 180.0)));
}

#[test]
fn display_matches_storage_form() {
    let location = Location::new(48.8566, 2.3522);
    assert_eq!(location.to_string(), location.encode());
}

proptest! {
    #[test]
    fn encode_then_decode_is_exact(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
        prop_assert_eq!(decode(&encode(lat, lng)), Some(Location::new(lat, lng)));
    }

    #[test]
    fn decode_never_panics(text in ".{0,40}") {
        let _ = decode(&text);
    }
}
