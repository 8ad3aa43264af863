use chrono::{NaiveDate, NaiveDateTime};
use exifnotes_core::{
    Camera, DeleteMode, EntityKind, FilmStore, Frame, FrameSortMode, IntegrityViolation, Lens,
    Location, Roll, RollFilter, RollSortMode, StoreError, ValidationError,
};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn frame_with_shutter(roll_id: i64, count: u32, shutter: &str) -> Frame {
    let mut frame = Frame::new(roll_id, count, at(1, 12));
    frame.shutter = shutter.to_string();
    frame
}

#[test]
fn roll_with_frames_scenario() {
    let store = FilmStore::open_in_memory().unwrap();
    let camera_id = store.add_camera(&Camera::new("Olympus", "XA")).unwrap();

    let mut roll = Roll::new("Portra 160", at(1, 9));
    roll.camera_id = Some(camera_id);
    roll.note = Some("Box speed".to_string());
    let roll_id = store.add_roll(&roll).unwrap();

    store.add_frame(&frame_with_shutter(roll_id, 1, "1/125")).unwrap();
    store.add_frame(&frame_with_shutter(roll_id, 2, "1/500")).unwrap();
    store.add_frame(&frame_with_shutter(roll_id, 3, "1/60")).unwrap();

    assert_eq!(store.count_frames(roll_id).unwrap(), 3);

    let by_shutter: Vec<String> = store
        .list_frames_sorted(roll_id, FrameSortMode::ShutterSpeed)
        .unwrap()
        .into_iter()
        .map(|frame| frame.shutter)
        .collect();
    assert_eq!(by_shutter, vec!["1/500", "1/125", "1/60"]);

    let loaded = store.get_roll(roll_id).unwrap();
    assert_eq!(loaded.camera_id, Some(camera_id));
    assert_eq!(loaded.note.as_deref(), Some("Box speed"));
    assert_eq!(loaded.date, at(1, 9));
}

#[test]
fn shutter_with_quote_roundtrips_exactly() {
    let store = FilmStore::open_in_memory().unwrap();
    let roll_id = store.add_roll(&Roll::new("Velvia", at(2, 8))).unwrap();

    let id = store.add_frame(&frame_with_shutter(roll_id, 1, "1\"")).unwrap();
    assert_eq!(store.get_frame(id).unwrap().shutter, "1\"");

    let mut frame = store.get_frame(id).unwrap();
    frame.shutter = "2''".to_string();
    store.update_frame(&frame).unwrap();
    assert_eq!(store.get_frame(id).unwrap().shutter, "2''");
}

#[test]
fn frames_list_by_count_then_id() {
    let store = FilmStore::open_in_memory().unwrap();
    let roll_id = store.add_roll(&Roll::new("HP5", at(3, 8))).unwrap();

    let late = store.add_frame(&Frame::new(roll_id, 5, at(3, 9))).unwrap();
    let dup_first = store.add_frame(&Frame::new(roll_id, 2, at(3, 9))).unwrap();
    let dup_second = store.add_frame(&Frame::new(roll_id, 2, at(3, 9))).unwrap();

    let ids: Vec<i64> = store
        .list_frames(roll_id)
        .unwrap()
        .into_iter()
        .map(|frame| frame.id)
        .collect();
    assert_eq!(ids, vec![dup_first, dup_second, late]);
}

#[test]
fn frame_location_is_persisted_through_codec() {
    let store = FilmStore::open_in_memory().unwrap();
    let roll_id = store.add_roll(&Roll::new("Gold 200", at(4, 8))).unwrap();

    let mut frame = Frame::new(roll_id, 1, at(4, 10));
    frame.location = Some(Location::new(-33.8688, 151.2093));
    frame.note = Some("harbour".to_string());
    let id = store.add_frame(&frame).unwrap();

    let loaded = store.get_frame(id).unwrap();
    assert_eq!(loaded.location, Some(Location::new(-33.8688, 151.2093)));
    assert_eq!(loaded.note.as_deref(), Some("harbour"));
}

#[test]
fn unstorable_location_is_rejected_before_write() {
    let store = FilmStore::open_in_memory().unwrap();
    let roll_id = store.add_roll(&Roll::new("Gold 200", at(4, 8))).unwrap();

    for location in [Location::new(95.0, 10.0), Location::new(f64::NAN, 10.0)] {
        let mut frame = Frame::new(roll_id, 1, at(4, 10));
        frame.location = Some(location);
        assert!(matches!(
            store.add_frame(&frame),
            Err(StoreError::Validation(ValidationError::Unrepresentable {
                entity: EntityKind::Frame,
                field: "location",
            }))
        ));
    }
    assert_eq!(store.count_frames(roll_id).unwrap(), 0);

    let mut frame = Frame::new(roll_id, 1, at(4, 10));
    frame.location = Some(Location::new(10.0, 20.0));
    let id = store.add_frame(&frame).unwrap();

    let mut moved = store.get_frame(id).unwrap();
    moved.location = Some(Location::new(10.0, 200.0));
    assert!(matches!(
        store.update_frame(&moved),
        Err(StoreError::Validation(_))
    ));
    assert_eq!(
        store.get_frame(id).unwrap().location,
        Some(Location::new(10.0, 20.0))
    );
}

#[test]
fn dates_keep_their_seconds() {
    let store = FilmStore::open_in_memory().unwrap();
    let shot = |second: u32| {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(17, 42, second)
            .unwrap()
    };

    let roll_id = store.add_roll(&Roll::new("Tri-X", shot(33))).unwrap();
    assert_eq!(store.get_roll(roll_id).unwrap().date, shot(33));

    let late = store.add_frame(&Frame::new(roll_id, 1, shot(48))).unwrap();
    let early = store.add_frame(&Frame::new(roll_id, 2, shot(5))).unwrap();
    assert_eq!(store.get_frame(late).unwrap().date, shot(48));
    assert_eq!(store.get_frame(early).unwrap().date, shot(5));

    let by_date: Vec<i64> = store
        .list_frames_sorted(roll_id, FrameSortMode::Date)
        .unwrap()
        .into_iter()
        .map(|frame| frame.id)
        .collect();
    assert_eq!(by_date, vec![early, late]);
}

#[test]
fn frame_references_must_exist() {
    let store = FilmStore::open_in_memory().unwrap();

    let err = store.add_frame(&Frame::new(12, 1, at(5, 8))).unwrap_err();
    assert!(matches!(
        err,
        StoreError::ReferentialIntegrity(IntegrityViolation::MissingReference {
            entity: EntityKind::Roll,
            id: 12
        })
    ));

    let roll_id = store.add_roll(&Roll::new("Delta", at(5, 8))).unwrap();
    let mut frame = Frame::new(roll_id, 1, at(5, 9));
    frame.lens_id = Some(4);
    assert!(matches!(
        store.add_frame(&frame),
        Err(StoreError::ReferentialIntegrity(IntegrityViolation::MissingReference {
            entity: EntityKind::Lens,
            id: 4
        }))
    ));

    let mut roll = Roll::new("Delta 2", at(5, 8));
    roll.camera_id = Some(77);
    assert!(matches!(
        store.add_roll(&roll),
        Err(StoreError::ReferentialIntegrity(IntegrityViolation::MissingReference {
            entity: EntityKind::Camera,
            id: 77
        }))
    ));
}

#[test]
fn count_frames_on_missing_roll_is_not_found() {
    let store = FilmStore::open_in_memory().unwrap();
    assert!(matches!(
        store.count_frames(8),
        Err(StoreError::NotFound {
            entity: EntityKind::Roll,
            id: 8
        })
    ));
}

#[test]
fn strict_roll_delete_refuses_while_frames_exist() {
    let store = FilmStore::open_in_memory().unwrap();
    let roll_id = store.add_roll(&Roll::new("Ilford FP4", at(6, 8))).unwrap();
    store.add_frame(&Frame::new(roll_id, 1, at(6, 9))).unwrap();

    let err = store.delete_roll(roll_id, DeleteMode::Strict).unwrap_err();
    assert!(matches!(
        err,
        StoreError::ReferentialIntegrity(IntegrityViolation::RollHasFrames {
            frame_count: 1,
            ..
        })
    ));
    assert_eq!(store.count_frames(roll_id).unwrap(), 1);

    assert_eq!(store.delete_frames_for_roll(roll_id).unwrap(), 1);
    store.delete_roll(roll_id, DeleteMode::Strict).unwrap();
    assert!(store.list_rolls(RollFilter::All).unwrap().is_empty());
}

#[test]
fn cascade_roll_delete_removes_its_frames() {
    let store = FilmStore::open_in_memory().unwrap();
    let doomed = store.add_roll(&Roll::new("Expired", at(7, 8))).unwrap();
    let kept = store.add_roll(&Roll::new("Fresh", at(7, 8))).unwrap();
    let doomed_frame = store.add_frame(&Frame::new(doomed, 1, at(7, 9))).unwrap();
    store.add_frame(&Frame::new(kept, 1, at(7, 9))).unwrap();

    store.delete_roll(doomed, DeleteMode::Cascade).unwrap();

    assert!(matches!(
        store.get_frame(doomed_frame),
        Err(StoreError::NotFound {
            entity: EntityKind::Frame,
            ..
        })
    ));
    assert_eq!(store.count_frames(kept).unwrap(), 1);
}

#[test]
fn archive_filter_and_counts() {
    let store = FilmStore::open_in_memory().unwrap();
    let older = store.add_roll(&Roll::new("Old", at(1, 8))).unwrap();
    let newer = store.add_roll(&Roll::new("New", at(2, 8))).unwrap();

    let mut archived = store.get_roll(older).unwrap();
    archived.archived = true;
    store.update_roll(&archived).unwrap();

    let active: Vec<i64> = store
        .list_rolls(RollFilter::Active)
        .unwrap()
        .into_iter()
        .map(|roll| roll.id)
        .collect();
    assert_eq!(active, vec![newer]);
    assert_eq!(store.list_rolls(RollFilter::Archived).unwrap()[0].id, older);
    let all: Vec<i64> = store
        .list_rolls(RollFilter::All)
        .unwrap()
        .into_iter()
        .map(|roll| roll.id)
        .collect();
    assert_eq!(all, vec![newer, older]);
    assert_eq!(store.roll_counts().unwrap(), (1, 1));
}

#[test]
fn rolls_sorted_by_name_and_camera() {
    let store = FilmStore::open_in_memory().unwrap();
    let zeiss = store.add_camera(&Camera::new("Zeiss Ikon", "Contax")).unwrap();
    let canon = store.add_camera(&Camera::new("Canon", "A-1")).unwrap();

    let mut b = Roll::new("Bravo", at(1, 8));
    b.camera_id = Some(zeiss);
    let b = store.add_roll(&b).unwrap();
    let mut a = Roll::new("Alpha", at(2, 8));
    a.camera_id = Some(canon);
    let a = store.add_roll(&a).unwrap();
    let loose = store.add_roll(&Roll::new("Charlie", at(3, 8))).unwrap();

    let ids = |mode| -> Vec<i64> {
        store
            .list_rolls_sorted(RollFilter::All, mode)
            .unwrap()
            .into_iter()
            .map(|roll| roll.id)
            .collect()
    };
    assert_eq!(ids(RollSortMode::Name), vec![a, b, loose]);
    assert_eq!(ids(RollSortMode::Camera), vec![loose, a, b]);
    assert_eq!(ids(RollSortMode::Date), vec![loose, a, b]);
}

#[test]
fn add_next_frame_inherits_settings_from_last_frame() {
    let store = FilmStore::open_in_memory().unwrap();
    let lens_id = store.add_lens(&Lens::new("Pentax", "SMC 50mm")).unwrap();
    let roll_id = store.add_roll(&Roll::new("Superia", at(9, 8))).unwrap();

    let first = store.add_next_frame(roll_id, at(9, 9)).unwrap();
    assert_eq!(first.count, 1);
    assert_eq!(first.lens_id, None);

    let mut edited = store.get_frame(first.id).unwrap();
    edited.lens_id = Some(lens_id);
    edited.shutter = "1/250".to_string();
    edited.aperture = "5.6".to_string();
    store.update_frame(&edited).unwrap();

    let second = store.add_next_frame(roll_id, at(9, 10)).unwrap();
    assert_eq!(second.count, 2);
    assert_eq!(second.lens_id, Some(lens_id));
    assert_eq!(second.shutter, "1/250");
    assert_eq!(second.aperture, "5.6");
    assert_eq!(second.date, at(9, 10));
    assert_eq!(store.get_frame(second.id).unwrap(), second);
}

#[test]
fn legacy_malformed_location_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    let store = FilmStore::open(&path).unwrap();
    let roll_id = store.add_roll(&Roll::new("Legacy", at(10, 8))).unwrap();
    let null_frame = store.add_frame(&Frame::new(roll_id, 1, at(10, 9))).unwrap();
    let garbage_frame = store.add_frame(&Frame::new(roll_id, 2, at(10, 9))).unwrap();
    drop(store);

    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute(
        "UPDATE frames SET location = 'null' WHERE frame_id = ?1;",
        [null_frame],
    )
    .unwrap();
    conn.execute(
        "UPDATE frames SET location = 'somewhere' WHERE frame_id = ?1;",
        [garbage_frame],
    )
    .unwrap();
    drop(conn);

    let store = FilmStore::open(&path).unwrap();
    assert_eq!(store.get_frame(null_frame).unwrap().location, None);
    assert_eq!(store.get_frame(garbage_frame).unwrap().location, None);
}
