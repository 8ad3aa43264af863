use exifnotes_core::{Camera, DeleteMode, EntityKind, FilmStore, Lens, StoreError, ValidationError};

#[test]
fn add_and_get_camera_roundtrip() {
    let store = FilmStore::open_in_memory().unwrap();

    let mut camera = Camera::new("Canon", "AE-1");
    camera.id = 42;
    let id = store.add_camera(&camera).unwrap();
    assert_eq!(id, 1, "caller-supplied id must be ignored");

    let loaded = store.get_camera(id).unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.make, "Canon");
    assert_eq!(loaded.model, "AE-1");
    assert_eq!(loaded.name(), "Canon AE-1");
}

#[test]
fn ids_increase_monotonically_per_table() {
    let store = FilmStore::open_in_memory().unwrap();
    let first = store.add_lens(&Lens::new("Nikon", "28mm")).unwrap();
    let second = store.add_lens(&Lens::new("Nikon", "50mm")).unwrap();
    store.delete_lens(second, DeleteMode::Strict).unwrap();
    let third = store.add_lens(&Lens::new("Nikon", "105mm")).unwrap();

    assert!(first < second);
    assert!(second < third);
    assert_eq!(store.add_camera(&Camera::new("Nikon", "F3")).unwrap(), 1);
}

#[test]
fn blank_make_or_model_is_rejected() {
    let store = FilmStore::open_in_memory().unwrap();

    let err = store.add_camera(&Camera::new("  ", "X-700")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyField {
            entity: EntityKind::Camera,
            field: "make",
        })
    ));

    let err = store.add_lens(&Lens::new("Minolta", "")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyField {
            field: "model",
            ..
        })
    ));
    assert!(store.list_cameras().unwrap().is_empty());
    assert!(store.list_lenses().unwrap().is_empty());
}

#[test]
fn listing_orders_by_make_then_model_then_id() {
    let store = FilmStore::open_in_memory().unwrap();
    store.add_camera(&Camera::new("Pentax", "MX")).unwrap();
    store.add_camera(&Camera::new("Leica", "M6")).unwrap();
    store.add_camera(&Camera::new("Leica", "M3")).unwrap();
    store.add_camera(&Camera::new("Leica", "M3")).unwrap();

    let names: Vec<(String, i64)> = store
        .list_cameras()
        .unwrap()
        .into_iter()
        .map(|camera| (camera.name(), camera.id))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Leica M3".to_string(), 3),
            ("Leica M3".to_string(), 4),
            ("Leica M6".to_string(), 2),
            ("Pentax MX".to_string(), 1),
        ]
    );
}

#[test]
fn update_replaces_all_fields() {
    let store = FilmStore::open_in_memory().unwrap();
    let id = store.add_lens(&Lens::new("Canon", "FD 50mm")).unwrap();

    let mut lens = store.get_lens(id).unwrap();
    lens.model = "FD 50mm f/1.4".to_string();
    store.update_lens(&lens).unwrap();

    assert_eq!(store.get_lens(id).unwrap(), lens);
}

#[test]
fn missing_gear_reports_not_found() {
    let store = FilmStore::open_in_memory().unwrap();

    assert!(matches!(
        store.get_camera(7),
        Err(StoreError::NotFound {
            entity: EntityKind::Camera,
            id: 7
        })
    ));

    let mut ghost = Lens::new("Sigma", "24mm");
    ghost.id = 9;
    assert!(matches!(
        store.update_lens(&ghost),
        Err(StoreError::NotFound {
            entity: EntityKind::Lens,
            id: 9
        })
    ));
    assert!(matches!(
        store.delete_camera(3, DeleteMode::Strict),
        Err(StoreError::NotFound { id: 3, .. })
    ));
}

#[test]
fn file_backed_store_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gear.db");

    {
        let store = FilmStore::open(&path).unwrap();
        store.add_camera(&Camera::new("Mamiya", "RB67")).unwrap();
    }

    let store = FilmStore::open(&path).unwrap();
    let cameras = store.list_cameras().unwrap();
    assert_eq!(cameras.len(), 1);
    assert_eq!(cameras[0].model, "RB67");
}
