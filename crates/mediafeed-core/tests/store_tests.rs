use std::collections::HashSet;
use std::sync::Arc;

use mediafeed_core::error::StoreError;
use mediafeed_core::store::MediaStore;
use mediafeed_test_harness::{assertions, builders::MediaRecordBuilder, fixtures};

#[test]
fn test_create_then_fetch_roundtrip() {
    let store = MediaStore::open_in_memory().unwrap();

    let image = fixtures::test_image_jpeg(32, 32);
    let video = vec![0xde, 0xad, 0xbe, 0xef];
    let created = store.create(image.clone(), Some(video.clone())).unwrap();

    let records = store.fetch_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, created.id);
    assert_eq!(records[0].image_data, image);
    assert_eq!(records[0].video_data.as_deref(), Some(video.as_slice()));
}

#[test]
fn test_image_record_has_no_video() {
    let store = MediaStore::open_in_memory().unwrap();

    let record = store
        .create(fixtures::test_image_jpeg(32, 32), None)
        .unwrap();
    assert!(!record.is_video());

    let fetched = store.fetch_all().unwrap();
    assert!(fetched[0].video_data.is_none());
}

#[test]
fn test_video_record_is_video() {
    let store = MediaStore::open_in_memory().unwrap();

    let record = store
        .create(fixtures::test_image_jpeg(32, 32), Some(vec![1, 2, 3]))
        .unwrap();
    assert!(record.is_video());
}

#[test]
fn test_create_rejects_empty_image() {
    let store = MediaStore::open_in_memory().unwrap();

    let result = store.create(Vec::new(), None);
    assert!(matches!(result, Err(StoreError::EmptyImage)));
    assert!(store.is_empty(), "failed create must not join the view");
}

#[test]
fn test_delete_removes_record() {
    let store = MediaStore::open_in_memory().unwrap();

    let keep = MediaRecordBuilder::new().create_in(&store).unwrap();
    let gone = MediaRecordBuilder::new().create_in(&store).unwrap();

    store.delete(gone.id).unwrap();

    assertions::assert_store_missing(&store, gone.id);
    assertions::assert_store_contains(&store, keep.id);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_delete_unknown_id() {
    let store = MediaStore::open_in_memory().unwrap();
    let record = MediaRecordBuilder::new().create_in(&store).unwrap();

    let result = store.delete(uuid::Uuid::new_v4());
    assert!(matches!(result, Err(StoreError::RecordNotFound(_))));

    // The cached view must be untouched by the failed delete.
    assert_eq!(store.len(), 1);
    assertions::assert_store_contains(&store, record.id);
}

#[test]
fn test_fetch_all_ordered_by_creation_time() {
    let store = MediaStore::open_in_memory().unwrap();

    for _ in 0..5 {
        MediaRecordBuilder::new().create_in(&store).unwrap();
    }

    let records = store.fetch_all().unwrap();
    assert_eq!(records.len(), 5);
    assertions::assert_chronological(&records);
}

#[test]
fn test_records_survive_reopen() {
    let dir = fixtures::fixture_dir();
    let db_path = dir.path().join("feed.db");

    let created = {
        let store = MediaStore::open(&db_path).unwrap();
        store
            .create(fixtures::test_image_jpeg(16, 16), Some(vec![9, 9, 9]))
            .unwrap()
    };

    let store = MediaStore::open(&db_path).unwrap();
    let records = store.fetch_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, created.id);
    assert_eq!(records[0].image_data, created.image_data);
    assert_eq!(records[0].video_data, created.video_data);
    assert_eq!(
        records[0].created_at.timestamp(),
        created.created_at.timestamp()
    );
}

#[test]
fn test_update_caption_persists() {
    let store = MediaStore::open_in_memory().unwrap();
    let record = MediaRecordBuilder::new().create_in(&store).unwrap();
    assert!(record.caption.is_none());

    let updated = store
        .update_caption(record.id, Some("sunset at the pier".into()))
        .unwrap();
    assert_eq!(updated.caption.as_deref(), Some("sunset at the pier"));

    let fetched = store.fetch_all().unwrap();
    assert_eq!(fetched[0].caption.as_deref(), Some("sunset at the pier"));

    let cleared = store.update_caption(record.id, None).unwrap();
    assert!(cleared.caption.is_none());
}

#[test]
fn test_update_caption_unknown_id() {
    let store = MediaStore::open_in_memory().unwrap();
    let result = store.update_caption(uuid::Uuid::new_v4(), Some("nope".into()));
    assert!(matches!(result, Err(StoreError::RecordNotFound(_))));
}

#[test]
fn test_cached_view_tracks_mutations() {
    let store = MediaStore::open_in_memory().unwrap();
    assert!(store.is_empty());

    let record = MediaRecordBuilder::new().create_in(&store).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.records()[0].id, record.id);

    store.delete(record.id).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_concurrent_creates_distinct_ids() {
    let dir = fixtures::fixture_dir();
    let store = Arc::new(MediaStore::open(dir.path().join("concurrent.db")).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.create(vec![i as u8 + 1], None).unwrap().id)
        })
        .collect();

    let ids: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids.len(), 8, "each create must yield a distinct id");
    assert_eq!(store.fetch_all().unwrap().len(), 8);
}
