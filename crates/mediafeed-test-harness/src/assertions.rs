use mediafeed_core::feed::Feed;
use mediafeed_core::record::MediaRecord;
use mediafeed_core::store::MediaStore;
use uuid::Uuid;

/// Assert that a fresh fetch from storage includes the given record id.
pub fn assert_store_contains(store: &MediaStore, id: Uuid) {
    let records = store.fetch_all().expect("fetch_all failed");
    assert!(
        records.iter().any(|r| r.id == id),
        "record {id} not found in store ({} records)",
        records.len()
    );
}

/// Assert that a fresh fetch from storage does not include the given id.
pub fn assert_store_missing(store: &MediaStore, id: Uuid) {
    let records = store.fetch_all().expect("fetch_all failed");
    assert!(
        !records.iter().any(|r| r.id == id),
        "record {id} unexpectedly present in store"
    );
}

/// Assert how many records in the feed carry video bytes.
pub fn assert_video_count(feed: &Feed, expected: usize) {
    let actual = feed.videos().count();
    assert_eq!(
        actual, expected,
        "feed has {actual} video records, expected {expected}"
    );
}

/// Assert records are ordered by non-decreasing creation time.
pub fn assert_chronological(records: &[MediaRecord]) {
    for window in records.windows(2) {
        assert!(
            window[0].created_at <= window[1].created_at,
            "records out of order: {} ({}) after {} ({})",
            window[0].id,
            window[0].created_at,
            window[1].id,
            window[1].created_at
        );
    }
}
