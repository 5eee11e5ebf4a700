use mediafeed_core::error::Result;
use mediafeed_core::record::MediaRecord;
use mediafeed_core::store::MediaStore;

use crate::fixtures;

/// Builder for test MediaRecords with sensible defaults: a small JPEG
/// payload and no video.
pub struct MediaRecordBuilder {
    image_data: Vec<u8>,
    video_data: Option<Vec<u8>>,
    caption: Option<String>,
}

impl MediaRecordBuilder {
    pub fn new() -> Self {
        Self {
            image_data: fixtures::test_image_jpeg(64, 64),
            video_data: None,
            caption: None,
        }
    }

    pub fn image_data(mut self, bytes: Vec<u8>) -> Self {
        self.image_data = bytes;
        self
    }

    pub fn video_data(mut self, bytes: Vec<u8>) -> Self {
        self.video_data = Some(bytes);
        self
    }

    pub fn caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Build a record directly, without touching a store.
    pub fn build(self) -> MediaRecord {
        let record = MediaRecord::new(self.image_data, self.video_data);
        match self.caption {
            Some(caption) => record.with_caption(caption),
            None => record,
        }
    }

    /// Create the record through a store, captioning it afterwards if one
    /// was set, and return the persisted value.
    pub fn create_in(self, store: &MediaStore) -> Result<MediaRecord> {
        let record = store.create(self.image_data, self.video_data)?;
        match self.caption {
            Some(caption) => store.update_caption(record.id, Some(caption)),
            None => Ok(record),
        }
    }
}

impl Default for MediaRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
