use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored unit of media: a still image, optional video bytes, caption,
/// id, and creation timestamp. Both payloads are carried inline; a video
/// record's `image_data` is its poster frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub image_data: Vec<u8>,
    pub video_data: Option<Vec<u8>>,
    pub caption: Option<String>,
}

impl MediaRecord {
    pub fn new(image_data: Vec<u8>, video_data: Option<Vec<u8>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            image_data,
            video_data,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// A record represents a video iff it carries video bytes.
    pub fn is_video(&self) -> bool {
        self.video_data.is_some()
    }
}
