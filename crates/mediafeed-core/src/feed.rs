use rand::seq::IteratorRandom;
use uuid::Uuid;

use crate::error::Result;
use crate::record::MediaRecord;
use crate::store::MediaStore;

/// Feed-view model: the ordered record list behind the scrollable feed,
/// including the random-video pick for the header player.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    records: Vec<MediaRecord>,
}

impl Feed {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Repopulate from storage.
    pub fn refresh(&mut self, store: &MediaStore) -> Result<()> {
        self.records = store.fetch_all()?;
        Ok(())
    }

    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&MediaRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that carry video bytes.
    pub fn videos(&self) -> impl Iterator<Item = &MediaRecord> {
        self.records.iter().filter(|r| r.is_video())
    }

    /// Uniform pick among the video records, for the header player.
    /// `None` when the feed holds no videos.
    pub fn random_video(&self) -> Option<&MediaRecord> {
        self.videos().choose(&mut rand::thread_rng())
    }
}
