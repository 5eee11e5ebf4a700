use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::record::MediaRecord;

const SELECT_COLUMNS: &str = "id, created_at, caption, image_data, video_data";

struct Inner {
    conn: Connection,
    /// Cached view of the feed, kept consistent with storage: a record joins
    /// it only after its insert succeeds and leaves it only after its delete
    /// is confirmed.
    records: Vec<MediaRecord>,
}

/// Durable CRUD over [`MediaRecord`], backed by SQLite.
///
/// Constructed explicitly from a database path; there is no process-wide
/// instance. The connection and the cached view sit behind one mutex, so
/// create/delete from multiple threads serialize instead of racing.
pub struct MediaStore {
    inner: Mutex<Inner>,
}

impl MediaStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Ephemeral store, useful in tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS media_records (
                id          TEXT PRIMARY KEY,
                created_at  TEXT NOT NULL,
                caption     TEXT,
                image_data  BLOB NOT NULL,
                video_data  BLOB
            );",
        )?;
        Ok(Self {
            inner: Mutex::new(Inner {
                conn,
                records: Vec::new(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist a new record built from the given payloads and return it.
    /// The cached view picks it up only once the insert has succeeded.
    pub fn create(
        &self,
        image_data: Vec<u8>,
        video_data: Option<Vec<u8>>,
    ) -> Result<MediaRecord> {
        if image_data.is_empty() {
            return Err(StoreError::EmptyImage);
        }
        let record = MediaRecord::new(image_data, video_data);

        let mut inner = self.lock();
        inner.conn.execute(
            "INSERT INTO media_records (id, created_at, caption, image_data, video_data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.to_string(),
                record.created_at,
                record.caption,
                record.image_data,
                record.video_data,
            ],
        )?;
        inner.records.push(record.clone());
        Ok(record)
    }

    /// Load every record from storage, ordered by creation time, replacing
    /// the cached view.
    pub fn fetch_all(&self) -> Result<Vec<MediaRecord>> {
        let mut inner = self.lock();
        let records = {
            let mut stmt = inner.conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM media_records ORDER BY created_at"
            ))?;
            let rows = stmt.query_map([], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        inner.records = records.clone();
        Ok(records)
    }

    /// Remove a record from storage, then from the cached view. The view is
    /// untouched if the database refuses the delete.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let mut inner = self.lock();
        let affected = inner.conn.execute(
            "DELETE FROM media_records WHERE id = ?1",
            params![id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::RecordNotFound(id));
        }
        inner.records.retain(|r| r.id != id);
        Ok(())
    }

    /// Persist a new caption for an existing record and return the updated
    /// value. Pass `None` to clear the caption.
    pub fn update_caption(&self, id: Uuid, caption: Option<String>) -> Result<MediaRecord> {
        let mut inner = self.lock();
        let affected = inner.conn.execute(
            "UPDATE media_records SET caption = ?1 WHERE id = ?2",
            params![caption, id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::RecordNotFound(id));
        }
        if let Some(record) = inner.records.iter_mut().find(|r| r.id == id) {
            record.caption = caption;
            return Ok(record.clone());
        }
        // Not in the cached view (stale view); read the row back instead.
        let record = inner.conn.query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM media_records WHERE id = ?1"),
            params![id.to_string()],
            row_to_record,
        )?;
        Ok(record)
    }

    /// Snapshot of the cached view.
    pub fn records(&self) -> Vec<MediaRecord> {
        self.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaRecord> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(MediaRecord {
        id,
        created_at: row.get(1)?,
        caption: row.get(2)?,
        image_data: row.get(3)?,
        video_data: row.get(4)?,
    })
}
