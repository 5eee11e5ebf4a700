use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Result;

/// Staged copy of in-memory video bytes, addressable by path so the decoder
/// can open it. The backing file lives in the system temp directory and is
/// removed when this value is dropped.
pub struct ScratchVideo {
    file: NamedTempFile,
}

impl ScratchVideo {
    pub fn write(bytes: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("mediafeed-")
            .suffix(".mp4")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
