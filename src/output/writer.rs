//! Metadata document writer

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::DiscRipperResult;

/// File name of the per-rip metadata document
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Writes JSON documents next to ripped output
pub struct MetadataWriter {
    file_name: String,
    atomic_writes: bool,
}

impl Default for MetadataWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataWriter {
    pub fn new() -> Self {
        Self {
            file_name: METADATA_FILE_NAME.to_string(),
            atomic_writes: true,
        }
    }

    /// Write straight to the final path instead of through a temp file
    pub fn without_atomic_writes(mut self) -> Self {
        self.atomic_writes = false;
        self
    }

    /// Serialize `document` as pretty JSON into `directory`, replacing any
    /// previous document. Returns the written path.
    pub fn write<T: Serialize>(&self, document: &T, directory: &Path) -> DiscRipperResult<PathBuf> {
        fs::create_dir_all(directory)?;

        let mut body = serde_json::to_string_pretty(document)?;
        body.push('\n');

        let path = directory.join(&self.file_name);
        if self.atomic_writes {
            let temp_path = directory.join(format!(".tmp_{}", self.file_name));
            write_to_file(&temp_path, body.as_bytes())?;
            fs::rename(&temp_path, &path)?;
        } else {
            write_to_file(&path, body.as_bytes())?;
        }

        info!(event = "metadata_written", path = %path.display(), "Metadata written");
        Ok(path)
    }
}

fn write_to_file(path: &Path, data: &[u8]) -> DiscRipperResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut writer = BufWriter::new(&file);
    writer.write_all(data)?;
    writer.flush()?;
    drop(writer);

    file.sync_all()?;
    Ok(())
}

/// Write `document` as `metadata.json` under `directory`
pub fn write_metadata_document<T: Serialize>(
    document: &T,
    directory: &Path,
) -> DiscRipperResult<PathBuf> {
    MetadataWriter::new().write(document, directory)
}
