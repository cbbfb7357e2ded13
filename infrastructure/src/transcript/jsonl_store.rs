//! JSONL file store for conversation transcripts.
//!
//! Each [`TranscriptEntry`] is serialized as a single JSON line and
//! appended to the file via a buffered writer.

use async_trait::async_trait;
use roundtable_application::{TranscriptEntry, TranscriptError, TranscriptStore};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Transcript store that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every entry and
/// on `Drop`, so a crash loses at most the entry being written.
pub struct JsonlTranscriptStore {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptStore {
    /// Create a store appending to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, TranscriptError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                TranscriptError::WriteFailed(format!(
                    "could not create transcript directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                TranscriptError::WriteFailed(format!(
                    "could not open transcript file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole transcript back and render it as one JSON array.
    pub fn export_json(&self) -> Result<String, TranscriptError> {
        let file = File::open(&self.path)
            .map_err(|e| TranscriptError::WriteFailed(format!("could not open transcript: {}", e)))?;

        let mut entries: Vec<TranscriptEntry> = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line
                .map_err(|e| TranscriptError::WriteFailed(format!("could not read line: {}", e)))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line)
                .map_err(|e| TranscriptError::WriteFailed(format!("malformed entry: {}", e)))?;
            entries.push(entry);
        }

        serde_json::to_string_pretty(&entries)
            .map_err(|e| TranscriptError::WriteFailed(e.to_string()))
    }
}

#[async_trait]
impl TranscriptStore for JsonlTranscriptStore {
    async fn record(&self, entry: TranscriptEntry) -> Result<(), TranscriptError> {
        let line = serde_json::to_string(&entry)
            .map_err(|e| TranscriptError::WriteFailed(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| TranscriptError::WriteFailed("writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| TranscriptError::WriteFailed(e.to_string()))?;
        // Flush every entry for crash safety, the file is append-only
        writer
            .flush()
            .map_err(|e| TranscriptError::WriteFailed(e.to_string()))
    }
}

impl Drop for JsonlTranscriptStore {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
