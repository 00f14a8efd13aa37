use std::io::{Cursor, Write};

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const DEFAULT_FOLDER: &str = "images";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialized archive, held in memory until it is saved and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHandle {
    bytes: Bytes,
    entry_count: usize,
}

impl ArchiveHandle {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of files stored under the folder (the folder entry itself excluded).
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

struct ArchiveEntry {
    name: String,
    data: Bytes,
}

/// In-memory accumulator of named entries under a single folder.
///
/// Entries keep insertion order. Inserting a name that already exists replaces
/// the earlier payload at its original position.
pub struct ArchiveBuilder {
    folder: String,
    entries: Vec<ArchiveEntry>,
}

impl ArchiveBuilder {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into().trim_matches('/').to_string(),
            entries: Vec::new(),
        }
    }

    /// Returns `true` when an existing entry of the same name was overwritten.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) -> bool {
        let name = name.into();
        let data = data.into();
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == name) {
            existing.data = data;
            return true;
        }
        self.entries.push(ArchiveEntry { name, data });
        false
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry_path(&self, name: &str) -> String {
        if self.folder.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.folder, name)
        }
    }

    pub fn finish(self, compression: Compression) -> Result<ArchiveHandle, ArchiveError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(compression.method());

        if !self.folder.is_empty() {
            writer.add_directory(format!("{}/", self.folder), options)?;
        }
        for entry in &self.entries {
            writer.start_file(self.entry_path(&entry.name), options)?;
            writer.write_all(&entry.data)?;
        }

        let cursor = writer.finish()?;
        Ok(ArchiveHandle {
            bytes: Bytes::from(cursor.into_inner()),
            entry_count: self.entries.len(),
        })
    }
}
