use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::archive::ArchiveHandle;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("refusing to write outside the output directory: {0}")]
    InvalidFilename(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Create `dir` if needed and make sure files can be created inside it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |err: io::Error| PersistError::OutputDir(format!("{}: {}", dir.display(), err));
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )))
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(unusable)?
        }
        Err(err) => return Err(unusable(err)),
    }
    tempfile::tempfile_in(dir).map_err(unusable)?;
    Ok(())
}

/// Writes whole files into one directory, never leaving a partial file behind.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Stage `content` next to the target and move it into place, replacing any previous file.
    pub fn write(&self, filename: &str, content: impl AsRef<[u8]>) -> Result<PathBuf, PersistError> {
        if !is_plain_filename(filename) {
            return Err(PersistError::InvalidFilename(filename.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content.as_ref())?;
        staged.as_file().sync_all()?;

        let target = self.dir.join(filename);
        if let Err(err) = staged.persist(&target) {
            // Windows refuses to rename over an existing file.
            if !target.is_file() {
                return Err(err.error.into());
            }
            fs::remove_file(&target)?;
            err.file.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        }
        Ok(target)
    }

    /// Saves the archive once; the handle is consumed and released afterwards.
    pub fn save_archive(
        &self,
        filename: &str,
        archive: ArchiveHandle,
    ) -> Result<PathBuf, PersistError> {
        self.write(filename, archive.into_bytes())
    }
}

fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
}
