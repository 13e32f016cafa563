use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};
use crate::domain::file_format::FileFormat;

/// Directory holding transient copies of uploads between preview and analysis.
pub struct WorkingStore {
    root: PathBuf,
}

impl WorkingStore {
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload under a fresh `<uuid>.<ext>` name.
    pub fn save(&self, format: FileFormat, bytes: &[u8]) -> Result<WorkingFile> {
        let id = format!("{}.{}", Uuid::new_v4(), format.extension());
        let path = self.root.join(&id);
        fs::write(&path, bytes)?;
        debug!(file_id = %id, bytes = bytes.len(), "saved working file");
        Ok(WorkingFile::new(id, path, format))
    }

    /// Take ownership of a previously retained working file.
    ///
    /// Ids that are not `<uuid>.<supported ext>` are reported as not found,
    /// so no caller-supplied name ever reaches the filesystem.
    pub fn claim(&self, id: &str) -> Result<WorkingFile> {
        let format = parse_id(id).ok_or_else(|| not_found(id))?;
        let path = self.root.join(id);
        if !path.is_file() {
            return Err(not_found(id));
        }
        Ok(WorkingFile::new(id.to_string(), path, format))
    }

    /// Delete working files last modified more than `max_age` ago.
    pub fn sweep_expired(&self, max_age: Duration) -> usize {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return 0;
        };
        let now = SystemTime::now();
        let mut removed = 0;

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if parse_id(name).is_none() {
                continue;
            }
            let expired = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(|modified| now.duration_since(modified).unwrap_or_default() > max_age)
                .unwrap_or(false);
            if expired {
                match fs::remove_file(entry.path()) {
                    Ok(()) => removed += 1,
                    Err(err) => warn!(error = %err, file = name, "failed to sweep working file"),
                }
            }
        }

        removed
    }
}

/// An uploaded file on disk. The file is deleted when the handle is dropped
/// unless [`WorkingFile::retain`] was called.
#[derive(Debug)]
pub struct WorkingFile {
    id: String,
    path: PathBuf,
    format: FileFormat,
    retained: bool,
}

impl WorkingFile {
    fn new(id: String, path: PathBuf, format: FileFormat) -> Self {
        Self {
            id,
            path,
            format,
            retained: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    /// Keep the file on disk for a later request and return its id.
    pub fn retain(mut self) -> String {
        self.retained = true;
        std::mem::take(&mut self.id)
    }
}

impl Drop for WorkingFile {
    fn drop(&mut self) {
        if self.retained {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(file = %self.path.display(), "removed working file"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(error = %err, file = %self.path.display(), "failed to remove working file"),
        }
    }
}

fn parse_id(id: &str) -> Option<FileFormat> {
    let (stem, extension) = id.rsplit_once('.')?;
    Uuid::parse_str(stem).ok()?;
    FileFormat::from_extension(extension).ok()
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("working file '{}'", id))
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
