//! Image attachments for QuickNote.
//!
//! Picked images are copied into a private directory and referenced from
//! notes by absolute path:
//!
//! ```text
//! images/
//!   note_image_7c1f...e2.jpg
//!   note_image_a03b...91.jpg
//! ```
//!
//! Nothing here tracks which note owns which file. Removing or replacing an
//! image is sequenced by the caller, and a crash between removing the old
//! file and saving the new path leaves the note pointing at a missing file.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use quicknote_core::Error;
use thiserror::Error as ThisError;
use tracing::{debug, warn};
use uuid::Uuid;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Reasons an image could not be attached, with the message shown to users.
///
/// The copy path does not produce these; every copy failure is reported as
/// "no image".
#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    #[error("Gallery permission is required to add images")]
    PermissionDenied,
    #[error("Image selection was cancelled")]
    PickCancelled,
    #[error("Failed to save image. Please try again")]
    CopyFailed,
    #[error("Image file is too large. Please choose a smaller image")]
    FileTooLarge,
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Unknown error occurred")]
    Unknown,
}

/// Private directory holding attached images.
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open the image directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref();
        fs::create_dir_all(root)
            .map_err(|e| Error::Io(format!("Failed to create images dir: {}", e)))?;
        let root = fs::canonicalize(root)
            .map_err(|e| Error::Io(format!("Failed to resolve images dir: {}", e)))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `source` into a new file and return its absolute path.
    ///
    /// Any failure is logged and reported as `None`.
    pub fn attach<R: Read>(&self, source: R) -> Option<PathBuf> {
        match self.copy_in(source) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "failed to copy image");
                None
            }
        }
    }

    /// Same as [`ImageStore::attach`] for an image already on disk.
    pub fn attach_file<P: AsRef<Path>>(&self, source: P) -> Option<PathBuf> {
        let source = source.as_ref();
        match File::open(source) {
            Ok(file) => self.attach(file),
            Err(e) => {
                warn!(source = %source.display(), error = %e, "failed to open picked image");
                None
            }
        }
    }

    /// Delete the old image (if any) and attach a new one.
    ///
    /// Not atomic: if the copy fails the old image is already gone.
    pub fn replace<R: Read>(&self, old: Option<&str>, source: R) -> Option<PathBuf> {
        if let Some(old) = old.filter(|p| !p.trim().is_empty()) {
            remove_image(old);
        }
        self.attach(source)
    }

    fn copy_in<R: Read>(&self, mut source: R) -> Result<PathBuf, Error> {
        let path = self
            .root
            .join(format!("note_image_{}.jpg", Uuid::new_v4()));
        let temp_path = path.with_extension("jpg.tmp");

        let written = write_temp(&temp_path, &mut source).and_then(|bytes| {
            fs::rename(&temp_path, &path).map(|_| bytes)
        });

        match written {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes, "stored image");
                Ok(path)
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(Error::Io(format!("Failed to store image: {}", e)))
            }
        }
    }
}

fn write_temp<R: Read>(temp_path: &Path, source: &mut R) -> io::Result<u64> {
    let mut file = File::create(temp_path)?;
    let bytes = io::copy(source, &mut file)?;
    file.flush()?;
    file.sync_all()?;
    Ok(bytes)
}

/// Delete an image file. Returns false if it did not exist or could not be removed.
pub fn remove_image<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if !path.exists() {
        return false;
    }
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to delete image");
            false
        }
    }
}

/// Whether a stored image path still points at a file.
pub fn image_exists(path: Option<&str>) -> bool {
    match path {
        Some(p) if !p.trim().is_empty() => Path::new(p).exists(),
        _ => false,
    }
}

/// Size of an image in megabytes, or 0 if it is missing.
pub fn image_size_in_mb<P: AsRef<Path>>(path: P) -> f64 {
    fs::metadata(path)
        .map(|m| m.len() as f64 / BYTES_PER_MB)
        .unwrap_or(0.0)
}
