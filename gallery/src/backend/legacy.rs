use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use shutterkit_fs::ShutterFs;
use uuid::Uuid;

use super::{AssetHandle, GalleryBackend, StoredAsset, WriteStream};
use crate::{SaveError, SaveRequest, StorageMode};

/// Filesystem primitives for direct-file saves.
pub trait FileStore: Send + Sync {
    /// The public pictures folder.
    fn pictures_root(&self) -> Option<PathBuf>;

    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and its parents; `false` on failure.
    fn create_directories(&self, path: &Path) -> bool;

    /// Open a new file for writing.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created; `AlreadyExists` if it
    /// is already there.
    fn open_file_for_write(&self, path: &Path) -> io::Result<WriteStream>;

    /// Remove a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be removed.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Tell the media index about a new file so gallery apps show it.
    fn notify_media_index(&self, path: &Path, mime_type: &str);
}

/// Writes images as plain files under the public pictures folder.
///
/// Albums are subdirectories. A failed write removes the partial file on a
/// best-effort basis only.
#[derive(Clone, Copy)]
pub struct LegacyFileBackend<'a> {
    files: &'a dyn FileStore,
}

impl std::fmt::Debug for LegacyFileBackend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyFileBackend").finish_non_exhaustive()
    }
}

impl<'a> LegacyFileBackend<'a> {
    /// Create a backend over `files`.
    pub const fn new(files: &'a dyn FileStore) -> Self {
        Self { files }
    }

    fn target_dir(&self, album: Option<&str>) -> Result<PathBuf, SaveError> {
        let root = self.files.pictures_root().ok_or_else(|| {
            SaveError::DirectoryCreationFailed("unable to locate the pictures directory".into())
        })?;
        match album {
            Some(album) => ShutterFs::album_dir(&root, album).ok_or_else(|| {
                SaveError::DirectoryCreationFailed(format!(
                    "`{album}` cannot be used as a directory name"
                ))
            }),
            None => Ok(root),
        }
    }
}

fn unique_file_name(request: &SaveRequest) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!(
        "{}-{millis}-{}.{}",
        request.display_name(),
        Uuid::new_v4(),
        request.file_extension()
    )
}

impl GalleryBackend for LegacyFileBackend<'_> {
    fn mode(&self) -> Option<StorageMode> {
        Some(StorageMode::LegacyDirectFile)
    }

    fn store(&self, request: &SaveRequest) -> Result<StoredAsset, SaveError> {
        let dir = self.target_dir(request.album())?;
        let file_name = unique_file_name(request);
        let path = ShutterFs::child(&dir, &file_name).ok_or_else(|| {
            SaveError::WriteFailed(format!("`{file_name}` cannot be used as a file name"))
        })?;
        if !self.files.exists(&dir) && !self.files.create_directories(&dir) {
            return Err(SaveError::DirectoryCreationFailed(format!(
                "failed to create directory: {}",
                dir.display()
            )));
        }

        if self.files.exists(&path) {
            return Err(SaveError::FileExists(format!(
                "a file named `{}` already exists",
                path.display()
            )));
        }

        let mut stream = self.files.open_file_for_write(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                SaveError::FileExists(format!("a file named `{}` already exists", path.display()))
            } else {
                SaveError::WriteFailed(format!("failed to create {}: {e}", path.display()))
            }
        })?;

        let written = stream
            .write_all(request.image_bytes())
            .and_then(|()| stream.flush());
        drop(stream);
        if let Err(e) = written {
            if let Err(cleanup) = self.files.remove_file(&path) {
                warn!("left partial file {}: {cleanup}", path.display());
            }
            return Err(SaveError::WriteFailed(format!(
                "failed to save the image to the gallery: {e}"
            )));
        }

        self.files.notify_media_index(&path, request.mime_type());
        debug!("wrote {}", path.display());

        let location = path.display().to_string();
        Ok(StoredAsset {
            handle: AssetHandle::new(location.clone()),
            location: Some(location),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_do_not_collide() {
        let request = SaveRequest::new(vec![1], "sunset", "png", "image/png");
        let first = unique_file_name(&request);
        let second = unique_file_name(&request);

        assert_ne!(first, second);
        assert!(first.starts_with("sunset-"));
        assert!(first.ends_with(".png"));
    }
}
