//! Desktop storage using the user's pictures folder.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use shutterkit_fs::ShutterFs;

use crate::backend::{FileStore, WriteStream};
use crate::{Gallery, GalleryConfig};

/// Direct-file primitives backed by `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct SystemFileStore {
    root: Option<PathBuf>,
}

impl SystemFileStore {
    /// Store writing into the user's pictures folder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ShutterFs::pictures_dir(),
        }
    }

    /// Store writing below `root` instead.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl FileStore for SystemFileStore {
    fn pictures_root(&self) -> Option<PathBuf> {
        self.root.clone()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_directories(&self, path: &Path) -> bool {
        fs::create_dir_all(path).is_ok()
    }

    fn open_file_for_write(&self, path: &Path) -> io::Result<WriteStream> {
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn notify_media_index(&self, path: &Path, mime_type: &str) {
        // Desktop file managers pick new files up on their own
        debug!("{} ({mime_type}) is visible without indexing", path.display());
    }
}

pub(crate) fn default_gallery() -> Gallery {
    Gallery::builder(GalleryConfig::detect())
        .file_store(Arc::new(SystemFileStore::new()))
        .build()
}
