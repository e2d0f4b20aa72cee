use super::{GalleryBackend, StoredAsset};
use crate::{SaveError, SaveRequest, StorageMode};

/// Stands in where the system cannot save to the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedBackend {
    reason: String,
}

impl UnsupportedBackend {
    /// Create a backend that always fails with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl GalleryBackend for UnsupportedBackend {
    fn mode(&self) -> Option<StorageMode> {
        None
    }

    fn store(&self, _request: &SaveRequest) -> Result<StoredAsset, SaveError> {
        Err(SaveError::Unsupported(self.reason.clone()))
    }
}
