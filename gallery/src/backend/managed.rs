use std::io::Write;

use log::{debug, error};
use shutterkit_fs::ShutterFs;

use super::{AssetHandle, GalleryBackend, StoredAsset, WriteStream};
use crate::{SaveError, SaveRequest, StorageMode};

/// Metadata of a media record inserted before its bytes are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    /// Name shown in the gallery.
    pub display_name: String,
    /// MIME type of the image.
    pub mime_type: String,
    /// Whether the record is hidden until published.
    pub pending: bool,
    /// Collection path for album placement, e.g. `Pictures/Trips`.
    pub relative_path: Option<String>,
}

/// Media-provider primitives for managed saves.
pub trait MediaProvider: Send + Sync {
    /// Insert a record; `None` if the provider returned nothing.
    fn insert_pending_media_record(&self, record: &MediaRecord) -> Option<AssetHandle>;

    /// Open a write stream for a record; `None` if the provider failed.
    fn open_stream_for_handle(&self, handle: &AssetHandle) -> Option<WriteStream>;

    /// Set the record's pending flag; returns the number of rows updated.
    fn update_record_pending_flag(&self, handle: &AssetHandle, pending: bool) -> usize;
}

/// A reserved, not yet visible media record.
///
/// Finalizing clears the pending flag. It runs at most once and also runs on
/// drop, so every exit path publishes the record even when its bytes are
/// incomplete; a visible partial asset is preferred over an invisible orphan.
pub struct PendingAsset<'a> {
    provider: &'a dyn MediaProvider,
    handle: AssetHandle,
    published: Option<bool>,
}

impl std::fmt::Debug for PendingAsset<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAsset")
            .field("handle", &self.handle)
            .field("published", &self.published)
            .finish_non_exhaustive()
    }
}

impl<'a> PendingAsset<'a> {
    /// Insert `record` and hold the resulting handle.
    pub fn reserve(provider: &'a dyn MediaProvider, record: &MediaRecord) -> Option<Self> {
        let handle = provider.insert_pending_media_record(record)?;
        debug!("reserved {handle}");
        Some(Self {
            provider,
            handle,
            published: None,
        })
    }

    /// The reserved record.
    #[must_use]
    pub const fn handle(&self) -> &AssetHandle {
        &self.handle
    }

    /// Clear the pending flag. Idempotent; returns whether the provider
    /// acknowledged the update.
    pub fn finalize(&mut self) -> bool {
        if let Some(published) = self.published {
            return published;
        }
        let published = self
            .provider
            .update_record_pending_flag(&self.handle, false)
            > 0;
        if published {
            debug!("published {}", self.handle);
        } else {
            error!("failed to update image state for {}", self.handle);
        }
        self.published = Some(published);
        published
    }
}

impl Drop for PendingAsset<'_> {
    fn drop(&mut self) {
        self.finalize();
    }
}

/// Saves through a media provider: reserve, write, finalize.
#[derive(Clone, Copy)]
pub struct ManagedProviderBackend<'a> {
    provider: &'a dyn MediaProvider,
}

impl std::fmt::Debug for ManagedProviderBackend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedProviderBackend").finish_non_exhaustive()
    }
}

impl<'a> ManagedProviderBackend<'a> {
    /// Create a backend over `provider`.
    pub const fn new(provider: &'a dyn MediaProvider) -> Self {
        Self { provider }
    }

    fn write(&self, handle: &AssetHandle, bytes: &[u8]) -> Result<(), SaveError> {
        let mut stream = self.provider.open_stream_for_handle(handle).ok_or_else(|| {
            SaveError::WriteFailed(
                "could not open the output stream; the provider might have recently crashed"
                    .into(),
            )
        })?;
        stream
            .write_all(bytes)
            .and_then(|()| stream.flush())
            .map_err(|e| {
                SaveError::WriteFailed(format!("failed to save the image to the gallery: {e}"))
            })
    }
}

impl GalleryBackend for ManagedProviderBackend<'_> {
    fn mode(&self) -> Option<StorageMode> {
        Some(StorageMode::ManagedScoped)
    }

    fn store(&self, request: &SaveRequest) -> Result<StoredAsset, SaveError> {
        let record = MediaRecord {
            display_name: request.display_name().to_owned(),
            mime_type: request.mime_type().to_owned(),
            pending: true,
            relative_path: request.album().map(ShutterFs::album_relative_path),
        };
        let mut asset = PendingAsset::reserve(self.provider, &record).ok_or_else(|| {
            SaveError::InsertFailed(
                "the media provider returned no record; it may have crashed".into(),
            )
        })?;

        let written = self.write(asset.handle(), request.image_bytes());
        let published = asset.finalize();
        written?;
        if !published {
            return Err(SaveError::WriteFailed(format!(
                "failed to publish {}",
                asset.handle()
            )));
        }

        Ok(StoredAsset {
            handle: asset.handle().clone(),
            location: Some(asset.handle().to_string()),
        })
    }
}
