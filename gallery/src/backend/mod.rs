//! Storage strategies behind the save pipeline.
//!
//! The orchestrator resolves a [`StorageMode`] once per request and hands the
//! write to the matching [`GalleryBackend`]. Backends wrap the platform's
//! storage primitives ([`FileStore`], [`MediaProvider`]) and own the cleanup
//! rules of their mode.

mod legacy;
mod managed;
mod unsupported;

use std::fmt;
use std::io::Write;

pub use legacy::{FileStore, LegacyFileBackend};
pub use managed::{ManagedProviderBackend, MediaProvider, MediaRecord, PendingAsset};
pub use unsupported::UnsupportedBackend;

use crate::{SaveError, SaveRequest, StorageMode};

/// A writable stream handed out by a storage primitive.
pub type WriteStream = Box<dyn Write + Send>;

/// Identifies a stored asset: a file path or a provider URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(String);

impl AssetHandle {
    /// Wrap a path or URI.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The path or URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image a backend has written and made visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Handle of the new asset.
    pub handle: AssetHandle,
    /// Location hint reported to the caller.
    pub location: Option<String>,
}

/// One storage strategy.
pub trait GalleryBackend: Send + Sync {
    /// The mode this backend implements, or `None` if it cannot store at all.
    fn mode(&self) -> Option<StorageMode>;

    /// Write the request's bytes and make them visible in the gallery.
    ///
    /// Called only after validation and permission negotiation succeeded.
    ///
    /// # Errors
    /// Returns the [`SaveError`] describing the first failing step.
    fn store(&self, request: &SaveRequest) -> Result<StoredAsset, SaveError>;
}
