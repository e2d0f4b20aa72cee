//! Album placement by exact title.
//!
//! Lookup and creation are not serialized. Two saves racing to a brand-new
//! album can both miss it and both create one, leaving two albums with the
//! same title; each asset still belongs to exactly one of them. Hosts that
//! need a single album must serialize saves to it themselves.

use std::fmt;
use std::io;

use log::debug;

use crate::{AssetHandle, SaveError};

/// Identifies an album in the platform's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlbumHandle(String);

impl AlbumHandle {
    /// Wrap a platform album identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The platform identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlbumHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Album primitives of a photo library.
pub trait AlbumCatalog: Send + Sync {
    /// The album titled exactly `name`, if any.
    fn find_album(&self, name: &str) -> Option<AlbumHandle>;

    /// Create an album titled `name` holding `initial_assets`.
    ///
    /// # Errors
    /// Returns an error if the library refuses the change.
    fn create_album(&self, name: &str, initial_assets: &[AssetHandle]) -> io::Result<AlbumHandle>;

    /// Append `assets` to `album`.
    ///
    /// # Errors
    /// Returns an error if the library refuses the change.
    fn add_assets_to_album(&self, album: &AlbumHandle, assets: &[AssetHandle]) -> io::Result<()>;
}

/// Put `asset` into the album titled `name`, creating the album if needed.
///
/// # Errors
/// Returns [`SaveError::WriteFailed`] if the catalog rejects the change.
pub fn place_in_album(
    catalog: &dyn AlbumCatalog,
    name: &str,
    asset: &AssetHandle,
) -> Result<AlbumHandle, SaveError> {
    let assets = std::slice::from_ref(asset);
    if let Some(album) = catalog.find_album(name) {
        catalog.add_assets_to_album(&album, assets).map_err(|e| {
            SaveError::WriteFailed(format!("failed to add {asset} to album `{name}`: {e}"))
        })?;
        debug!("added {asset} to existing album {album}");
        return Ok(album);
    }

    let album = catalog.create_album(name, assets).map_err(|e| {
        SaveError::WriteFailed(format!("failed to create album `{name}`: {e}"))
    })?;
    debug!("created album {album} for {asset}");
    Ok(album)
}
