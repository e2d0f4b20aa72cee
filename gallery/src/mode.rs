use crate::{OsVersion, PlatformProfile};

/// How an image reaches the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// Plain file under the public pictures folder, behind a storage permission.
    LegacyDirectFile,
    /// Insert, write and publish through a media provider.
    ManagedScoped,
}

/// Picks the [`StorageMode`] for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageModeResolver {
    scoped_storage_since: Option<OsVersion>,
}

impl StorageModeResolver {
    /// Resolver switching to managed storage at `scoped_storage_since`.
    #[must_use]
    pub const fn new(scoped_storage_since: Option<OsVersion>) -> Self {
        Self {
            scoped_storage_since,
        }
    }

    /// Resolver for a platform.
    #[must_use]
    pub const fn for_profile(profile: &PlatformProfile) -> Self {
        Self::new(profile.scoped_storage_since)
    }

    /// Mode for a request on `os_version`.
    ///
    /// Album placement never changes the mode, only how each mode places
    /// the asset.
    #[must_use]
    pub fn resolve(&self, os_version: OsVersion, _album_requested: bool) -> StorageMode {
        match self.scoped_storage_since {
            Some(threshold) if os_version >= threshold => StorageMode::ManagedScoped,
            _ => StorageMode::LegacyDirectFile,
        }
    }
}
