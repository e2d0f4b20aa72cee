//! Per-platform rules for gallery saves.
//!
//! Android, iOS and macOS follow the same save contract but disagree on when
//! scoped storage starts, whether photo access is split into add-only and
//! read-write, and which declarations the host must carry. Those differences
//! are data, captured in a [`PlatformProfile`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// An operating system version, ordered by `major` then `minor`.
///
/// Android API levels use `major` alone.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OsVersion {
    /// Major version (or API level).
    pub major: u32,
    /// Minor version.
    #[serde(default)]
    pub minor: u32,
}

impl OsVersion {
    /// Create a version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl From<u32> for OsVersion {
    fn from(major: u32) -> Self {
        Self::new(major, 0)
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformFamily {
    /// Android.
    Android,
    /// iOS.
    Ios,
    /// macOS with the Photos library.
    Macos,
    /// Desktop with a plain pictures folder.
    Desktop,
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Macos => "macOS",
            Self::Desktop => "desktop",
        })
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The profile is not valid JSON or has the wrong shape.
    #[error("invalid platform profile: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rules of one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformProfile {
    /// Platform family.
    pub family: PlatformFamily,
    /// First version with scoped storage; `None` means never.
    #[serde(default)]
    pub scoped_storage_since: Option<OsVersion>,
    /// First version with separate add-only and read-write photo access.
    #[serde(default)]
    pub granular_photos_since: Option<OsVersion>,
    /// Whether managed saves need a photo-library grant.
    #[serde(default)]
    pub managed_requires_grant: bool,
    /// First version able to save to the gallery at all.
    #[serde(default)]
    pub gallery_save_since: Option<OsVersion>,
    /// Manifest permission required for direct file writes.
    #[serde(default)]
    pub storage_declaration: Option<String>,
    /// Usage description required for read-write photo access.
    #[serde(default)]
    pub read_write_declaration: Option<String>,
    /// Usage description required for add-only photo access.
    #[serde(default)]
    pub add_only_declaration: Option<String>,
}

const PHOTO_LIBRARY_USAGE: &str = "NSPhotoLibraryUsageDescription";
const PHOTO_LIBRARY_ADD_USAGE: &str = "NSPhotoLibraryAddUsageDescription";

impl PlatformProfile {
    /// Android: direct files below API 29, `MediaStore` from 29 on.
    #[must_use]
    pub fn android() -> Self {
        Self {
            family: PlatformFamily::Android,
            scoped_storage_since: Some(OsVersion::from(29)),
            granular_photos_since: None,
            managed_requires_grant: false,
            gallery_save_since: None,
            storage_declaration: Some("android.permission.WRITE_EXTERNAL_STORAGE".into()),
            read_write_declaration: None,
            add_only_declaration: None,
        }
    }

    /// iOS: always the Photos library; add-only access from iOS 14.
    #[must_use]
    pub fn ios() -> Self {
        Self {
            family: PlatformFamily::Ios,
            scoped_storage_since: Some(OsVersion::default()),
            granular_photos_since: Some(OsVersion::from(14)),
            managed_requires_grant: true,
            gallery_save_since: None,
            storage_declaration: None,
            read_write_declaration: Some(PHOTO_LIBRARY_USAGE.into()),
            add_only_declaration: Some(PHOTO_LIBRARY_ADD_USAGE.into()),
        }
    }

    /// macOS: the Photos library from 10.15; add-only access from 11.
    #[must_use]
    pub fn macos() -> Self {
        Self {
            family: PlatformFamily::Macos,
            granular_photos_since: Some(OsVersion::from(11)),
            gallery_save_since: Some(OsVersion::new(10, 15)),
            ..Self::ios()
        }
    }

    /// Desktop: plain files in the user's pictures folder.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            family: PlatformFamily::Desktop,
            scoped_storage_since: None,
            granular_photos_since: None,
            managed_requires_grant: false,
            gallery_save_since: None,
            storage_declaration: None,
            read_write_declaration: None,
            add_only_declaration: None,
        }
    }

    /// Load a host-supplied profile.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if `json` is not a valid profile.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether `os_version` can save to the gallery at all.
    #[must_use]
    pub fn supports_gallery_save(&self, os_version: OsVersion) -> bool {
        self.gallery_save_since
            .is_none_or(|minimum| os_version >= minimum)
    }
}

/// Read-only facts about the running host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Rules of the platform.
    pub profile: PlatformProfile,
    /// Version of the running operating system.
    pub os_version: OsVersion,
}

impl GalleryConfig {
    /// Create a configuration.
    pub fn new(profile: PlatformProfile, os_version: impl Into<OsVersion>) -> Self {
        Self {
            profile,
            os_version: os_version.into(),
        }
    }

    /// Configuration of the current process when the host supplies none.
    ///
    /// Android and iOS versions are only known to the host, so those builds
    /// get their family's profile at version `0`; everything else gets the
    /// desktop profile.
    #[must_use]
    pub fn detect() -> Self {
        let profile = if cfg!(target_os = "android") {
            PlatformProfile::android()
        } else if cfg!(target_os = "ios") {
            PlatformProfile::ios()
        } else {
            PlatformProfile::desktop()
        };
        Self::new(profile, OsVersion::default())
    }
}
