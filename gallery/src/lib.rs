//! Save in-memory images to the system photo gallery.
//!
//! A save runs through one pipeline on every platform:
//!
//! 1. the bytes must decode as an image ([`ImageValidator`]);
//! 2. the OS version picks a [`StorageMode`]: plain files under the public
//!    pictures folder, or a managed media provider;
//! 3. the capability that mode needs is negotiated, possibly suspending on
//!    a user prompt ([`PermissionNegotiator`]);
//! 4. the matching [`GalleryBackend`] writes the bytes and publishes them.
//!
//! Each request produces exactly one [`SaveOutcome`].
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use shutterkit_gallery::{Gallery, GalleryConfig, PlatformProfile, SaveRequest};
//!
//! let gallery = Gallery::builder(GalleryConfig::new(PlatformProfile::android(), 34))
//!     .permissions(Arc::new(host_permissions))
//!     .file_store(Arc::new(host_files))
//!     .media_provider(Arc::new(host_media_store))
//!     .build();
//!
//! let request = SaveRequest::new(png, "sunset", "png", "image/png").with_album("Trips");
//! let saved = gallery.save(request).await?;
//! ```

#![warn(missing_docs)]

mod album;
pub mod backend;
mod error;
mod mode;
mod negotiator;
mod orchestrator;
mod platform;
mod request;
/// Platform-specific implementations.
pub mod sys;
mod validator;

use std::sync::OnceLock;

pub use album::{AlbumCatalog, AlbumHandle, place_in_album};
pub use backend::{AssetHandle, GalleryBackend};
pub use error::{ErrorKind, SaveError};
pub use mode::{StorageMode, StorageModeResolver};
pub use negotiator::PermissionNegotiator;
pub use orchestrator::{Gallery, GalleryBuilder};
pub use platform::{ConfigError, GalleryConfig, OsVersion, PlatformFamily, PlatformProfile};
pub use request::{SaveOutcome, SaveRequest, SavedImage};
pub use validator::{DecodingValidator, ImageValidator};

/// The process-default gallery.
///
/// On desktop it writes into the user's pictures folder. On Android and iOS
/// it reports saves as unsupported; build a [`Gallery`] with the host's
/// primitives instead.
pub fn default_gallery() -> &'static Gallery {
    static DEFAULT: OnceLock<Gallery> = OnceLock::new();
    DEFAULT.get_or_init(sys::default_gallery)
}

/// Save an image using the [`default_gallery`].
///
/// # Errors
/// Returns a [`SaveError`] naming the first step that failed.
pub async fn save_image_to_gallery(request: SaveRequest) -> SaveOutcome {
    default_gallery().save(request).await
}

/// Whether the [`default_gallery`] can save at all.
#[must_use]
pub fn supports_gallery_save() -> bool {
    default_gallery().supports_gallery_save()
}
