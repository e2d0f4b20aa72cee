//! The save pipeline.
//!
//! validate -> resolve mode -> negotiate capability -> write -> finalize,
//! producing exactly one [`SaveOutcome`] per request. Nothing is retried;
//! a retry is a new request.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use shutterkit_permission::{PermissionBackend, PromptRegistry};

use crate::backend::{
    FileStore, GalleryBackend, LegacyFileBackend, ManagedProviderBackend, MediaProvider,
    UnsupportedBackend,
};
use crate::{
    AlbumCatalog, DecodingValidator, GalleryConfig, ImageValidator, PermissionNegotiator,
    SaveError, SaveOutcome, SaveRequest, SavedImage, StorageMode, StorageModeResolver,
    album::place_in_album,
};

/// Saves images to the gallery of one host.
///
/// Holds no per-request state: any number of saves may run concurrently,
/// each with its own prompt and pending asset.
pub struct Gallery {
    config: GalleryConfig,
    resolver: StorageModeResolver,
    validator: Arc<dyn ImageValidator>,
    negotiator: PermissionNegotiator<Arc<dyn PermissionBackend>>,
    files: Option<Arc<dyn FileStore>>,
    provider: Option<Arc<dyn MediaProvider>>,
    albums: Option<Arc<dyn AlbumCatalog>>,
}

impl fmt::Debug for Gallery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gallery")
            .field("config", &self.config)
            .field("file_store", &self.files.is_some())
            .field("media_provider", &self.provider.is_some())
            .field("album_catalog", &self.albums.is_some())
            .finish_non_exhaustive()
    }
}

impl Gallery {
    /// Start configuring a gallery for `config`.
    #[must_use]
    pub fn builder(config: GalleryConfig) -> GalleryBuilder {
        GalleryBuilder::new(config)
    }

    /// The host configuration.
    #[must_use]
    pub const fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Registry the host routes prompt responses through.
    #[must_use]
    pub const fn prompts(&self) -> &PromptRegistry {
        self.negotiator.prompts()
    }

    /// The storage mode a request would use.
    #[must_use]
    pub fn storage_mode(&self, album_requested: bool) -> StorageMode {
        self.resolver.resolve(self.config.os_version, album_requested)
    }

    /// Whether gallery saves are available on this host at all.
    #[must_use]
    pub fn supports_gallery_save(&self) -> bool {
        self.backend(self.storage_mode(false)).mode().is_some()
    }

    fn backend(&self, mode: StorageMode) -> Box<dyn GalleryBackend + '_> {
        let GalleryConfig {
            profile,
            os_version,
        } = &self.config;
        if !profile.supports_gallery_save(*os_version) {
            let minimum = profile.gallery_save_since.unwrap_or_default();
            return Box::new(UnsupportedBackend::new(format!(
                "saving images to the gallery requires {} {minimum} or later; running {os_version}",
                profile.family
            )));
        }

        match mode {
            StorageMode::LegacyDirectFile => match &self.files {
                Some(files) => Box::new(LegacyFileBackend::new(files.as_ref())),
                None => Box::new(UnsupportedBackend::new(
                    "no file store is configured for direct file saves",
                )),
            },
            StorageMode::ManagedScoped => match &self.provider {
                Some(provider) => Box::new(ManagedProviderBackend::new(provider.as_ref())),
                None => Box::new(UnsupportedBackend::new(
                    "no media provider is configured for managed saves",
                )),
            },
        }
    }

    /// Save an image to the gallery.
    ///
    /// Suspends while a permission prompt is pending. Dropping the future
    /// cancels the request and deregisters its prompt.
    ///
    /// # Errors
    /// Returns a [`SaveError`] naming the first step that failed.
    pub async fn save(&self, request: SaveRequest) -> SaveOutcome {
        let outcome = self.run(&request).await;
        match &outcome {
            Ok(saved) => info!(
                "saved `{}` to the gallery at {}",
                request.display_name(),
                saved.location.as_deref().unwrap_or("<unknown>")
            ),
            Err(err) => warn!(
                "saving `{}` failed with {}: {err}",
                request.display_name(),
                err.kind()
            ),
        }
        outcome
    }

    async fn run(&self, request: &SaveRequest) -> SaveOutcome {
        if !self.validator.validate(request.image_bytes()) {
            return Err(SaveError::InvalidImage(
                "the provided image bytes could not be decoded".into(),
            ));
        }

        let album_requested = request.album().is_some();
        let backend = self.backend(self.storage_mode(album_requested));
        if let Some(mode) = backend.mode() {
            debug!("saving `{}` in {mode:?} mode", request.display_name());
            self.negotiator
                .ensure_capability(mode, album_requested)
                .await?;
        }

        let stored = backend.store(request)?;
        let album = match (request.album(), &self.albums) {
            (Some(name), Some(catalog)) => {
                Some(place_in_album(catalog.as_ref(), name, &stored.handle)?)
            }
            (Some(name), None) if self.config.profile.managed_requires_grant => {
                warn!(
                    "no album catalog attached, `{}` was saved outside album `{name}`",
                    request.display_name()
                );
                None
            }
            _ => None,
        };

        Ok(SavedImage {
            location: stored.location,
            album,
        })
    }
}

/// Configures a [`Gallery`].
///
/// Defaults: images are validated by decoding them, permissions come from
/// the platform's default backend, and no storage primitives are attached
/// (saves fail with `Unsupported` until one is).
pub struct GalleryBuilder {
    config: GalleryConfig,
    validator: Arc<dyn ImageValidator>,
    permissions: Arc<dyn PermissionBackend>,
    prompts: PromptRegistry,
    files: Option<Arc<dyn FileStore>>,
    provider: Option<Arc<dyn MediaProvider>>,
    albums: Option<Arc<dyn AlbumCatalog>>,
}

impl fmt::Debug for GalleryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GalleryBuilder {
    /// Start from the defaults.
    #[must_use]
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            validator: Arc::new(DecodingValidator),
            permissions: Arc::new(shutterkit_permission::sys::SystemPermissions),
            prompts: PromptRegistry::new(),
            files: None,
            provider: None,
            albums: None,
        }
    }

    /// Use a different image validator.
    #[must_use]
    pub fn validator(mut self, validator: Arc<dyn ImageValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Use the host's permission primitives.
    #[must_use]
    pub fn permissions(mut self, permissions: Arc<dyn PermissionBackend>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Correlate prompts through an existing registry.
    #[must_use]
    pub fn prompts(mut self, prompts: PromptRegistry) -> Self {
        self.prompts = prompts;
        self
    }

    /// Attach filesystem primitives for direct file saves.
    #[must_use]
    pub fn file_store(mut self, files: Arc<dyn FileStore>) -> Self {
        self.files = Some(files);
        self
    }

    /// Attach media-provider primitives for managed saves.
    #[must_use]
    pub fn media_provider(mut self, provider: Arc<dyn MediaProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Attach album primitives for placing images in albums by title.
    ///
    /// Without a catalog, a requested album only becomes a subdirectory
    /// (direct files) or the record's relative path (media providers). Photo
    /// libraries ignore that path, so on those platforms the image is saved
    /// outside any album and [`SavedImage::album`] is `None`.
    #[must_use]
    pub fn album_catalog(mut self, albums: Arc<dyn AlbumCatalog>) -> Self {
        self.albums = Some(albums);
        self
    }

    /// Build the gallery.
    #[must_use]
    pub fn build(self) -> Gallery {
        Gallery {
            resolver: StorageModeResolver::for_profile(&self.config.profile),
            negotiator: PermissionNegotiator::new(
                self.permissions,
                self.prompts,
                self.config.clone(),
            ),
            config: self.config,
            validator: self.validator,
            files: self.files,
            provider: self.provider,
            albums: self.albums,
        }
    }
}
