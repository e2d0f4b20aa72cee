//! Storage-mode-aware permission negotiation.

use log::debug;
use shutterkit_permission::{
    AccessScope, CapabilityGrant, PermissionBackend, PermissionGate, PromptPolicy,
    PromptRegistry, Requirement,
};

use crate::{GalleryConfig, SaveError, StorageMode};

/// Works out which capability a save needs and obtains it.
#[derive(Debug)]
pub struct PermissionNegotiator<P> {
    gate: PermissionGate<P>,
    config: GalleryConfig,
}

impl<P: PermissionBackend> PermissionNegotiator<P> {
    /// Create a negotiator issuing prompts through `prompts`.
    pub const fn new(backend: P, prompts: PromptRegistry, config: GalleryConfig) -> Self {
        Self {
            gate: PermissionGate::with_registry(backend, prompts),
            config,
        }
    }

    /// The registry prompts are correlated through.
    pub const fn prompts(&self) -> &PromptRegistry {
        self.gate.prompts()
    }

    /// Photo access scope for a managed save.
    ///
    /// Read-write is needed before the add-only split existed, and whenever an
    /// album is requested since finding an album means reading the library.
    pub fn photo_scope(&self, album_requested: bool) -> AccessScope {
        let predates_split = self
            .config
            .profile
            .granular_photos_since
            .is_none_or(|split| self.config.os_version < split);
        if predates_split || album_requested {
            AccessScope::PhotosReadWrite
        } else {
            AccessScope::PhotosAddOnly
        }
    }

    /// What a save in `mode` needs, or `None` if no grant is involved.
    pub fn requirement(&self, mode: StorageMode, album_requested: bool) -> Option<Requirement> {
        let profile = &self.config.profile;
        match mode {
            StorageMode::LegacyDirectFile => {
                let requirement = Requirement::new(AccessScope::StorageWrite)
                    .with_policy(PromptPolicy::UnlessGranted);
                Some(match &profile.storage_declaration {
                    Some(declaration) => requirement.declared_as(declaration.as_str()),
                    None => requirement,
                })
            }
            StorageMode::ManagedScoped if profile.managed_requires_grant => {
                let scope = self.photo_scope(album_requested);
                let declaration = match scope {
                    AccessScope::PhotosAddOnly => &profile.add_only_declaration,
                    _ => &profile.read_write_declaration,
                };
                let requirement = Requirement::new(scope);
                Some(match declaration {
                    Some(declaration) => requirement.declared_as(declaration.as_str()),
                    None => requirement,
                })
            }
            StorageMode::ManagedScoped => None,
        }
    }

    /// Obtain the capability a save in `mode` needs.
    ///
    /// Suspends while a prompt is pending.
    ///
    /// # Errors
    /// - [`SaveError::MisconfiguredHost`] if the host lacks the declaration.
    /// - [`SaveError::PermissionDenied`] if access is refused.
    pub async fn ensure_capability(
        &self,
        mode: StorageMode,
        album_requested: bool,
    ) -> Result<CapabilityGrant, SaveError> {
        let Some(requirement) = self.requirement(mode, album_requested) else {
            debug!("{mode:?} needs no grant");
            return Ok(CapabilityGrant::Granted);
        };

        self.gate.ensure(&requirement).await.map_err(|err| {
            let err = SaveError::from(err);
            match (&err, mode) {
                (SaveError::MisconfiguredHost(detail), StorageMode::LegacyDirectFile) => {
                    SaveError::MisconfiguredHost(format!(
                        "{detail}; {} {} predates scoped storage, so writing to the gallery \
                         needs the storage permission",
                        self.config.profile.family, self.config.os_version
                    ))
                }
                _ => err,
            }
        })
    }
}
