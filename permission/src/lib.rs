//! Capability grants and correlated permission prompts.
//!
//! This crate models the operating system's consent decision for writing
//! media, and the asynchronous prompt that asks the user for it. A prompt is
//! answered through a [`PromptRegistry`] keyed by per-request tokens, so a
//! response can only ever resolve the request that issued it.

#![warn(missing_docs)]

mod gate;
mod prompt;
/// Platform-specific implementations.
pub mod sys;

use std::sync::Arc;

pub use gate::{NegotiationState, PermissionGate, PromptPolicy, Requirement};
pub use prompt::{PendingPrompt, PromptRegistry, PromptResponse, PromptTicket, PromptToken};

/// The kind of media access being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    /// Coarse write access to shared external storage.
    StorageWrite,
    /// Permission to add photos without reading the library.
    PhotosAddOnly,
    /// Full read and write access to the photo library.
    PhotosReadWrite,
}

impl AccessScope {
    /// A stable identifier for the scope, suitable for logs.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::StorageWrite => "storage.write",
            Self::PhotosAddOnly => "photos.add_only",
            Self::PhotosReadWrite => "photos.read_write",
        }
    }
}

impl std::fmt::Display for AccessScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// The current consent decision for an [`AccessScope`].
///
/// Grants are never cached: the operating system is the source of truth and
/// the user can change them from the system settings at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityGrant {
    /// The user has not decided yet.
    Unknown,
    /// Access has been granted.
    Granted,
    /// Access has been denied, but may still be asked for.
    Denied,
    /// Access is denied and cannot be prompted for (user choice or policy).
    PermanentlyDenied,
}

impl CapabilityGrant {
    /// Whether access is granted.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Whether this state blocks access without a way to prompt.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Denied | Self::PermanentlyDenied)
    }
}

/// Errors that can occur while negotiating a capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The host application does not declare the capability it needs.
    #[error("`{0}` is not declared by the host application")]
    NotDeclared(String),
    /// The user or a policy refused access.
    #[error("access denied ({0:?})")]
    Denied(CapabilityGrant),
    /// The capability cannot be requested on this platform.
    #[error("permission not supported on this platform")]
    NotSupported,
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// The operating system's permission primitives.
///
/// `request` must not block: it starts the prompt and answers later through
/// the ticket, or through [`PromptRegistry::dispatch`] when the host receives
/// results on a shared listener.
pub trait PermissionBackend: Send + Sync {
    /// Whether the host application declares `declaration` (a manifest entry
    /// or a usage-description key).
    fn is_declared(&self, declaration: &str) -> bool;

    /// The current grant for `scope`, without prompting.
    fn query(&self, scope: AccessScope) -> CapabilityGrant;

    /// Show a prompt for `scope` and answer through `ticket`.
    fn request(&self, scope: AccessScope, ticket: PromptTicket);
}

impl<T: PermissionBackend + ?Sized> PermissionBackend for Arc<T> {
    fn is_declared(&self, declaration: &str) -> bool {
        (**self).is_declared(declaration)
    }

    fn query(&self, scope: AccessScope) -> CapabilityGrant {
        (**self).query(scope)
    }

    fn request(&self, scope: AccessScope, ticket: PromptTicket) {
        (**self).request(scope, ticket);
    }
}

/// Check the current grant for a scope using the platform's default backend.
#[must_use]
pub fn check(scope: AccessScope) -> CapabilityGrant {
    sys::SystemPermissions.query(scope)
}

/// Request a scope using the platform's default backend.
///
/// If the grant is already decided, this returns it without showing a prompt.
///
/// # Errors
/// Returns a [`PermissionError`] if access is refused or cannot be requested.
pub async fn request(scope: AccessScope) -> Result<CapabilityGrant, PermissionError> {
    PermissionGate::new(sys::SystemPermissions)
        .ensure(&Requirement::new(scope))
        .await
}
