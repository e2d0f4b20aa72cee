//! The per-request negotiation state machine.
//!
//! ```text
//! Unchecked -> declared? -> PromptPending -> Granted | Denied
//! Unchecked -> Granted | Denied            (already decided)
//! ```

use log::debug;

use crate::{
    AccessScope, CapabilityGrant, PermissionBackend, PermissionError, PromptRegistry,
};

/// When a prompt may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptPolicy {
    /// Prompt only while the user has not decided; a denial fails fast.
    #[default]
    WhenUnknown,
    /// Prompt whenever access is not granted, unless it is permanently denied.
    UnlessGranted,
}

/// What a request needs before it may touch storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Scope to obtain.
    pub scope: AccessScope,
    /// Declaration the host must carry (manifest permission, usage key).
    pub declaration: Option<String>,
    /// When prompting is allowed.
    pub policy: PromptPolicy,
}

impl Requirement {
    /// A requirement for `scope` with no declaration and the default policy.
    #[must_use]
    pub const fn new(scope: AccessScope) -> Self {
        Self {
            scope,
            declaration: None,
            policy: PromptPolicy::WhenUnknown,
        }
    }

    /// Require the host to declare `declaration`.
    #[must_use]
    pub fn declared_as(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }

    /// Set the prompt policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: PromptPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Next state given the grant currently reported by the platform.
    #[must_use]
    pub const fn assess(&self, current: CapabilityGrant) -> NegotiationState {
        match (current, self.policy) {
            (CapabilityGrant::Granted, _) => NegotiationState::Granted,
            (CapabilityGrant::Unknown, _)
            | (CapabilityGrant::Denied, PromptPolicy::UnlessGranted) => {
                NegotiationState::PromptPending
            }
            (CapabilityGrant::Denied | CapabilityGrant::PermanentlyDenied, _) => {
                NegotiationState::Denied(current)
            }
        }
    }
}

/// Where a negotiation goes after looking at the current grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// The user must be asked.
    PromptPending,
    /// Access is available.
    Granted,
    /// Access is refused.
    Denied(CapabilityGrant),
}

/// Negotiates capabilities against a [`PermissionBackend`].
///
/// Grants are queried fresh on every call.
#[derive(Debug)]
pub struct PermissionGate<B> {
    backend: B,
    prompts: PromptRegistry,
}

impl<B: PermissionBackend> PermissionGate<B> {
    /// Create a gate with its own prompt registry.
    pub fn new(backend: B) -> Self {
        Self::with_registry(backend, PromptRegistry::new())
    }

    /// Create a gate that issues prompts through `prompts`.
    pub const fn with_registry(backend: B, prompts: PromptRegistry) -> Self {
        Self { backend, prompts }
    }

    /// The registry prompts are correlated through.
    pub const fn prompts(&self) -> &PromptRegistry {
        &self.prompts
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Make sure `requirement` is satisfied, prompting if allowed.
    ///
    /// Suspends while a prompt is pending. Dropping the returned future
    /// deregisters the prompt.
    ///
    /// # Errors
    /// - [`PermissionError::NotDeclared`] if the host lacks the declaration;
    ///   the user is never prompted in that case.
    /// - [`PermissionError::Denied`] if access is refused before or after a prompt.
    pub async fn ensure(
        &self,
        requirement: &Requirement,
    ) -> Result<CapabilityGrant, PermissionError> {
        if let Some(declaration) = requirement.declaration.as_deref()
            && !self.backend.is_declared(declaration)
        {
            return Err(PermissionError::NotDeclared(declaration.to_owned()));
        }

        let scope = requirement.scope;
        let current = self.backend.query(scope);
        match requirement.assess(current) {
            NegotiationState::Granted => Ok(CapabilityGrant::Granted),
            NegotiationState::Denied(grant) => Err(PermissionError::Denied(grant)),
            NegotiationState::PromptPending => {
                let (ticket, pending) = self.prompts.register(scope);
                debug!("prompting for {scope} ({current:?}) as {}", ticket.token());
                self.backend.request(scope, ticket);

                let settled = pending.await;
                if settled.is_granted() {
                    Ok(settled)
                } else {
                    Err(PermissionError::Denied(settled))
                }
            }
        }
    }
}
