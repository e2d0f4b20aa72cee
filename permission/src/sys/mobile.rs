//! Mobile fallback.
//!
//! Consent on Android and iOS lives in the host activity or view
//! controller, which this crate cannot reach on its own. Hosts implement
//! [`PermissionBackend`] themselves; this default reports every scope as
//! refused so nothing is written without a real decision.

use log::warn;

use crate::{AccessScope, CapabilityGrant, PermissionBackend, PromptTicket};

/// The process-default permission backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPermissions;

impl PermissionBackend for SystemPermissions {
    fn is_declared(&self, _declaration: &str) -> bool {
        true
    }

    fn query(&self, _scope: AccessScope) -> CapabilityGrant {
        CapabilityGrant::PermanentlyDenied
    }

    fn request(&self, scope: AccessScope, ticket: PromptTicket) {
        warn!("no host permission backend installed, refusing {scope}");
        ticket.respond(CapabilityGrant::PermanentlyDenied);
    }
}
