//! Desktop permission implementation.
//!
//! Desktop systems have no runtime consent for writing into the user's
//! pictures folder: ordinary file permissions apply, and sandboxed apps
//! (Flatpak, Snap) go through portals that answer on their own.

use crate::{AccessScope, CapabilityGrant, PermissionBackend, PromptTicket};

/// The process-default permission backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPermissions;

impl PermissionBackend for SystemPermissions {
    fn is_declared(&self, _declaration: &str) -> bool {
        // No manifest on desktop
        true
    }

    fn query(&self, _scope: AccessScope) -> CapabilityGrant {
        CapabilityGrant::Granted
    }

    fn request(&self, _scope: AccessScope, ticket: PromptTicket) {
        ticket.respond(CapabilityGrant::Granted);
    }
}
