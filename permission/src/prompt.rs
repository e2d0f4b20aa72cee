//! Correlation of permission prompts with their responses.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use futures::channel::oneshot;
use log::{debug, warn};

use crate::{AccessScope, CapabilityGrant};

/// Identifies one outstanding prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromptToken(u64);

impl PromptToken {
    /// The raw token value, e.g. to pass as a platform request code.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PromptToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A prompt result as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptResponse {
    /// Token of the prompt this answers.
    pub token: PromptToken,
    /// Scopes the platform reports as having been asked for.
    pub scopes: Vec<AccessScope>,
    /// The user's decision.
    pub grant: CapabilityGrant,
}

impl PromptResponse {
    /// A response for a single scope.
    #[must_use]
    pub fn new(token: PromptToken, scope: AccessScope, grant: CapabilityGrant) -> Self {
        Self {
            token,
            scopes: vec![scope],
            grant,
        }
    }
}

struct Waiter {
    scope: AccessScope,
    sender: oneshot::Sender<CapabilityGrant>,
}

#[derive(Default)]
struct Shared {
    next_token: AtomicU64,
    waiters: Mutex<HashMap<PromptToken, Waiter>>,
}

impl Shared {
    fn waiters(&self) -> MutexGuard<'_, HashMap<PromptToken, Waiter>> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Table of prompts waiting for an answer.
///
/// Every prompt gets a fresh [`PromptToken`]. A response is routed to the
/// waiter with the same token and resolves it exactly once; responses for
/// tokens that are unknown (already answered, cancelled, or never issued)
/// are logged and dropped.
#[derive(Clone, Default)]
pub struct PromptRegistry {
    shared: Arc<Shared>,
}

impl fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl PromptRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new prompt for `scope`.
    ///
    /// The ticket goes to whoever shows the prompt; the pending half is
    /// awaited by the requester. Dropping the pending half deregisters it.
    pub fn register(&self, scope: AccessScope) -> (PromptTicket, PendingPrompt) {
        let token = PromptToken(self.shared.next_token.fetch_add(1, Ordering::Relaxed) + 1);
        let (sender, receiver) = oneshot::channel();
        self.shared.waiters().insert(token, Waiter { scope, sender });
        debug!("registered prompt {token} for {scope}");

        let ticket = PromptTicket {
            token,
            scope,
            registry: self.clone(),
        };
        let pending = PendingPrompt {
            token,
            registry: Arc::downgrade(&self.shared),
            receiver,
        };
        (ticket, pending)
    }

    /// Route a response to the prompt with the same token.
    ///
    /// Returns `true` if a waiting prompt was resolved.
    pub fn dispatch(&self, response: PromptResponse) -> bool {
        let mut waiters = self.shared.waiters();
        let Some(waiter) = waiters.remove(&response.token) else {
            warn!(
                "ignoring prompt response for unknown token {}",
                response.token
            );
            return false;
        };

        if response.grant == CapabilityGrant::Unknown {
            warn!(
                "ignoring malformed response for prompt {}: no decision",
                response.token
            );
            waiters.insert(response.token, waiter);
            return false;
        }
        drop(waiters);

        if response.scopes != [waiter.scope] {
            warn!(
                "prompt {} expected only [{}], received {:?}",
                response.token, waiter.scope, response.scopes
            );
        }

        debug!("prompt {} settled as {:?}", response.token, response.grant);
        waiter.sender.send(response.grant).is_ok()
    }

    /// Remove a prompt without resolving it.
    pub fn deregister(&self, token: PromptToken) -> bool {
        self.shared.waiters().remove(&token).is_some()
    }

    /// Whether `token` is still waiting for an answer.
    #[must_use]
    pub fn is_pending(&self, token: PromptToken) -> bool {
        self.shared.waiters().contains_key(&token)
    }

    /// Number of prompts waiting for an answer.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.waiters().len()
    }
}

/// The half of a prompt handed to the backend that shows it.
#[derive(Debug)]
pub struct PromptTicket {
    token: PromptToken,
    scope: AccessScope,
    registry: PromptRegistry,
}

impl PromptTicket {
    /// Token identifying this prompt.
    #[must_use]
    pub const fn token(&self) -> PromptToken {
        self.token
    }

    /// Scope being asked for.
    #[must_use]
    pub const fn scope(&self) -> AccessScope {
        self.scope
    }

    /// Answer the prompt.
    ///
    /// Returns `false` if the requester already gave up.
    pub fn respond(self, grant: CapabilityGrant) -> bool {
        self.registry
            .dispatch(PromptResponse::new(self.token, self.scope, grant))
    }
}

/// A prompt awaiting the user's decision.
///
/// Resolves to the settled grant. If the prompt is abandoned (no answer
/// ever arrives) it stays pending; drop it to deregister.
#[must_use = "prompts do nothing unless awaited"]
pub struct PendingPrompt {
    token: PromptToken,
    registry: Weak<Shared>,
    receiver: oneshot::Receiver<CapabilityGrant>,
}

impl fmt::Debug for PendingPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingPrompt")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl PendingPrompt {
    /// Token identifying this prompt.
    #[must_use]
    pub const fn token(&self) -> PromptToken {
        self.token
    }
}

impl Future for PendingPrompt {
    type Output = CapabilityGrant;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().receiver).poll(cx) {
            Poll::Ready(Ok(grant)) => Poll::Ready(grant),
            // Sender dropped without an answer: the prompt was abandoned.
            Poll::Ready(Err(oneshot::Canceled)) | Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for PendingPrompt {
    fn drop(&mut self) {
        if let Some(shared) = self.registry.upgrade()
            && shared.waiters().remove(&self.token).is_some()
        {
            debug!("deregistered unanswered prompt {}", self.token);
        }
    }
}
