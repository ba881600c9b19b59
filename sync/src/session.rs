//! Session credential store.
//!
//! A simple presence check over the bearer credential decides guest vs.
//! authenticated mode. The credential is written by the login/logout
//! flow, read-shared by the sync adapter, and cleared when the remote
//! service answers with a 401-equivalent.

use std::sync::RwLock;

/// Session credential store
pub trait SessionStore: Send + Sync {
    /// The current bearer credential, if any
    fn token(&self) -> Option<String>;

    /// Store a credential (login)
    fn set_token(&self, token: String);

    /// Drop the credential (logout, or remote 401)
    fn clear(&self);

    /// Whether a credential is present
    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// Process-local session store
///
/// Holds the credential in memory for the lifetime of the application
/// session; durable credential storage is the embedder's concern.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    token: RwLock<Option<String>>,
}

impl InMemorySessionStore {
    /// Create an empty (guest) session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session already holding a credential
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: String) {
        *self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }
}
