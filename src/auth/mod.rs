//! Session layer: who is the current user.
//!
//! `SessionStore` merges a durable local snapshot with the signal from the
//! remote identity provider. Sign-in and sign-up live in the UI layer; it
//! populates the store through [`SessionStore::save_user`].

use std::sync::{Arc, Mutex};

use anyhow::Context;
use thiserror::Error;

use crate::models::User;
use crate::storage::LocalStore;

/// Storage key for the serialized user snapshot.
pub const KEY_USER_DATA: &str = "user_data";
/// Storage key for the durable logged-in flag.
pub const KEY_IS_LOGGED_IN: &str = "is_logged_in";

const FLAG_TRUE: &str = "true";
const FLAG_FALSE: &str = "false";

/// Signal from the remote authentication service.
///
/// `current_principal_id` reads the provider's locally cached principal and
/// never blocks on the network; `sign_out` asks the provider to invalidate
/// its session.
pub trait IdentityProvider: Send + Sync {
    fn current_principal_id(&self) -> Option<String>;
    fn sign_out(&self);
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Process-wide source of truth for the signed-in user.
///
/// Construct one instance at startup and share it by `Arc`; services take it
/// by reference rather than reaching for ambient state.
pub struct SessionStore {
    storage: Arc<dyn LocalStore>,
    provider: Arc<dyn IdentityProvider>,
    current: Mutex<Option<User>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn LocalStore>, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            storage,
            provider,
            current: Mutex::new(None),
        }
    }

    /// Load the durable user snapshot into memory, if one exists.
    ///
    /// Never touches the network. Idempotent; a corrupt or unreadable
    /// snapshot is logged and ignored so startup degrades to the remote
    /// fallback instead of failing.
    pub fn initialize(&self) {
        let mut current = self.current.lock().unwrap();
        match self.storage.get(KEY_USER_DATA) {
            Ok(Some(payload)) => match serde_json::from_str::<User>(&payload) {
                Ok(user) => {
                    tracing::debug!(user_id = %user.id, "restored user session from storage");
                    *current = Some(user);
                }
                Err(err) => {
                    tracing::warn!(%err, "ignoring unreadable user snapshot");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%err, "failed to read user snapshot from storage");
            }
        }
    }

    /// Cache `user` as the current session, durably and in memory.
    ///
    /// The durable copy is written first; the in-memory value advances only
    /// after both writes succeed, so a storage failure leaves the previous
    /// session observable everywhere.
    pub fn save_user(&self, user: &User) -> Result<(), SessionError> {
        let mut current = self.current.lock().unwrap();

        let payload = serde_json::to_string(user).context("failed to serialize user snapshot")?;
        self.storage.set(KEY_USER_DATA, &payload)?;
        self.storage.set(KEY_IS_LOGGED_IN, FLAG_TRUE)?;

        *current = Some(user.clone());
        tracing::debug!(user_id = %user.id, "saved user session");
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.lock().unwrap().clone()
    }

    /// Id of the current user: the cached session if present, otherwise the
    /// provider's authenticated principal. Local cache is preferred for
    /// latency; the remote signal covers a fresh install or evicted cache.
    pub fn current_user_id(&self) -> Option<String> {
        let cached = self.current.lock().unwrap().as_ref().map(|u| u.id.clone());
        cached.or_else(|| self.provider.current_principal_id())
    }

    pub fn current_user_email(&self) -> Option<String> {
        self.current.lock().unwrap().as_ref().map(|u| u.email.clone())
    }

    /// True only when the provider still reports a principal AND the durable
    /// logged-in flag is set. A stale local flag without a live remote
    /// session counts as logged out.
    pub fn is_active(&self) -> bool {
        let flagged = match self.storage.get(KEY_IS_LOGGED_IN) {
            Ok(value) => value.as_deref() == Some(FLAG_TRUE),
            Err(err) => {
                tracing::warn!(%err, "failed to read logged-in flag");
                false
            }
        };
        self.provider.current_principal_id().is_some() && flagged
    }

    /// Drop the session everywhere: durable payload and flag, the in-memory
    /// value, and the provider's own state. Safe to call with no user set.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut current = self.current.lock().unwrap();

        self.storage.remove(KEY_USER_DATA)?;
        self.storage.set(KEY_IS_LOGGED_IN, FLAG_FALSE)?;

        *current = None;
        self.provider.sign_out();
        tracing::debug!("cleared user session");
        Ok(())
    }
}
