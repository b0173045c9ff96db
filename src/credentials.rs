//! Injectable credential storage for the session token.
//!
//! The session token is the gateway's only shared mutable state. It is
//! stored under a primary key, with a legacy key read as a fallback for
//! installations that predate the rename. The store itself is a trait so
//! hosts can plug in whatever persistence they have (browser local
//! storage, keychain, a file) and tests can use the in-memory fake.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::RwLock;

/// Primary storage key for the session token.
pub const SESSION_TOKEN_KEY: &str = "tg_session_token";

/// Legacy storage key, still read as a fallback.
pub const LEGACY_SESSION_TOKEN_KEY: &str = "session_token";

/// Error raised by a credential store backend.
#[derive(Debug)]
pub struct StoreError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl StoreError {
    /// Create a new store error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "credential store error: {}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// Result type for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Host-pluggable key/value storage for credentials.
///
/// Implementations must not log stored values. Removing an absent key is
/// a no-op, and setting the same value twice leaves storage unchanged, so
/// callers never need to guard against repeated writes.
pub trait CredentialStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Remove the value stored under `key`, if any.
    fn remove(&self, key: &str) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Session-token view over a [`CredentialStore`].
///
/// Owns the primary/legacy key discipline so the rest of the gateway never
/// touches raw storage keys.
pub struct SessionTokens<S> {
    store: S,
}

impl<S: CredentialStore> SessionTokens<S> {
    /// Wrap a credential store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current session token: primary key first, then the legacy key.
    pub async fn token(&self) -> StoreResult<Option<String>> {
        if let Some(token) = self.store.get(SESSION_TOKEN_KEY).await? {
            return Ok(Some(token));
        }
        self.store.get(LEGACY_SESSION_TOKEN_KEY).await
    }

    /// Store a new session token under the primary key.
    pub async fn set_token(&self, token: &str) -> StoreResult<()> {
        self.store.set(SESSION_TOKEN_KEY, token).await
    }

    /// Clear the session token from both keys. A no-op when absent.
    pub async fn clear(&self) -> StoreResult<()> {
        self.store.remove(SESSION_TOKEN_KEY).await?;
        self.store.remove(LEGACY_SESSION_TOKEN_KEY).await
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// In-memory credential store.
///
/// Backs tests and short-lived native hosts. Lock poisoning is surfaced
/// as a [`StoreError`] rather than a panic.
pub struct InMemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

fn lock_error(context: &str) -> StoreError {
    StoreError::new(format!(
        "InMemoryCredentialStore: lock poisoned during {}",
        context
    ))
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the store is empty. Returns true if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| lock_error("get"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("set"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("remove"))?;
        entries.remove(key);
        Ok(())
    }
}
