//! Key-value persistence for session state.
//!
//! The session store mirrors the token and the authenticated user into a
//! [`KeyValueStore`] so a session survives process restarts. Two backends
//! are provided:
//!
//! - [`MemoryStore`]: process-local, used in tests and one-off runs
//! - [`FileStore`]: a JSON document on disk
//!
//! ```rust
//! use user_session::storage::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("authToken", "T1").unwrap();
//! assert_eq!(store.get("authToken").unwrap().as_deref(), Some("T1"));
//! ```

mod file;
mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "authToken";

/// Key holding the JSON-serialized authenticated user.
pub const USER_KEY: &str = "user";

/// Errors raised by storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document is not valid JSON.
    #[error("invalid storage document: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// Persistent string key-value capability.
///
/// Implementations must be safe to share between tasks. Every mutation is
/// expected to be durable by the time the call returns.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Flush buffered writes, if the backend buffers any.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
