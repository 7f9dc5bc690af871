//! # user-session
//!
//! Session-aware client for a user-management REST API.
//!
//! The [`SessionStore`] keeps the authenticated user, the bearer token and
//! the last fetched user list. The token and user are mirrored into an
//! injected [`KeyValueStore`], so a session can be restored and
//! re-validated on the next start.
//!
//! ## Features
//!
//! - **Session lifecycle**: login, verification against `/users/me`, logout
//! - **User CRUD**: paginated list, fetch, create, update, delete
//! - **Pluggable persistence**: in-memory or JSON file storage
//! - **Uniform errors**: every action returns a categorized [`SessionError`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use user_session::{Credentials, FileStore, HttpUserApi, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> user_session::Result<()> {
//!     user_session::logging::try_init().ok();
//!
//!     let api = Arc::new(HttpUserApi::new("http://127.0.0.1:8000/api", None)?);
//!     let storage = Arc::new(FileStore::open("session.json")?);
//!     let store = SessionStore::init(api, storage);
//!
//!     if !store.verify_token().await {
//!         store
//!             .login_user(&Credentials::new("a@example.com", "secret"))
//!             .await?;
//!     }
//!
//!     println!("logged in as {}", store.get_user().as_value());
//!     store.close()
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use api::{
    ApiResponse, Credentials, HttpUserApi, LoginResponse, Pagination, UserApi, UserId, UserRecord,
};
pub use error::{FailureKind, Result, SessionError};
pub use session::{SessionState, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
