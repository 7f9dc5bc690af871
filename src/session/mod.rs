//! Session management module.
//!
//! This module provides the client session store: the authenticated user,
//! the bearer token, the cached user list, and the actions that keep them in
//! sync with the remote API and persistent storage.

mod state;
mod store;

pub use state::SessionState;
pub use store::SessionStore;
