//! Client side of the user-management REST API.
//!
//! ## Endpoints
//!
//! - `POST /users/login` - Authenticate, returns `{user, token}`
//! - `GET /users/me` - Current user (Bearer token)
//! - `GET /users?page=&limit=` - Paginated list, returns `{data: [...]}`
//! - `GET /users/{id}` - Fetch one user
//! - `POST /users/add` - Create a user
//! - `PUT /users/{id}` - Update a user
//! - `DELETE /users/{id}` - Delete a user
//!
//! Paths are relative to the configured base URL, normally ending in `/api`.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;
pub mod id;
pub mod types;

pub use client::{HttpUserApi, UserApi};
pub use id::UserId;
pub use types::{ApiResponse, Credentials, LoginResponse, Pagination, UserRecord};
