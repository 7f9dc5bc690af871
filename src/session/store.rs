//! Session store: authenticated user, token and cached user list.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::SessionState;
use crate::api::types::list_data;
use crate::api::{Credentials, LoginResponse, Pagination, UserApi, UserId, UserRecord};
use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY};
use crate::Result;

#[derive(Debug, Default)]
struct SessionData {
    user: UserRecord,
    token: Option<String>,
    users: Vec<UserRecord>,
}

/// Client session store.
///
/// Holds the session in memory and mirrors the durable part of it (token
/// and authenticated user) to a [`KeyValueStore`]. Storage writes happen
/// while the in-memory state is locked, so readers never see one updated
/// without the other.
///
/// Session actions (`login_user`, `verify_token`, `logout`,
/// `fetch_user_by_id`, `fetch_user_on_load`) run one at a time; list
/// fetches are serialized separately. CRUD calls that do not touch the
/// session run unguarded.
pub struct SessionStore {
    api: Arc<dyn UserApi>,
    storage: Arc<dyn KeyValueStore>,
    data: RwLock<SessionData>,
    session_guard: Mutex<()>,
    users_guard: Mutex<()>,
}

impl SessionStore {
    /// Create an anonymous store without reading storage.
    pub fn new(api: Arc<dyn UserApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            storage,
            data: RwLock::new(SessionData::default()),
            session_guard: Mutex::new(()),
            users_guard: Mutex::new(()),
        }
    }

    /// Create a store and restore the session from storage.
    pub fn init(api: Arc<dyn UserApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        let store = Self::new(api, storage);
        store.restore();
        store
    }

    /// Load token and user from storage into memory.
    ///
    /// Unreadable entries are logged and treated as absent; an unparsable
    /// user becomes the empty record.
    pub fn restore(&self) -> SessionState {
        let token = self.persisted_token();

        let user = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Null) => UserRecord::default(),
                Ok(value) => UserRecord::new(value),
                Err(e) => {
                    warn!("Ignoring unparsable stored user: {}", e);
                    UserRecord::default()
                }
            },
            Ok(None) => UserRecord::default(),
            Err(e) => {
                warn!("Failed to read stored user: {}", e);
                UserRecord::default()
            }
        };

        let mut data = self.write();
        data.token = token;
        data.user = user;

        let state = SessionState::from_token(data.token.as_deref());
        info!("Session restored: {}", state);
        state
    }

    /// Flush storage and release the store.
    pub fn close(self) -> Result<()> {
        self.storage.flush()?;
        debug!("Session store closed");
        Ok(())
    }

    /// The current user (`{}` when anonymous).
    pub fn get_user(&self) -> UserRecord {
        self.read().user.clone()
    }

    /// The bearer token, if authenticated.
    pub fn get_token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// The last fetched user list.
    pub fn get_users(&self) -> Vec<UserRecord> {
        self.read().users.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_token(self.read().token.as_deref())
    }

    /// Authenticate and store the returned user and token.
    ///
    /// A response without both a user and a token is
    /// [`SessionError::MalformedResponse`](crate::SessionError::MalformedResponse).
    /// On any failure the previous session is left untouched.
    pub async fn login_user(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let _guard = self.session_guard.lock().await;

        let result = self.try_login(credentials).await;
        match &result {
            Ok(_) => info!("Logged in as {}", credentials.email),
            Err(e) => error!(error = %e, "Error logging in"),
        }
        result
    }

    /// Check the persisted token against `GET /users/me`.
    ///
    /// Returns `false` without a request when no token is persisted. Any
    /// failure clears the session.
    pub async fn verify_token(&self) -> bool {
        let _guard = self.session_guard.lock().await;

        match self.persisted_token() {
            Some(token) => self.verify(&token).await.is_some(),
            None => false,
        }
    }

    /// Clear the session in memory and in storage. Never fails.
    pub async fn logout(&self) {
        let _guard = self.session_guard.lock().await;
        self.clear_session();
        info!("Logged out");
    }

    /// Fetch one page of users, replacing the cached list on success.
    pub async fn fetch_users(&self, pagination: Pagination) -> Result<Vec<UserRecord>> {
        let _guard = self.users_guard.lock().await;

        match self.api.list_users(pagination).await.and_then(list_data) {
            Ok(users) => {
                debug!(
                    "Fetched {} users (page {}, limit {})",
                    users.len(),
                    pagination.page,
                    pagination.limit
                );
                self.write().users = users.clone();
                Ok(users)
            }
            Err(e) => {
                error!(error = %e, "Error fetching users");
                Err(e)
            }
        }
    }

    /// Fetch one user and make it the current in-memory user.
    ///
    /// The record is not persisted.
    pub async fn fetch_user_by_id(&self, id: &UserId) -> Result<UserRecord> {
        let _guard = self.session_guard.lock().await;

        match self.api.get_user(id).await {
            Ok(response) => {
                let record = UserRecord::new(response.body);
                self.write().user = record.clone();
                Ok(record)
            }
            Err(e) => {
                error!(error = %e, "Error fetching user with ID {}", id);
                Err(e)
            }
        }
    }

    /// Create a user, returning the response body.
    pub async fn add_user(&self, record: &UserRecord) -> Result<Value> {
        self.api
            .create_user(record)
            .await
            .map(|response| response.body)
            .inspect_err(|e| error!(error = %e, "Error adding user"))
    }

    /// Update a user, returning the response body.
    pub async fn update_user(&self, id: &UserId, record: &UserRecord) -> Result<Value> {
        self.api
            .update_user(id, record)
            .await
            .map(|response| response.body)
            .inspect_err(|e| error!(error = %e, "Error updating user with ID {}", id))
    }

    /// Delete a user, returning the response body (`null` when empty).
    pub async fn delete_user(&self, id: &UserId) -> Result<Value> {
        self.api
            .delete_user(id)
            .await
            .map(|response| response.body)
            .inspect_err(|e| error!(error = %e, "Error deleting user with ID {}", id))
    }

    /// Bootstrap a restored session.
    ///
    /// With a persisted token: verify it, then re-fetch the current user and
    /// store it; an invalid token logs the session out. Without one this is
    /// a no-op.
    pub async fn fetch_user_on_load(&self) -> SessionState {
        let _guard = self.session_guard.lock().await;

        let Some(token) = self.persisted_token() else {
            return self.state();
        };

        if self.verify(&token).await.is_none() {
            return self.state();
        }

        match self.api.current_user(&token).await {
            Ok(response) => {
                let user = UserRecord::new(response.body);
                let mut data = self.write();
                if let Err(e) = self.write_session(&mut data, user, token) {
                    error!(error = %e, "Failed to store logged-in user");
                }
            }
            Err(e) => error!(error = %e, "Error fetching logged-in user data"),
        }

        self.state()
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let response = self.api.login(credentials).await?;
        let login = LoginResponse::try_from(response)?;

        let mut data = self.write();
        self.write_session(&mut data, login.user.clone(), login.token.clone())?;
        Ok(login)
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persisted_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                None
            }
        }
    }

    /// Caller must hold `session_guard`.
    async fn verify(&self, token: &str) -> Option<Value> {
        match self.api.current_user(token).await {
            Ok(response) => Some(response.body),
            Err(e) => {
                warn!(error = %e, "Token verification failed");
                self.clear_session();
                None
            }
        }
    }

    /// Persist then commit `user` and `token`.
    ///
    /// If the second key cannot be written the token key is put back to its
    /// previous value and memory is left unchanged.
    fn write_session(
        &self,
        data: &mut SessionData,
        user: UserRecord,
        token: String,
    ) -> Result<()> {
        let user_json = serde_json::to_string(&user).map_err(StorageError::from)?;

        self.storage.set(TOKEN_KEY, &token)?;
        if let Err(e) = self.storage.set(USER_KEY, &user_json) {
            let rollback = match data.token.as_deref() {
                Some(previous) => self.storage.set(TOKEN_KEY, previous),
                None => self.storage.remove(TOKEN_KEY),
            };
            if let Err(rollback) = rollback {
                error!(error = %rollback, "Failed to roll back stored token");
            }
            return Err(e.into());
        }

        data.user = user;
        data.token = Some(token);
        Ok(())
    }

    fn clear_session(&self) {
        let mut data = self.write();
        data.user = UserRecord::default();
        data.token = None;

        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                error!(error = %e, "Failed to remove stored {}", key);
            }
        }
    }
}
