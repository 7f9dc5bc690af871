//! Request and response types for the user API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SessionError;

/// Opaque user entity as returned by the API.
///
/// The store never interprets these fields; the record is passed through
/// as-is. The default record is the empty JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Value);

impl UserRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Look up a top-level field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True for `{}` and `null`.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl Default for UserRecord {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for UserRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl PartialEq<Value> for UserRecord {
    fn eq(&self, other: &Value) -> bool {
        &self.0 == other
    }
}

/// Login request body.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Page selection for the user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }
}

/// Raw successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; `null` for an empty body.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginResponse {
    pub status: u16,
    pub user: UserRecord,
    pub token: String,
    /// The full response document.
    pub body: Value,
}

impl TryFrom<ApiResponse> for LoginResponse {
    type Error = SessionError;

    /// Requires a non-null `user` and a non-empty string `token`.
    fn try_from(response: ApiResponse) -> Result<Self, Self::Error> {
        let user = match response.body.get("user") {
            Some(Value::Null) | None => {
                return Err(SessionError::MalformedResponse(
                    "login response has no user".into(),
                ))
            }
            Some(user) => UserRecord::new(user.clone()),
        };

        let token = response
            .body
            .get("token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SessionError::MalformedResponse("login response has no token".into()))?
            .to_string();

        Ok(Self {
            status: response.status,
            user,
            token,
            body: response.body,
        })
    }
}

/// Extract the `data` array of a list response.
pub(crate) fn list_data(response: ApiResponse) -> Result<Vec<UserRecord>, SessionError> {
    match response.body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items.into_iter().map(UserRecord::new).collect()),
            _ => Err(SessionError::MalformedResponse(
                "list response has no data array".into(),
            )),
        },
        _ => Err(SessionError::MalformedResponse(
            "list response is not an object".into(),
        )),
    }
}
