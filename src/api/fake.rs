//! Scripted [`UserApi`] double for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ApiResponse, Credentials, Pagination, UserApi, UserId, UserRecord};
use crate::error::SessionError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Endpoint {
    Login,
    Me,
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// A recorded call with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Login(Credentials),
    Me(String),
    List(Pagination),
    Get(UserId),
    Create(UserRecord),
    Update(UserId, UserRecord),
    Delete(UserId),
}

impl Call {
    fn endpoint(&self) -> Endpoint {
        match self {
            Call::Login(_) => Endpoint::Login,
            Call::Me(_) => Endpoint::Me,
            Call::List(_) => Endpoint::List,
            Call::Get(_) => Endpoint::Get,
            Call::Create(_) => Endpoint::Create,
            Call::Update(..) => Endpoint::Update,
            Call::Delete(_) => Endpoint::Delete,
        }
    }
}

/// Returns queued responses per endpoint in FIFO order.
///
/// An endpoint with nothing queued fails with a network error.
#[derive(Default)]
pub(crate) struct FakeApi {
    responses: Mutex<HashMap<Endpoint, VecDeque<Result<ApiResponse>>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, endpoint: Endpoint, response: Result<ApiResponse>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(response);
        self
    }

    pub(crate) fn push_ok(&self, endpoint: Endpoint, body: serde_json::Value) -> &Self {
        self.push(endpoint, Ok(ApiResponse::ok(body)))
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .count()
    }

    fn respond(&self, call: Call) -> Result<ApiResponse> {
        let endpoint = call.endpoint();
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(SessionError::Network(format!(
                    "no scripted response for {:?}",
                    endpoint
                )))
            })
    }
}

#[async_trait]
impl UserApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<ApiResponse> {
        self.respond(Call::Login(credentials.clone()))
    }

    async fn current_user(&self, token: &str) -> Result<ApiResponse> {
        self.respond(Call::Me(token.to_string()))
    }

    async fn list_users(&self, pagination: Pagination) -> Result<ApiResponse> {
        self.respond(Call::List(pagination))
    }

    async fn get_user(&self, id: &UserId) -> Result<ApiResponse> {
        self.respond(Call::Get(id.clone()))
    }

    async fn create_user(&self, record: &UserRecord) -> Result<ApiResponse> {
        self.respond(Call::Create(record.clone()))
    }

    async fn update_user(&self, id: &UserId, record: &UserRecord) -> Result<ApiResponse> {
        self.respond(Call::Update(id.clone(), record.clone()))
    }

    async fn delete_user(&self, id: &UserId) -> Result<ApiResponse> {
        self.respond(Call::Delete(id.clone()))
    }
}
