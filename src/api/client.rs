//! HTTP client for the user API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;

use super::{ApiResponse, Credentials, Pagination, UserId, UserRecord};
use crate::error::SessionError;
use crate::Result;

/// Remote user API.
///
/// One method per endpoint. Implementations return the decoded body of a
/// successful response, or a categorized [`SessionError`] for transport
/// failures and non-success statuses.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `POST /users/login`
    async fn login(&self, credentials: &Credentials) -> Result<ApiResponse>;

    /// `GET /users/me` with `Authorization: Bearer <token>`
    async fn current_user(&self, token: &str) -> Result<ApiResponse>;

    /// `GET /users?page=&limit=`
    async fn list_users(&self, pagination: Pagination) -> Result<ApiResponse>;

    /// `GET /users/{id}`
    async fn get_user(&self, id: &UserId) -> Result<ApiResponse>;

    /// `POST /users/add`
    async fn create_user(&self, record: &UserRecord) -> Result<ApiResponse>;

    /// `PUT /users/{id}`
    async fn update_user(&self, id: &UserId, record: &UserRecord) -> Result<ApiResponse>;

    /// `DELETE /users/{id}`
    async fn delete_user(&self, id: &UserId) -> Result<ApiResponse>;
}

/// [`UserApi`] over HTTP using reqwest.
#[derive(Debug, Clone)]
pub struct HttpUserApi {
    client: Client,
    base_url: Url,
}

impl HttpUserApi {
    /// Create a client for the API rooted at `base_url` (e.g.
    /// `https://example.com/api`).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| SessionError::InvalidUrl(format!("{base_url}: {e}")))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(SessionError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SessionError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SessionError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "api request");
        Ok(self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(e) if status.is_success() => {
                    return Err(SessionError::MalformedResponse(format!(
                        "invalid JSON body: {}",
                        e
                    )))
                }
                Err(_) => Value::String(text),
            }
        };

        if !status.is_success() {
            return Err(SessionError::from_status(status.as_u16(), &body));
        }

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn login(&self, credentials: &Credentials) -> Result<ApiResponse> {
        let request = self
            .request(Method::POST, &["users", "login"])?
            .json(credentials);
        self.send(request).await
    }

    async fn current_user(&self, token: &str) -> Result<ApiResponse> {
        let request = self
            .request(Method::GET, &["users", "me"])?
            .bearer_auth(token);
        self.send(request).await
    }

    async fn list_users(&self, pagination: Pagination) -> Result<ApiResponse> {
        let request = self
            .request(Method::GET, &["users"])?
            .query(&pagination);
        self.send(request).await
    }

    async fn get_user(&self, id: &UserId) -> Result<ApiResponse> {
        let request = self.request(Method::GET, &["users", id.as_str()])?;
        self.send(request).await
    }

    async fn create_user(&self, record: &UserRecord) -> Result<ApiResponse> {
        let request = self.request(Method::POST, &["users", "add"])?.json(record);
        self.send(request).await
    }

    async fn update_user(&self, id: &UserId, record: &UserRecord) -> Result<ApiResponse> {
        let request = self
            .request(Method::PUT, &["users", id.as_str()])?
            .json(record);
        self.send(request).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<ApiResponse> {
        let request = self.request(Method::DELETE, &["users", id.as_str()])?;
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let api = HttpUserApi::new("https://example.com/api", None).unwrap();
        let url = api.endpoint(&["users", "me"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/users/me");
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let api = HttpUserApi::new("https://example.com/api/", None).unwrap();
        let url = api.endpoint(&["users"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/users");
    }

    #[test]
    fn test_endpoint_encodes_id() {
        let api = HttpUserApi::new("http://127.0.0.1:8000/api", None).unwrap();
        let id = UserId::new("a/b c").unwrap();
        let url = api.endpoint(&["users", id.as_str()]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/users/a%2Fb%20c");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            HttpUserApi::new("not a url", None),
            Err(SessionError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpUserApi::new("mailto:someone@example.com", None),
            Err(SessionError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpUserApi::new("ftp://example.com/api", None),
            Err(SessionError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_with_timeout() {
        let api = HttpUserApi::new("https://example.com/api", Some(Duration::from_secs(5)));
        assert!(api.is_ok());
        assert_eq!(api.unwrap().base_url().host_str(), Some("example.com"));
    }
}
