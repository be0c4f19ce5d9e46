//! Feedback API Client
//!
//! Frontend bindings to the feedback service's REST endpoints, organized by domain.
//! Every request carries the stored bearer token; any 401 tears the session down.

mod auth;
mod boards;
mod comments;
mod error;
mod feedback;
mod http;
mod tags;
#[cfg(test)]
pub mod testing;

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::models::ListPayload;
use crate::router::{Navigator, LOGIN_PATH};
use crate::storage::{stored_token, KeyValueStore, PersistedSession};

pub use error::{ApiError, ApiResult, FieldErrors};
pub use http::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one HTTP request. Errors are transport failures only;
/// non-success statuses come back as responses.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

/// REST client shared by all views
#[derive(Clone)]
pub struct ApiClient {
    config: Rc<ApiConfig>,
    transport: Rc<dyn Transport>,
    storage: Rc<dyn KeyValueStore>,
    navigator: Rc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: ApiConfig,
        transport: Rc<dyn Transport>,
        storage: Rc<dyn KeyValueStore>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            config: Rc::new(config),
            transport,
            storage,
            navigator,
        }
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let request = ApiRequest {
            method,
            url: self.config.endpoint_with_query(path, query),
            body,
            bearer: stored_token(self.storage()),
        };
        log::debug!("[API] {} {}", method, path);

        let response = self.transport.send(request).await.map_err(|err| {
            log::warn!("[API] {} {} failed: {}", method, path, err);
            err
        })?;

        if response.status == 401 {
            self.handle_unauthorized();
        }
        if response.is_success() {
            Ok(response.body)
        } else {
            let err = ApiError::from_response(response.status, &response.body);
            log::warn!("[API] {} {} -> {}: {}", method, path, response.status, err);
            Err(err)
        }
    }

    /// Any 401 ends the session, whichever call received it
    fn handle_unauthorized(&self) {
        log::warn!("[API] unauthorized response, clearing session");
        PersistedSession::clear(self.storage());
        self.navigator.redirect(LOGIN_PATH);
    }

    fn encode<B: Serialize>(body: &B) -> ApiResult<Value> {
        serde_json::to_value(body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
        serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        Self::decode(self.execute(Method::Get, path, query, None).await?)
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = Self::encode(body)?;
        Self::decode(self.execute(Method::Post, path, &[], Some(body)).await?)
    }

    /// POST without a request body (action endpoints)
    pub(crate) async fn post_action<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Self::decode(self.execute(Method::Post, path, &[], None).await?)
    }

    pub(crate) async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = Self::encode(body)?;
        Self::decode(self.execute(Method::Patch, path, &[], Some(body)).await?)
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(Method::Delete, path, &[], None).await.map(|_| ())
    }

    /// Read a collection for display; failures become an empty list
    pub(crate) async fn get_list<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Vec<T> {
        match self.get::<ListPayload<T>>(path, query).await {
            Ok(payload) => payload.into_vec(),
            Err(err) => {
                log::warn!("[API] showing empty {} after error: {}", path, err);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::config::{TOKEN_KEY, USER_KEY};
    use crate::models::Feedback;
    use serde_json::json;

    #[tokio::test]
    async fn test_bearer_token_attached_when_present() {
        let h = harness();
        h.transport.respond(Method::Get, "boards/", 200, json!([]));

        h.api.list_boards().await;
        h.storage.set(TOKEN_KEY, "abc");
        h.api.list_boards().await;

        let requests = h.transport.requests();
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[1].bearer.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_redirects() {
        let h = signed_in_harness(sample_user(1, crate::models::Role::Contributor));
        h.transport.respond(Method::Post, "feedback/3/vote/", 401, json!({"detail": "Token expired"}));

        let result = h.api.vote_feedback(3).await;

        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        assert_eq!(h.storage.get(USER_KEY), None);
        assert_eq!(h.navigator.visits(), vec![LOGIN_PATH.to_string()]);
    }

    #[tokio::test]
    async fn test_unauthorized_on_list_read_also_redirects() {
        let h = signed_in_harness(sample_user(1, crate::models::Role::Admin));
        h.transport.respond(Method::Get, "feedback/", 401, json!({}));

        let items: Vec<Feedback> = h.api.list_feedback(&Default::default()).await;

        assert!(items.is_empty());
        assert!(h.storage.is_empty());
        assert_eq!(h.navigator.visits(), vec![LOGIN_PATH.to_string()]);
    }

    #[tokio::test]
    async fn test_network_failure_on_read_is_masked() {
        let h = harness();
        h.transport.fail(Method::Get, "tags/", ApiError::Network("connection refused".to_string()));

        assert!(h.api.list_tags().await.is_empty());
        assert!(h.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_decode_error() {
        let h = harness();
        h.transport.respond(Method::Get, "feedback/9/", 200, json!({"id": "nine"}));

        assert!(matches!(h.api.get_feedback(9).await, Err(ApiError::Decode(_))));
    }
}
