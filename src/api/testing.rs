//! Test doubles for the API client

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use super::{ApiClient, ApiError, ApiRequest, ApiResponse, ApiResult, Method, Transport};
use crate::config::ApiConfig;
use crate::models::{Feedback, Priority, Role, Status, User, UserRef};
use crate::router::Navigator;
use crate::storage::{MemoryStore, PersistedSession};

pub const TEST_BASE_URL: &str = "http://test/api";

type Reply = ApiResult<ApiResponse>;

/// Canned responses keyed by method and path (query ignored).
/// The last queued reply for a route repeats.
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Replace any queued replies for the route
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.set(method, path, Ok(ApiResponse { status, body }));
    }

    pub fn fail(&self, method: Method, path: &str, err: ApiError) {
        self.set(method, path, Err(err));
    }

    /// Append a reply, for routes answered differently on each call
    pub fn queue(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(ApiResponse { status, body }));
    }

    fn set(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .borrow_mut()
            .insert((method, path.to_string()), VecDeque::from([reply]));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// Requests sent to one route
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.method == method && route_path(&request.url) == path)
            .count()
    }
}

fn route_path(url: &str) -> String {
    let path = url.strip_prefix(TEST_BASE_URL).unwrap_or(url);
    let path = path.trim_start_matches('/');
    path.split('?').next().unwrap_or(path).to_string()
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let key = (request.method, route_path(&request.url));
        self.requests.borrow_mut().push(request);

        let mut routes = self.routes.borrow_mut();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Ok(ApiResponse {
                status: 404,
                body: json!({"detail": "Not found."}),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_string());
    }
}

pub struct Harness {
    pub api: ApiClient,
    pub transport: Rc<MockTransport>,
    pub storage: Rc<MemoryStore>,
    pub navigator: Rc<RecordingNavigator>,
}

pub fn harness() -> Harness {
    let transport = Rc::new(MockTransport::default());
    let storage = Rc::new(MemoryStore::new());
    let navigator = Rc::new(RecordingNavigator::default());
    let api = ApiClient::new(
        ApiConfig::new(TEST_BASE_URL),
        transport.clone(),
        storage.clone(),
        navigator.clone(),
    );
    Harness {
        api,
        transport,
        storage,
        navigator,
    }
}

/// Harness with a persisted session for `user`
pub fn signed_in_harness(user: User) -> Harness {
    let h = harness();
    PersistedSession {
        token: "test-token".to_string(),
        refresh: Some("test-refresh".to_string()),
        user,
    }
    .save(h.storage.as_ref());
    h
}

pub fn sample_user(id: u32, role: Role) -> User {
    User {
        id,
        username: format!("user{}", id),
        email: Some(format!("user{}@example.com", id)),
        role,
        full_name: None,
    }
}

pub fn sample_feedback(id: u32, author: u32, status: Status) -> Feedback {
    Feedback {
        id,
        board: 1,
        board_name: Some("General".to_string()),
        author: UserRef::Id(author),
        author_name: Some(format!("user{}", author)),
        title: format!("Feedback {}", id),
        content: "Some details about the request".to_string(),
        status,
        priority: Priority::Medium,
        upvotes: Vec::new(),
        upvote_count: None,
        tags: Vec::new(),
        comment_count: 0,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::hours(id as i64),
        updated_at: None,
    }
}
