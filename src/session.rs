//! Auth Session Store
//!
//! Single owner of the signed-in user and the persisted credentials.
//! Views read the state; only `bootstrap`, `login`, `register`, `logout`
//! and `update_user` write it.

use std::cell::{Cell, RefCell};

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::config::{REFRESH_KEY, TOKEN_KEY};
use crate::models::{AuthTokens, RegisterForm, Role, User};
use crate::storage::{save_user, stored_token, PersistedSession};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Persisted credentials not yet revalidated
    Booting,
    Unauthenticated,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_booting(&self) -> bool {
        matches!(self, AuthState::Booting)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }
}

/// Result of a login or register attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Success(User),
    Failure(String),
}

type Observer = Box<dyn Fn(&AuthState)>;

pub struct SessionStore {
    api: ApiClient,
    state: RefCell<AuthState>,
    bootstrapped: Cell<bool>,
    observers: RefCell<Vec<Observer>>,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RefCell::new(AuthState::Booting),
            bootstrapped: Cell::new(false),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Called with every state change
    pub fn subscribe(&self, observer: impl Fn(&AuthState) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    fn transition(&self, next: AuthState) {
        *self.state.borrow_mut() = next.clone();
        for observer in self.observers.borrow().iter() {
            observer(&next);
        }
    }

    /// Revalidate persisted credentials. Runs once; later calls are no-ops.
    pub async fn bootstrap(&self) {
        if self.bootstrapped.replace(true) {
            return;
        }
        let storage = self.api.storage();
        if PersistedSession::load(storage).is_none() {
            PersistedSession::clear(storage);
            self.transition(AuthState::Unauthenticated);
            return;
        }

        match self.api.current_user().await {
            Ok(user) => {
                log::info!("[AUTH] session restored for {}", user.username);
                save_user(self.api.storage(), &user);
                self.transition(AuthState::Authenticated(user));
            }
            Err(err) => {
                log::warn!("[AUTH] stored session rejected: {}", err);
                self.logout();
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthOutcome {
        match self.api.login(username.trim(), password).await {
            Ok(tokens) => self.establish(tokens, "Login failed").await,
            Err(err) => {
                log::warn!("[AUTH] login failed: {}", err);
                AuthOutcome::Failure(err.detail().unwrap_or_else(|| "Login failed".to_string()))
            }
        }
    }

    pub async fn register(&self, form: &RegisterForm) -> AuthOutcome {
        match self.api.register(form).await {
            Ok(tokens) => self.establish(tokens, "Registration failed").await,
            Err(err) => {
                log::warn!("[AUTH] registration failed: {}", err);
                let message = match &err {
                    ApiError::Validation(fields) if !fields.is_empty() => fields.to_string(),
                    _ => err.detail().unwrap_or_else(|| "Registration failed".to_string()),
                };
                AuthOutcome::Failure(message)
            }
        }
    }

    /// Persist fresh tokens and move to `Authenticated`
    async fn establish(&self, tokens: AuthTokens, failure: &str) -> AuthOutcome {
        let storage = self.api.storage();
        storage.set(TOKEN_KEY, &tokens.access);

        // Some responses omit the user; fetch it with the new token
        let user = match tokens.user {
            Some(user) => user,
            None => match self.fetch_user().await {
                Ok(user) => user,
                Err(err) => {
                    log::warn!("[AUTH] could not load user after sign-in: {}", err);
                    PersistedSession::clear(storage);
                    return AuthOutcome::Failure(failure.to_string());
                }
            },
        };

        PersistedSession {
            token: tokens.access,
            refresh: tokens.refresh,
            user: user.clone(),
        }
        .save(storage);
        log::info!("[AUTH] signed in as {} ({})", user.username, user.role.as_str());
        self.transition(AuthState::Authenticated(user.clone()));
        AuthOutcome::Success(user)
    }

    async fn fetch_user(&self) -> ApiResult<User> {
        self.api.current_user().await
    }

    pub fn logout(&self) {
        PersistedSession::clear(self.api.storage());
        if self.state.borrow().is_authenticated() {
            log::info!("[AUTH] signed out");
        }
        self.transition(AuthState::Unauthenticated);
    }

    /// Replace the signed-in user (e.g. after a profile change)
    pub fn update_user(&self, user: User) {
        if !self.state.borrow().is_authenticated() {
            log::warn!("[AUTH] update_user ignored without a session");
            return;
        }
        save_user(self.api.storage(), &user);
        self.transition(AuthState::Authenticated(user));
    }
}

/// Checks for code outside the reactive tree; views read `AppContext` instead
#[allow(dead_code)]
impl SessionStore {
    /// Trade the stored refresh token for a new access token
    pub async fn refresh_access_token(&self) -> ApiResult<()> {
        let Some(refresh) = self.api.storage().get(REFRESH_KEY) else {
            return Err(ApiError::Unauthorized { detail: None });
        };
        let access = self.api.refresh_token(&refresh).await?;
        self.api.storage().set(TOKEN_KEY, &access);
        Ok(())
    }

    /// A user is in memory and a token is persisted
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated() && stored_token(self.api.storage()).is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().role() == Some(Role::Admin)
    }

    pub fn is_moderator(&self) -> bool {
        self.state.borrow().role() == Some(Role::Moderator)
    }

    pub fn is_contributor(&self) -> bool {
        self.state.borrow().role() == Some(Role::Contributor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::api::Method;
    use crate::config::USER_KEY;
    use crate::storage::KeyValueStore;
    use serde_json::json;
    use std::rc::Rc;

    #[tokio::test]
    async fn test_bootstrap_without_token_skips_network() {
        let h = harness();
        let session = SessionStore::new(h.api.clone());

        session.bootstrap().await;

        assert_eq!(session.state(), AuthState::Unauthenticated);
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_rejected_token_clears_storage() {
        let h = signed_in_harness(sample_user(3, Role::Contributor));
        h.transport.respond(Method::Get, "users/me/", 401, json!({"detail": "Token is invalid or expired"}));
        let session = SessionStore::new(h.api.clone());

        session.bootstrap().await;

        assert!(!session.is_authenticated());
        assert_eq!(session.state(), AuthState::Unauthenticated);
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_network_failure_also_signs_out() {
        let h = signed_in_harness(sample_user(3, Role::Contributor));
        h.transport.fail(Method::Get, "users/me/", ApiError::Network("offline".to_string()));
        let session = SessionStore::new(h.api.clone());

        session.bootstrap().await;

        assert!(!session.is_authenticated());
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_restores_and_runs_once() {
        let user = sample_user(3, Role::Moderator);
        let h = signed_in_harness(user.clone());
        h.transport.respond(Method::Get, "users/me/", 200, serde_json::to_value(&user).unwrap());
        let session = SessionStore::new(h.api.clone());

        session.bootstrap().await;
        session.bootstrap().await;

        assert!(session.is_authenticated());
        assert!(session.is_moderator());
        assert_eq!(h.transport.count(Method::Get, "users/me/"), 1);
    }

    #[tokio::test]
    async fn test_login_success_persists_session() {
        let h = harness();
        h.transport.respond(
            Method::Post,
            "users/login/",
            200,
            json!({"access": "a1", "refresh": "r1", "user": {"id": 2, "username": "kim", "role": "admin"}}),
        );
        let session = SessionStore::new(h.api.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        session.subscribe(move |state| sink.borrow_mut().push(state.is_authenticated()));

        let outcome = session.login("kim", "pw").await;

        assert!(matches!(outcome, AuthOutcome::Success(ref user) if user.username == "kim"));
        assert!(session.is_admin());
        assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("a1"));
        assert_eq!(h.storage.get(REFRESH_KEY).as_deref(), Some("r1"));
        assert!(h.storage.get(USER_KEY).is_some());
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[tokio::test]
    async fn test_login_without_user_fetches_it() {
        let h = harness();
        h.transport.respond(Method::Post, "users/login/", 200, json!({"access": "a1"}));
        h.transport.respond(Method::Get, "users/me/", 200, json!({"id": 4, "username": "jo"}));
        let session = SessionStore::new(h.api.clone());

        let outcome = session.login("jo", "pw").await;

        assert_eq!(outcome, AuthOutcome::Success(session.current_user().unwrap()));
        assert_eq!(h.transport.requests()[1].bearer.as_deref(), Some("a1"));
        assert!(session.is_contributor());
    }

    #[tokio::test]
    async fn test_login_failure_returns_message() {
        let h = harness();
        h.transport.respond(Method::Post, "users/login/", 400, json!({"error": "Invalid credentials"}));
        let session = SessionStore::new(h.api.clone());

        let outcome = session.login("kim", "wrong").await;

        assert_eq!(outcome, AuthOutcome::Failure("Invalid credentials".to_string()));
        assert!(!session.is_authenticated());
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn test_register_failure_lists_fields() {
        let h = harness();
        h.transport.respond(
            Method::Post,
            "users/register/",
            400,
            json!({"username": ["A user with that username already exists."]}),
        );
        let session = SessionStore::new(h.api.clone());

        let outcome = session.register(&RegisterForm::default()).await;

        assert_eq!(
            outcome,
            AuthOutcome::Failure("username: A user with that username already exists.".to_string())
        );
    }

    #[tokio::test]
    async fn test_logout_and_update_user() {
        let user = sample_user(3, Role::Contributor);
        let h = signed_in_harness(user.clone());
        h.transport.respond(Method::Get, "users/me/", 200, serde_json::to_value(&user).unwrap());
        let session = SessionStore::new(h.api.clone());
        session.bootstrap().await;

        let promoted = User { role: Role::Moderator, ..user };
        session.update_user(promoted.clone());
        assert!(session.is_moderator());
        assert!(h.storage.get(USER_KEY).unwrap().contains("moderator"));

        session.logout();
        assert_eq!(session.state(), AuthState::Unauthenticated);
        assert!(h.storage.is_empty());

        session.update_user(promoted);
        assert_eq!(session.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_refresh_access_token() {
        let h = signed_in_harness(sample_user(3, Role::Contributor));
        h.transport.respond(Method::Post, "token/refresh/", 200, json!({"access": "renewed"}));
        let session = SessionStore::new(h.api.clone());

        session.refresh_access_token().await.unwrap();

        assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("renewed"));
    }
}
