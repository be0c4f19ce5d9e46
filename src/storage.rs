//! Persisted Session Storage
//!
//! Key/value persistence for credentials (browser localStorage or in memory).

use std::cell::RefCell;
use std::collections::HashMap;

use crate::config::{REFRESH_KEY, TOKEN_KEY, USER_KEY};
use crate::models::User;

/// Minimal string key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// Private browsing modes may deny access
    pub fn available() -> bool {
        Self::storage().is_some()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            log::warn!("[STORAGE] localStorage unavailable, '{}' not saved", key);
            return;
        };
        if let Err(err) = storage.set_item(key, value) {
            log::warn!("[STORAGE] failed to save '{}': {:?}", key, err);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory store, used when localStorage is unavailable
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Credentials as persisted between page loads
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSession {
    pub token: String,
    pub refresh: Option<String>,
    pub user: User,
}

impl PersistedSession {
    /// Restore a session; requires both a token and a readable user
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let token = store.get(TOKEN_KEY)?;
        let raw_user = store.get(USER_KEY)?;
        let user = match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => user,
            Err(err) => {
                log::warn!("[STORAGE] discarding unreadable stored user: {}", err);
                return None;
            }
        };
        Some(Self {
            token,
            refresh: store.get(REFRESH_KEY),
            user,
        })
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        store.set(TOKEN_KEY, &self.token);
        match &self.refresh {
            Some(refresh) => store.set(REFRESH_KEY, refresh),
            None => store.remove(REFRESH_KEY),
        }
        save_user(store, &self.user);
    }

    pub fn clear(store: &dyn KeyValueStore) {
        store.remove(TOKEN_KEY);
        store.remove(REFRESH_KEY);
        store.remove(USER_KEY);
    }
}

pub fn save_user(store: &dyn KeyValueStore, user: &User) {
    match serde_json::to_string(user) {
        Ok(json) => store.set(USER_KEY, &json),
        Err(err) => log::error!("[STORAGE] failed to serialize user: {}", err),
    }
}

pub fn stored_token(store: &dyn KeyValueStore) -> Option<String> {
    store.get(TOKEN_KEY).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user() -> User {
        User {
            id: 4,
            username: "mia".to_string(),
            email: None,
            role: Role::Admin,
            full_name: None,
        }
    }

    #[test]
    fn test_save_load_clear() {
        let store = MemoryStore::new();
        let session = PersistedSession {
            token: "access".to_string(),
            refresh: Some("refresh".to_string()),
            user: user(),
        };
        session.save(&store);

        assert_eq!(PersistedSession::load(&store), Some(session));
        assert_eq!(stored_token(&store).as_deref(), Some("access"));

        PersistedSession::clear(&store);
        assert!(store.is_empty());
        assert_eq!(PersistedSession::load(&store), None);
    }

    #[test]
    fn test_corrupt_user_is_not_a_session() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "access");
        store.set(USER_KEY, "{not json");
        assert_eq!(PersistedSession::load(&store), None);
    }
}
