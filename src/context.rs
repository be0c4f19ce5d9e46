//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::models::User;
use crate::session::{AuthState, SessionStore};

/// How long a flash message stays visible
const FLASH_TIMEOUT_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub id: u32,
    pub kind: FlashKind,
    pub text: String,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Mirror of the session store state
    pub auth: ReadSignal<AuthState>,
    /// Current flash message - read
    pub flash: ReadSignal<Option<Flash>>,
    /// Current flash message - write
    set_flash: WriteSignal<Option<Flash>>,
    api: StoredValue<ApiClient, LocalStorage>,
    session: StoredValue<Rc<SessionStore>, LocalStorage>,
}

impl AppContext {
    /// Wire the session store into signals; the store stays the only writer
    pub fn new(api: ApiClient, session: Rc<SessionStore>) -> Self {
        let (auth, set_auth) = signal(session.state());
        let (flash, set_flash) = signal::<Option<Flash>>(None);
        session.subscribe(move |state| {
            set_auth.try_set(state.clone());
        });
        Self {
            auth,
            flash,
            set_flash,
            api: StoredValue::new_local(api),
            session: StoredValue::new_local(session),
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    pub fn session(&self) -> Rc<SessionStore> {
        self.session.get_value()
    }

    /// Signed-in user, tracked
    pub fn current_user(&self) -> Option<User> {
        self.auth.with(|state| state.user().cloned())
    }

    pub fn is_elevated(&self) -> bool {
        self.auth.with(|state| state.role().is_some_and(|role| role.is_elevated()))
    }

    /// Show a message that clears itself
    pub fn notify(&self, kind: FlashKind, text: impl Into<String>) {
        let id = self.flash.get_untracked().map(|f| f.id + 1).unwrap_or(1);
        self.set_flash.set(Some(Flash {
            id,
            kind,
            text: text.into(),
        }));
        let flash = self.flash;
        let set_flash = self.set_flash;
        spawn_local(async move {
            TimeoutFuture::new(FLASH_TIMEOUT_MS).await;
            // A newer message keeps its own timer
            if flash.get_untracked().is_some_and(|f| f.id == id) {
                set_flash.set(None);
            }
        });
    }

    pub fn dismiss_flash(&self) {
        self.set_flash.set(None);
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}
