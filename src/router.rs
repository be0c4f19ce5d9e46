//! Client-Side Router
//!
//! Maps URL paths to views, gates protected routes behind a session and
//! keeps the address bar in sync through the History API.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::session::AuthState;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const FEEDBACK_PATH: &str = "/feedback";
pub const CREATE_FEEDBACK_PATH: &str = "/create-feedback";
pub const BOARDS_PATH: &str = "/boards";
pub const CREATE_BOARD_PATH: &str = "/create-board";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Dashboard,
    FeedbackList,
    FeedbackDetail(u32),
    CreateFeedback,
    Boards,
    CreateBoard,
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["feedback"] => Route::FeedbackList,
            ["feedback", id] => id.parse().map(Route::FeedbackDetail).unwrap_or(Route::NotFound),
            ["create-feedback"] => Route::CreateFeedback,
            ["boards"] => Route::Boards,
            ["create-board"] => Route::CreateBoard,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => REGISTER_PATH.to_string(),
            Route::Dashboard => DASHBOARD_PATH.to_string(),
            Route::FeedbackList => FEEDBACK_PATH.to_string(),
            Route::FeedbackDetail(id) => format!("{}/{}", FEEDBACK_PATH, id),
            Route::CreateFeedback => CREATE_FEEDBACK_PATH.to_string(),
            Route::Boards => BOARDS_PATH.to_string(),
            Route::CreateBoard => CREATE_BOARD_PATH.to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Login and register are the only public pages
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// Routing decision for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Render,
    Redirect(Route),
    /// Session still being revalidated
    Wait,
}

pub fn guard(route: &Route, state: &AuthState) -> Guard {
    if state.is_booting() {
        return Guard::Wait;
    }
    let signed_in = state.is_authenticated();
    match route {
        Route::Root if signed_in => Guard::Redirect(Route::Dashboard),
        Route::Root => Guard::Redirect(Route::Login),
        Route::NotFound => Guard::Render,
        route if route.is_public() && signed_in => Guard::Redirect(Route::Dashboard),
        route if !route.is_public() && !signed_in => Guard::Redirect(Route::Login),
        _ => Guard::Render,
    }
}

/// Full page navigation, used when the session is torn down
pub trait Navigator {
    fn redirect(&self, path: &str);
}

/// `window.location` navigation
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, path: &str) {
        let Some(window) = web_sys::window() else { return };
        let location = window.location();
        // A reload of the page we are on would only drop its state
        if location.pathname().ok().as_deref() == Some(path) {
            log::debug!("[NAV] already on {}, not reloading", path);
            return;
        }
        if let Err(err) = location.set_href(path) {
            log::error!("[NAV] redirect to {} failed: {:?}", path, err);
        }
    }
}

fn current_browser_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// In-app navigation state provided via context
#[derive(Clone, Copy)]
pub struct RouterContext {
    pub current: ReadSignal<Route>,
    set_current: WriteSignal<Route>,
}

impl RouterContext {
    /// Read the initial route and follow back/forward navigation
    pub fn install() -> Self {
        let (current, set_current) = signal(Route::parse(&current_browser_path()));

        let on_popstate = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(move |_ev: web_sys::PopStateEvent| {
            set_current.try_set(Route::parse(&current_browser_path()));
        });
        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
        }
        // The router lives as long as the page
        on_popstate.forget();

        Self { current, set_current }
    }

    pub fn navigate(&self, route: Route) {
        self.update_history(&route, false);
        self.set_current.set(route);
    }

    /// Navigate without adding a history entry (used for guard redirects)
    pub fn replace(&self, route: Route) {
        self.update_history(&route, true);
        self.set_current.set(route);
    }

    fn update_history(&self, route: &Route, replace: bool) {
        let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
            return;
        };
        let path = route.path();
        let result = if replace {
            history.replace_state_with_url(&JsValue::NULL, "", Some(&path))
        } else {
            history.push_state_with_url(&JsValue::NULL, "", Some(&path))
        };
        if let Err(err) = result {
            log::warn!("[NAV] history update to {} failed: {:?}", path, err);
        }
    }
}

pub fn use_router() -> RouterContext {
    expect_context::<RouterContext>()
}

/// Anchor that navigates inside the app
#[component]
pub fn AppLink(
    to: Route,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.path();
    view! {
        <a
            href=href
            class=class
            on:click=move |ev: web_sys::MouseEvent| {
                // Let modified clicks open new tabs
                if ev.ctrl_key() || ev.meta_key() || ev.shift_key() {
                    return;
                }
                ev.prevent_default();
                router.navigate(to.clone());
            }
        >
            {children()}
        </a>
    }
}
