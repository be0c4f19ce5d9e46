//! FeedbackHub App
//!
//! Builds the shared services, provides them via context and renders the
//! page for the current route once the session guard allows it.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::{ApiClient, HttpTransport};
use crate::components::{
    BoardManagement, CreateBoard, CreateFeedback, Dashboard, FeedbackDetails, FeedbackList, FlashBanner, LoginPage,
    NavBar, RegisterPage, Spinner,
};
use crate::config::ApiConfig;
use crate::context::AppContext;
use crate::router::{guard, AppLink, BrowserNavigator, Guard, Route, RouterContext};
use crate::session::SessionStore;
use crate::storage::{BrowserStorage, KeyValueStore, MemoryStore};
use crate::store::FeedbackState;

fn render_route(route: Route) -> AnyView {
    match route {
        Route::Login => view! { <LoginPage /> }.into_any(),
        Route::Register => view! { <RegisterPage /> }.into_any(),
        Route::Dashboard => view! { <Dashboard /> }.into_any(),
        Route::FeedbackList => view! { <FeedbackList /> }.into_any(),
        Route::FeedbackDetail(id) => view! { <FeedbackDetails id=id /> }.into_any(),
        Route::CreateFeedback => view! { <CreateFeedback /> }.into_any(),
        Route::Boards => view! { <BoardManagement /> }.into_any(),
        Route::CreateBoard => view! { <CreateBoard /> }.into_any(),
        // Root always redirects
        Route::Root | Route::NotFound => view! { <NotFound /> }.into_any(),
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"Page not found"</h1>
            <AppLink to=Route::Dashboard>"Go to the dashboard"</AppLink>
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    let storage: Rc<dyn KeyValueStore> = if BrowserStorage::available() {
        Rc::new(BrowserStorage)
    } else {
        log::warn!("[STORAGE] localStorage unavailable, session will not survive a reload");
        Rc::new(MemoryStore::new())
    };
    let config = ApiConfig::from_env();
    log::info!("[API] backend at {}", config.base_url());
    let api = ApiClient::new(config, Rc::new(HttpTransport::new()), storage, Rc::new(BrowserNavigator));
    let session = Rc::new(SessionStore::new(api.clone()));

    // Provide context to all children
    let ctx = AppContext::new(api, session.clone());
    provide_context(ctx);
    provide_context(Store::new(FeedbackState::default()));
    let router = RouterContext::install();
    provide_context(router);

    spawn_local(async move {
        session.bootstrap().await;
    });

    // Route and guard decision change together
    let decision = Memo::new(move |_| {
        let route = router.current.get();
        let decision = ctx.auth.with(|state| guard(&route, state));
        (route, decision)
    });

    Effect::new(move |_| {
        if let (from, Guard::Redirect(to)) = decision.get() {
            log::debug!("[NAV] {} -> {}", from.path(), to.path());
            router.replace(to);
        }
    });

    let page = move || match decision.get() {
        (route, Guard::Render) => render_route(route),
        (_, Guard::Wait | Guard::Redirect(_)) => view! { <Spinner /> }.into_any(),
    };

    view! {
        <div class="app-layout">
            <NavBar />
            <FlashBanner />
            <main class="main-content">{page}</main>
        </div>
    }
}
