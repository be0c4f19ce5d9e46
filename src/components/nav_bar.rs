//! Navigation Bar Component
//!
//! Top bar with role-dependent links, the signed-in user and logout.

use leptos::prelude::*;

use crate::context::use_app;
use crate::router::{use_router, AppLink, Route};

/// Links every signed-in user sees
const NAV_LINKS: [(Route, &str); 2] = [(Route::Dashboard, "Dashboard"), (Route::FeedbackList, "Feedback")];
/// Links for admins and moderators
const ELEVATED_LINKS: [(Route, &str); 2] = [(Route::Boards, "Boards"), (Route::CreateFeedback, "Create Feedback")];

/// Exact match or a sub-path (`/feedback/3` activates `/feedback`)
pub fn is_active(current: &str, link: &str) -> bool {
    current == link || current.starts_with(&format!("{}/", link))
}

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = use_app();
    let router = use_router();
    let (menu_open, set_menu_open) = signal(false);

    let links = move || {
        let mut links: Vec<(Route, &'static str)> = NAV_LINKS.to_vec();
        if ctx.is_elevated() {
            links.extend(ELEVATED_LINKS);
        }
        let current = router.current.get().path();
        links
            .into_iter()
            .map(|(route, label)| {
                let class = if is_active(&current, &route.path()) { "nav-link active" } else { "nav-link" };
                view! {
                    <span on:click=move |_| set_menu_open.set(false)>
                        <AppLink to=route class=class>{label}</AppLink>
                    </span>
                }
            })
            .collect_view()
    };

    let on_logout = move |_: web_sys::MouseEvent| {
        ctx.session().logout();
        router.navigate(Route::Login);
    };

    move || {
        ctx.current_user().map(|user| {
            let initial = user.username.chars().next().map(|c| c.to_ascii_uppercase()).unwrap_or('?');
            view! {
                <nav class="navbar">
                    <AppLink to=Route::Dashboard class="navbar-brand">"FeedbackHub"</AppLink>
                    <button class="navbar-toggle" on:click=move |_| set_menu_open.update(|open| *open = !*open)>
                        {move || if menu_open.get() { "×" } else { "☰" }}
                    </button>
                    <div class=move || if menu_open.get() { "navbar-links open" } else { "navbar-links" }>
                        {links}
                    </div>
                    <div class="navbar-user">
                        <span class="avatar">{initial.to_string()}</span>
                        <span class="username">{user.username.clone()}</span>
                        <span class="role">{user.role.as_str()}</span>
                        <button class="btn btn-secondary" on:click=on_logout>"Logout"</button>
                    </div>
                </nav>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_link_matching() {
        assert!(is_active("/feedback", "/feedback"));
        assert!(is_active("/feedback/12", "/feedback"));
        assert!(!is_active("/feedback-archive", "/feedback"));
        assert!(!is_active("/dashboard", "/feedback"));
    }
}
