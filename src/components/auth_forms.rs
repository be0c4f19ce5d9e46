//! Login and Register Pages

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{use_app, FlashKind};
use crate::forms::check_registration;
use crate::models::RegisterForm;
use crate::router::{use_router, AppLink, Route};
use crate::session::AuthOutcome;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let name = username.get_untracked();
        let pass = password.get_untracked();
        if name.trim().is_empty() || pass.is_empty() {
            set_error.set(Some("Enter your username and password".to_string()));
            return;
        }
        set_error.set(None);
        set_submitting.set(true);
        let session = ctx.session();
        spawn_local(async move {
            match session.login(&name, &pass).await {
                AuthOutcome::Success(_) => router.navigate(Route::Dashboard),
                AuthOutcome::Failure(message) => {
                    set_error.try_set(Some(message));
                }
            }
            set_submitting.try_set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Sign in"</h1>
                {move || error.get().map(|message| view! { <div class="form-error">{message}</div> })}
                <label for="login-username">"Username"</label>
                <input
                    id="login-username"
                    type="text"
                    autocomplete="username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
                <label for="login-password">"Password"</label>
                <input
                    id="login-password"
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>
                <p class="auth-switch">
                    "No account? "
                    <AppLink to=Route::Register>"Register"</AppLink>
                </p>
            </form>
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_app();
    let router = use_router();

    let form = RwSignal::new(RegisterForm::default());
    let (confirm, set_confirm) = signal(String::new());
    let (errors, set_errors) = signal(Vec::<String>::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let data = form.get_untracked();
        if let Err(fields) = check_registration(&data, &confirm.get_untracked()) {
            set_errors.set(fields.lines());
            return;
        }
        set_errors.set(Vec::new());
        set_submitting.set(true);
        let session = ctx.session();
        spawn_local(async move {
            match session.register(&data).await {
                AuthOutcome::Success(user) => {
                    ctx.notify(FlashKind::Success, format!("Welcome, {}!", user.username));
                    router.navigate(Route::Dashboard);
                }
                AuthOutcome::Failure(message) => {
                    set_errors.try_set(message.lines().map(str::to_string).collect());
                }
            }
            set_submitting.try_set(false);
        });
    };

    let field = move |id: &'static str, label: &'static str, kind: &'static str, get: fn(&RegisterForm) -> String, set: fn(&mut RegisterForm, String)| {
        view! {
            <label for=id>{label}</label>
            <input
                id=id
                type=kind
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        }
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Create account"</h1>
                <Show when=move || !errors.get().is_empty()>
                    <ul class="form-error">
                        {move || errors.get().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                    </ul>
                </Show>
                {field("register-username", "Username", "text", |f| f.username.clone(), |f, v| f.username = v)}
                {field("register-email", "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                {field("register-first-name", "First name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
                {field("register-last-name", "Last name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
                {field("register-password", "Password", "password", |f| f.password.clone(), |f, v| f.password = v)}
                <label for="register-confirm">"Confirm password"</label>
                <input
                    id="register-confirm"
                    type="password"
                    prop:value=move || confirm.get()
                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Creating account..." } else { "Register" }}
                </button>
                <p class="auth-switch">
                    "Already registered? "
                    <AppLink to=Route::Login>"Sign in"</AppLink>
                </p>
            </form>
        </div>
    }
}
