//! Flash Banner Component
//!
//! Shows the context's current flash message until it times out or is dismissed.

use leptos::prelude::*;

use crate::context::{use_app, FlashKind};

#[component]
pub fn FlashBanner() -> impl IntoView {
    let ctx = use_app();

    move || {
        ctx.flash.get().map(|flash| {
            let class = match flash.kind {
                FlashKind::Success => "flash flash-success",
                FlashKind::Error => "flash flash-error",
            };
            view! {
                <div class=class role="alert">
                    <span class="flash-text">{flash.text}</span>
                    <button class="flash-close" on:click=move |_| ctx.dismiss_flash()>"×"</button>
                </div>
            }
        })
    }
}
