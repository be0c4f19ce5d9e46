//! Delete Confirm Button Component
//!
//! Two-step destructive action: the first click asks, the second acts.

use leptos::prelude::*;

/// Inline confirmation for boards and comments
///
/// * `label` - text of the initial button
/// * `prompt` - question shown while confirming (defaults to "Delete?")
/// * `on_confirm` - runs once the user answers "Yes"
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] label: String,
    #[prop(into, optional)] prompt: Option<String>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let asking = RwSignal::new(false);
    let prompt = prompt.unwrap_or_else(|| "Delete?".to_string());

    move || {
        if asking.get() {
            view! {
                <span class="delete-confirm" role="group">
                    <span class="delete-confirm-text">{prompt.clone()}</span>
                    <button
                        class="btn btn-danger btn-small"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            asking.set(false);
                            on_confirm.run(());
                        }
                    >
                        "Yes"
                    </button>
                    <button
                        class="btn btn-secondary btn-small"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            asking.set(false);
                        }
                    >
                        "No"
                    </button>
                </span>
            }
            .into_any()
        } else {
            view! {
                <button
                    class="btn btn-danger"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        asking.set(true);
                    }
                >
                    {label.clone()}
                </button>
            }
            .into_any()
        }
    }
}
