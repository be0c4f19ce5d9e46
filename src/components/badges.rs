//! Status and priority badges

use leptos::prelude::*;

use crate::models::{Priority, Status};

pub fn status_class(status: Status) -> &'static str {
    match status {
        Status::Open => "badge badge-open",
        Status::InProgress => "badge badge-in-progress",
        Status::UnderReview => "badge badge-under-review",
        Status::Completed => "badge badge-completed",
        Status::Rejected => "badge badge-rejected",
    }
}

#[component]
pub fn StatusBadge(status: Status) -> impl IntoView {
    view! { <span class=status_class(status)>{status.label()}</span> }
}

#[component]
pub fn PriorityBadge(priority: Priority) -> impl IntoView {
    let class = format!("badge priority-{}", priority.as_str());
    view! { <span class=class>{priority.as_str().to_uppercase()}</span> }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! { <div class="spinner-wrapper"><div class="spinner"></div></div> }
}
