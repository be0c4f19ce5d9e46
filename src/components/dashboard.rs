//! Dashboard Component
//!
//! Summary cards, status breakdown, top voted and recent feedback,
//! and a 30-day submission trend.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::analytics::{most_recent, status_histogram, top_voted, trend_bars, DashboardStats, DASHBOARD_LIST_LEN};
use crate::components::badges::{Spinner, StatusBadge};
use crate::context::use_app;
use crate::models::{Board, Feedback, FeedbackFilters, Role, TrendPoint};
use crate::router::{AppLink, Route};

/// Header shortcuts; anyone may submit, only admins and moderators manage boards
fn quick_links(role: Option<Role>) -> Vec<(Route, &'static str, &'static str)> {
    let mut links = vec![
        (Route::FeedbackList, "Browse feedback", "btn btn-secondary"),
        (Route::CreateFeedback, "New feedback", "btn btn-primary"),
    ];
    if role.is_some_and(|role| role.is_elevated()) {
        links.push((Route::Boards, "Manage boards", "btn btn-secondary"));
    }
    links
}

#[derive(Debug, Clone, Default)]
struct Snapshot {
    items: Vec<Feedback>,
    boards: Vec<Board>,
    trends: Vec<TrendPoint>,
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_app();
    let (snapshot, set_snapshot) = signal::<Option<Snapshot>>(None);

    let api = ctx.api();
    spawn_local(async move {
        let filters = FeedbackFilters::default();
        let (items, boards, trends) = futures::join!(
            api.list_feedback(&filters),
            api.list_boards(),
            api.feedback_trends()
        );
        log::info!("[API] dashboard loaded {} items, {} boards", items.len(), boards.len());
        set_snapshot.try_set(Some(Snapshot { items, boards, trends }));
    });

    let greeting = move || {
        ctx.current_user()
            .map(|user| format!("Welcome back, {}", user.full_name.clone().filter(|n| !n.is_empty()).unwrap_or(user.username)))
            .unwrap_or_default()
    };

    view! {
        <div class="dashboard">
            <header class="page-header">
                <h1>{greeting}</h1>
                <div class="quick-links">
                    {move || {
                        quick_links(ctx.auth.with(|state| state.role()))
                            .into_iter()
                            .map(|(route, label, class)| view! { <AppLink to=route class=class>{label}</AppLink> })
                            .collect_view()
                    }}
                </div>
            </header>
            {move || match snapshot.get() {
                None => view! { <Spinner /> }.into_any(),
                Some(snapshot) => view! { <DashboardBody snapshot=snapshot /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn DashboardBody(snapshot: Snapshot) -> impl IntoView {
    let stats = DashboardStats::compute(&snapshot.items, &snapshot.boards);
    let histogram = status_histogram(&snapshot.items);
    let top = top_voted(&snapshot.items, DASHBOARD_LIST_LEN);
    let recent = most_recent(&snapshot.items, DASHBOARD_LIST_LEN);
    let bars = trend_bars(&snapshot.trends);
    let peak = histogram.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);

    let cards = [
        ("Total", stats.total),
        ("Active", stats.active),
        ("In progress", stats.in_progress),
        ("Under review", stats.under_review),
        ("Completed", stats.completed),
        ("Boards", stats.boards),
    ];

    view! {
        <section class="stat-cards">
            {cards.into_iter().map(|(label, value)| view! {
                <div class="stat-card">
                    <span class="stat-value">{value}</span>
                    <span class="stat-label">{label}</span>
                </div>
            }).collect_view()}
        </section>

        <section class="panel">
            <h2>"By status"</h2>
            <ul class="status-histogram">
                {histogram.into_iter().map(|(status, count)| {
                    let width = format!("width: {}%", count * 100 / peak);
                    view! {
                        <li>
                            <StatusBadge status=status />
                            <div class="bar"><div class="bar-fill" style=width></div></div>
                            <span class="count">{count}</span>
                        </li>
                    }
                }).collect_view()}
            </ul>
        </section>

        <div class="dashboard-columns">
            <FeedbackPanel title="Top voted" items=top empty="No votes yet" />
            <FeedbackPanel title="Recent" items=recent empty="No feedback yet" />
        </div>

        <section class="panel">
            <h2>"Last 30 days"</h2>
            {if bars.is_empty() {
                view! { <p class="empty">"No submissions in this period"</p> }.into_any()
            } else {
                view! {
                    <div class="trend-bars">
                        {bars.into_iter().map(|(point, height)| {
                            let title = format!("{}: {}", point.day.format("%b %d"), point.count);
                            view! {
                                <div class="trend-bar" title=title>
                                    <div class="trend-bar-fill" style=format!("height: {}%", height)></div>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_any()
            }}
        </section>
    }
}

#[component]
fn FeedbackPanel(title: &'static str, items: Vec<Feedback>, empty: &'static str) -> impl IntoView {
    view! {
        <section class="panel">
            <h2>{title}</h2>
            {if items.is_empty() {
                view! { <p class="empty">{empty}</p> }.into_any()
            } else {
                view! {
                    <ul class="feedback-summary">
                        {items.into_iter().map(|item| {
                            let item_title = item.title.clone();
                            view! {
                            <li>
                                <AppLink to=Route::FeedbackDetail(item.id)>{item_title}</AppLink>
                                <StatusBadge status=item.status />
                                <span class="votes">{format!("▲ {}", item.vote_count())}</span>
                                <span class="meta">{item.created_at.format("%Y-%m-%d").to_string()}</span>
                            </li>
                            }
                        }).collect_view()}
                    </ul>
                }.into_any()
            }}
        </section>
    }
}
