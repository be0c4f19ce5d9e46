//! FeedbackHub Frontend Entry Point

mod actions;
mod analytics;
mod api;
mod app;
mod cancel;
mod components;
mod config;
mod context;
mod forms;
mod kanban;
mod markdown;
mod models;
mod optimistic;
mod router;
mod session;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;
use rolling_logger::LoggerConfig;

fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    if rolling_logger::init(LoggerConfig { level, ..Default::default() }).is_err() {
        web_sys::console::warn_1(&"logger already installed".into());
    }
    mount_to_body(App);
}
