//! Shared Collections Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{Board, Feedback};
use crate::optimistic::replace_by_id;

/// Collections shared between list, table, kanban and board views
#[derive(Clone, Debug, Default, Store)]
pub struct FeedbackState {
    /// Feedback matching the current list filters
    pub items: Vec<Feedback>,
    /// All boards visible to the user
    pub boards: Vec<Board>,
    /// Set while the feedback list is being fetched
    pub loading: bool,
}

pub type FeedbackStore = Store<FeedbackState>;

/// Get the store from context
pub fn use_feedback_store() -> FeedbackStore {
    expect_context::<FeedbackStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_items(store: &FeedbackStore, items: Vec<Feedback>) {
    store.items().set(items);
}

/// Replace a feedback item by ID (optimistic copies and server copies alike)
pub fn store_replace_item(store: &FeedbackStore, item: Feedback) {
    let id = item.id;
    if !replace_by_id(store.items().write().as_mut_slice(), item) {
        log::debug!("[STORE] feedback #{} not in current list", id);
    }
}

pub fn store_set_boards(store: &FeedbackStore, boards: Vec<Board>) {
    store.boards().set(boards);
}

pub fn store_replace_board(store: &FeedbackStore, board: Board) {
    replace_by_id(store.boards().write().as_mut_slice(), board);
}

pub fn store_remove_board(store: &FeedbackStore, board_id: u32) {
    store.boards().write().retain(|board| board.id != board_id);
}
