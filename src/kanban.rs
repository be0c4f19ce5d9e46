//! Kanban Rules
//!
//! Who may drag which card, how a drop is planned, and what to tell the
//! user when the server refuses a move.

use leptos_dragdrop::exceeds_threshold;

use crate::api::ApiError;
use crate::models::{Feedback, Role, Status, User};

pub const DRAG_DENIED_MESSAGE: &str = "You can only move your own feedback";

/// Authors move their own cards; admins and moderators move any card
pub fn can_drag(user: &User, item: &Feedback) -> bool {
    user.role.is_elevated() || item.author_id() == user.id
}

/// Items per status column, in workflow order
pub fn group_by_status(items: &[Feedback]) -> Vec<(Status, Vec<Feedback>)> {
    Status::ALL
        .into_iter()
        .map(|status| {
            let column = items.iter().filter(|item| item.status == status).cloned().collect();
            (status, column)
        })
        .collect()
}

/// A left-button press on a card the user may not move. Clicks and text
/// selection stay quiet; the press only counts once it turns into a drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeniedDrag {
    start: Option<(i32, i32)>,
}

impl DeniedDrag {
    pub fn press(&mut self, button: i16, at: (i32, i32)) {
        if button == 0 {
            self.start = Some(at);
        }
    }

    /// True once per press, when the pointer passes the drag threshold
    pub fn moved(&mut self, at: (i32, i32)) -> bool {
        match self.start {
            Some(start) if exceeds_threshold(start, at) => {
                self.start = None;
                true
            }
            _ => false,
        }
    }

    pub fn release(&mut self) {
        self.start = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    /// Dropped back on its own column
    Unchanged,
    Move { id: u32, from: Status, to: Status },
}

/// `None` when the item is not in the list
pub fn plan_drop(items: &[Feedback], id: u32, target: Status) -> Option<DropPlan> {
    let item = items.iter().find(|item| item.id == id)?;
    if item.status == target {
        Some(DropPlan::Unchanged)
    } else {
        Some(DropPlan::Move {
            id,
            from: item.status,
            to: target,
        })
    }
}

/// Message shown after a failed move
pub fn move_failure_message(err: &ApiError, role: Role) -> String {
    if err.is_forbidden() {
        if role.is_elevated() {
            "Permission denied: the server refused this status change.".to_string()
        } else {
            "Permission denied: contributors can only change the status of their own feedback.".to_string()
        }
    } else if err.is_not_found() {
        "This feedback item no longer exists. Refresh the board.".to_string()
    } else {
        "Failed to update status. Please try again.".to_string()
    }
}
