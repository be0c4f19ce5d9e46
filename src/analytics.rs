//! Dashboard Aggregates
//!
//! Stateless derivations over an already-fetched feedback snapshot.

use std::cmp::Reverse;

use crate::models::{Board, Feedback, Status, TrendPoint};

/// Items shown in the top-voted and recent lists
pub const DASHBOARD_LIST_LEN: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    /// Everything not completed
    pub active: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub under_review: usize,
    pub boards: usize,
}

impl DashboardStats {
    pub fn compute(items: &[Feedback], boards: &[Board]) -> Self {
        let count = |status: Status| items.iter().filter(|item| item.status == status).count();
        let completed = count(Status::Completed);
        Self {
            total: items.len(),
            active: items.len() - completed,
            completed,
            in_progress: count(Status::InProgress),
            under_review: count(Status::UnderReview),
            boards: boards.len(),
        }
    }
}

/// Count per status, every status present, in workflow order
pub fn status_histogram(items: &[Feedback]) -> Vec<(Status, usize)> {
    Status::ALL
        .into_iter()
        .map(|status| (status, items.iter().filter(|item| item.status == status).count()))
        .collect()
}

/// Highest vote counts first; ties go to the newer item
pub fn top_voted(items: &[Feedback], n: usize) -> Vec<Feedback> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| (Reverse(item.vote_count()), Reverse(item.created_at)));
    sorted.truncate(n);
    sorted
}

pub fn most_recent(items: &[Feedback], n: usize) -> Vec<Feedback> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| Reverse(item.created_at));
    sorted.truncate(n);
    sorted
}

/// One bar per trend day with its height as a percentage of the busiest day
pub fn trend_bars(points: &[TrendPoint]) -> Vec<(TrendPoint, u32)> {
    let peak = points.iter().map(|point| point.count).max().unwrap_or(0);
    points
        .iter()
        .map(|point| {
            let height = if peak == 0 { 0 } else { point.count * 100 / peak };
            (point.clone(), height)
        })
        .collect()
}
