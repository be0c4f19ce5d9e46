//! Optimistic Updates
//!
//! A local change applied before the server confirms it, with an explicit
//! pending → committed | rolled-back lifecycle.

use crate::models::{Board, Feedback};

/// Anything kept in a collection and replaced by id
pub trait Entity: Clone {
    fn id(&self) -> u32;
}

impl Entity for Feedback {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Entity for Board {
    fn id(&self) -> u32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T> {
    Pending { original: T, optimistic: T },
    Committed(T),
    RolledBack(T),
}

impl<T: Entity> Mutation<T> {
    /// Start a mutation; `change` edits a copy of `original`
    pub fn begin(original: &T, change: impl FnOnce(&mut T)) -> Self {
        let mut optimistic = original.clone();
        change(&mut optimistic);
        Mutation::Pending {
            original: original.clone(),
            optimistic,
        }
    }

    /// The copy that should be displayed now
    pub fn current(&self) -> &T {
        match self {
            Mutation::Pending { optimistic, .. } => optimistic,
            Mutation::Committed(value) | Mutation::RolledBack(value) => value,
        }
    }

    /// Server accepted the change; its copy becomes authoritative.
    /// Settled mutations are left unchanged.
    pub fn commit(self, server: T) -> Self {
        match self {
            Mutation::Pending { .. } => Mutation::Committed(server),
            settled => settled,
        }
    }

    /// Server refused the change; restore the pre-mutation copy
    pub fn rollback(self) -> Self {
        match self {
            Mutation::Pending { original, .. } => Mutation::RolledBack(original),
            settled => settled,
        }
    }
}

/// Returns false when no item has the value's id
pub fn replace_by_id<T: Entity>(items: &mut [T], value: T) -> bool {
    match items.iter_mut().find(|item| item.id() == value.id()) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::sample_feedback;
    use crate::models::Status;

    #[test]
    fn test_commit_takes_server_copy() {
        let item = sample_feedback(1, 2, Status::Open);
        let mutation = Mutation::begin(&item, |f| f.status = Status::InProgress);
        assert!(matches!(mutation, Mutation::Pending { .. }));
        assert_eq!(mutation.current().status, Status::InProgress);

        let mut server = item.clone();
        server.status = Status::InProgress;
        server.comment_count = 4;
        let mutation = mutation.commit(server.clone());

        assert_eq!(mutation, Mutation::Committed(server));
    }

    #[test]
    fn test_rollback_restores_original() {
        let item = sample_feedback(1, 2, Status::Open);
        let mutation = Mutation::begin(&item, |f| f.status = Status::Rejected).rollback();
        assert_eq!(mutation, Mutation::RolledBack(item.clone()));

        // settled mutations ignore late results
        let mutation = mutation.commit(sample_feedback(1, 2, Status::Completed));
        assert_eq!(mutation.current(), &item);
    }

    #[test]
    fn test_apply_replaces_by_id() {
        let mut items = vec![
            sample_feedback(1, 2, Status::Open),
            sample_feedback(2, 2, Status::Open),
        ];
        let mutation = Mutation::begin(&items[1], |f| f.status = Status::Completed);

        assert!(replace_by_id(&mut items, mutation.current().clone()));
        assert_eq!(items[0].status, Status::Open);
        assert_eq!(items[1].status, Status::Completed);

        let stray = Mutation::begin(&sample_feedback(9, 2, Status::Open), |_| {});
        assert!(!replace_by_id(&mut items, stray.current().clone()));
    }
}
