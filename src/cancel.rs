//! Request Cancellation
//!
//! Fetches take a ticket; only the newest ticket may apply its response.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct LatestRequest {
    generation: Rc<Cell<u64>>,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersedes every earlier ticket
    pub fn begin(&self) -> Ticket {
        let id = self.generation.get() + 1;
        self.generation.set(id);
        Ticket {
            id,
            generation: self.generation.clone(),
        }
    }

    /// Invalidate all outstanding tickets (component unmounted)
    pub fn cancel_all(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    generation: Rc<Cell<u64>>,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.generation.get() == self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let latest = LatestRequest::new();
        let first = latest.begin();
        assert!(first.is_current());

        let second = latest.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn test_cancel_all() {
        let latest = LatestRequest::new();
        let ticket = latest.begin();
        latest.cancel_all();
        assert!(!ticket.is_current());
        assert!(latest.begin().is_current());
    }
}
