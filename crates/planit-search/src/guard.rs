//! Latest-request-wins guard for superseded queries.
//!
//! Each new request takes a ticket. A response is only accepted when its
//! ticket is still the newest one issued, so a slow stale query can finish
//! without overwriting the result of a newer one. In-flight work is not
//! cancelled.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

#[derive(Debug, Default)]
pub struct RequestGuard {
    latest: AtomicU64,
}

impl RequestGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket newer than every ticket issued so far.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// `Some(value)` if `ticket` is still current, otherwise `None`.
    pub fn accept<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn newer_ticket_supersedes_older() {
        let guard = RequestGuard::new();
        let first = guard.begin();
        let second = guard.begin();
        assert!(second > first);
        assert_eq!(guard.accept(first, "stale"), None);
        assert_eq!(guard.accept(second, "fresh"), Some("fresh"));
    }

    #[tokio::test]
    async fn slow_stale_response_is_dropped() {
        let guard = Arc::new(RequestGuard::new());

        let slow = {
            let guard = Arc::clone(&guard);
            let ticket = guard.begin();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                guard.accept(ticket, "calc")
            })
        };
        let fast = {
            let guard = Arc::clone(&guard);
            let ticket = guard.begin();
            tokio::spawn(async move { guard.accept(ticket, "calculus") })
        };

        assert_eq!(fast.await.unwrap(), Some("calculus"));
        assert_eq!(slow.await.unwrap(), None);
    }
}
