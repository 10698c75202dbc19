use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

/// Hands out increasing tickets so a slow, superseded query cannot overwrite
/// the results of a newer one.
#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: AtomicU64,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Awaits `fut` and keeps its output only if `ticket` is still the latest.
    /// Issue the ticket when the query is submitted, not when it is polled,
    /// so scheduling order cannot reorder queries.
    pub async fn run_latest<F, T>(&self, ticket: QueryTicket, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let out = fut.await;
        if self.is_current(ticket) {
            Some(out)
        } else {
            tracing::debug!(?ticket, "discarding stale query result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn only_the_latest_ticket_is_current() {
        let seq = QuerySequencer::new();
        let first = seq.issue();
        assert!(seq.is_current(first));
        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(second > first);
    }

    #[tokio::test]
    async fn slow_stale_query_is_discarded() {
        let seq = QuerySequencer::new();
        let slow = seq.run_latest(seq.issue(), async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            "old"
        });
        let fast = seq.run_latest(seq.issue(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            "new"
        });

        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(slow, None);
        assert_eq!(fast, Some("new"));
    }

    #[tokio::test]
    async fn submission_order_wins_when_the_newer_query_is_polled_first() {
        let seq = QuerySequencer::new();
        let older = seq.run_latest(seq.issue(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            "old"
        });
        let newer = seq.run_latest(seq.issue(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            "new"
        });

        // join! polls its arguments in order, so the newer query starts first.
        let (newer, older) = tokio::join!(newer, older);
        assert_eq!(newer, Some("new"));
        assert_eq!(older, None);
    }
}
