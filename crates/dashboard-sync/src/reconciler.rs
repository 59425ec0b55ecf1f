//! Trade log reconciliation.

use dashboard_core::Trade;

/// Result of comparing a freshly fetched trade log with the known one.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Always the fetched list; it replaces the previous one wholesale.
    pub next: Vec<Trade>,
    /// Whether positions must be re-fetched.
    pub positions_dirty: bool,
}

/// Compare two trade logs.
///
/// Positions only need a refresh when the number of trades changed. A status
/// change of an existing trade keeps the length and does not trigger one.
pub fn reconcile(previous: &[Trade], fetched: Vec<Trade>) -> Reconciliation {
    let positions_dirty = previous.len() != fetched.len();
    Reconciliation {
        next: fetched,
        positions_dirty,
    }
}

/// Holds the last committed trade log.
#[derive(Debug, Clone, Default)]
pub struct TradeLogReconciler {
    known: Vec<Trade>,
}

impl TradeLogReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known(&self) -> &[Trade] {
        &self.known
    }

    /// Compare `fetched` against the committed log without changing it.
    pub fn reconcile(&self, fetched: Vec<Trade>) -> Reconciliation {
        reconcile(&self.known, fetched)
    }

    /// Make `trades` the known log.
    pub fn commit(&mut self, trades: Vec<Trade>) {
        self.known = trades;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::trades;
    use dashboard_core::TradeStatus;

    #[test]
    fn test_length_change_marks_positions_dirty() {
        let previous = trades(4);
        let outcome = reconcile(&previous, trades(5));
        assert!(outcome.positions_dirty);
        assert_eq!(outcome.next.len(), 5);

        let shrunk = reconcile(&previous, trades(3));
        assert!(shrunk.positions_dirty);
    }

    #[test]
    fn test_status_change_keeps_positions_clean() {
        let previous = trades(4);
        let mut fetched = trades(4);
        fetched[0].status = TradeStatus::Filled;

        let outcome = reconcile(&previous, fetched.clone());
        assert!(!outcome.positions_dirty);
        assert_eq!(outcome.next, fetched);
    }

    #[test]
    fn test_first_fetch_against_empty_log() {
        let reconciler = TradeLogReconciler::new();
        assert!(reconciler.reconcile(trades(2)).positions_dirty);
        assert!(!reconciler.reconcile(Vec::new()).positions_dirty);
    }

    #[test]
    fn test_reconcile_does_not_commit() {
        let mut reconciler = TradeLogReconciler::new();
        let outcome = reconciler.reconcile(trades(3));
        assert!(reconciler.known().is_empty());

        reconciler.commit(outcome.next);
        assert_eq!(reconciler.known().len(), 3);
        assert!(!reconciler.reconcile(trades(3)).positions_dirty);
    }
}
