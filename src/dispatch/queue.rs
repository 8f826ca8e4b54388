use std::collections::VecDeque;

use crate::tx::Transaction;

/// Hard cap on pending transactions.
pub const QUEUE_CAP: usize = 5_000;
/// Minimum number of oldest entries evicted on overflow.
pub const QUEUE_TRIM: usize = 500;

/// FIFO of transactions waiting for a beat.
///
/// Overflow is handled by bulk eviction: when a push takes the queue past
/// `QUEUE_CAP`, the oldest entries are dropped in one go so that only the
/// newest `QUEUE_CAP - QUEUE_TRIM` remain.
#[derive(Debug, Default)]
pub struct PendingQueue {
    items: VecDeque<Transaction>,
    dropped: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(QUEUE_CAP + 1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, tx: Transaction) {
        self.items.push_back(tx);
        if self.items.len() > QUEUE_CAP {
            let trim = self.items.len() - (QUEUE_CAP - QUEUE_TRIM);
            self.items.drain(..trim);
            self.dropped += trim as u64;
            tracing::debug!(trimmed = trim, remaining = self.items.len(), "pending queue overflow");
        }
    }

    /// Oldest pending transaction.
    pub fn pop(&mut self) -> Option<Transaction> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total transactions evicted by overflow this session.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn front(&self) -> Option<&Transaction> {
        self.items.front()
    }

    pub fn back(&self) -> Option<&Transaction> {
        self.items.back()
    }

    /// Replace contents wholesale, bypassing the cap. Test setup only.
    #[cfg(test)]
    pub(crate) fn fill_unchecked(&mut self, items: impl IntoIterator<Item = Transaction>) {
        self.items.extend(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(n: usize) -> Transaction {
        Transaction::new(format!("tx{n}"), n as u64, 1.0)
    }

    #[test]
    fn fifo_order() {
        let mut queue = PendingQueue::new();
        queue.push(tx(1));
        queue.push(tx(2));
        assert_eq!(queue.pop().map(|t| t.id), Some("tx1".to_string()));
        assert_eq!(queue.pop().map(|t| t.id), Some("tx2".to_string()));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn never_exceeds_cap() {
        let mut queue = PendingQueue::new();
        for n in 0..12_000 {
            queue.push(tx(n));
            assert!(queue.len() <= QUEUE_CAP);
        }
    }

    #[test]
    fn overflow_bulk_evicts_oldest() {
        let mut queue = PendingQueue::new();
        for n in 0..QUEUE_CAP {
            queue.push(tx(n));
        }
        assert_eq!(queue.len(), QUEUE_CAP);

        queue.push(tx(QUEUE_CAP));
        assert_eq!(queue.len(), QUEUE_CAP - QUEUE_TRIM);
        assert_eq!(queue.front().map(|t| t.id.as_str()), Some("tx501"));
        assert_eq!(queue.back().map(|t| t.id.as_str()), Some("tx5000"));
        assert_eq!(queue.dropped(), QUEUE_TRIM as u64 + 1);
    }

    #[test]
    fn oversized_backlog_trims_once_per_push() {
        let mut queue = PendingQueue::new();
        queue.fill_unchecked((0..5_200).map(tx));

        queue.push(tx(99_999));
        assert!(queue.len() <= 4_700);
        // the 500 oldest of the original backlog are gone
        let oldest: usize = queue.front().map(|t| t.id[2..].parse().unwrap()).unwrap();
        assert!(oldest >= 500);
        assert_eq!(queue.back().map(|t| t.id.as_str()), Some("tx99999"));
    }
}
