// Reverie Engine — Capped FIFO History
//
// Append-only ring of the most recent N entries. Oldest entries are evicted
// first so exactly `cap` entries remain once the history has filled up.
//
// Not internally synchronized. The service keeps its histories behind a
// single Mutex.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct CappedHistory<T> {
    entries: VecDeque<T>,
    cap: usize,
}

impl<T: Clone> CappedHistory<T> {
    /// A cap of zero is treated as one so the latest entry is always kept.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        CappedHistory { entries: VecDeque::with_capacity(cap.min(1024)), cap }
    }

    /// Append and evict from the front until within the cap.
    pub fn push(&mut self, entry: T) {
        self.entries.push_back(entry);
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    /// The last `limit` entries, oldest first.
    pub fn tail(&self, limit: usize) -> Vec<T> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
