//! Per-window event queues over a global arrival sequence.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::events::{Event, WindowTag};

/// Collects decoded events in arrival order and indexes them per window.
///
/// The global sequence number only ever grows; each window's index holds
/// sequence numbers in FIFO order. Removal walks the per-window list, which
/// is linear in queue depth — fine at per-frame event volumes.
pub struct EventHub {
    epoch: Instant,
    next_seq: u64,
    sequence: BTreeMap<u64, Event>,
    by_window: BTreeMap<WindowTag, Vec<u64>>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            next_seq: 0,
            sequence: BTreeMap::new(),
            by_window: BTreeMap::new(),
        }
    }

    /// Process-relative timestamp for events decoded now.
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Appends an event to the global sequence and its window's queue.
    pub fn push(&mut self, event: Event) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_window.entry(event.window).or_default().push(seq);
        self.sequence.insert(seq, event);
        seq
    }

    /// Returns up to `limit` events for `window` in FIFO order (0 means
    /// unlimited). Unless `retain` is set, returned events are removed from
    /// both the global sequence and the per-window index.
    pub fn pop_events(&mut self, window: WindowTag, limit: usize, retain: bool) -> Vec<Event> {
        let Some(queue) = self.by_window.get(&window) else {
            return Vec::new();
        };

        let take = if limit == 0 {
            queue.len()
        } else {
            limit.min(queue.len())
        };
        let picked: Vec<u64> = queue.iter().copied().take(take).collect();

        let mut popped = Vec::with_capacity(picked.len());
        if retain {
            for seq in &picked {
                if let Some(event) = self.sequence.get(seq) {
                    popped.push(event.clone());
                }
            }
        } else {
            for seq in &picked {
                if let Some(event) = self.sequence.remove(seq) {
                    popped.push(event);
                }
            }
            if let Some(queue) = self.by_window.get_mut(&window) {
                queue.retain(|seq| !picked.contains(seq));
                if queue.is_empty() {
                    self.by_window.remove(&window);
                }
            }
        }

        popped
    }

    /// Non-destructive snapshot of a window's pending events.
    pub fn events_for(&self, window: WindowTag) -> Vec<Event> {
        let Some(queue) = self.by_window.get(&window) else {
            return Vec::new();
        };
        queue
            .iter()
            .filter_map(|seq| self.sequence.get(seq))
            .cloned()
            .collect()
    }

    /// Drops everything queued for a window (used when it closes).
    pub fn forget_window(&mut self, window: WindowTag) {
        if let Some(queue) = self.by_window.remove(&window) {
            for seq in queue {
                self.sequence.remove(&seq);
            }
        }
    }

    /// Number of pending events across all windows.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
