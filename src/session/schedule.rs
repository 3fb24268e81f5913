use std::time::Duration;

use crate::engine::wheel::{SpinOutcome, SpinTicket};

/// Work the session has promised to do later.
#[derive(Clone, Debug, PartialEq)]
pub enum Deferred {
    /// Wheels come to rest; resolve the spin.
    WheelsStopped(SpinTicket),
    /// Show the resolved pick.
    Reveal(SpinOutcome),
    LoadSelection {
        category: String,
        question_number: u32,
    },
    Celebrate,
}

#[derive(Clone, Debug)]
struct Entry {
    at: Duration,
    seq: u64,
    action: Deferred,
}

/// Deadline-ordered queue of deferred session actions. Time is the session
/// clock, so nothing here depends on the wall clock.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Schedule {
    pub fn push(&mut self, at: Duration, action: Deferred) {
        self.entries.push(Entry {
            at,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.at).min()
    }

    /// Remove and return the earliest action due at or before `now`. Equal
    /// deadlines come out in insertion order.
    pub fn pop_due(&mut self, now: Duration) -> Option<Deferred> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.at <= now)
            .min_by_key(|(_, e)| (e.at, e.seq))
            .map(|(i, _)| i)?;
        Some(self.entries.swap_remove(idx).action)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop everything except pending celebrations.
    pub fn retain_celebrations(&mut self) {
        self.entries.retain(|e| matches!(e.action, Deferred::Celebrate));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
