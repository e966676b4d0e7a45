use std::collections::VecDeque;

use tracing::trace;

use super::machine::MachineState;

/// Undo stack of pre-step machine states.
///
/// With a limit, pushing onto a full history evicts the oldest entry, so undo
/// reaches back at most `limit` steps.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<MachineState>,
    limit: Option<usize>,
    evicted: u64,
}

impl History {
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self { entries: VecDeque::new(), limit, evicted: 0 }
    }

    pub fn push(&mut self, state: MachineState) {
        if self.limit == Some(0) {
            self.evicted += 1;
            return;
        }
        if let Some(limit) = self.limit {
            while self.entries.len() >= limit {
                self.entries.pop_front();
                self.evicted += 1;
            }
        }
        self.entries.push_back(state);
        trace!(depth = self.entries.len(), "history push");
    }

    pub fn pop(&mut self) -> Option<MachineState> {
        self.entries.pop_back()
    }

    pub fn top(&self) -> Option<&MachineState> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of snapshots dropped because of the limit.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(step: u64) -> MachineState {
        let mut s = MachineState::new(1000, 0);
        s.step_count = step;
        s
    }

    #[test]
    fn lifo_order() {
        let mut h = History::with_limit(None);
        h.push(state(0));
        h.push(state(1));
        assert_eq!(h.top().map(|s| s.step_count), Some(1));
        assert_eq!(h.pop().map(|s| s.step_count), Some(1));
        assert_eq!(h.pop().map(|s| s.step_count), Some(0));
        assert!(h.pop().is_none());
    }

    #[test]
    fn limit_evicts_oldest() {
        let mut h = History::with_limit(Some(2));
        for i in 0..5 {
            h.push(state(i));
        }
        assert_eq!(h.len(), 2);
        assert_eq!(h.evicted(), 3);
        assert_eq!(h.pop().map(|s| s.step_count), Some(4));
        assert_eq!(h.pop().map(|s| s.step_count), Some(3));
        assert!(h.is_empty());
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut h = History::with_limit(Some(0));
        h.push(state(0));
        assert!(h.is_empty());
        assert_eq!(h.evicted(), 1);
    }
}
