use std::collections::VecDeque;

/// LIFO of pre-operation snapshots. Once popped a snapshot is gone; there is
/// no redo stack. Unbounded unless a limit is given.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotHistory<T> {
    undo_stack: VecDeque<T>,
    limit: Option<usize>,
}

impl<T> SnapshotHistory<T> {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            limit: limit.map(|limit| limit.max(1)),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self::new(Some(limit))
    }

    /// Pushes a checkpoint. With a limit set, the oldest one is dropped when
    /// the stack is full.
    pub fn push(&mut self, snapshot: T) {
        if let Some(limit) = self.limit {
            if self.undo_stack.len() >= limit {
                self.undo_stack.pop_front();
                tracing::debug!(limit, "undo history full, dropped oldest snapshot");
            }
        }
        self.undo_stack.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.undo_stack.pop_back()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
    }
}

impl<T> Default for SnapshotHistory<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::model::Color;
    use crate::canvas::raster::CanvasSnapshot;

    fn snapshot(shade: u8) -> CanvasSnapshot {
        CanvasSnapshot::new(2, 2, Color::rgb(shade, shade, shade))
    }

    #[test]
    fn pop_returns_snapshots_in_reverse_order() {
        let mut history = SnapshotHistory::default();
        history.push(snapshot(1));
        history.push(snapshot(2));

        assert_eq!(history.pop(), Some(snapshot(2)));
        assert_eq!(history.pop(), Some(snapshot(1)));
        assert_eq!(history.pop(), None);
        assert!(history.is_empty());
    }

    #[test]
    fn default_history_keeps_every_snapshot() {
        let mut history = SnapshotHistory::default();
        for shade in 0..120 {
            history.push(snapshot(shade));
        }
        assert_eq!(history.limit(), None);
        assert_eq!(history.len(), 120);
        assert_eq!(history.pop(), Some(snapshot(119)));
    }

    #[test]
    fn limited_history_drops_oldest_snapshot() {
        let mut history = SnapshotHistory::with_limit(2);
        history.push(snapshot(1));
        history.push(snapshot(2));
        history.push(snapshot(3));

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop(), Some(snapshot(3)));
        assert_eq!(history.pop(), Some(snapshot(2)));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn zero_limit_is_raised_to_one() {
        let mut history = SnapshotHistory::with_limit(0);
        history.push(snapshot(1));
        history.push(snapshot(2));
        assert_eq!(history.limit(), Some(1));
        assert_eq!(history.pop(), Some(snapshot(2)));
        assert_eq!(history.pop(), None);
    }
}
