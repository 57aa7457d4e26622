//! Deadline queue for delayed continuations.
//!
//! Each pending continuation carries the seconds left until it fires. The
//! owner advances the queue by `dt` once per tick, every entry counts down
//! by that amount, and the tasks that reached zero come back earliest
//! first. No absolute clock is kept, so precision does not decay over a
//! long session. Cancelling is plain removal from the queue, so a
//! cancelled task can never fire.

use crate::constants::TIME_EPSILON;

/// Identifies one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    handle: TaskHandle,
    remaining: f32,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue `task` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let delay = if delay > 0.0 { delay } else { 0.0 };
        self.entries.push(Entry {
            handle,
            remaining: delay,
            task,
        });
        handle
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let idx = self.entries.iter().position(|e| e.handle == handle)?;
        Some(self.entries.remove(idx).task)
    }

    /// Remove every pending task matching `pred`, returning how many were removed
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.task));
        before - self.entries.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn contains(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.task)
    }

    /// Seconds until `handle` fires, if it is still queued
    pub fn time_left(&self, handle: TaskHandle) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.remaining.max(0.0))
    }

    /// Move time forward and drain every due task, ordered by how far past
    /// due it is and then by scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        if dt > 0.0 {
            for entry in &mut self.entries {
                entry.remaining -= dt;
            }
        }

        let mut due: Vec<Entry<T>> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].remaining <= TIME_EPSILON {
                due.push(self.entries.remove(i));
            } else {
                i += 1;
            }
        }

        due.sort_by(|a, b| {
            a.remaining
                .total_cmp(&b.remaining)
                .then_with(|| a.handle.cmp(&b.handle))
        });
        due.into_iter().map(|e| e.task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_deadline() {
        let mut s = Scheduler::new();
        s.schedule(0.3, "a");
        assert!(s.advance(0.2).is_empty());
        assert_eq!(s.advance(0.1), vec!["a"]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_due_order_by_deadline() {
        let mut s = Scheduler::new();
        s.schedule(0.5, "late");
        s.schedule(0.1, "early");
        s.schedule(0.1, "early-second");
        assert_eq!(s.advance(1.0), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_cancel_removes_task() {
        let mut s = Scheduler::new();
        let h = s.schedule(0.1, 1);
        s.schedule(0.1, 2);
        assert_eq!(s.cancel(h), Some(1));
        assert!(!s.contains(h));
        assert_eq!(s.advance(0.2), vec![2]);
        assert_eq!(s.cancel(h), None);
    }

    #[test]
    fn test_cancel_where() {
        let mut s = Scheduler::new();
        for i in 0..6 {
            s.schedule(0.1, i);
        }
        assert_eq!(s.cancel_where(|t| t % 2 == 0), 3);
        assert_eq!(s.advance(1.0), vec![1, 3, 5]);
    }

    #[test]
    fn test_cancel_all() {
        let mut s = Scheduler::new();
        s.schedule(0.1, ());
        s.schedule(0.2, ());
        assert_eq!(s.cancel_all(), 2);
        assert!(s.advance(10.0).is_empty());
    }

    #[test]
    fn test_time_left() {
        let mut s = Scheduler::new();
        let h = s.schedule(1.0, ());
        s.advance(0.25);
        let left = s.time_left(h).unwrap();
        assert!((left - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_precision_holds_after_long_session() {
        let mut s = Scheduler::new();
        // Six simulated days, past where an absolute f32 clock stops advancing
        s.schedule(1.0e9, "idle");
        for _ in 0..1000 {
            s.advance(600.0);
        }

        s.schedule(0.5, "phase");
        let mut fired_at = None;
        for tick in 1..=40 {
            if s.advance(1.0 / 60.0).contains(&"phase") {
                fired_at = Some(tick);
                break;
            }
        }
        assert_eq!(fired_at, Some(30));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_zero_delay_fires_next_advance() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 'x');
        assert_eq!(s.advance(0.0), vec!['x']);
    }
}
