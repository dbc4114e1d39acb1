use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::ui_event::UiEvent;

/// Unbounded FIFO between the producer thread and UI consumers.
///
/// This is the only synchronization point the pipeline needs: `push` never
/// blocks, so a slow consumer cannot starve the producer. Consumers poll with
/// [`EventQueue::pop_timeout`] and must pair emptiness with an explicit
/// completion signal; an empty read alone is transient, not terminal.
#[derive(Debug, Default)]
pub struct EventQueue {
    items: Mutex<VecDeque<UiEvent>>,
    ready: Condvar,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<UiEvent>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, event: UiEvent) {
        self.lock().push_back(event);
        self.ready.notify_one();
    }

    pub fn try_pop(&self) -> Option<UiEvent> {
        self.lock().pop_front()
    }

    /// Blocks up to `timeout` for the next event. `None` means only that the
    /// queue was empty for the whole window.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<UiEvent> {
        let deadline = Instant::now() + timeout;
        let mut items = self.lock();
        loop {
            if let Some(event) = items.pop_front() {
                return Some(event);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .ready
                .wait_timeout(items, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            items = guard;
        }
    }

    /// Discards everything queued right now and reports how many items went.
    /// A producer racing new pushes is fine; those land after the drain.
    pub fn drain(&self) -> usize {
        let mut items = self.lock();
        let drained = items.len();
        items.clear();
        drained
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn delta(text: &str) -> UiEvent {
        UiEvent::TextDelta {
            data: text.to_string(),
            text: text.to_string(),
            agent: None,
            accumulated_text: None,
        }
    }

    #[test]
    fn pops_in_fifo_order() {
        let queue = EventQueue::new();
        queue.push(delta("a"));
        queue.push(delta("b"));

        assert_eq!(queue.try_pop(), Some(delta("a")));
        assert_eq!(queue.try_pop(), Some(delta("b")));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn pop_timeout_expires_on_an_empty_queue() {
        let queue = EventQueue::new();
        let started = Instant::now();
        assert!(queue.pop_timeout(Duration::from_millis(20)).is_none());
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn pop_timeout_wakes_for_a_cross_thread_push() {
        let queue = Arc::new(EventQueue::new());
        let producer = Arc::clone(&queue);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            producer.push(delta("late"));
        });

        let event = queue.pop_timeout(Duration::from_secs(2));
        handle.join().unwrap();
        assert_eq!(event, Some(delta("late")));
    }

    #[test]
    fn drain_clears_and_counts() {
        let queue = EventQueue::new();
        queue.push(delta("a"));
        queue.push(delta("b"));
        assert_eq!(queue.drain(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.drain(), 0);
    }
}
