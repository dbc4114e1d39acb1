use std::sync::Arc;
use std::time::Duration;

use crate::driver::is_sentinel;
use crate::queue::EventQueue;
use crate::ui_event::UiEvent;

/// Async twin of the synchronous polling consumer.
///
/// Same discipline as [`crate::EventStream`]: short non-blocking polls, and
/// emptiness only ends the stream after the completion sentinel has been
/// seen. The sentinel itself is consumed, never yielded.
pub struct AsyncEventStream {
    queue: Arc<EventQueue>,
    poll_interval: Duration,
    finished: bool,
}

impl AsyncEventStream {
    pub fn new(queue: Arc<EventQueue>) -> Self {
        Self::with_poll_interval(queue, Duration::from_millis(100))
    }

    pub fn with_poll_interval(queue: Arc<EventQueue>, poll_interval: Duration) -> Self {
        Self {
            queue,
            poll_interval,
            finished: false,
        }
    }

    /// Next event, or `None` once the producer signalled completion and the
    /// queue is dry.
    pub async fn next_event(&mut self) -> Option<UiEvent> {
        loop {
            if let Some(event) = self.queue.try_pop() {
                if is_sentinel(&event) {
                    self.finished = true;
                    continue;
                }
                return Some(event);
            }
            if self.finished {
                return None;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::completion_sentinel;

    fn delta(text: &str) -> UiEvent {
        UiEvent::TextDelta {
            data: text.to_string(),
            text: text.to_string(),
            agent: None,
            accumulated_text: None,
        }
    }

    #[tokio::test]
    async fn drains_cross_thread_events_then_ends_on_the_sentinel() {
        let queue = Arc::new(EventQueue::new());
        let producer = Arc::clone(&queue);
        let handle = std::thread::spawn(move || {
            producer.push(delta("a"));
            producer.push(delta("b"));
            producer.push(completion_sentinel());
        });

        let mut stream =
            AsyncEventStream::with_poll_interval(Arc::clone(&queue), Duration::from_millis(5));
        let mut seen = Vec::new();
        while let Some(event) = stream.next_event().await {
            seen.push(event);
        }
        handle.join().unwrap();

        assert_eq!(seen, vec![delta("a"), delta("b")]);
    }

    #[tokio::test]
    async fn events_behind_the_sentinel_are_not_lost() {
        let queue = Arc::new(EventQueue::new());
        queue.push(completion_sentinel());
        queue.push(delta("straggler"));

        let mut stream =
            AsyncEventStream::with_poll_interval(Arc::clone(&queue), Duration::from_millis(5));
        assert_eq!(stream.next_event().await, Some(delta("straggler")));
        assert_eq!(stream.next_event().await, None);
    }
}
