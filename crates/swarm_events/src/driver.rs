use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::queue::EventQueue;
use crate::ui_event::UiEvent;

/// Internal queue marker separating "empty for now" from "producer done".
/// Consumers never see it; the stream swallows it.
pub const COMPLETION_SENTINEL: &str = "_swarm_complete";

#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// How long one queue poll may block before re-checking the producer.
    pub poll_interval: Duration,
    /// Upper bound on waiting for the producer thread at shutdown.
    pub join_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            join_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to spawn swarm producer thread")]
    Spawn(#[source] std::io::Error),
}

/// What the producer closure hands back: the final swarm result, or the
/// failure reason that becomes a `force_stop`.
pub type ProducerOutcome = Result<Value, String>;

pub(crate) fn completion_sentinel() -> UiEvent {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(COMPLETION_SENTINEL));
    UiEvent::Passthrough(map)
}

pub(crate) fn is_sentinel(event: &UiEvent) -> bool {
    matches!(
        event,
        UiEvent::Passthrough(map)
            if map.get("type").and_then(Value::as_str) == Some(COMPLETION_SENTINEL)
    )
}

/// Runs `producer` on a background thread and returns the live event stream.
///
/// The producer is expected to feed `queue` (usually through a
/// `SwarmEventAdapter` it owns) while it runs; the driver appends the
/// completion sentinel for it.
pub fn run_swarm<F>(
    queue: Arc<EventQueue>,
    producer: F,
    config: DriverConfig,
) -> Result<EventStream, DriverError>
where
    F: FnOnce() -> ProducerOutcome + Send + 'static,
{
    let sentinel_queue = Arc::clone(&queue);
    let handle = thread::Builder::new()
        .name("swarm-producer".to_string())
        .spawn(move || {
            let outcome = producer();
            sentinel_queue.push(completion_sentinel());
            outcome
        })
        .map_err(DriverError::Spawn)?;

    Ok(EventStream {
        queue,
        handle: Some(handle),
        config,
        stage: Stage::Starting,
    })
}

enum Stage {
    Starting,
    Streaming,
    Finished,
}

/// Iterator over a live swarm run.
///
/// Yields `start` first, then queue events as they arrive, and finishes with
/// exactly one terminal event: `complete` carrying the producer's result, or
/// `force_stop` carrying its failure reason. Emptiness alone never ends the
/// stream; only the producer being finished with the queue drained does.
pub struct EventStream {
    queue: Arc<EventQueue>,
    handle: Option<JoinHandle<ProducerOutcome>>,
    config: DriverConfig,
    stage: Stage,
}

impl EventStream {
    fn next_streamed(&mut self) -> Option<UiEvent> {
        loop {
            // Snapshot before polling so events pushed between the poll and
            // the check cannot be lost.
            let producer_done = self.handle.as_ref().map_or(true, JoinHandle::is_finished);
            match self.queue.pop_timeout(self.config.poll_interval) {
                Some(event) if is_sentinel(&event) => continue,
                Some(event) => return Some(event),
                None => {
                    if producer_done && self.queue.is_empty() {
                        return None;
                    }
                }
            }
        }
    }

    fn terminal_event(&mut self) -> UiEvent {
        match self.join_producer() {
            Ok(result) => UiEvent::Complete {
                result: Some(result),
                status: "completed".to_string(),
                agent_history: None,
                final_agent: None,
            },
            Err(reason) => UiEvent::ForceStop {
                force_stop: true,
                force_stop_reason: reason.clone(),
                reason,
                agent: None,
                agent_history: Vec::new(),
            },
        }
    }

    fn join_producer(&mut self) -> ProducerOutcome {
        let Some(handle) = self.handle.take() else {
            return Err("swarm thread already joined".to_string());
        };
        let deadline = Instant::now() + self.config.join_timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                warn!("swarm thread did not finish within the join timeout");
                return Err("swarm thread did not shut down in time".to_string());
            }
            thread::sleep(self.config.poll_interval);
        }
        handle
            .join()
            .unwrap_or_else(|_| Err("swarm thread panicked".to_string()))
    }
}

impl Iterator for EventStream {
    type Item = UiEvent;

    fn next(&mut self) -> Option<UiEvent> {
        match self.stage {
            Stage::Starting => {
                self.stage = Stage::Streaming;
                Some(UiEvent::Start)
            }
            Stage::Streaming => match self.next_streamed() {
                Some(event) => Some(event),
                None => {
                    self.stage = Stage::Finished;
                    Some(self.terminal_event())
                }
            },
            Stage::Finished => None,
        }
    }
}
