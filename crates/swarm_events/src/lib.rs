#![forbid(unsafe_code)]
//! Multi-agent swarm event adaptation for live UI consumers.
//!
//! A swarm runtime drives several LLM agents, one active at a time, and
//! reports progress through a stream of loosely shaped callback payloads.
//! This crate turns that stream into something a UI thread can render live:
//! - [`SwarmEventAdapter`] translates each runtime event into a typed
//!   [`UiEvent`] while tracking workflow state (active agent, handoffs,
//!   tool-call correlation, accumulated text, completion).
//! - [`EventQueue`] is the single synchronization point between the producer
//!   thread and UI consumers.
//! - [`run_swarm`] owns the producer/consumer handshake: background thread,
//!   completion sentinel, and an [`Iterator`] of live events ending in
//!   exactly one terminal event.
//! - The swarm handlers plug the whole thing into the generic
//!   `agent_events` registry.
//!
//! The `tokio` feature adds [`AsyncEventStream`], an async twin of the
//! polling consumer.

mod adapter;
mod driver;
mod handlers;
mod queue;
mod roster;
mod state;
mod ui_event;

#[cfg(feature = "tokio")]
mod async_stream;

pub use adapter::{
    infer_swarm_kind, CallbackError, ExternalCallback, SwarmEventAdapter, SwarmStatusHandle,
    SWARM_KIND_ORDER,
};
pub use driver::{
    run_swarm, DriverConfig, DriverError, EventStream, ProducerOutcome, COMPLETION_SENTINEL,
};
pub use handlers::{AgentStatusHandler, SinkError, StatusSink, SwarmBridgeHandler};
pub use queue::EventQueue;
pub use roster::{AgentRoster, RosterEntry};
pub use state::{
    AdapterState, AgentPhase, AgentProgressEntry, AgentStatusInfo, ToolCallPhase, ToolCallRecord,
    WorkflowStatus,
};
pub use ui_event::{UiEvent, UiEventKind};

#[cfg(feature = "tokio")]
pub use async_stream::AsyncEventStream;
