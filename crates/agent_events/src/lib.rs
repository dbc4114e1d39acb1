#![forbid(unsafe_code)]
//! Event normalization and dispatch for streaming agent callbacks.
//!
//! Agent runtimes deliver progress as a stream of loosely shaped, string-keyed
//! payloads in two co-existing dialects: a *standard* dialect with an explicit
//! `"type"` field and a *legacy* dialect where key presence implies the type.
//! This crate provides:
//! - A closed vocabulary of canonical event kinds ([`EventKind`]).
//! - An order-preserving payload type for the open wire format ([`RawEvent`]).
//! - A handler seam with priorities and a `Result`-returning boundary
//!   ([`EventHandler`]).
//! - A session-owned registry that normalizes payloads, infers their kind,
//!   and fans them out with per-handler failure isolation ([`EventRegistry`]).
//!
//! Nothing here knows about any particular producer; swarm-specific
//! translation lives in the `swarm_events` crate on top of this one.

mod handler;
mod handlers;
mod kind;
mod payload;
mod registry;

pub use handler::{BoxedHandler, EventHandler, HandlerError, DEFAULT_PRIORITY};
pub use handlers::{CollectingHandler, LoggingHandler};
pub use kind::{EventKind, LEGACY_KIND_ORDER, UNKNOWN_KIND};
pub use payload::RawEvent;
pub use registry::{infer_kind, normalize_event, EventRegistry};
