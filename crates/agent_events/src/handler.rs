use serde_json::Value;

use crate::payload::RawEvent;

/// Priority assumed when a handler does not declare one. Lower runs earlier.
pub const DEFAULT_PRIORITY: i32 = 100;

pub type BoxedHandler = Box<dyn EventHandler + Send>;

/// Failure surfaced by a handler instead of being raised past the registry.
///
/// `error_type` is a short classification (mirrors the handler's own error
/// taxonomy); `message` is the human-readable detail. Both end up verbatim in
/// the synthesized failure record.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error_type}: {message}")]
pub struct HandlerError {
    error_type: String,
    message: String,
}

impl HandlerError {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A consumer of normalized events.
///
/// Handlers declare which kinds they accept and run in ascending priority
/// order. `handle` returns `Ok(None)` for "consumed, nothing to report",
/// `Ok(Some(value))` for a structured result, and `Err` for a failure the
/// registry turns into a record instead of propagating.
pub trait EventHandler {
    /// Short name used in synthesized failure records.
    fn name(&self) -> &'static str;

    fn can_handle(&self, kind: &str) -> bool;

    fn handle(&mut self, event: &RawEvent) -> Result<Option<Value>, HandlerError>;

    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }
}
