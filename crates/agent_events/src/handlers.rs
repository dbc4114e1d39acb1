use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::handler::{EventHandler, HandlerError};
use crate::kind::EventKind;
use crate::payload::RawEvent;
use crate::registry::infer_kind;

/// Traces the agent conversation to the log stream instead of the UI.
///
/// Accepts every kind; the interesting ones get a dedicated line, the rest a
/// debug entry. Never returns a structured result.
#[derive(Debug, Default)]
pub struct LoggingHandler {
    scope: Option<String>,
}

impl LoggingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefixes log lines with the producing agent's id.
    pub fn for_agent(agent: impl Into<String>) -> Self {
        Self {
            scope: Some(agent.into()),
        }
    }

    fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or("")
    }
}

impl EventHandler for LoggingHandler {
    fn name(&self) -> &'static str {
        "LoggingHandler"
    }

    fn can_handle(&self, _kind: &str) -> bool {
        true
    }

    fn handle(&mut self, event: &RawEvent) -> Result<Option<Value>, HandlerError> {
        let kind = infer_kind(event);
        match EventKind::from_wire(&kind) {
            Some(EventKind::NodeStart) => {
                let node_id = event.str_field("node_id").unwrap_or("unknown");
                info!(scope = self.scope(), node_id, "agent started");
            }
            Some(EventKind::NodeStop) => {
                let node_id = event.str_field("node_id").unwrap_or("unknown");
                info!(scope = self.scope(), node_id, "agent finished");
            }
            Some(EventKind::Handoff) => {
                let from = first_id(event, "from_node_ids").unwrap_or_default();
                let to = first_id(event, "to_node_ids").unwrap_or_default();
                info!(scope = self.scope(), %from, %to, "handoff");
            }
            Some(EventKind::Data | EventKind::Delta) => {
                let len = event.str_field("data").map(str::len).unwrap_or(0);
                debug!(scope = self.scope(), bytes = len, "text delta");
            }
            Some(EventKind::CurrentToolUse) => {
                let tool = event
                    .get("current_tool_use")
                    .and_then(|t| t.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                debug!(scope = self.scope(), tool, "tool invoked");
            }
            Some(EventKind::ToolResult) => {
                debug!(scope = self.scope(), "tool result received");
            }
            Some(EventKind::ForceStop) => {
                let reason = event
                    .str_field("reason")
                    .or_else(|| event.str_field("force_stop_reason"))
                    .unwrap_or("Unknown");
                warn!(scope = self.scope(), reason, "run force-stopped");
            }
            Some(EventKind::Complete | EventKind::Result | EventKind::MultiAgentResult) => {
                info!(scope = self.scope(), "run complete");
            }
            Some(_) | None => match kind.as_str() {
                // Converted UI shapes carry different field names.
                "agent_handoff" => {
                    let from = event.str_field("from_agent").unwrap_or_default();
                    let to = event.str_field("to_agent").unwrap_or_default();
                    info!(scope = self.scope(), %from, %to, "handoff");
                }
                "text_delta" => {
                    let len = event.str_field("text").map(str::len).unwrap_or(0);
                    debug!(scope = self.scope(), bytes = len, "text delta");
                }
                "tool_call" => {
                    let tool = event.str_field("tool_name").unwrap_or("unknown");
                    debug!(scope = self.scope(), tool, "tool invoked");
                }
                other => {
                    debug!(scope = self.scope(), event_type = other, "event");
                }
            },
        }
        Ok(None)
    }
}

fn first_id(event: &RawEvent, key: &str) -> Option<String> {
    event
        .get(key)
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Accumulates every handled event into a shared buffer.
///
/// The buffer handle stays valid after the handler moves into a registry,
/// which is what debug displays and tests want.
#[derive(Debug, Default)]
pub struct CollectingHandler {
    kinds: Option<Vec<String>>,
    seen: Arc<Mutex<Vec<Value>>>,
}

impl CollectingHandler {
    /// Collects every kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only the listed kinds.
    pub fn for_kinds(kinds: &[&str]) -> Self {
        Self {
            kinds: Some(kinds.iter().map(|k| k.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Handle onto the shared buffer of collected events.
    pub fn seen(&self) -> Arc<Mutex<Vec<Value>>> {
        Arc::clone(&self.seen)
    }
}

impl EventHandler for CollectingHandler {
    fn name(&self) -> &'static str {
        "CollectingHandler"
    }

    fn can_handle(&self, kind: &str) -> bool {
        match &self.kinds {
            None => true,
            Some(kinds) => kinds.iter().any(|k| k == kind),
        }
    }

    fn handle(&mut self, event: &RawEvent) -> Result<Option<Value>, HandlerError> {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        seen.push(event.clone().into_value());
        Ok(None)
    }
}
