use agent_events::{EventHandler, EventKind, HandlerError, RawEvent};
use serde_json::{json, Value};
use tracing::debug;

use crate::state::AgentProgressEntry;

/// Bridges swarm events into the generic registry flow ahead of UI
/// rendering; runs at priority 5. Answers for the raw multi-agent kinds and
/// for the two converted agent kinds.
#[derive(Debug, Default)]
pub struct SwarmBridgeHandler;

impl SwarmBridgeHandler {
    pub fn new() -> Self {
        Self
    }
}

impl EventHandler for SwarmBridgeHandler {
    fn name(&self) -> &'static str {
        "SwarmBridgeHandler"
    }

    fn can_handle(&self, kind: &str) -> bool {
        if EventKind::from_wire(kind).is_some_and(EventKind::is_multi_agent) {
            return true;
        }
        kind == "agent_status" || kind == "agent_handoff"
    }

    fn handle(&mut self, event: &RawEvent) -> Result<Option<Value>, HandlerError> {
        let kind = event.str_field("type").unwrap_or("");

        if kind == "agent_status" || kind == "agent_handoff" {
            return Ok(Some(json!({
                "swarm_event_processed": true,
                "event_type": kind,
                "agent": event.get("agent").cloned(),
                "status": event.get("status").cloned(),
            })));
        }

        if kind.starts_with("multiagent_") {
            return Ok(Some(json!({
                "swarm_event_processed": true,
                "event_type": kind,
                "node_id": event.get("node_id").cloned(),
            })));
        }

        Ok(None)
    }

    fn priority(&self) -> i32 {
        5
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("display target rejected update: {message}")]
pub struct SinkError {
    message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Where agent status lines end up (a UI placeholder, a terminal pane).
///
/// Render failures are expected during teardown (stale display target) and
/// are swallowed by the handler; the `Result` keeps that swallow visible.
pub trait StatusSink: Send {
    fn render(&mut self, line: &str) -> Result<(), SinkError>;
}

/// Renders agent status and handoff lines to a [`StatusSink`]; runs at
/// priority 8, just ahead of the generic UI tier.
#[derive(Default)]
pub struct AgentStatusHandler {
    sink: Option<Box<dyn StatusSink>>,
}

impl AgentStatusHandler {
    /// No sink yet; events are still acknowledged so dispatch accounting
    /// keeps working before the display exists.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Box<dyn StatusSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn set_sink(&mut self, sink: Box<dyn StatusSink>) {
        self.sink = Some(sink);
    }

    fn render(&mut self, line: &str) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(err) = sink.render(line) {
            debug!(error = %err, "status render failed; ignoring");
        }
    }

    /// Redraws the whole roster walk, one line per agent in history order.
    pub fn render_progress(&mut self, progress: &[AgentProgressEntry]) {
        if progress.is_empty() {
            return;
        }
        let lines: Vec<String> = progress.iter().map(progress_line).collect();
        self.render(&lines.join("\n"));
    }
}

impl EventHandler for AgentStatusHandler {
    fn name(&self) -> &'static str {
        "AgentStatusHandler"
    }

    fn can_handle(&self, kind: &str) -> bool {
        kind == "agent_status" || kind == "agent_handoff"
    }

    fn handle(&mut self, event: &RawEvent) -> Result<Option<Value>, HandlerError> {
        let kind = event.str_field("type").unwrap_or("").to_string();

        if kind == "agent_status" {
            let display = event
                .str_field("agent_display_name")
                .or_else(|| event.str_field("agent"))
                .unwrap_or("Unknown");
            let status = event.str_field("status").unwrap_or("working");
            let message = event.str_field("message").unwrap_or("");
            let line = format!("{} **{display}**: {message}", status_icon(status));
            self.render(&line);
        } else if kind == "agent_handoff" {
            let display = event
                .str_field("agent_display_name")
                .or_else(|| event.str_field("to_agent"))
                .unwrap_or("Unknown");
            let message = event
                .str_field("message")
                .map(str::to_string)
                .unwrap_or_else(|| format!("Handing work to {display}..."));
            let line = format!("🔀 **{display}**: {message}");
            self.render(&line);
        }

        Ok(Some(json!({ "ui_updated": true, "event_type": kind })))
    }

    fn priority(&self) -> i32 {
        8
    }
}

fn status_icon(status: &str) -> &'static str {
    match status {
        "completed" => "✅",
        "error" => "❌",
        "idle" => "⏸️",
        _ => "🔄",
    }
}

fn progress_line(entry: &AgentProgressEntry) -> String {
    let icon = match entry.status.as_str() {
        "working" if entry.is_current => "🔄",
        "completed" => "✅",
        "error" => "❌",
        _ => "⏸️",
    };
    if entry.is_current {
        format!("{icon} **{}** ← current", entry.display_name)
    } else {
        format!("{icon} {}", entry.display_name)
    }
}
