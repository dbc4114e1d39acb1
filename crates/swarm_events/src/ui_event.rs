use serde::Serialize;
use serde_json::{Map, Value};

use crate::state::AgentPhase;

/// Closed vocabulary of event types the UI layer consumes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum UiEventKind {
    AgentStatus,
    AgentHandoff,
    TextDelta,
    TextComplete,
    ToolCall,
    ToolResult,
    Reasoning,
    ChainOfThought,
    Start,
    Complete,
    ForceStop,
    Error,
}

impl UiEventKind {
    pub const ALL: [UiEventKind; 12] = [
        UiEventKind::AgentStatus,
        UiEventKind::AgentHandoff,
        UiEventKind::TextDelta,
        UiEventKind::TextComplete,
        UiEventKind::ToolCall,
        UiEventKind::ToolResult,
        UiEventKind::Reasoning,
        UiEventKind::ChainOfThought,
        UiEventKind::Start,
        UiEventKind::Complete,
        UiEventKind::ForceStop,
        UiEventKind::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UiEventKind::AgentStatus => "agent_status",
            UiEventKind::AgentHandoff => "agent_handoff",
            UiEventKind::TextDelta => "text_delta",
            UiEventKind::TextComplete => "text_complete",
            UiEventKind::ToolCall => "tool_call",
            UiEventKind::ToolResult => "tool_result",
            UiEventKind::Reasoning => "reasoning",
            UiEventKind::ChainOfThought => "chain_of_thought",
            UiEventKind::Start => "start",
            UiEventKind::Complete => "complete",
            UiEventKind::ForceStop => "force_stop",
            UiEventKind::Error => "error",
        }
    }
}

/// Normalized event delivered to the UI thread.
///
/// Serialization is internally tagged, so every event carries `"type"` on the
/// wire; [`UiEvent::Passthrough`] is the explicit legacy-untyped escape hatch
/// and serializes as its raw map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum UiEvent {
    #[serde(rename = "agent_status")]
    AgentStatus {
        agent: String,
        agent_display_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        node_type: Option<String>,
        status: AgentPhase,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        node_result: Option<Value>,
        agent_history: Vec<String>,
    },
    #[serde(rename = "agent_handoff")]
    AgentHandoff {
        from_agent: Option<String>,
        to_agent: String,
        from_agents: Vec<String>,
        to_agents: Vec<String>,
        handoff_message: String,
        agent_display_name: String,
        status: AgentPhase,
        message: String,
        agent_history: Vec<String>,
    },
    #[serde(rename = "text_delta")]
    TextDelta {
        data: String,
        text: String,
        agent: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        accumulated_text: Option<String>,
    },
    #[serde(rename = "text_complete")]
    TextComplete { text: String, agent: Option<String> },
    #[serde(rename = "tool_call")]
    ToolCall {
        current_tool_use: Value,
        tool_use_id: String,
        tool_name: String,
        arguments: Value,
        status: String,
        agent: Option<String>,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_result: Value,
        tool_use_id: String,
        result: Value,
        status: String,
        agent: Option<String>,
    },
    #[serde(rename = "reasoning")]
    Reasoning {
        #[serde(rename = "reasoningText")]
        reasoning_text: String,
        reasoning: String,
        agent: Option<String>,
    },
    #[serde(rename = "chain_of_thought")]
    ChainOfThought { text: String, agent: Option<String> },
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "complete")]
    Complete {
        result: Option<Value>,
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        agent_history: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        final_agent: Option<String>,
    },
    #[serde(rename = "force_stop")]
    ForceStop {
        force_stop: bool,
        force_stop_reason: String,
        reason: String,
        agent: Option<String>,
        agent_history: Vec<String>,
    },
    #[serde(rename = "error")]
    Error {
        message: String,
        agent: Option<String>,
    },
    /// Unrecognized shape forwarded unchanged.
    #[serde(untagged)]
    Passthrough(Map<String, Value>),
}

impl UiEvent {
    pub fn kind(&self) -> Option<UiEventKind> {
        let kind = match self {
            UiEvent::AgentStatus { .. } => UiEventKind::AgentStatus,
            UiEvent::AgentHandoff { .. } => UiEventKind::AgentHandoff,
            UiEvent::TextDelta { .. } => UiEventKind::TextDelta,
            UiEvent::TextComplete { .. } => UiEventKind::TextComplete,
            UiEvent::ToolCall { .. } => UiEventKind::ToolCall,
            UiEvent::ToolResult { .. } => UiEventKind::ToolResult,
            UiEvent::Reasoning { .. } => UiEventKind::Reasoning,
            UiEvent::ChainOfThought { .. } => UiEventKind::ChainOfThought,
            UiEvent::Start => UiEventKind::Start,
            UiEvent::Complete { .. } => UiEventKind::Complete,
            UiEvent::ForceStop { .. } => UiEventKind::ForceStop,
            UiEvent::Error { .. } => UiEventKind::Error,
            UiEvent::Passthrough(_) => return None,
        };
        Some(kind)
    }

    /// The `"type"` value this event carries on the wire. Passthrough events
    /// answer with their own `"type"` field, or `"unknown"` without one.
    pub fn type_name(&self) -> &str {
        match self {
            UiEvent::Passthrough(map) => map
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
            other => other.kind().map(UiEventKind::as_str).unwrap_or("unknown"),
        }
    }

    /// Wire form as a JSON map, `"type"` included for tagged variants.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // Serialization of these shapes cannot fail and every variant is
            // an object; still, degrade to an empty map rather than panic.
            _ => Map::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_variants_carry_type_on_the_wire() {
        let event = UiEvent::TextDelta {
            data: "abc".into(),
            text: "abc".into(),
            agent: Some("sql_agent".into()),
            accumulated_text: None,
        };
        let value = event.to_value();
        assert_eq!(value["type"], "text_delta");
        assert_eq!(value["data"], "abc");
        assert!(value.get("accumulated_text").is_none());
    }

    #[test]
    fn start_serializes_as_bare_lifecycle_marker() {
        assert_eq!(UiEvent::Start.to_value(), json!({"type": "start"}));
    }

    #[test]
    fn passthrough_serializes_as_its_raw_map() {
        let mut map = Map::new();
        map.insert("unrelated_key".into(), json!(123));
        let event = UiEvent::Passthrough(map);
        assert_eq!(event.to_value(), json!({"unrelated_key": 123}));
        assert_eq!(event.type_name(), "unknown");
    }

    #[test]
    fn handler_facing_variants_share_the_same_tagging() {
        let complete = UiEvent::TextComplete {
            text: "final answer".into(),
            agent: Some("lead_agent".into()),
        };
        assert_eq!(complete.to_value()["type"], "text_complete");

        let thought = UiEvent::ChainOfThought {
            text: "step 1".into(),
            agent: None,
        };
        assert_eq!(thought.to_value()["type"], "chain_of_thought");

        let error = UiEvent::Error {
            message: "render failed".into(),
            agent: None,
        };
        let value = error.to_value();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "render failed");
    }

    #[test]
    fn every_kind_has_a_distinct_wire_name() {
        let mut names: Vec<&str> = UiEventKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), UiEventKind::ALL.len());
    }

    #[test]
    fn agent_phase_serializes_lowercase() {
        let event = UiEvent::AgentStatus {
            agent: "lead_agent".into(),
            agent_display_name: "Lead Agent (coordinator)".into(),
            node_type: Some("agent".into()),
            status: AgentPhase::Working,
            message: "Analyzing the user request...".into(),
            node_result: None,
            agent_history: vec!["lead_agent".into()],
        };
        assert_eq!(event.to_value()["status"], "working");
    }
}
