/// Canonical categories of runtime events.
///
/// Wire names follow the runtime's callback keys, which is why the casing is
/// uneven (`reasoningText` next to `tool_result`).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EventKind {
    // Text generation
    Data,
    Delta,
    // Tools
    CurrentToolUse,
    ToolResult,
    // Reasoning
    Reasoning,
    ReasoningText,
    ReasoningSignature,
    RedactedContent,
    // Lifecycle
    InitEventLoop,
    StartEventLoop,
    Start,
    Message,
    Complete,
    ForceStop,
    Result,
    // Multi-agent
    NodeStart,
    NodeStream,
    NodeStop,
    Handoff,
    MultiAgentResult,
}

/// Kind reported for an empty payload with no recognizable key.
pub const UNKNOWN_KIND: &str = "unknown";

/// Key scan order for inferring the kind of a legacy (untyped) payload.
///
/// A payload can carry several of these keys at once; the first present wins.
pub const LEGACY_KIND_ORDER: [&str; 8] = [
    "data",
    "current_tool_use",
    "tool_result",
    "reasoning",
    "reasoningText",
    "redactedContent",
    "result",
    "force_stop",
];

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Data => "data",
            EventKind::Delta => "delta",
            EventKind::CurrentToolUse => "current_tool_use",
            EventKind::ToolResult => "tool_result",
            EventKind::Reasoning => "reasoning",
            EventKind::ReasoningText => "reasoningText",
            EventKind::ReasoningSignature => "reasoning_signature",
            EventKind::RedactedContent => "redactedContent",
            EventKind::InitEventLoop => "init_event_loop",
            EventKind::StartEventLoop => "start_event_loop",
            EventKind::Start => "start",
            EventKind::Message => "message",
            EventKind::Complete => "complete",
            EventKind::ForceStop => "force_stop",
            EventKind::Result => "result",
            EventKind::NodeStart => "multiagent_node_start",
            EventKind::NodeStream => "multiagent_node_stream",
            EventKind::NodeStop => "multiagent_node_stop",
            EventKind::Handoff => "multiagent_handoff",
            EventKind::MultiAgentResult => "multiagent_result",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        let kind = match name {
            "data" => EventKind::Data,
            "delta" => EventKind::Delta,
            "current_tool_use" => EventKind::CurrentToolUse,
            "tool_result" => EventKind::ToolResult,
            "reasoning" => EventKind::Reasoning,
            "reasoningText" => EventKind::ReasoningText,
            "reasoning_signature" => EventKind::ReasoningSignature,
            "redactedContent" => EventKind::RedactedContent,
            "init_event_loop" => EventKind::InitEventLoop,
            "start_event_loop" => EventKind::StartEventLoop,
            "start" => EventKind::Start,
            "message" => EventKind::Message,
            "complete" => EventKind::Complete,
            "force_stop" => EventKind::ForceStop,
            "result" => EventKind::Result,
            "multiagent_node_start" => EventKind::NodeStart,
            "multiagent_node_stream" => EventKind::NodeStream,
            "multiagent_node_stop" => EventKind::NodeStop,
            "multiagent_handoff" => EventKind::Handoff,
            "multiagent_result" => EventKind::MultiAgentResult,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_multi_agent(self) -> bool {
        matches!(
            self,
            EventKind::NodeStart
                | EventKind::NodeStream
                | EventKind::NodeStop
                | EventKind::Handoff
                | EventKind::MultiAgentResult
        )
    }
}
