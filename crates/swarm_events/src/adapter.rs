use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use agent_events::{EventRegistry, RawEvent};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::queue::EventQueue;
use crate::roster::AgentRoster;
use crate::state::{AdapterState, AgentPhase, AgentProgressEntry, WorkflowStatus};
use crate::ui_event::UiEvent;

/// Kind scan order for untyped swarm payloads. Multi-agent keys win over the
/// per-agent stream keys, and `complete` participates, unlike the generic
/// registry order.
pub const SWARM_KIND_ORDER: [&str; 13] = [
    "multiagent_node_start",
    "multiagent_node_stream",
    "multiagent_node_stop",
    "multiagent_handoff",
    "multiagent_result",
    "data",
    "current_tool_use",
    "tool_result",
    "reasoningText",
    "reasoning",
    "result",
    "force_stop",
    "complete",
];

/// Infers the kind of an untyped swarm payload; an explicit `"type"` is only
/// consulted when no known key is present.
pub fn infer_swarm_kind(event: &RawEvent) -> String {
    for key in SWARM_KIND_ORDER {
        if event.contains(key) {
            return key.to_string();
        }
    }
    event.str_field("type").unwrap_or("unknown").to_string()
}

pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Optional external consumer of every converted event. A returned error is
/// logged and dropped; the callback can never break the pipeline.
pub type ExternalCallback =
    Box<dyn FnMut(&Map<String, Value>) -> Result<(), CallbackError> + Send>;

/// Stateful translator from swarm runtime events to UI events.
///
/// Owned and driven by the single producer thread. Every conversion may
/// update the shared [`AdapterState`]; display threads read it through
/// [`SwarmStatusHandle`] snapshots, never live references.
pub struct SwarmEventAdapter {
    queue: Arc<EventQueue>,
    registry: Option<EventRegistry>,
    callback: Option<ExternalCallback>,
    roster: Arc<AgentRoster>,
    state: Arc<RwLock<AdapterState>>,
}

impl SwarmEventAdapter {
    pub fn new(queue: Arc<EventQueue>) -> Self {
        Self {
            queue,
            registry: None,
            callback: None,
            roster: Arc::new(AgentRoster::default()),
            state: Arc::new(RwLock::new(AdapterState::new())),
        }
    }

    /// Forwards every converted event through the given registry.
    pub fn with_registry(mut self, registry: EventRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_roster(mut self, roster: AgentRoster) -> Self {
        self.roster = Arc::new(roster);
        self
    }

    pub fn with_callback(mut self, callback: ExternalCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn queue(&self) -> Arc<EventQueue> {
        Arc::clone(&self.queue)
    }

    pub fn registry_mut(&mut self) -> Option<&mut EventRegistry> {
        self.registry.as_mut()
    }

    /// Read-only handle for display threads.
    pub fn status_handle(&self) -> SwarmStatusHandle {
        SwarmStatusHandle {
            roster: Arc::clone(&self.roster),
            state: Arc::clone(&self.state),
        }
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, AdapterState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn state_read(&self) -> RwLockReadGuard<'_, AdapterState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Translates one runtime event, updating workflow state as a side
    /// effect. Never fails; unrecognized shapes pass through unchanged.
    pub fn convert_event(&mut self, event: &RawEvent) -> UiEvent {
        let kind = match event.str_field("type") {
            Some(explicit) => explicit.to_string(),
            None => infer_swarm_kind(event),
        };

        // Key presence keeps working for typed events carrying legacy keys.
        if kind == "multiagent_node_start" {
            self.convert_node_start(event)
        } else if kind == "multiagent_node_stream" {
            self.convert_node_stream(event)
        } else if kind == "multiagent_node_stop" {
            self.convert_node_stop(event)
        } else if kind == "multiagent_handoff" {
            self.convert_handoff(event)
        } else if kind == "multiagent_result" {
            self.convert_result(event)
        } else if kind == "data" || event.contains("data") {
            self.convert_data(event)
        } else if kind == "current_tool_use" || event.contains("current_tool_use") {
            self.convert_tool_use(event, None)
        } else if kind == "tool_result" || event.contains("tool_result") {
            self.convert_tool_result(event, None)
        } else if kind == "reasoning" || kind == "reasoningText" || event.contains("reasoningText")
        {
            self.convert_reasoning(event, None)
        } else if kind == "complete" {
            self.convert_complete(event)
        } else if kind == "force_stop" || event.contains("force_stop") {
            self.convert_force_stop(event)
        } else if kind == "result" || event.contains("result") {
            self.convert_legacy_result(event)
        } else {
            UiEvent::Passthrough(event.clone().into_map())
        }
    }

    /// Converts, then fans out: queue for the UI thread, registry dispatch,
    /// optional external callback. Callback failures are dropped here, at the
    /// one visible call site.
    pub fn process_event(&mut self, event: &RawEvent) -> UiEvent {
        let converted = self.convert_event(event);
        self.queue.push(converted.clone());

        if self.registry.is_some() || self.callback.is_some() {
            let map = converted.to_map();
            if let Some(registry) = self.registry.as_mut() {
                registry.process_event(&RawEvent::from_map(map.clone()));
            }
            if let Some(callback) = self.callback.as_mut() {
                if let Err(err) = callback(&map) {
                    debug!(error = %err, "external callback failed; ignoring");
                }
            }
        }
        converted
    }

    /// Replaces the workflow state wholesale and empties the queue. Safe
    /// against a producer still enqueuing; stragglers land after the drain.
    pub fn reset(&mut self) {
        *self.state_mut() = AdapterState::new();
        self.queue.drain();
    }

    pub fn get_current_status(&self) -> WorkflowStatus {
        self.status_handle().get_current_status()
    }

    pub fn get_agent_progress(&self) -> Vec<AgentProgressEntry> {
        self.status_handle().get_agent_progress()
    }

    fn convert_node_start(&mut self, event: &RawEvent) -> UiEvent {
        let node_id = event.str_field("node_id").unwrap_or("unknown").to_string();
        let node_type = event.str_field("node_type").unwrap_or("agent").to_string();
        let display_name = self.roster.display_name(&node_id);
        let message = self.roster.working_message(&node_id);

        let mut state = self.state_mut();
        state.activate_agent(&node_id, message.clone());
        let agent_history = state.agent_history().to_vec();
        drop(state);

        UiEvent::AgentStatus {
            agent: node_id,
            agent_display_name: display_name,
            node_type: Some(node_type),
            status: AgentPhase::Working,
            message,
            node_result: None,
            agent_history,
        }
    }

    fn convert_node_stream(&mut self, event: &RawEvent) -> UiEvent {
        let node_id = event
            .str_field("node_id")
            .map(str::to_string)
            .or_else(|| self.state_read().current_agent().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        let inner = event
            .get("event")
            .and_then(Value::as_object)
            .cloned()
            .map(RawEvent::from_map)
            .unwrap_or_default();

        if inner.contains("data") {
            let text = inner.str_field("data").unwrap_or("").to_string();
            let mut state = self.state_mut();
            state.append_text(&text);
            let accumulated = state.accumulated_text().to_string();
            drop(state);
            UiEvent::TextDelta {
                data: text.clone(),
                text,
                agent: Some(node_id),
                accumulated_text: Some(accumulated),
            }
        } else if inner.contains("current_tool_use") {
            self.convert_tool_use(&inner, Some(node_id))
        } else if inner.contains("tool_result") {
            self.convert_tool_result(&inner, Some(node_id))
        } else if inner.contains("reasoningText") || inner.contains("reasoning") {
            self.convert_reasoning(&inner, Some(node_id))
        } else {
            let mut tagged = inner.into_map();
            tagged.insert("agent".to_string(), json!(node_id));
            UiEvent::Passthrough(tagged)
        }
    }

    fn convert_node_stop(&mut self, event: &RawEvent) -> UiEvent {
        let node_id = event
            .str_field("node_id")
            .map(str::to_string)
            .or_else(|| self.state_read().current_agent().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        let node_result = event.get("node_result").cloned().unwrap_or_else(|| json!({}));
        let display_name = self.roster.display_name(&node_id);
        let message = self.roster.completed_message(&node_id);

        let mut state = self.state_mut();
        state.complete_agent(&node_id, Some(&message));
        let agent_history = state.agent_history().to_vec();
        drop(state);

        UiEvent::AgentStatus {
            agent: node_id,
            agent_display_name: display_name,
            node_type: None,
            status: AgentPhase::Completed,
            message,
            node_result: Some(node_result),
            agent_history,
        }
    }

    fn convert_handoff(&mut self, event: &RawEvent) -> UiEvent {
        let from_agents = id_list(event, "from_node_ids");
        let to_agents = id_list(event, "to_node_ids");
        let handoff_message = event.str_field("message").unwrap_or("").to_string();

        let from_agent = from_agents
            .first()
            .cloned()
            .or_else(|| self.state_read().current_agent().map(str::to_string));
        let to_agent = to_agents
            .first()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let agent_display_name = self.roster.display_name(&to_agent);
        let message = self.roster.handoff_message(&to_agent);

        let mut state = self.state_mut();
        if let Some(from) = from_agent.as_deref() {
            state.complete_agent(from, None);
        }
        state.activate_agent(&to_agent, message.clone());
        let agent_history = state.agent_history().to_vec();
        drop(state);

        UiEvent::AgentHandoff {
            from_agent,
            to_agent,
            from_agents,
            to_agents,
            handoff_message,
            agent_display_name,
            status: AgentPhase::Working,
            message,
            agent_history,
        }
    }

    fn convert_result(&mut self, event: &RawEvent) -> UiEvent {
        let mut state = self.state_mut();
        state.mark_completed();
        let agent_history = state.agent_history().to_vec();
        let final_agent = state.current_agent().map(str::to_string);
        drop(state);

        UiEvent::Complete {
            result: event.get("result").cloned(),
            status: "completed".to_string(),
            agent_history: Some(agent_history),
            final_agent,
        }
    }

    fn convert_data(&mut self, event: &RawEvent) -> UiEvent {
        let text = event.str_field("data").unwrap_or("").to_string();
        let mut state = self.state_mut();
        state.append_text(&text);
        let agent = state.current_agent().map(str::to_string);
        drop(state);

        UiEvent::TextDelta {
            data: text.clone(),
            text,
            agent,
            accumulated_text: None,
        }
    }

    fn convert_tool_use(&mut self, event: &RawEvent, agent: Option<String>) -> UiEvent {
        let tool_info = event
            .get("current_tool_use")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let tool_use_id = tool_id(&tool_info);
        let tool_name = tool_info
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let arguments = tool_info.get("input").cloned().unwrap_or_else(|| json!({}));

        let mut state = self.state_mut();
        state.begin_tool_call(&tool_use_id, &tool_name, arguments.clone());
        let agent = agent.or_else(|| state.current_agent().map(str::to_string));
        drop(state);

        UiEvent::ToolCall {
            current_tool_use: tool_info,
            tool_use_id,
            tool_name,
            arguments,
            status: "running".to_string(),
            agent,
        }
    }

    fn convert_tool_result(&mut self, event: &RawEvent, agent: Option<String>) -> UiEvent {
        let tool_result = event.get("tool_result").cloned().unwrap_or_else(|| json!({}));
        let tool_use_id = tool_id(&tool_result);
        let result = tool_result
            .get("content")
            .cloned()
            .or_else(|| tool_result.get("result").cloned())
            .unwrap_or_else(|| json!(""));
        let status = tool_result
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("success")
            .to_string();

        let mut state = self.state_mut();
        state.finish_tool_call(&tool_use_id, result.clone());
        let agent = agent.or_else(|| state.current_agent().map(str::to_string));
        drop(state);

        UiEvent::ToolResult {
            tool_result,
            tool_use_id,
            result,
            status,
            agent,
        }
    }

    fn convert_reasoning(&mut self, event: &RawEvent, agent: Option<String>) -> UiEvent {
        let text = event
            .str_field("reasoningText")
            .or_else(|| event.str_field("reasoning"))
            .unwrap_or("")
            .to_string();
        let agent = agent.or_else(|| self.state_read().current_agent().map(str::to_string));

        UiEvent::Reasoning {
            reasoning_text: text.clone(),
            reasoning: text,
            agent,
        }
    }

    fn convert_complete(&mut self, event: &RawEvent) -> UiEvent {
        let mut state = self.state_mut();
        state.mark_completed();
        let agent_history = state.agent_history().to_vec();
        drop(state);

        UiEvent::Complete {
            result: event.get("result").cloned(),
            status: "completed".to_string(),
            agent_history: Some(agent_history),
            final_agent: None,
        }
    }

    fn convert_force_stop(&mut self, event: &RawEvent) -> UiEvent {
        let reason = event
            .str_field("force_stop_reason")
            .or_else(|| event.str_field("reason"))
            .unwrap_or("Unknown error")
            .to_string();

        let mut state = self.state_mut();
        state.fail(&reason);
        let agent = state.current_agent().map(str::to_string);
        let agent_history = state.agent_history().to_vec();
        drop(state);

        UiEvent::ForceStop {
            force_stop: true,
            force_stop_reason: reason.clone(),
            reason,
            agent,
            agent_history,
        }
    }

    fn convert_legacy_result(&mut self, event: &RawEvent) -> UiEvent {
        self.state_mut().mark_completed();
        UiEvent::Complete {
            result: event.get("result").cloned(),
            status: "completed".to_string(),
            agent_history: None,
            final_agent: None,
        }
    }
}

/// Read-only view of the workflow for display threads; every accessor copies.
#[derive(Clone)]
pub struct SwarmStatusHandle {
    roster: Arc<AgentRoster>,
    state: Arc<RwLock<AdapterState>>,
}

impl SwarmStatusHandle {
    fn state_read(&self) -> RwLockReadGuard<'_, AdapterState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get_current_status(&self) -> WorkflowStatus {
        let state = self.state_read();
        WorkflowStatus {
            current_agent: state.current_agent().map(str::to_string),
            current_agent_display_name: state
                .current_agent()
                .map(|agent| self.roster.display_name(agent)),
            agent_history: state.agent_history().to_vec(),
            agent_statuses: state.agent_statuses().to_vec(),
            is_completed: state.is_completed(),
            error_message: state.error_message().map(str::to_string),
            tool_calls_count: state.tool_call_count(),
        }
    }

    /// Per-agent progress rows in first-activation order.
    pub fn get_agent_progress(&self) -> Vec<AgentProgressEntry> {
        let state = self.state_read();
        let current = state.current_agent();
        state
            .agent_history()
            .iter()
            .filter_map(|agent| {
                state.status_of(agent).map(|info| AgentProgressEntry {
                    agent: agent.clone(),
                    display_name: self.roster.display_name(agent),
                    status: info.status,
                    message: info.message.clone(),
                    is_current: Some(agent.as_str()) == current,
                })
            })
            .collect()
    }
}

fn id_list(event: &RawEvent, key: &str) -> Vec<String> {
    event
        .get(key)
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Tool ids arrive in either camelCase or snake_case depending on dialect.
fn tool_id(info: &Value) -> String {
    info.get("toolUseId")
        .or_else(|| info.get("tool_use_id"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ToolCallPhase;

    fn raw(value: Value) -> RawEvent {
        RawEvent::from_value(value).unwrap()
    }

    fn adapter() -> SwarmEventAdapter {
        SwarmEventAdapter::new(Arc::new(EventQueue::new()))
    }

    #[test]
    fn node_start_activates_the_agent() {
        let mut adapter = adapter();
        let converted = adapter.convert_event(&raw(json!({
            "type": "multiagent_node_start",
            "node_id": "lead_agent",
            "node_type": "agent",
        })));

        let value = converted.to_value();
        assert_eq!(value["type"], "agent_status");
        assert_eq!(value["agent"], "lead_agent");
        assert_eq!(value["status"], "working");
        assert!(value["message"].as_str().is_some());

        let status = adapter.get_current_status();
        assert_eq!(status.current_agent.as_deref(), Some("lead_agent"));
        assert_eq!(status.agent_history, ["lead_agent"]);
    }

    #[test]
    fn node_stream_data_accumulates_text() {
        let mut adapter = adapter();
        let converted = adapter.convert_event(&raw(json!({
            "type": "multiagent_node_stream",
            "node_id": "sql_agent",
            "event": {"data": "SELECT * FROM users"},
        })));

        let value = converted.to_value();
        assert_eq!(value["type"], "text_delta");
        assert_eq!(value["data"], "SELECT * FROM users");
        assert_eq!(value["agent"], "sql_agent");
        assert_eq!(value["accumulated_text"], "SELECT * FROM users");
    }

    #[test]
    fn node_stream_without_known_inner_keys_tags_the_agent() {
        let mut adapter = adapter();
        let converted = adapter.convert_event(&raw(json!({
            "type": "multiagent_node_stream",
            "node_id": "lead_agent",
            "event": {"custom": 1},
        })));

        assert_eq!(
            converted.to_value(),
            json!({"custom": 1, "agent": "lead_agent"})
        );
    }

    #[test]
    fn node_stop_completes_a_started_agent() {
        let mut adapter = adapter();
        adapter.convert_event(&raw(json!({
            "type": "multiagent_node_start",
            "node_id": "data_expert",
        })));
        let converted = adapter.convert_event(&raw(json!({
            "type": "multiagent_node_stop",
            "node_id": "data_expert",
            "node_result": {"status": "success"},
        })));

        let value = converted.to_value();
        assert_eq!(value["type"], "agent_status");
        assert_eq!(value["status"], "completed");
        assert_eq!(
            adapter.get_current_status().agent_statuses[0].status,
            AgentPhase::Completed
        );
    }

    #[test]
    fn handoff_moves_the_active_role() {
        let mut adapter = adapter();
        adapter.convert_event(&raw(json!({
            "type": "multiagent_node_start",
            "node_id": "lead_agent",
        })));
        let converted = adapter.convert_event(&raw(json!({
            "type": "multiagent_handoff",
            "from_node_ids": ["lead_agent"],
            "to_node_ids": ["data_expert"],
            "message": "need the catalog",
        })));

        let value = converted.to_value();
        assert_eq!(value["type"], "agent_handoff");
        assert_eq!(value["from_agent"], "lead_agent");
        assert_eq!(value["to_agent"], "data_expert");
        assert_eq!(value["handoff_message"], "need the catalog");

        let status = adapter.get_current_status();
        assert_eq!(status.current_agent.as_deref(), Some("data_expert"));
        assert_eq!(status.agent_history, ["lead_agent", "data_expert"]);
    }

    #[test]
    fn top_level_data_has_no_accumulated_field_but_still_accumulates() {
        let mut adapter = adapter();
        adapter.convert_event(&raw(json!({"data": "Hello, "})));
        let converted = adapter.convert_event(&raw(json!({"data": "World!"})));

        let value = converted.to_value();
        assert_eq!(value["type"], "text_delta");
        assert!(value.get("accumulated_text").is_none());

        let handle = adapter.status_handle();
        assert_eq!(handle.get_current_status().current_agent, None);
        // Accumulation is observable through state, not the per-delta event.
        let again = adapter.convert_event(&raw(json!({
            "type": "multiagent_node_stream",
            "node_id": "lead_agent",
            "event": {"data": "!"},
        })));
        assert_eq!(again.to_value()["accumulated_text"], "Hello, World!!");
    }

    #[test]
    fn tool_use_and_result_correlate_by_either_id_spelling() {
        let mut adapter = adapter();
        adapter.convert_event(&raw(json!({
            "current_tool_use": {
                "toolUseId": "t1",
                "name": "calc",
                "input": {"x": 1},
            }
        })));
        let converted = adapter.convert_event(&raw(json!({
            "tool_result": {
                "tool_use_id": "t1",
                "content": "2",
            }
        })));

        let value = converted.to_value();
        assert_eq!(value["type"], "tool_result");
        assert_eq!(value["result"], "2");
        assert_eq!(value["status"], "success");

        assert_eq!(adapter.get_current_status().tool_calls_count, 1);
        let state = adapter.state_read();
        let record = state.tool_call("t1").unwrap();
        assert_eq!(record.status, ToolCallPhase::Completed);
        assert_eq!(record.result, Some(json!("2")));
    }

    #[test]
    fn tool_result_content_falls_back_to_result_key() {
        let mut adapter = adapter();
        let converted = adapter.convert_event(&raw(json!({
            "tool_result": {"toolUseId": "t9", "result": "fallback"},
        })));
        assert_eq!(converted.to_value()["result"], "fallback");
    }

    #[test]
    fn typed_force_stop_flags_the_current_agent() {
        let mut adapter = adapter();
        adapter.convert_event(&raw(json!({
            "type": "multiagent_node_start",
            "node_id": "sql_agent",
        })));
        let converted = adapter.convert_event(&raw(json!({
            "type": "force_stop",
            "force_stop_reason": "Timeout",
        })));

        let value = converted.to_value();
        assert_eq!(value["type"], "force_stop");
        assert_eq!(value["reason"], "Timeout");

        let status = adapter.get_current_status();
        assert!(status.is_completed);
        assert_eq!(status.error_message.as_deref(), Some("Timeout"));
        assert_eq!(status.agent_statuses[0].status, AgentPhase::Error);
    }

    #[test]
    fn untyped_force_stop_is_inferred_and_completes_the_run() {
        let mut adapter = adapter();
        let converted = adapter.convert_event(&raw(json!({
            "force_stop": true,
            "force_stop_reason": "timeout",
        })));

        let value = converted.to_value();
        assert_eq!(value["type"], "force_stop");
        assert_eq!(value["reason"], "timeout");
        assert!(adapter.get_current_status().is_completed);
    }

    #[test]
    fn reasoning_accepts_both_spellings() {
        let mut adapter = adapter();
        let converted = adapter.convert_event(&raw(json!({"reasoningText": "thinking..."})));
        let value = converted.to_value();
        assert_eq!(value["type"], "reasoning");
        assert_eq!(value["reasoningText"], "thinking...");
        assert_eq!(value["reasoning"], "thinking...");

        let converted = adapter.convert_event(&raw(json!({"reasoning": "more thought"})));
        assert_eq!(converted.to_value()["reasoning"], "more thought");
    }

    #[test]
    fn multiagent_result_completes_with_final_agent() {
        let mut adapter = adapter();
        adapter.convert_event(&raw(json!({
            "type": "multiagent_node_start",
            "node_id": "lead_agent",
        })));
        let converted = adapter.convert_event(&raw(json!({
            "type": "multiagent_result",
            "result": {"status": "COMPLETED"},
        })));

        let value = converted.to_value();
        assert_eq!(value["type"], "complete");
        assert_eq!(value["final_agent"], "lead_agent");
        assert!(adapter.get_current_status().is_completed);
    }

    #[test]
    fn legacy_result_completes_without_history() {
        let mut adapter = adapter();
        let converted = adapter.convert_event(&raw(json!({"result": "answer", "extra": 1})));
        let value = converted.to_value();
        assert_eq!(value["type"], "complete");
        assert_eq!(value["result"], "answer");
        assert!(value.get("agent_history").is_none());
        assert!(adapter.get_current_status().is_completed);
    }

    #[test]
    fn unknown_shapes_pass_through_unchanged() {
        let mut adapter = adapter();
        let converted = adapter.convert_event(&raw(json!({"unrelated_key": 123})));
        assert_eq!(converted.to_value(), json!({"unrelated_key": 123}));
    }

    #[test]
    fn reset_replaces_state_and_drains_the_queue() {
        let queue = Arc::new(EventQueue::new());
        let mut adapter = SwarmEventAdapter::new(Arc::clone(&queue));
        adapter.process_event(&raw(json!({
            "type": "multiagent_node_start",
            "node_id": "lead_agent",
        })));
        assert_eq!(queue.len(), 1);

        adapter.reset();

        assert!(queue.is_empty());
        let status = adapter.get_current_status();
        assert_eq!(status.current_agent, None);
        assert!(status.agent_history.is_empty());
        assert!(!status.is_completed);
    }

    #[test]
    fn progress_rows_follow_history_order_and_mark_the_current_agent() {
        let mut adapter = adapter();
        adapter.convert_event(&raw(json!({
            "type": "multiagent_node_start",
            "node_id": "lead_agent",
        })));
        adapter.convert_event(&raw(json!({
            "type": "multiagent_handoff",
            "from_node_ids": ["lead_agent"],
            "to_node_ids": ["data_expert"],
        })));

        let progress = adapter.get_agent_progress();
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].agent, "lead_agent");
        assert_eq!(progress[0].status, AgentPhase::Completed);
        assert!(!progress[0].is_current);
        assert_eq!(progress[1].agent, "data_expert");
        assert!(progress[1].is_current);
    }

    #[test]
    fn status_snapshot_resolves_display_names() {
        let mut adapter = adapter();
        adapter.convert_event(&raw(json!({
            "type": "multiagent_node_start",
            "node_id": "lead_agent",
        })));

        let status = adapter.get_current_status();
        assert_eq!(
            status.current_agent_display_name.as_deref(),
            Some("Lead Agent (coordinator)")
        );
    }
}
