use serde::Serialize;
use serde_json::Value;

/// Lifecycle phase of one agent within the current run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentPhase {
    #[default]
    Idle,
    Working,
    Completed,
    Error,
}

impl AgentPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentPhase::Idle => "idle",
            AgentPhase::Working => "working",
            AgentPhase::Completed => "completed",
            AgentPhase::Error => "error",
        }
    }
}

/// Tracked status of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStatusInfo {
    pub agent_name: String,
    pub status: AgentPhase,
    pub message: String,
    pub progress: f64,
}

impl AgentStatusInfo {
    fn working(agent: &str, message: String) -> Self {
        Self {
            agent_name: agent.to_string(),
            status: AgentPhase::Working,
            message,
            progress: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallPhase {
    Running,
    Completed,
}

/// One correlated tool invocation, matched by its invocation id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    pub input: Value,
    pub status: ToolCallPhase,
    pub result: Option<Value>,
}

/// Mutable workflow record of a swarm run.
///
/// Mutated only by the producer thread that owns the adapter; everyone else
/// sees copy-out snapshots. `agent_history` is append-only in first-occurrence
/// order and `is_completed` only ever goes false to true; `reset()` on the
/// adapter replaces the whole value instead of clearing fields.
#[derive(Debug, Default)]
pub struct AdapterState {
    current_agent: Option<String>,
    agent_history: Vec<String>,
    agent_statuses: Vec<AgentStatusInfo>,
    tool_calls: Vec<ToolCallRecord>,
    accumulated_text: String,
    is_completed: bool,
    error_message: Option<String>,
}

impl AdapterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_agent(&self) -> Option<&str> {
        self.current_agent.as_deref()
    }

    pub fn agent_history(&self) -> &[String] {
        &self.agent_history
    }

    pub fn agent_statuses(&self) -> &[AgentStatusInfo] {
        &self.agent_statuses
    }

    pub fn status_of(&self, agent: &str) -> Option<&AgentStatusInfo> {
        self.agent_statuses.iter().find(|s| s.agent_name == agent)
    }

    pub fn tool_call(&self, id: &str) -> Option<&ToolCallRecord> {
        self.tool_calls.iter().find(|t| t.id == id)
    }

    pub fn tool_call_count(&self) -> usize {
        self.tool_calls.len()
    }

    pub fn accumulated_text(&self) -> &str {
        &self.accumulated_text
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Makes `agent` the active one: appended to history on first sight,
    /// status replaced with a fresh `working` entry.
    pub(crate) fn activate_agent(&mut self, agent: &str, message: String) {
        self.current_agent = Some(agent.to_string());
        if !self.agent_history.iter().any(|a| a == agent) {
            self.agent_history.push(agent.to_string());
        }
        let info = AgentStatusInfo::working(agent, message);
        match self.agent_statuses.iter_mut().find(|s| s.agent_name == agent) {
            Some(existing) => *existing = info,
            None => self.agent_statuses.push(info),
        }
    }

    /// Marks a tracked agent completed; untracked ids are ignored.
    pub(crate) fn complete_agent(&mut self, agent: &str, message: Option<&str>) {
        if let Some(info) = self
            .agent_statuses
            .iter_mut()
            .find(|s| s.agent_name == agent)
        {
            info.status = AgentPhase::Completed;
            if let Some(message) = message {
                info.message = message.to_string();
            }
        }
    }

    pub(crate) fn append_text(&mut self, chunk: &str) {
        self.accumulated_text.push_str(chunk);
    }

    pub(crate) fn begin_tool_call(&mut self, id: &str, name: &str, input: Value) {
        let record = ToolCallRecord {
            id: id.to_string(),
            name: name.to_string(),
            input,
            status: ToolCallPhase::Running,
            result: None,
        };
        match self.tool_calls.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = record,
            None => self.tool_calls.push(record),
        }
    }

    /// Completes a tracked invocation; unknown ids are ignored. A completed
    /// call never transitions back to running.
    pub(crate) fn finish_tool_call(&mut self, id: &str, result: Value) {
        if let Some(record) = self.tool_calls.iter_mut().find(|t| t.id == id) {
            record.status = ToolCallPhase::Completed;
            record.result = Some(result);
        }
    }

    pub(crate) fn mark_completed(&mut self) {
        self.is_completed = true;
    }

    /// Records the failure reason and flips the current agent to `error`.
    pub(crate) fn fail(&mut self, reason: &str) {
        self.error_message = Some(reason.to_string());
        self.is_completed = true;
        if let Some(current) = self.current_agent.clone() {
            if let Some(info) = self
                .agent_statuses
                .iter_mut()
                .find(|s| s.agent_name == current)
            {
                info.status = AgentPhase::Error;
                info.message = format!("Error: {reason}");
            }
        }
    }

}

/// Copy-out snapshot of the whole workflow, for display threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStatus {
    pub current_agent: Option<String>,
    pub current_agent_display_name: Option<String>,
    pub agent_history: Vec<String>,
    pub agent_statuses: Vec<AgentStatusInfo>,
    pub is_completed: bool,
    pub error_message: Option<String>,
    pub tool_calls_count: usize,
}

/// One row of the per-agent progress walk, in history order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentProgressEntry {
    pub agent: String,
    pub display_name: String,
    pub status: AgentPhase,
    pub message: String,
    pub is_current: bool,
}
