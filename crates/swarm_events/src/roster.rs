/// Display metadata for one known agent id.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub id: String,
    pub display_name: String,
    pub working_message: String,
    pub completed_message: String,
}

impl RosterEntry {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        working_message: impl Into<String>,
        completed_message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            working_message: working_message.into(),
            completed_message: completed_message.into(),
        }
    }
}

/// Fixed id -> (display name, per-phase message) table.
///
/// Unknown ids fall back to the raw id and templated messages, so the adapter
/// keeps working when the runtime introduces agents the UI was not told about.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRoster {
    entries: Vec<RosterEntry>,
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self {
            entries: vec![
                RosterEntry::new(
                    "lead_agent",
                    "Lead Agent (coordinator)",
                    "Analyzing the user request...",
                    "Analysis complete",
                ),
                RosterEntry::new(
                    "data_expert",
                    "Data Expert",
                    "Exploring the data catalog...",
                    "Table identification complete",
                ),
                RosterEntry::new(
                    "sql_agent",
                    "SQL Agent",
                    "Generating and running SQL queries...",
                    "Query execution complete",
                ),
            ],
        }
    }
}

impl AgentRoster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: RosterEntry) {
        self.entries.push(entry);
    }

    fn entry(&self, id: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn display_name(&self, id: &str) -> String {
        self.entry(id)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn working_message(&self, id: &str) -> String {
        self.entry(id)
            .map(|e| e.working_message.clone())
            .unwrap_or_else(|| format!("{} is starting work...", self.display_name(id)))
    }

    pub fn completed_message(&self, id: &str) -> String {
        self.entry(id)
            .map(|e| e.completed_message.clone())
            .unwrap_or_else(|| format!("{} finished", self.display_name(id)))
    }

    /// Message announcing a handoff to `id`; known agents reuse their working
    /// message, unknown ones get a templated line.
    pub fn handoff_message(&self, id: &str) -> String {
        self.entry(id)
            .map(|e| e.working_message.clone())
            .unwrap_or_else(|| format!("Handing work to {}...", self.display_name(id)))
    }
}
