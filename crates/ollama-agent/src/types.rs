use serde::{Deserialize, Serialize};

/// Body of `GET /api/tags`. Only the fields this crate reads are modelled;
/// everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
}

/// Result of a single reachability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The tags endpoint answered with a 2xx status.
    Running,
    /// Nothing is listening on the daemon's port.
    NotListening,
    /// Something answered, or the transport failed in an unexpected way.
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_running(&self) -> bool {
        matches!(self, ProbeOutcome::Running)
    }
}

/// Lifecycle of the daemon child process owned by a supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DaemonState {
    Stopped,
    Starting,
    Running,
}

impl DaemonState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DaemonState::Stopped => "stopped",
            DaemonState::Starting => "starting",
            DaemonState::Running => "running",
        }
    }
}

impl std::fmt::Display for DaemonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
