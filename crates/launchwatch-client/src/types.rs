use serde::{Deserialize, Serialize};

/// Response to a task-creation request. The service sometimes includes the
/// live preview URL immediately and sometimes only once the browser session
/// is up, hence the separate polling path in the client.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreated {
    pub id: String,
    #[serde(default)]
    pub live_url: Option<String>,
}

/// Lifecycle states reported by the task service. The status endpoint
/// returns the state as a bare JSON string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Created,
    Running,
    Paused,
    Finished,
    Failed,
    Stopped,
}

impl TaskStatus {
    /// Whether the task has reached a state it cannot leave.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Stopped)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
        }
    }
}
