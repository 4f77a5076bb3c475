use serde::{Deserialize, Serialize};

/// One entry of a project's activity log (`GET /log?p=<projectId>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub log_action: String,
    #[serde(default)]
    pub log_time: Option<String>,
    #[serde(default)]
    pub log_project: Option<String>,
    /// Member id of whoever performed the action.
    pub log_actor: String,
    #[serde(default)]
    pub task_name: Option<String>,
}
