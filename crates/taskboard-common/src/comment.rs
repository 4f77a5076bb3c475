use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: String,
    pub comment_content: String,
    #[serde(default)]
    pub comment_task_id: Option<String>,
    #[serde(default)]
    pub comment_member_id: Option<String>,
    #[serde(default)]
    pub comment_time: Option<String>,
}

/// Body of `POST /comment/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub comment_content: String,
    pub comment_task_id: String,
    pub comment_member_id: String,
}
