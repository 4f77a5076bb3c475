use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub meeting_id: String,
    pub meeting_topic: String,
    #[serde(default)]
    pub meeting_location: Option<String>,
    #[serde(default)]
    pub meeting_date: Option<String>,
    #[serde(default)]
    pub meeting_project_id: Option<String>,
}

/// Body of `POST /meeting/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    pub meeting_topic: String,
    pub meeting_location: String,
    pub meeting_date: Option<String>,
    pub meeting_project_id: String,
}
