use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationStatus {
    #[serde(rename = "READ")]
    Read,
    #[serde(rename = "UNREAD", alias = "UN_READ")]
    Unread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    Project,
    Task,
    Meeting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub notification_id: String,
    #[serde(default)]
    pub notification_time: Option<String>,
    #[serde(default)]
    pub notification_detail: String,
    pub notification_status: NotificationStatus,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub meeting_id: Option<String>,
    #[serde(default)]
    pub receiver_id: Option<String>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.notification_status == NotificationStatus::Unread
    }
}

/// Number of unread entries, shown as the inbox badge.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| n.is_unread()).count()
}
