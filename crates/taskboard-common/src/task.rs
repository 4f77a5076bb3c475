use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::member::Member;

/// Opaque task identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "TODO")]
    Todo,
    #[serde(rename = "PROGRESS", alias = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "PROGRESS",
            Self::Done => "DONE",
        }
    }

    pub fn column(&self) -> Column {
        match self {
            Self::Todo => Column::Todo,
            Self::InProgress => Column::Progress,
            Self::Done => Column::Done,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(Self::Todo),
            "PROGRESS" | "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

/// A board column. Each column holds exactly the tasks of one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Todo,
    #[serde(alias = "inProgress")]
    Progress,
    Done,
}

impl Column {
    /// Left-to-right board order.
    pub const ALL: [Column; 3] = [Column::Todo, Column::Progress, Column::Done];

    /// Droppable identifier used by the drag surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Progress => "progress",
            Self::Done => "done",
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self {
            Self::Todo => TaskStatus::Todo,
            Self::Progress => TaskStatus::InProgress,
            Self::Done => TaskStatus::Done,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "progress" | "inProgress" | "in_progress" => Ok(Self::Progress),
            "done" => Ok(Self::Done),
            _ => Err(format!("Invalid column: {}", s)),
        }
    }
}

/// A task as the board sees it.
///
/// Only `id` and `status` matter to reordering; everything else is payload
/// carried through untouched. Deserialization goes through [`TaskWire`] so a
/// malformed backend record is rejected instead of reaching the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskWire")]
pub struct Task {
    #[serde(rename = "taskId")]
    pub id: TaskId,
    #[serde(rename = "taskName")]
    pub name: String,
    #[serde(rename = "taskStatus")]
    pub status: TaskStatus,
    pub task_detail: Option<String>,
    pub task_project_id: Option<String>,
    pub task_due_date: Option<String>,
    pub task_participants: Vec<Member>,
    pub task_comments: Vec<Comment>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: TaskId::new(id),
            name: name.into(),
            status,
            task_detail: None,
            task_project_id: None,
            task_due_date: None,
            task_participants: Vec::new(),
            task_comments: Vec::new(),
        }
    }
}

/// Loose shape of a task as it arrives over the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWire {
    pub task_id: Option<String>,
    pub task_name: Option<String>,
    pub task_status: Option<String>,
    pub task_detail: Option<String>,
    pub task_project_id: Option<String>,
    pub task_due_date: Option<String>,
    pub task_participants: Option<Vec<Member>>,
    pub task_comments: Option<Vec<Comment>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedTask {
    #[error("task record has no taskId")]
    MissingId,
    #[error("task {id} has no taskName")]
    MissingName { id: String },
    #[error("task {id} has no taskStatus")]
    MissingStatus { id: String },
    #[error("task {id} has unknown status '{status}'")]
    UnknownStatus { id: String, status: String },
}

impl TryFrom<TaskWire> for Task {
    type Error = MalformedTask;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let id = wire
            .task_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(MalformedTask::MissingId)?;
        let name = wire
            .task_name
            .ok_or_else(|| MalformedTask::MissingName { id: id.clone() })?;
        let raw_status = wire
            .task_status
            .ok_or_else(|| MalformedTask::MissingStatus { id: id.clone() })?;
        let status = raw_status
            .parse::<TaskStatus>()
            .map_err(|_| MalformedTask::UnknownStatus {
                id: id.clone(),
                status: raw_status.clone(),
            })?;

        Ok(Self {
            id: TaskId::new(id),
            name,
            status,
            task_detail: wire.task_detail,
            task_project_id: wire.task_project_id,
            task_due_date: wire.task_due_date,
            task_participants: wire.task_participants.unwrap_or_default(),
            task_comments: wire.task_comments.unwrap_or_default(),
        })
    }
}

/// Body of `POST /task/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub task_name: String,
    pub task_detail: String,
    pub task_due_date: Option<String>,
    pub task_project_id: String,
    pub task_owner_id: String,
}

/// Body of `PUT /task/update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub task_id: String,
    pub task_name: String,
    pub task_detail: String,
    pub task_due_date: Option<String>,
}
