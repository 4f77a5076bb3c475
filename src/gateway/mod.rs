//! Access to the REST backend.
//!
//! [`HttpGateway`] covers every endpoint the client calls. The board sync
//! path only needs two of them, so it depends on the narrower
//! [`BoardBackend`] trait instead, which tests replace with in-memory doubles.

pub mod http;

pub use http::{DEFAULT_API_URL, HttpGateway};

use async_trait::async_trait;
use taskboard_common::{Session, Task, TaskId, TaskStatus};

use crate::errors::GatewayError;

#[async_trait]
pub trait BoardBackend: Send + Sync {
    /// Every task of the project, as the server currently has it.
    async fn fetch_board(&self, session: &Session, project_id: &str)
    -> Result<Vec<Task>, GatewayError>;

    /// Persist a task's new status.
    async fn update_task_status(
        &self,
        session: &Session,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<(), GatewayError>;
}
