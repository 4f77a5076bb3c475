use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use taskboard_common::task::TaskWire;
use taskboard_common::{
    ActivityLog, ChangePasswordRequest, Comment, EditProfileRequest, FavourUpdate, Invite,
    LoginRequest, Meeting, Member, NewComment, NewMeeting, NewProject, NewTask, Notification,
    Project, RegisterRequest, Session, Task, TaskId, TaskStatus, TaskUpdate,
};

use super::BoardBackend;
use crate::errors::GatewayError;

pub const DEFAULT_API_URL: &str = "http://localhost:9000";

/// Client for the taskboard REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("taskboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authed(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.header("Authorization", session.bearer())
    }

    /// Send and map the status line. 401 is singled out so callers can drop
    /// the session.
    async fn execute(&self, builder: RequestBuilder, url: &str) -> Result<reqwest::Response, GatewayError> {
        debug!(url, "backend request");
        let resp = builder.send().await.map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(url, "backend rejected session");
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder, url: &str) -> Result<T, GatewayError> {
        let resp = self.execute(builder, url).await?;
        let bytes = resp.bytes().await.map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn empty(&self, builder: RequestBuilder, url: &str) -> Result<(), GatewayError> {
        self.execute(builder, url).await.map(|_| ())
    }

    // ── Account ──────────────────────────────────────────────────────

    pub async fn login(&self, request: &LoginRequest) -> Result<Session, GatewayError> {
        let url = self.url("login");
        self.json(self.client.post(&url).json(request), &url).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), GatewayError> {
        let url = self.url("register");
        self.empty(self.client.post(&url).json(request), &url).await
    }

    pub async fn change_password(
        &self,
        session: &Session,
        request: &ChangePasswordRequest,
    ) -> Result<(), GatewayError> {
        let url = self.url("member/change-password");
        let req = self.authed(self.client.put(&url), session).json(request);
        self.empty(req, &url).await
    }

    pub async fn member(&self, session: &Session, member_id: &str) -> Result<Member, GatewayError> {
        let url = self.url("member");
        let req = self
            .authed(self.client.get(&url), session)
            .query(&[("m", member_id)]);
        self.json(req, &url).await
    }

    pub async fn edit_profile(
        &self,
        session: &Session,
        request: &EditProfileRequest,
    ) -> Result<Member, GatewayError> {
        let url = self.url("member/edit-profile");
        let req = self.authed(self.client.put(&url), session).json(request);
        self.json(req, &url).await
    }

    // ── Projects ─────────────────────────────────────────────────────

    pub async fn projects(&self, session: &Session, email: &str) -> Result<Vec<Project>, GatewayError> {
        let url = self.url(&format!("project/{}", email));
        self.json(self.authed(self.client.get(&url), session), &url)
            .await
    }

    pub async fn create_project(&self, session: &Session, project: &NewProject) -> Result<(), GatewayError> {
        let url = self.url("project/create");
        let req = self.authed(self.client.post(&url), session).json(project);
        self.empty(req, &url).await
    }

    pub async fn update_favour(&self, session: &Session, update: &FavourUpdate) -> Result<(), GatewayError> {
        let url = self.url("project/update-favour");
        let req = self.authed(self.client.put(&url), session).json(update);
        self.empty(req, &url).await
    }

    pub async fn delete_project(&self, session: &Session, project_id: &str) -> Result<(), GatewayError> {
        let url = self.url("project/delete");
        let req = self
            .authed(self.client.delete(&url), session)
            .query(&[("p", project_id)]);
        self.empty(req, &url).await
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Tasks of one project. Records are validated here so a malformed one
    /// never reaches the board.
    pub async fn project_tasks(&self, session: &Session, project_id: &str) -> Result<Vec<Task>, GatewayError> {
        let url = self.url(&format!("{}/task", project_id));
        let wire: Vec<TaskWire> = self
            .json(self.authed(self.client.get(&url), session), &url)
            .await?;
        wire.into_iter()
            .map(|t| Task::try_from(t).map_err(GatewayError::from))
            .collect()
    }

    pub async fn create_task(&self, session: &Session, task: &NewTask) -> Result<(), GatewayError> {
        let url = self.url("task/create");
        let req = self.authed(self.client.post(&url), session).json(task);
        self.empty(req, &url).await
    }

    pub async fn update_task(&self, session: &Session, update: &TaskUpdate) -> Result<(), GatewayError> {
        let url = self.url("task/update");
        let req = self.authed(self.client.put(&url), session).json(update);
        self.empty(req, &url).await
    }

    pub async fn set_task_status(
        &self,
        session: &Session,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<(), GatewayError> {
        let url = self.url("task/update-status");
        let req = self
            .authed(self.client.put(&url), session)
            .query(&[("t", task_id.as_str()), ("s", status.as_str())]);
        self.empty(req, &url).await
    }

    pub async fn add_participants(
        &self,
        session: &Session,
        task_id: &TaskId,
        member_ids: &[String],
    ) -> Result<(), GatewayError> {
        let url = self.url("task/addParticipate");
        let req = self
            .authed(self.client.post(&url), session)
            .query(&[("t", task_id.as_str())])
            .json(member_ids);
        self.empty(req, &url).await
    }

    pub async fn remove_participants(
        &self,
        session: &Session,
        task_id: &TaskId,
        member_ids: &[String],
    ) -> Result<(), GatewayError> {
        let url = self.url("task/deleteParticipate");
        let req = self
            .authed(self.client.delete(&url), session)
            .query(&[("t", task_id.as_str())])
            .json(member_ids);
        self.empty(req, &url).await
    }

    pub async fn delete_task(&self, session: &Session, task_id: &TaskId) -> Result<(), GatewayError> {
        let url = self.url("task/delete");
        let req = self
            .authed(self.client.delete(&url), session)
            .query(&[("t", task_id.as_str())]);
        self.empty(req, &url).await
    }

    // ── Members, meetings, comments ──────────────────────────────────

    pub async fn project_members(&self, session: &Session, project_id: &str) -> Result<Vec<Member>, GatewayError> {
        let url = self.url(&format!("{}/member", project_id));
        self.json(self.authed(self.client.get(&url), session), &url)
            .await
    }

    pub async fn invite(&self, session: &Session, project_id: &str, invite: &Invite) -> Result<(), GatewayError> {
        let url = self.url(&format!("{}/assign", project_id));
        let req = self.authed(self.client.post(&url), session).json(invite);
        self.empty(req, &url).await
    }

    pub async fn meetings(&self, session: &Session, project_id: &str) -> Result<Vec<Meeting>, GatewayError> {
        let url = self.url(&format!("{}/meeting", project_id));
        self.json(self.authed(self.client.get(&url), session), &url)
            .await
    }

    pub async fn create_meeting(&self, session: &Session, meeting: &NewMeeting) -> Result<(), GatewayError> {
        let url = self.url("meeting/create");
        let req = self.authed(self.client.post(&url), session).json(meeting);
        self.empty(req, &url).await
    }

    pub async fn comments(&self, session: &Session, task_id: &TaskId) -> Result<Vec<Comment>, GatewayError> {
        let url = self.url(&format!("{}/comment", task_id));
        self.json(self.authed(self.client.get(&url), session), &url)
            .await
    }

    pub async fn create_comment(&self, session: &Session, comment: &NewComment) -> Result<(), GatewayError> {
        let url = self.url("comment/create");
        let req = self.authed(self.client.post(&url), session).json(comment);
        self.empty(req, &url).await
    }

    // ── Notifications and activity ───────────────────────────────────

    pub async fn notifications(&self, session: &Session) -> Result<Vec<Notification>, GatewayError> {
        let url = self.url("notification");
        let req = self
            .authed(self.client.get(&url), session)
            .query(&[("m", session.member_id.as_str())]);
        self.json(req, &url).await
    }

    pub async fn mark_notification_read(&self, session: &Session, notification_id: &str) -> Result<(), GatewayError> {
        let url = self.url("notification");
        let req = self
            .authed(self.client.put(&url), session)
            .query(&[("n", notification_id)]);
        self.empty(req, &url).await
    }

    pub async fn activity(&self, session: &Session, project_id: &str) -> Result<Vec<ActivityLog>, GatewayError> {
        let url = self.url("log");
        let req = self
            .authed(self.client.get(&url), session)
            .query(&[("p", project_id)]);
        self.json(req, &url).await
    }
}

#[async_trait]
impl BoardBackend for HttpGateway {
    #[instrument(skip(self, session), fields(base = %self.base_url))]
    async fn fetch_board(&self, session: &Session, project_id: &str) -> Result<Vec<Task>, GatewayError> {
        self.project_tasks(session, project_id).await
    }

    #[instrument(skip(self, session), fields(task = %task_id, status = %status))]
    async fn update_task_status(
        &self,
        session: &Session,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<(), GatewayError> {
        self.set_task_status(session, task_id, status).await
    }
}
