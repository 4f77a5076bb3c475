//! Background persistence of optimistic moves.
//!
//! The board is updated before the server hears about a move. [`SyncAgent`]
//! then sends the status change; on failure it replaces the board with the
//! server's copy.
//!
//! Two drags can overlap: the reload triggered by the first failure may land
//! after the second drag was applied. [`ReloadPolicy`] decides what happens
//! then. `DiscardIfSuperseded` drops a reload whose starting version is no
//! longer current and reconciles again once no persist is in flight.
//! `LastWriteWins` applies every reload, which can briefly revert the later
//! drag on screen.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, warn};

use taskboard_common::{Session, TaskId, TaskStatus};

use super::state::BoardState;
use super::store::BoardStore;
use crate::errors::GatewayError;
use crate::gateway::BoardBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadPolicy {
    #[default]
    DiscardIfSuperseded,
    LastWriteWins,
}

impl ReloadPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DiscardIfSuperseded => "discard-if-superseded",
            Self::LastWriteWins => "last-write-wins",
        }
    }
}

impl fmt::Display for ReloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReloadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discard-if-superseded" => Ok(Self::DiscardIfSuperseded),
            "last-write-wins" => Ok(Self::LastWriteWins),
            _ => Err(format!("Invalid reload policy: {}", s)),
        }
    }
}

/// How one persist ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The server accepted the status change.
    Confirmed,
    /// The update failed and the board was replaced with the server's copy.
    Reconciled,
    /// The update failed, but the board moved on while the reload was in
    /// flight, so the reload was dropped.
    ReloadDiscarded,
    /// The update failed and so did the reload; the optimistic board stays.
    ReloadFailed(String),
    /// The server rejected the session.
    SessionExpired,
}

impl SyncOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

struct Inner<B> {
    backend: Arc<B>,
    store: BoardStore,
    project_id: String,
    policy: ReloadPolicy,
    in_flight: AtomicUsize,
    reconcile_pending: AtomicBool,
}

pub struct SyncAgent<B: BoardBackend> {
    inner: Arc<Inner<B>>,
}

impl<B: BoardBackend> Clone for SyncAgent<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: BoardBackend + 'static> SyncAgent<B> {
    pub fn new(
        backend: Arc<B>,
        store: BoardStore,
        project_id: impl Into<String>,
        policy: ReloadPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                store,
                project_id: project_id.into(),
                policy,
                in_flight: AtomicUsize::new(0),
                reconcile_pending: AtomicBool::new(false),
            }),
        }
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.inner.policy
    }

    /// Persists currently unsettled.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Send `status` for `task_id` to the server.
    ///
    /// The persist counts as in flight from the moment this is called, not
    /// from the first poll of the returned future, so a drag applied right
    /// after is already covered when an earlier reload is judged. Dropping
    /// the future without running it releases the count.
    pub fn persist(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        session: &Session,
    ) -> impl Future<Output = SyncOutcome> + Send + 'static {
        let guard = InFlight::enter(&self.inner);
        let agent = self.clone();
        let session = session.clone();
        let span = info_span!("persist", task = %task_id, status = %status);
        async move {
            let outcome = agent.run_persist(&task_id, status, &session).await;
            drop(guard);
            if outcome != SyncOutcome::SessionExpired {
                agent.run_deferred_reconcile(&session).await;
            }
            outcome
        }
        .instrument(span)
    }

    async fn run_persist(&self, task_id: &TaskId, status: TaskStatus, session: &Session) -> SyncOutcome {
        let inner = &self.inner;
        match inner.backend.update_task_status(session, task_id, status).await {
            Ok(()) => {
                debug!("status update confirmed");
                SyncOutcome::Confirmed
            }
            Err(GatewayError::Unauthorized) => SyncOutcome::SessionExpired,
            Err(e) => {
                warn!(error = %e, "status update failed, reloading board");
                self.reload(session).await
            }
        }
    }

    /// Replace the board with the server's copy, subject to the policy.
    pub async fn reload(&self, session: &Session) -> SyncOutcome {
        let inner = &self.inner;
        let started_at = inner.store.version();
        let tasks = match inner.backend.fetch_board(session, &inner.project_id).await {
            Ok(tasks) => tasks,
            Err(GatewayError::Unauthorized) => return SyncOutcome::SessionExpired,
            Err(e) => {
                warn!(error = %e, "board reload failed, keeping optimistic board");
                return SyncOutcome::ReloadFailed(e.to_string());
            }
        };
        let fresh = BoardState::from_tasks(tasks);

        match inner.policy {
            ReloadPolicy::LastWriteWins => {
                inner.store.set_state(fresh);
                info!("board reconciled with server");
                SyncOutcome::Reconciled
            }
            ReloadPolicy::DiscardIfSuperseded => {
                if inner.store.set_state_if_version(started_at, fresh) {
                    info!("board reconciled with server");
                    SyncOutcome::Reconciled
                } else {
                    info!(
                        started_at,
                        now = inner.store.version(),
                        "board changed during reload, deferring reconcile"
                    );
                    inner.reconcile_pending.store(true, Ordering::SeqCst);
                    SyncOutcome::ReloadDiscarded
                }
            }
        }
    }

    /// Run the reconcile a discarded reload left behind, once nothing is in
    /// flight. A deferred reload can itself be discarded by a local write
    /// (a same-column reorder is never persisted), so keep going until one
    /// lands or fails. A persist started meanwhile takes the job over.
    async fn run_deferred_reconcile(&self, session: &Session) {
        let inner = &self.inner;
        loop {
            if inner.in_flight.load(Ordering::SeqCst) > 0 {
                return;
            }
            if !inner.reconcile_pending.swap(false, Ordering::SeqCst) {
                return;
            }
            debug!("no persists in flight, running deferred reconcile");
            let deferred = self.reload(session).await;
            debug!(?deferred, "deferred reconcile finished");
            if deferred == SyncOutcome::SessionExpired {
                return;
            }
        }
    }
}

/// One unit of `in_flight`, released on drop.
struct InFlight<B> {
    inner: Arc<Inner<B>>,
}

impl<B> InFlight<B> {
    fn enter(inner: &Arc<Inner<B>>) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self {
            inner: Arc::clone(inner),
        }
    }
}

impl<B> Drop for InFlight<B> {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use taskboard_common::{Column, Task};
    use tokio::sync::Notify;

    use crate::board::reducer;
    use crate::board::state::{MoveIntent, Position};

    /// In-memory server. Status updates can be made to fail, and the first
    /// `hold_first` board fetches wait on `hold_fetch` until the test
    /// releases them.
    #[derive(Default)]
    struct FakeServer {
        tasks: Mutex<Vec<Task>>,
        fail_updates: AtomicBool,
        fail_fetch: AtomicBool,
        unauthorized: AtomicBool,
        hold_fetch: Option<Arc<Notify>>,
        hold_first: usize,
        fetch_started: Arc<Notify>,
        fetches: AtomicUsize,
    }

    impl FakeServer {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            Self {
                tasks: Mutex::new(tasks),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl BoardBackend for FakeServer {
        async fn fetch_board(&self, _: &Session, _: &str) -> Result<Vec<Task>, GatewayError> {
            let earlier = self.fetches.fetch_add(1, Ordering::SeqCst);
            self.fetch_started.notify_one();
            if let Some(gate) = self.hold_fetch.as_ref().filter(|_| earlier < self.hold_first) {
                gate.notified().await;
            }
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(GatewayError::Decode {
                    url: "fake".into(),
                    message: "offline".into(),
                });
            }
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn update_task_status(
            &self,
            _: &Session,
            task_id: &TaskId,
            status: TaskStatus,
        ) -> Result<(), GatewayError> {
            if self.unauthorized.load(Ordering::SeqCst) {
                return Err(GatewayError::Unauthorized);
            }
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(GatewayError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    body: "boom".into(),
                });
            }
            let mut tasks = self.tasks.lock().unwrap();
            if let Some(t) = tasks.iter_mut().find(|t| &t.id == task_id) {
                t.status = status;
            }
            Ok(())
        }
    }

    fn session() -> Session {
        Session {
            token: "jwt".into(),
            member_id: "m-1".into(),
            detail: Default::default(),
        }
    }

    fn server_tasks() -> Vec<Task> {
        vec![
            Task::new("a", "Write copy", TaskStatus::Todo),
            Task::new("b", "Pick fonts", TaskStatus::Todo),
            Task::new("c", "Ship", TaskStatus::InProgress),
        ]
    }

    /// Apply a move to the store the way the service does.
    fn apply_move(store: &BoardStore, id: &str, from: Position, to: Position) {
        let intent = MoveIntent {
            task_id: TaskId::new(id),
            source: from,
            destination: to,
        };
        let next = reducer::apply(&store.state(), &intent).unwrap();
        store.set_state(next);
    }

    #[tokio::test]
    async fn test_confirmed_persist_leaves_board_alone() {
        let server = Arc::new(FakeServer::with_tasks(server_tasks()));
        let store = BoardStore::new(BoardState::from_tasks(server_tasks()));
        let agent = SyncAgent::new(server.clone(), store.clone(), "p-1", ReloadPolicy::default());

        apply_move(&store, "a", Position::new(Column::Todo, 0), Position::new(Column::Done, 0));
        let version = store.version();
        let outcome = agent.persist("a".into(), TaskStatus::Done, &session()).await;

        assert_eq!(outcome, SyncOutcome::Confirmed);
        assert_eq!(store.version(), version);
        assert_eq!(server.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(agent.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_failed_persist_restores_server_board() {
        let server = Arc::new(FakeServer::with_tasks(server_tasks()));
        server.fail_updates.store(true, Ordering::SeqCst);
        let store = BoardStore::new(BoardState::from_tasks(server_tasks()));
        let agent = SyncAgent::new(server.clone(), store.clone(), "p-1", ReloadPolicy::default());

        apply_move(&store, "a", Position::new(Column::Todo, 0), Position::new(Column::Done, 0));
        assert_eq!(store.state().column(Column::Done).len(), 1);

        let outcome = agent.persist("a".into(), TaskStatus::Done, &session()).await;
        assert_eq!(outcome, SyncOutcome::Reconciled);
        assert_eq!(*store.state(), BoardState::from_tasks(server_tasks()));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_optimistic_board() {
        let server = Arc::new(FakeServer::with_tasks(server_tasks()));
        server.fail_updates.store(true, Ordering::SeqCst);
        server.fail_fetch.store(true, Ordering::SeqCst);
        let store = BoardStore::new(BoardState::from_tasks(server_tasks()));
        let agent = SyncAgent::new(server, store.clone(), "p-1", ReloadPolicy::default());

        apply_move(&store, "a", Position::new(Column::Todo, 0), Position::new(Column::Done, 0));
        let optimistic = store.state();

        let outcome = agent.persist("a".into(), TaskStatus::Done, &session()).await;
        assert!(matches!(outcome, SyncOutcome::ReloadFailed(msg) if msg.contains("offline")));
        assert_eq!(store.state(), optimistic);
    }

    #[tokio::test]
    async fn test_unauthorized_reports_session_expired_without_reload() {
        let server = Arc::new(FakeServer::with_tasks(server_tasks()));
        server.unauthorized.store(true, Ordering::SeqCst);
        let store = BoardStore::new(BoardState::from_tasks(server_tasks()));
        let agent = SyncAgent::new(server.clone(), store, "p-1", ReloadPolicy::default());

        let outcome = agent.persist("a".into(), TaskStatus::Done, &session()).await;
        assert_eq!(outcome, SyncOutcome::SessionExpired);
        assert_eq!(server.fetches.load(Ordering::SeqCst), 0);
    }

    /// Drag 1 fails; its reload is held open while drag 2 is applied and
    /// persisted; then the reload is released.
    async fn overlapping_drags(policy: ReloadPolicy) -> (BoardStore, SyncOutcome, Arc<FakeServer>) {
        let gate = Arc::new(Notify::new());
        let server = Arc::new(FakeServer {
            tasks: Mutex::new(server_tasks()),
            hold_fetch: Some(gate.clone()),
            hold_first: 1,
            ..Default::default()
        });
        server.fail_updates.store(true, Ordering::SeqCst);
        let store = BoardStore::new(BoardState::from_tasks(server_tasks()));
        let agent = SyncAgent::new(server.clone(), store.clone(), "p-1", policy);

        apply_move(&store, "a", Position::new(Column::Todo, 0), Position::new(Column::Done, 0));
        let first = tokio::spawn(agent.persist("a".into(), TaskStatus::Done, &session()));
        server.fetch_started.notified().await;

        // Drag 2 lands while the reload is outstanding and will succeed.
        server.fail_updates.store(false, Ordering::SeqCst);
        apply_move(&store, "b", Position::new(Column::Todo, 0), Position::new(Column::Progress, 0));
        let second = agent.persist("b".into(), TaskStatus::InProgress, &session());

        gate.notify_one();
        let first_outcome = first.await.unwrap();
        assert_eq!(second.await, SyncOutcome::Confirmed);
        (store, first_outcome, server)
    }

    #[tokio::test]
    async fn test_overlap_discard_if_superseded_keeps_later_drag() {
        let (store, outcome, server) = overlapping_drags(ReloadPolicy::DiscardIfSuperseded).await;
        assert_eq!(outcome, SyncOutcome::ReloadDiscarded);

        // The deferred reconcile ran when drag 2 settled.
        assert_eq!(server.fetches.load(Ordering::SeqCst), 2);
        let state = store.state();
        assert_eq!(state.task(&"b".into()).unwrap().status, TaskStatus::InProgress);
        assert_eq!(state.task(&"a".into()).unwrap().status, TaskStatus::Todo);
        state.check_invariants().unwrap();
    }

    #[tokio::test]
    async fn test_overlap_last_write_wins_applies_stale_reload() {
        let (store, outcome, server) = overlapping_drags(ReloadPolicy::LastWriteWins).await;
        assert_eq!(outcome, SyncOutcome::Reconciled);
        assert_eq!(server.fetches.load(Ordering::SeqCst), 1);
        // The reload snapshot predates drag 2, so drag 2 is reverted on screen
        // even though the server accepted it.
        assert_eq!(
            store.state().task(&"b".into()).unwrap().status,
            TaskStatus::Todo
        );
    }

    #[tokio::test]
    async fn test_deferred_reconcile_retries_after_local_reorders() {
        let tasks = vec![
            Task::new("a", "Write copy", TaskStatus::Todo),
            Task::new("b", "Pick fonts", TaskStatus::Todo),
            Task::new("c", "Book venue", TaskStatus::Todo),
            Task::new("d", "Ship", TaskStatus::InProgress),
        ];
        let gate = Arc::new(Notify::new());
        let server = Arc::new(FakeServer {
            tasks: Mutex::new(tasks.clone()),
            hold_fetch: Some(gate.clone()),
            hold_first: 2,
            ..Default::default()
        });
        server.fail_updates.store(true, Ordering::SeqCst);
        let store = BoardStore::new(BoardState::from_tasks(tasks.clone()));
        let agent = SyncAgent::new(server.clone(), store.clone(), "p-1", ReloadPolicy::default());

        apply_move(&store, "a", Position::new(Column::Todo, 0), Position::new(Column::Done, 0));
        let persist = tokio::spawn(agent.persist("a".into(), TaskStatus::Done, &session()));
        server.fetch_started.notified().await;

        // A reorder within Todo supersedes the first reload...
        apply_move(&store, "b", Position::new(Column::Todo, 0), Position::new(Column::Todo, 1));
        gate.notify_one();
        server.fetch_started.notified().await;

        // ...and another one supersedes the deferred reload as well.
        apply_move(&store, "c", Position::new(Column::Todo, 0), Position::new(Column::Todo, 1));
        gate.notify_one();

        assert_eq!(persist.await.unwrap(), SyncOutcome::ReloadDiscarded);
        assert_eq!(server.fetches.load(Ordering::SeqCst), 3);
        assert_eq!(agent.in_flight(), 0);
        assert!(!agent.inner.reconcile_pending.load(Ordering::SeqCst));
        assert_eq!(*store.state(), BoardState::from_tasks(tasks));
    }

    #[test]
    fn test_dropped_persist_releases_in_flight() {
        let server = Arc::new(FakeServer::with_tasks(server_tasks()));
        let store = BoardStore::new(BoardState::from_tasks(server_tasks()));
        let agent = SyncAgent::new(server.clone(), store, "p-1", ReloadPolicy::default());

        let persist = agent.persist("a".into(), TaskStatus::Done, &session());
        assert_eq!(agent.in_flight(), 1);
        drop(persist);
        assert_eq!(agent.in_flight(), 0);
        assert_eq!(server.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dropped_persist_does_not_block_deferred_reconcile() {
        let gate = Arc::new(Notify::new());
        let server = Arc::new(FakeServer {
            tasks: Mutex::new(server_tasks()),
            hold_fetch: Some(gate.clone()),
            hold_first: 1,
            ..Default::default()
        });
        server.fail_updates.store(true, Ordering::SeqCst);
        let store = BoardStore::new(BoardState::from_tasks(server_tasks()));
        let agent = SyncAgent::new(server.clone(), store.clone(), "p-1", ReloadPolicy::default());

        drop(agent.persist("c".into(), TaskStatus::Done, &session()));

        apply_move(&store, "a", Position::new(Column::Todo, 0), Position::new(Column::Done, 0));
        let persist = tokio::spawn(agent.persist("a".into(), TaskStatus::Done, &session()));
        server.fetch_started.notified().await;
        apply_move(&store, "b", Position::new(Column::Todo, 0), Position::new(Column::Todo, 0));
        gate.notify_one();

        assert_eq!(persist.await.unwrap(), SyncOutcome::ReloadDiscarded);
        assert_eq!(server.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(*store.state(), BoardState::from_tasks(server_tasks()));
    }

    #[test]
    fn test_reload_policy_parse() {
        assert_eq!(
            "last-write-wins".parse::<ReloadPolicy>().unwrap(),
            ReloadPolicy::LastWriteWins
        );
        assert_eq!(ReloadPolicy::default().as_str(), "discard-if-superseded");
        assert!("sometimes".parse::<ReloadPolicy>().is_err());
    }
}
