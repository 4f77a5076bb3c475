use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use taskboard_common::{Column, Session, TaskId};

use super::drag::{DragController, DragEndHandler, DropEvent, DropLocation, intent_from_drop};
use super::reducer;
use super::state::{BoardState, MoveIntent};
use super::store::BoardStore;
use super::sync::{ReloadPolicy, SyncAgent, SyncOutcome};
use crate::errors::{BoardError, GatewayError};
use crate::gateway::BoardBackend;

/// One project's board: the store, the sync agent behind it, and the
/// session used for every call.
///
/// Drops are applied to the store before returning; cross-column moves are
/// then persisted on the runtime. [`settle`](Self::settle) waits for those.
///
/// The runtime is the one current when the service was built, or the one
/// given to [`with_runtime`](Self::with_runtime). `on_drop` may then be
/// called from any thread, e.g. a UI thread without a runtime of its own.
pub struct BoardService<B: BoardBackend> {
    backend: Arc<B>,
    store: BoardStore,
    agent: SyncAgent<B>,
    project_id: String,
    session: Session,
    runtime: Option<Handle>,
    pending: Mutex<Vec<JoinHandle<SyncOutcome>>>,
    rejected: Mutex<Option<BoardError>>,
}

impl<B: BoardBackend + 'static> BoardService<B> {
    pub fn new(backend: Arc<B>, project_id: impl Into<String>, session: Session, policy: ReloadPolicy) -> Self {
        let project_id = project_id.into();
        let store = BoardStore::default();
        let agent = SyncAgent::new(backend.clone(), store.clone(), project_id.clone(), policy);
        Self {
            backend,
            store,
            agent,
            project_id,
            session,
            runtime: Handle::try_current().ok(),
            pending: Mutex::new(Vec::new()),
            rejected: Mutex::new(None),
        }
    }

    /// Persist on `runtime` instead of the runtime current at construction.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn state(&self) -> Arc<BoardState> {
        self.store.state()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetch the project's tasks and replace the board with them.
    pub async fn load(&self) -> Result<(), GatewayError> {
        let tasks = self.backend.fetch_board(&self.session, &self.project_id).await?;
        let state = BoardState::from_tasks(tasks);
        debug!(project = %self.project_id, tasks = state.len(), "board loaded");
        self.store.set_state(state);
        Ok(())
    }

    /// Handle a finished drag. Returns the intent that was applied, or
    /// `None` when the card was dropped outside every column.
    pub fn on_drop(&self, event: &DropEvent) -> Result<Option<MoveIntent>, BoardError> {
        self.rejected.lock().unwrap_or_else(PoisonError::into_inner).take();
        let intent = DragController::new(self).handle_drop(event)?;
        match self.rejected.lock().unwrap_or_else(PoisonError::into_inner).take() {
            Some(err) => Err(err),
            None => Ok(intent),
        }
    }

    /// Move a task by id and wait for its own persist to settle.
    ///
    /// `index` defaults to the end of the destination column. Returns `None`
    /// when nothing was sent, which is the case for moves within a column.
    /// Persists spawned by earlier drops are left to [`settle`](Self::settle).
    pub async fn move_task(
        &self,
        task_id: &TaskId,
        column: Column,
        index: Option<usize>,
    ) -> Result<Option<SyncOutcome>, BoardError> {
        let state = self.store.state();
        let from = state
            .locate(task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.clone()))?;
        let index = index.unwrap_or_else(|| {
            let len = state.column(column).len();
            if from.column == column { len.saturating_sub(1) } else { len }
        });

        let event = DropEvent {
            source: DropLocation::new(from.column, from.index),
            destination: Some(DropLocation::new(column, index)),
            draggable_id: task_id.to_string(),
        };
        let Some(intent) = intent_from_drop(&event)? else {
            return Ok(None);
        };
        let Some(handle) = self.dispatch(&intent)? else {
            return Ok(None);
        };
        match handle.await {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                warn!(error = %e, "persist task did not complete");
                Ok(None)
            }
        }
    }

    /// Wait for every persist spawned so far.
    pub async fn settle(&self) -> Vec<SyncOutcome> {
        let handles: Vec<_> = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        join_all(handles)
            .await
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!(error = %e, "persist task did not complete");
                    None
                }
            })
            .collect()
    }

    /// Apply `intent` to the store and, for a cross-column move, spawn its
    /// persist. Nothing is written when no runtime is available to persist.
    fn dispatch(&self, intent: &MoveIntent) -> Result<Option<JoinHandle<SyncOutcome>>, BoardError> {
        let next = reducer::apply(&self.store.state(), intent)?;
        let status = next
            .task(&intent.task_id)
            .map(|t| t.status)
            .ok_or_else(|| BoardError::TaskNotFound(intent.task_id.clone()))?;

        if !intent.is_cross_column() {
            self.store.set_state(next);
            return Ok(None);
        }
        let runtime = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
            .ok_or(BoardError::NoRuntime)?;
        self.store.set_state(next);
        let persist = self.agent.persist(intent.task_id.clone(), status, &self.session);
        Ok(Some(runtime.spawn(persist)))
    }
}

impl<B: BoardBackend + 'static> DragEndHandler for BoardService<B> {
    fn on_drag_end(&self, intent: MoveIntent) {
        match self.dispatch(&intent) {
            Ok(Some(handle)) => self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(handle),
            Ok(None) => {}
            Err(err) => {
                warn!(task = %intent.task_id, error = %err, "move rejected");
                *self.rejected.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
            }
        }
    }
}
