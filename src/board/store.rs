use std::sync::Arc;

use tokio::sync::watch;

use super::state::BoardState;

/// What a reader sees: the board and the version it was written at.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub version: u64,
    pub state: Arc<BoardState>,
}

/// Holder of the current board.
///
/// Every write replaces the whole board and bumps `version` by one. Readers
/// either take a [`BoardSnapshot`] or [`subscribe`](Self::subscribe) to be
/// woken on each replacement.
#[derive(Debug, Clone)]
pub struct BoardStore {
    tx: Arc<watch::Sender<BoardSnapshot>>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(BoardState::empty())
    }
}

impl BoardStore {
    pub fn new(initial: BoardState) -> Self {
        let (tx, _rx) = watch::channel(BoardSnapshot {
            version: 0,
            state: Arc::new(initial),
        });
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> Arc<BoardState> {
        self.tx.borrow().state.clone()
    }

    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.tx.subscribe()
    }

    /// Replace the board. Returns the new version.
    pub fn set_state(&self, state: BoardState) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.state = Arc::new(state);
            version = snapshot.version;
        });
        version
    }

    /// Replace the board only if nothing has been written since `expected`.
    /// Returns whether the write happened.
    pub fn set_state_if_version(&self, expected: u64, state: BoardState) -> bool {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.version != expected {
                return false;
            }
            snapshot.version += 1;
            snapshot.state = Arc::new(state);
            true
        })
    }
}
