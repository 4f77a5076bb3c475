//! Kanban board with optimistic reordering.
//!
//! ## Overview
//!
//! A drop is applied to the local board at once and persisted in the
//! background. When the server refuses the change, the board is reloaded
//! from the server, so what the user sees converges on what the server has.
//!
//! ## Module Map
//!
//! ```text
//!  DropEvent
//!     │
//!     v
//!  drag.rs     DragController::handle_drop() ──> DragEndHandler
//!     │                                              │
//!     │                                  service.rs  BoardService
//!     │                                              │
//!     v                                              v
//!  reducer.rs  apply(state, intent) ──────> store.rs  BoardStore::set_state()
//!                                                    ^
//!                                                    │ reload on failure
//!  sync.rs     SyncAgent::persist() ─── BoardBackend ┘
//! ```
//!
//! | Module    | Responsibility                                          |
//! |-----------|---------------------------------------------------------|
//! | `state`   | `BoardState`, `Position`, `MoveIntent`, invariants      |
//! | `reducer` | Pure move application                                   |
//! | `drag`    | Drop events and the `DragEndHandler` capability         |
//! | `store`   | Versioned whole-board holder over a `watch` channel     |
//! | `sync`    | Status persistence, reload, `ReloadPolicy`              |
//! | `service` | Wires the above for one project and session             |

pub mod drag;
pub mod reducer;
pub mod service;
pub mod state;
pub mod store;
pub mod sync;

pub use drag::{DragController, DragEndHandler, DropEvent, DropLocation};
pub use service::BoardService;
pub use state::{BoardState, InvariantViolation, MoveIntent, Position};
pub use store::{BoardSnapshot, BoardStore};
pub use sync::{ReloadPolicy, SyncAgent, SyncOutcome};
