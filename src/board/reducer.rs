//! Move applier.
//!
//! `apply` is pure: it clones the input board, splices the moved card and
//! returns the new board. Index semantics follow the usual drag-and-drop
//! libraries: the card is removed first, so `destination.index` addresses the
//! column *after* removal. Moving `[A, B, C, D]` from 0 to 2 gives
//! `[B, C, A, D]`.

use super::state::{BoardState, MoveIntent};
use crate::errors::BoardError;

pub fn apply(state: &BoardState, intent: &MoveIntent) -> Result<BoardState, BoardError> {
    let source = intent.source;
    let destination = intent.destination;

    let source_len = state.column(source.column).len();
    if source.index >= source_len {
        return Err(BoardError::SourceOutOfRange {
            column: source.column.to_string(),
            index: source.index,
            len: source_len,
        });
    }

    let found = &state.column(source.column)[source.index].id;
    if found != &intent.task_id {
        return Err(BoardError::StaleIntent {
            column: source.column.to_string(),
            index: source.index,
            expected: intent.task_id.clone(),
            found: found.clone(),
        });
    }

    // Length of the destination column once the card has left its source.
    let dest_len = if intent.is_cross_column() {
        state.column(destination.column).len()
    } else {
        source_len - 1
    };
    if destination.index > dest_len {
        return Err(BoardError::DestinationOutOfRange {
            column: destination.column.to_string(),
            index: destination.index,
            len: dest_len,
        });
    }

    let mut next = state.clone();
    let mut task = next.column_mut(source.column).remove(source.index);
    task.status = destination.column.status();
    next.column_mut(destination.column)
        .insert(destination.index, task);

    Ok(next)
}
