//! Drag controller: turns drop events from a drag-and-drop surface into
//! move intents.
//!
//! The drag library itself stays outside; anything that can report
//! `{source, destination, draggableId}` can drive the board through
//! [`DragController::handle_drop`].

use serde::{Deserialize, Serialize};
use taskboard_common::{Column, TaskId};

use super::state::{MoveIntent, Position};
use crate::errors::BoardError;

/// One end of a drop: the droppable's id and the index inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    pub droppable_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(column: Column, index: usize) -> Self {
        Self {
            droppable_id: column.as_str().to_string(),
            index,
        }
    }

    fn position(&self) -> Result<Position, BoardError> {
        let column = self
            .droppable_id
            .parse::<Column>()
            .map_err(|_| BoardError::UnknownColumn(self.droppable_id.clone()))?;
        Ok(Position::new(column, self.index))
    }
}

/// A finished drag as reported by the drag surface. `destination` is `None`
/// when the card was released outside every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
    pub draggable_id: String,
}

/// Capability that receives finished moves.
pub trait DragEndHandler {
    fn on_drag_end(&self, intent: MoveIntent);
}

/// Build the intent for a drop, or `None` for a drop outside any column.
pub fn intent_from_drop(event: &DropEvent) -> Result<Option<MoveIntent>, BoardError> {
    let Some(destination) = event.destination.as_ref() else {
        return Ok(None);
    };
    Ok(Some(MoveIntent {
        task_id: TaskId::new(event.draggable_id.clone()),
        source: event.source.position()?,
        destination: destination.position()?,
    }))
}

pub struct DragController<'a, H: DragEndHandler + ?Sized> {
    handler: &'a H,
}

impl<'a, H: DragEndHandler + ?Sized> DragController<'a, H> {
    pub fn new(handler: &'a H) -> Self {
        Self { handler }
    }

    /// Forward the drop to the handler within the same call. Returns the
    /// intent that was forwarded, if any.
    pub fn handle_drop(&self, event: &DropEvent) -> Result<Option<MoveIntent>, BoardError> {
        let intent = intent_from_drop(event)?;
        match &intent {
            Some(intent) => self.handler.on_drag_end(intent.clone()),
            None => tracing::debug!(task = %event.draggable_id, "drop outside any column, ignoring"),
        }
        Ok(intent)
    }
}
