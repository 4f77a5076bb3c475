use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use taskboard_common::{Column, Task, TaskId};

/// Where a card sits: a column and an index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub column: Column,
    pub index: usize,
}

impl Position {
    pub fn new(column: Column, index: usize) -> Self {
        Self { column, index }
    }
}

/// A single drag-and-drop move, produced once per drop and consumed
/// immediately by the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub task_id: TaskId,
    pub source: Position,
    pub destination: Position,
}

impl MoveIntent {
    pub fn is_cross_column(&self) -> bool {
        self.source.column != self.destination.column
    }
}

/// Column -> ordered tasks. All three columns are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    columns: BTreeMap<Column, Vec<Task>>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            columns: Column::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }
}

/// A broken board invariant, reported by [`BoardState::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    DuplicateTask(TaskId),
    StatusMismatch { task: TaskId, column: Column },
}

impl BoardState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group backend tasks by status, keeping the backend's order inside each
    /// column. A task id seen twice keeps its first occurrence.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut state = Self::default();
        let mut seen = HashSet::new();
        for task in tasks {
            if !seen.insert(task.id.clone()) {
                continue;
            }
            state.column_mut(task.status.column()).push(task);
        }
        state
    }

    pub fn column(&self, column: Column) -> &[Task] {
        self.columns.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn column_mut(&mut self, column: Column) -> &mut Vec<Task> {
        self.columns.entry(column).or_default()
    }

    pub fn columns(&self) -> impl Iterator<Item = (Column, &[Task])> {
        Column::ALL.into_iter().map(move |c| (c, self.column(c)))
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current position of a task, if it is on the board.
    pub fn locate(&self, task_id: &TaskId) -> Option<Position> {
        self.columns().find_map(|(column, tasks)| {
            tasks
                .iter()
                .position(|t| &t.id == task_id)
                .map(|index| Position::new(column, index))
        })
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.locate(task_id)
            .map(|pos| &self.column(pos.column)[pos.index])
    }

    /// Task ids per column, order-insensitive. Used to compare boards by
    /// membership only.
    pub fn task_ids_by_column(&self) -> BTreeMap<Column, BTreeSet<TaskId>> {
        self.columns()
            .map(|(column, tasks)| (column, tasks.iter().map(|t| t.id.clone()).collect()))
            .collect()
    }

    /// Ordered ids of one column.
    pub fn ids(&self, column: Column) -> Vec<TaskId> {
        self.column(column).iter().map(|t| t.id.clone()).collect()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::new();
        for (column, tasks) in self.columns() {
            for task in tasks {
                if !seen.insert(&task.id) {
                    return Err(InvariantViolation::DuplicateTask(task.id.clone()));
                }
                if task.status.column() != column {
                    return Err(InvariantViolation::StatusMismatch {
                        task: task.id.clone(),
                        column,
                    });
                }
            }
        }
        Ok(())
    }
}
