//! Full document state: tasks, columns and formatting.
//!
//! History entries hold snapshots, and export/import goes through them. JSON
//! output is deterministic (tasks and columns in grid order, dynamic task
//! fields and formatting entries sorted), so importing an export and exporting
//! again yields identical bytes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::formatting_store::{FormattingEntry, FormattingStore};
use crate::grid::GridStore;
use crate::model::{Column, Task};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub formatting: Vec<FormattingEntry>,
}

impl Snapshot {
    pub fn capture(grid: &GridStore, formatting: &FormattingStore) -> Self {
        Self {
            tasks: grid.tasks().to_vec(),
            columns: grid.columns().to_vec(),
            formatting: formatting.to_entries(),
        }
    }

    /// Live stores rebuilt from this snapshot.
    pub fn restore(&self) -> (GridStore, FormattingStore) {
        (
            GridStore::from_parts(self.tasks.clone(), self.columns.clone()),
            FormattingStore::from_entries(self.formatting.iter().cloned()),
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::InvalidSnapshot(e.to_string()))
    }

    /// Parse and validate an exported snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the invariants the live stores rely on: unique task and column
    /// ids, unique column keys present on every task, and formatting that
    /// only refers to existing, distinct cells.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(EngineError::InvalidSnapshot(msg));

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if task.id.is_empty() || !task_ids.insert(task.id.as_str()) {
                return invalid(format!("duplicate or empty task id '{}'", task.id));
            }
        }

        let mut column_ids = HashSet::new();
        let mut keys = HashSet::new();
        for column in &self.columns {
            if column.id.is_empty() || !column_ids.insert(column.id.as_str()) {
                return invalid(format!("duplicate or empty column id '{}'", column.id));
            }
            if Task::is_reserved_key(&column.key) {
                return invalid(format!("column '{}' uses reserved key '{}'", column.id, column.key));
            }
            if column.key.is_empty() || !keys.insert(column.key.as_str()) {
                return invalid(format!("duplicate or empty column key '{}'", column.key));
            }
            if let Some(task) = self.tasks.iter().find(|t| !t.has_field(&column.key)) {
                return invalid(format!("task '{}' has no field '{}'", task.id, column.key));
            }
        }

        let mut cells = HashSet::new();
        for entry in &self.formatting {
            let cell = &entry.cell;
            if !task_ids.contains(cell.task_id.as_str()) || !column_ids.contains(cell.column_id.as_str()) {
                return invalid(format!("formatting for unknown cell {}", cell));
            }
            if !cells.insert(cell) {
                return invalid(format!("duplicate formatting for cell {}", cell));
            }
        }
        Ok(())
    }
}
