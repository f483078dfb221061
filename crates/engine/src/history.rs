//! Undo/redo history of whole-document snapshots.
//!
//! Every entry carries the full state before and after one user action.
//! Snapshots are shared through `Arc`, so the after-state of one entry and
//! the before-state of the next are a single allocation.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::format::CellFormatting;
use crate::formatting_store::FormattingEntry;
use crate::grid::new_id;
use crate::model::{Column, Task};
use crate::snapshot::Snapshot;

pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Paste,
    DeleteRow,
    DeleteColumn,
    AddRow,
    AddColumn,
    EditCell,
    MultiCellEdit,
    Initial,
    FormatCells,
}

impl ActionType {
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Paste => "Paste",
            ActionType::DeleteRow => "Delete row",
            ActionType::DeleteColumn => "Delete column",
            ActionType::AddRow => "Add row",
            ActionType::AddColumn => "Add column",
            ActionType::EditCell => "Edit cell",
            ActionType::MultiCellEdit => "Edit cells",
            ActionType::Initial => "Initial state",
            ActionType::FormatCells => "Format cells",
        }
    }
}

/// One recorded action.
#[derive(Debug, Clone)]
pub struct HistoryState {
    pub action_type: ActionType,
    pub action_id: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    before: Arc<Snapshot>,
    after: Arc<Snapshot>,
}

impl HistoryState {
    fn new(action_type: ActionType, description: String, before: Arc<Snapshot>, after: Arc<Snapshot>) -> Self {
        Self {
            action_type,
            action_id: new_id(),
            description,
            timestamp: Utc::now(),
            before,
            after,
        }
    }

    /// Oldest surviving entry after eviction; nothing before it can be restored.
    fn become_baseline(&mut self) {
        self.action_type = ActionType::Initial;
        self.description = ActionType::Initial.label().to_string();
        self.before = Arc::clone(&self.after);
    }

    /// State after the action.
    pub fn after(&self) -> &Arc<Snapshot> {
        &self.after
    }

    /// State before the action. The baseline entry has none.
    pub fn before(&self) -> Option<&Arc<Snapshot>> {
        (self.action_type != ActionType::Initial).then_some(&self.before)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.after.tasks
    }

    pub fn columns(&self) -> &[Column] {
        &self.after.columns
    }

    pub fn formatting(&self) -> &[FormattingEntry] {
        &self.after.formatting
    }

    pub fn tasks_before(&self) -> Option<&[Task]> {
        self.before().map(|s| s.tasks.as_slice())
    }

    pub fn columns_before(&self) -> Option<&[Column]> {
        self.before().map(|s| s.columns.as_slice())
    }

    pub fn formatting_before(&self) -> Option<&[FormattingEntry]> {
        self.before().map(|s| s.formatting.as_slice())
    }

    /// Local wall-clock time of the action, `HH:MM:SS`.
    pub fn formatted_time(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
    }

    /// Formatting the cell had after this action.
    pub fn formatting_of(&self, task_id: &str, column_id: &str) -> CellFormatting {
        self.after
            .formatting
            .iter()
            .find(|e| e.cell.task_id == task_id && e.cell.column_id == column_id)
            .map(|e| e.formatting.clone())
            .unwrap_or_default()
    }
}

/// Linear undo stack over a baseline entry, with a redo stack.
///
/// The bottom undo entry is the baseline and is never popped. When the stack
/// outgrows `max_entries` the oldest entries are dropped and the oldest
/// survivor becomes the baseline.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<HistoryState>,
    redo_stack: Vec<HistoryState>,
    max_entries: usize,
}

impl HistoryManager {
    pub fn new(initial: Snapshot) -> Self {
        Self::with_max_entries(initial, DEFAULT_MAX_ENTRIES)
    }

    /// `max_entries` counts the baseline and is raised to at least 2.
    pub fn with_max_entries(initial: Snapshot, max_entries: usize) -> Self {
        let mut history = Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(2),
        };
        history.reset(initial);
        history
    }

    /// Drop all history and start over from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        let initial = Arc::new(initial);
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push_back(HistoryState::new(
            ActionType::Initial,
            ActionType::Initial.label().to_string(),
            Arc::clone(&initial),
            initial,
        ));
    }

    /// Push an action and invalidate redo.
    pub fn record(
        &mut self,
        action_type: ActionType,
        description: impl Into<String>,
        before: Arc<Snapshot>,
        after: Arc<Snapshot>,
    ) -> &HistoryState {
        let entry = HistoryState::new(action_type, description.into(), before, after);
        log::trace!("history: {:?} '{}' ({})", entry.action_type, entry.description, entry.action_id);

        self.redo_stack.clear();
        self.undo_stack.push_back(entry);
        let mut evicted = false;
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.pop_front();
            evicted = true;
        }
        if evicted {
            if let Some(front) = self.undo_stack.front_mut() {
                front.become_baseline();
            }
        }
        &self.undo_stack[self.undo_stack.len() - 1]
    }

    /// Step back one action. Returns the state to restore, or `None` when
    /// only the baseline is left.
    pub fn undo(&mut self) -> Option<Arc<Snapshot>> {
        if self.undo_stack.len() <= 1 {
            return None;
        }
        let entry = self.undo_stack.pop_back()?;
        let restore = Arc::clone(&entry.before);
        log::trace!("history: undo {:?} ({})", entry.action_type, entry.action_id);
        self.redo_stack.push(entry);
        Some(restore)
    }

    /// Re-apply the most recently undone action.
    pub fn redo(&mut self) -> Option<Arc<Snapshot>> {
        let entry = self.redo_stack.pop()?;
        let restore = Arc::clone(&entry.after);
        log::trace!("history: redo {:?} ({})", entry.action_type, entry.action_id);
        self.undo_stack.push_back(entry);
        Some(restore)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Entries that can be undone (the baseline excluded).
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len() - 1
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Undo stack from the baseline up.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryState> {
        self.undo_stack.iter()
    }

    pub fn baseline(&self) -> &HistoryState {
        &self.undo_stack[0]
    }

    /// The state the document is in according to history.
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.undo_stack[self.undo_stack.len() - 1].after)
    }
}
