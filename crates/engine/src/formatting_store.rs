//! Sparse per-cell style storage.
//!
//! Keyed by [`CellIdentifier`] so formatting follows a cell through row and
//! column moves. A missing entry means default style; storing a default
//! formatting removes the entry instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::CellFormatting;
use crate::model::CellIdentifier;

/// One stored formatting overlay, as it appears in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingEntry {
    pub cell: CellIdentifier,
    pub formatting: CellFormatting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattingStore {
    entries: BTreeMap<CellIdentifier, CellFormatting>,
}

impl FormattingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the formatting of one cell.
    pub fn set_formatting(&mut self, cell: CellIdentifier, formatting: CellFormatting) {
        if formatting.is_default() {
            self.entries.remove(&cell);
        } else {
            self.entries.insert(cell, formatting);
        }
    }

    /// Formatting for a cell; the default style when none is stored.
    pub fn get_formatting(&self, cell: &CellIdentifier) -> CellFormatting {
        self.entries.get(cell).cloned().unwrap_or_default()
    }

    pub fn has_formatting(&self, cell: &CellIdentifier) -> bool {
        self.entries.contains_key(cell)
    }

    pub fn clear_formatting(&mut self, cell: &CellIdentifier) {
        self.entries.remove(cell);
    }

    /// Overlay `formatting` onto each cell's existing style.
    pub fn bulk_apply<'a, I>(&mut self, cells: I, formatting: &CellFormatting)
    where
        I: IntoIterator<Item = &'a CellIdentifier>,
    {
        for cell in cells {
            let merged = self.get_formatting(cell).merged(formatting);
            self.set_formatting(cell.clone(), merged);
        }
    }

    /// Remove every entry on a deleted row. Returns the number removed.
    pub fn purge_task(&mut self, task_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|cell, _| cell.task_id != task_id);
        before - self.entries.len()
    }

    /// Remove every entry in a deleted column. Returns the number removed.
    pub fn purge_column(&mut self, column_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|cell, _| cell.column_id != column_id);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellIdentifier, &CellFormatting)> {
        self.entries.iter()
    }

    /// Entries sorted by cell identifier.
    pub fn to_entries(&self) -> Vec<FormattingEntry> {
        self.entries
            .iter()
            .map(|(cell, formatting)| FormattingEntry {
                cell: cell.clone(),
                formatting: formatting.clone(),
            })
            .collect()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = FormattingEntry>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.set_formatting(entry.cell, entry.formatting);
        }
        store
    }
}
