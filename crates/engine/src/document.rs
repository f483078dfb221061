//! One open document: grid, formatting, selection and history together.
//!
//! Every mutating call stages its work on copies of the grid and formatting,
//! commits the copies, and records one before/after pair in history. Calls
//! that fail or change nothing leave no history entry.

use std::sync::Arc;

use taskgrid_core::{Range, SelectionModel, SelectionRange, StructuralChange};

use crate::clipboard::{self, PasteFormatting};
use crate::error::Result;
use crate::format::CellFormatting;
use crate::formatting_store::FormattingStore;
use crate::generation::{GenerationRequest, GenerationSuggestion};
use crate::grid::GridStore;
use crate::history::{ActionType, HistoryManager, DEFAULT_MAX_ENTRIES};
use crate::model::{derive_key, Column, ColumnSpec, DEFAULT_COLUMN_WIDTH};
use crate::paste::{PasteMode, PasteOutcome};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Undo depth, baseline included.
    pub max_history: usize,
    /// Width given to columns created without one.
    pub default_column_width: u32,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_ENTRIES,
            default_column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

/// Handed out when a clipboard read starts; redeemed when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteTicket {
    epoch: u64,
}

#[derive(Debug)]
pub struct Document {
    grid: GridStore,
    formatting: FormattingStore,
    selection: SelectionModel,
    history: HistoryManager,
    /// Bumped whenever the whole document is replaced.
    epoch: u64,
    options: DocumentOptions,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Default columns, no rows.
    pub fn new() -> Self {
        Self::with_rows(0, DocumentOptions::default())
    }

    pub fn with_rows(rows: usize, options: DocumentOptions) -> Self {
        let mut grid = GridStore::with_rows(rows);
        grid.set_default_column_width(options.default_column_width);
        Self::assemble(grid, FormattingStore::new(), options)
    }

    /// Open a document from a snapshot, which becomes the undo baseline.
    pub fn from_snapshot(snapshot: Snapshot, options: DocumentOptions) -> Result<Self> {
        snapshot.validate()?;
        let (mut grid, formatting) = snapshot.restore();
        grid.set_default_column_width(options.default_column_width);
        Ok(Self::assemble(grid, formatting, options))
    }

    pub fn from_json(json: &str, options: DocumentOptions) -> Result<Self> {
        Self::from_snapshot(Snapshot::from_json(json)?, options)
    }

    fn assemble(grid: GridStore, formatting: FormattingStore, options: DocumentOptions) -> Self {
        let baseline = Snapshot::capture(&grid, &formatting);
        Self {
            grid,
            formatting,
            selection: SelectionModel::new(),
            history: HistoryManager::with_max_entries(baseline, options.max_history),
            epoch: 0,
            options,
        }
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn formatting(&self) -> &FormattingStore {
        &self.formatting
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn options(&self) -> DocumentOptions {
        self.options
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // ---- selection ----

    /// Select a range; fails with `InvalidRange` if any corner is outside the grid.
    ///
    /// A grid without rows accepts a row-0 selection over existing columns so
    /// there is an anchor to paste into.
    pub fn select(&mut self, range: SelectionRange) -> Result<()> {
        let normalized = range.normalized();
        let empty_anchor = self.grid.row_count() == 0
            && normalized.end_row == 0
            && normalized.end_col < self.grid.column_count();
        if !empty_anchor {
            self.grid.check_range(&normalized)?;
        }
        self.selection.set_range(range);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- commit plumbing ----

    /// Swap in staged stores and record the action if anything changed.
    fn commit(
        &mut self,
        action: ActionType,
        description: impl Into<String>,
        grid: GridStore,
        formatting: FormattingStore,
    ) -> bool {
        let before = self.history.current();
        let after = Snapshot::capture(&grid, &formatting);
        self.grid = grid;
        self.formatting = formatting;
        if after == *before {
            return false;
        }
        self.history.record(action, description, before, Arc::new(after));
        true
    }

    fn staged(&self) -> (GridStore, FormattingStore) {
        (self.grid.clone(), self.formatting.clone())
    }

    fn apply_changes(&mut self, changes: &[StructuralChange]) {
        for change in changes {
            self.selection.apply_structural_change(*change);
        }
    }

    // ---- structure ----

    /// Append an empty row. Returns its id.
    pub fn add_row(&mut self) -> String {
        let (mut grid, formatting) = self.staged();
        let id = grid.add_row();
        self.commit(ActionType::AddRow, "Add row", grid, formatting);
        id
    }

    /// Delete a row and its formatting. `false` if no such row.
    pub fn delete_row(&mut self, task_id: &str) -> bool {
        let (mut grid, mut formatting) = self.staged();
        let Some((index, task)) = grid.delete_row(task_id) else {
            return false;
        };
        formatting.purge_task(task_id);

        let description = if task.name.is_empty() {
            "Delete row".to_string()
        } else {
            format!("Delete row '{}'", task.name)
        };
        self.commit(ActionType::DeleteRow, description, grid, formatting);
        self.apply_changes(&[StructuralChange::RowsDeleted { at: index, count: 1 }]);
        true
    }

    pub fn add_column(&mut self, spec: ColumnSpec) -> Result<Column> {
        let (mut grid, formatting) = self.staged();
        let column = grid.add_column(spec)?.clone();
        self.commit(
            ActionType::AddColumn,
            format!("Add column '{}'", column.title),
            grid,
            formatting,
        );
        Ok(column)
    }

    /// Delete a column and its formatting. `false` if no such column.
    pub fn delete_column(&mut self, column_id: &str) -> bool {
        let (mut grid, mut formatting) = self.staged();
        let Some((index, column)) = grid.delete_column(column_id) else {
            return false;
        };
        formatting.purge_column(column_id);

        self.commit(
            ActionType::DeleteColumn,
            format!("Delete column '{}'", column.title),
            grid,
            formatting,
        );
        self.apply_changes(&[StructuralChange::ColumnsDeleted { at: index, count: 1 }]);
        true
    }

    // ---- values ----

    /// Commit one cell edit. Returns whether the value changed; an unchanged
    /// value records nothing.
    pub fn edit_cell(&mut self, task_id: &str, column_id: &str, value: impl Into<String>) -> Result<bool> {
        let (mut grid, formatting) = self.staged();
        if !grid.set_cell_value(task_id, column_id, value)? {
            return Ok(false);
        }
        let title = grid.column(column_id).map(|c| c.title.clone()).unwrap_or_default();
        Ok(self.commit(ActionType::EditCell, format!("Edit {}", title), grid, formatting))
    }

    /// Write `value` into every selected cell. Returns the number of cells changed.
    pub fn fill_selection(&mut self, value: &str) -> Result<usize> {
        let Some(range) = self.selection.normalized_range() else {
            return Ok(0);
        };
        let (mut grid, formatting) = self.staged();
        let mut changed = 0;
        for coord in range.cells() {
            if grid.set_value_at(coord, value)? {
                changed += 1;
            }
        }
        if changed > 0 {
            let description = format!("Edit {} cells", changed);
            self.commit(ActionType::MultiCellEdit, description, grid, formatting);
        }
        Ok(changed)
    }

    pub fn clear_selected_values(&mut self) -> Result<usize> {
        self.fill_selection("")
    }

    // ---- formatting ----

    /// Overlay `patch` onto every selected cell. Returns whether anything changed.
    pub fn format_selection(&mut self, patch: &CellFormatting) -> bool {
        let Some(range) = self.selection.normalized_range() else {
            return false;
        };
        let (grid, mut formatting) = self.staged();
        let cells = grid.cell_ids_in(&range);
        formatting.bulk_apply(&cells, patch);
        let description = format!("Format {} cells", cells.len());
        self.commit(ActionType::FormatCells, description, grid, formatting)
    }

    pub fn clear_selection_formatting(&mut self) -> bool {
        let Some(range) = self.selection.normalized_range() else {
            return false;
        };
        let (grid, mut formatting) = self.staged();
        for cell in grid.cell_ids_in(&range) {
            formatting.clear_formatting(&cell);
        }
        self.commit(ActionType::FormatCells, "Clear formatting", grid, formatting)
    }

    // ---- paste ----

    /// Start a paste. The clipboard read may take a while; the ticket ties
    /// the result to this document.
    pub fn begin_paste(&self) -> PasteTicket {
        PasteTicket { epoch: self.epoch }
    }

    /// Finish a paste against the selection as it is now.
    ///
    /// Returns `Ok(None)` and changes nothing if the document was replaced
    /// since the ticket was issued or nothing is selected any more.
    pub fn complete_paste(
        &mut self,
        ticket: PasteTicket,
        clipboard_html: Option<&str>,
        clipboard_text: &str,
        mode: PasteMode,
    ) -> Result<Option<PasteOutcome>> {
        if ticket.epoch != self.epoch {
            log::debug!("paste discarded: document replaced while reading clipboard");
            return Ok(None);
        }
        let Some(range) = self.selection.normalized_range() else {
            log::debug!("paste discarded: selection cleared while reading clipboard");
            return Ok(None);
        };
        let data = clipboard::parse(clipboard_html, clipboard_text);
        self.paste_at(range, &data, mode).map(Some)
    }

    /// Paste into the current selection without an intervening clipboard read.
    pub fn paste(
        &mut self,
        clipboard_html: Option<&str>,
        clipboard_text: &str,
        mode: PasteMode,
    ) -> Result<Option<PasteOutcome>> {
        let ticket = self.begin_paste();
        self.complete_paste(ticket, clipboard_html, clipboard_text, mode)
    }

    /// Paste already-parsed data at `range`. One history entry for the whole paste.
    pub fn paste_at(&mut self, range: Range, data: &PasteFormatting, mode: PasteMode) -> Result<PasteOutcome> {
        let (mut grid, mut formatting) = self.staged();
        let outcome = grid.apply_paste(range, data, mode, &mut formatting)?;
        let description = format!(
            "Paste {}x{} ({})",
            data.row_count(),
            data.col_count(),
            mode
        );
        self.commit(ActionType::Paste, description, grid, formatting);
        self.apply_changes(&outcome.changes);
        self.select_pasted(range, &outcome);
        Ok(outcome)
    }

    /// Grow the selection over what a paste wrote. Insert modes keep the
    /// shifted selection unless it no longer fits the grid.
    fn select_pasted(&mut self, target: Range, outcome: &PasteOutcome) {
        let Some(affected) = outcome.affected else {
            return;
        };
        match outcome.mode {
            PasteMode::Replace | PasteMode::ValuesOnly | PasteMode::FormatsOnly => {
                self.selection.set_range(target.union(&affected).into());
            }
            PasteMode::Append => self.selection.set_range(affected.into()),
            PasteMode::InsertRows | PasteMode::InsertColumns => {
                let fits = self
                    .selection
                    .normalized_range()
                    .map_or(true, |r| r.fits(self.grid.row_count(), self.grid.column_count()));
                if !fits {
                    self.selection.set_range(affected.into());
                }
            }
        }
        self.selection
            .clamp_to(self.grid.row_count(), self.grid.column_count());
    }

    // ---- generation ----

    pub fn generation_request(&self, prompt: impl Into<String>) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.into(),
            column_titles: self.grid.columns().iter().map(|c| c.title.clone()).collect(),
        }
    }

    /// Merge generated content: new columns first (existing keys and titles
    /// are skipped), then the rows appended. Recorded as one paste.
    pub fn merge_suggestion(&mut self, suggestion: &GenerationSuggestion) -> Result<Option<PasteOutcome>> {
        if suggestion.is_empty() {
            return Ok(None);
        }
        let (mut grid, mut formatting) = self.staged();

        let mut columns_added = 0;
        for suggested in &suggestion.columns {
            let key = suggested.key();
            let exists = grid
                .columns()
                .iter()
                .any(|c| c.key == key || c.title.eq_ignore_ascii_case(suggested.title.trim()));
            if key.is_empty() || exists {
                continue;
            }
            grid.add_column(ColumnSpec::new(suggested.title.trim()).with_type(suggested.column_type))?;
            columns_added += 1;
        }

        let rows: Vec<Vec<String>> = suggestion
            .rows
            .iter()
            .map(|row| {
                grid.columns()
                    .iter()
                    .map(|column| suggested_value(row, column))
                    .collect()
            })
            .collect();

        let mut outcome = PasteOutcome::empty(PasteMode::Append);
        if !rows.is_empty() && grid.column_count() > 0 {
            outcome = grid.apply_paste(
                Range::single(0, 0),
                &PasteFormatting::from_values(rows),
                PasteMode::Append,
                &mut formatting,
            )?;
        }
        outcome.columns_added = columns_added;

        let description = format!(
            "Generated {} rows, {} columns",
            outcome.rows_added, outcome.columns_added
        );
        self.commit(ActionType::Paste, description, grid, formatting);
        Ok(Some(outcome))
    }

    // ---- history ----

    /// Step back one action. `false` when only the baseline is left.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        let (mut grid, formatting) = snapshot.restore();
        grid.set_default_column_width(self.options.default_column_width);
        self.grid = grid;
        self.formatting = formatting;
        self.selection
            .clamp_to(self.grid.row_count(), self.grid.column_count());
    }

    // ---- export / import ----

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.grid, &self.formatting)
    }

    pub fn export_json(&self) -> Result<String> {
        self.snapshot().to_json()
    }

    /// Replace the whole document. History restarts from the imported state,
    /// the selection is cleared and outstanding paste tickets go stale.
    pub fn load(&mut self, snapshot: Snapshot) -> Result<()> {
        snapshot.validate()?;
        let (mut grid, formatting) = snapshot.restore();
        grid.set_default_column_width(self.options.default_column_width);
        self.history.reset(Snapshot::capture(&grid, &formatting));
        self.grid = grid;
        self.formatting = formatting;
        self.selection.clear();
        self.epoch += 1;
        Ok(())
    }

    pub fn import_json(&mut self, json: &str) -> Result<()> {
        self.load(Snapshot::from_json(json)?)
    }
}

/// Value for `column` from a generated row keyed by field key or title.
fn suggested_value(row: &std::collections::BTreeMap<String, String>, column: &Column) -> String {
    row.get(&column.key)
        .or_else(|| row.get(&column.title))
        .or_else(|| {
            row.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(&column.title) || derive_key(k) == column.key)
                .map(|(_, v)| v)
        })
        .cloned()
        .unwrap_or_default()
}
