//! Live rows and columns of a document.
//!
//! `GridStore` is the only owner of the live tasks and columns. Positional
//! access goes through [`CellCoordinate`]; formatting and edits that must
//! survive structural changes go through [`CellIdentifier`].

use taskgrid_core::{CellCoordinate, Range, StructuralChange};
use uuid::Uuid;

use crate::clipboard::PasteFormatting;
use crate::error::{EngineError, Result};
use crate::formatting_store::FormattingStore;
use crate::model::{
    default_columns, derive_key, CellIdentifier, Column, ColumnSpec, ColumnType, Task,
    DEFAULT_COLUMN_WIDTH,
};
use crate::paste::{PasteMode, PasteOutcome};

/// Fresh identifier for a task, column or history action.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStore {
    tasks: Vec<Task>,
    columns: Vec<Column>,
    default_column_width: u32,
}

impl Default for GridStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GridStore {
    /// The default columns and no rows.
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), default_columns())
    }

    pub fn with_rows(count: usize) -> Self {
        let mut grid = Self::new();
        for _ in 0..count {
            grid.add_row();
        }
        grid
    }

    /// Adopt existing rows and columns as-is. Callers validate first.
    pub fn from_parts(tasks: Vec<Task>, columns: Vec<Column>) -> Self {
        Self {
            tasks,
            columns,
            default_column_width: DEFAULT_COLUMN_WIDTH,
        }
    }

    pub fn set_default_column_width(&mut self, width: u32) {
        self.default_column_width = width;
    }

    pub fn default_column_width(&self) -> u32 {
        self.default_column_width
    }

    // ---- read access ----

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Value shown at a position; `None` outside the grid.
    pub fn value_at(&self, coord: CellCoordinate) -> Option<&str> {
        let task = self.tasks.get(coord.row)?;
        let column = self.columns.get(coord.col)?;
        Some(task.get(&column.key).unwrap_or(""))
    }

    pub fn cell_id_at(&self, coord: CellCoordinate) -> Option<CellIdentifier> {
        let task = self.tasks.get(coord.row)?;
        let column = self.columns.get(coord.col)?;
        Some(CellIdentifier::new(&task.id, &column.id))
    }

    pub fn coord_of(&self, cell: &CellIdentifier) -> Option<CellCoordinate> {
        Some(CellCoordinate::new(
            self.task_index(&cell.task_id)?,
            self.column_index(&cell.column_id)?,
        ))
    }

    /// Identifiers for every cell of `range`, row-major. Cells outside the
    /// grid are skipped.
    pub fn cell_ids_in(&self, range: &Range) -> Vec<CellIdentifier> {
        range.cells().filter_map(|c| self.cell_id_at(c)).collect()
    }

    /// Fail with `InvalidRange` unless every cell of `range` exists.
    pub fn check_range(&self, range: &Range) -> Result<()> {
        if range.fits(self.row_count(), self.column_count()) {
            Ok(())
        } else {
            Err(EngineError::InvalidRange {
                row: range.end_row,
                col: range.end_col,
                rows: self.row_count(),
                cols: self.column_count(),
            })
        }
    }

    // ---- rows ----

    /// Append an empty task. Returns its id.
    pub fn add_row(&mut self) -> String {
        let task = self.blank_task();
        let id = task.id.clone();
        self.tasks.push(task);
        id
    }

    /// Remove a task. Returns its former index, or `None` if it did not exist.
    pub fn delete_row(&mut self, task_id: &str) -> Option<(usize, Task)> {
        let index = self.task_index(task_id)?;
        Some((index, self.tasks.remove(index)))
    }

    fn blank_task(&self) -> Task {
        let mut task = Task::new(new_id());
        for column in &self.columns {
            if !task.has_field(&column.key) {
                task.set(&column.key, "");
            }
        }
        task
    }

    // ---- columns ----

    /// Add a column after the last one.
    ///
    /// Fails with `DuplicateColumn` if the id or the (possibly derived) key
    /// is already used, or an explicit key is reserved; the grid is unchanged
    /// in that case. A derived key that is reserved gets a numeric suffix
    /// ("ID" becomes `id2`).
    pub fn add_column(&mut self, spec: ColumnSpec) -> Result<&Column> {
        let column = self.build_column(spec)?;
        let at = self.columns.len();
        self.insert_column(at, column);
        Ok(&self.columns[at])
    }

    fn build_column(&self, spec: ColumnSpec) -> Result<Column> {
        let explicit_key = spec.key.as_deref().is_some_and(|k| !k.is_empty());
        let mut key = spec.resolved_key();
        if key.is_empty() {
            key = format!("column{}", self.columns.len() + 1);
        }
        let id = spec.id.clone().unwrap_or_else(new_id);
        if Task::is_reserved_key(&key) {
            if explicit_key {
                return Err(EngineError::DuplicateColumn { id, key });
            }
            key = self.unreserved_key(&key);
        }
        if self.columns.iter().any(|c| c.id == id || c.key == key) {
            return Err(EngineError::DuplicateColumn { id, key });
        }
        Ok(Column {
            id,
            title: spec.title,
            key,
            column_type: spec.column_type,
            width: spec.width.unwrap_or(self.default_column_width),
            min_width: spec.min_width,
        })
    }

    /// `base` with the first numeric suffix that is neither reserved nor in use.
    fn unreserved_key(&self, base: &str) -> String {
        (2..)
            .map(|n| format!("{}{}", base, n))
            .find(|key| !Task::is_reserved_key(key) && !self.columns.iter().any(|c| &c.key == key))
            .unwrap_or_else(|| base.to_string())
    }

    fn insert_column(&mut self, at: usize, column: Column) {
        for task in &mut self.tasks {
            if !task.has_field(&column.key) {
                task.set(&column.key, "");
            }
        }
        self.columns.insert(at, column);
    }

    /// Remove a column and its dynamic field on every task. Returns the
    /// former index, or `None` if it did not exist.
    pub fn delete_column(&mut self, column_id: &str) -> Option<(usize, Column)> {
        let index = self.column_index(column_id)?;
        let column = self.columns.remove(index);
        if !Task::is_known_field(&column.key) {
            for task in &mut self.tasks {
                task.remove_field(&column.key);
            }
        }
        Some((index, column))
    }

    /// A `Column N` title and key that no existing column uses.
    fn generated_column(&self) -> Column {
        let mut n = self.columns.len() + 1;
        loop {
            let title = format!("Column {}", n);
            let key = derive_key(&title);
            let taken = Task::is_reserved_key(&key) || self.columns.iter().any(|c| c.key == key || c.title == title);
            if !taken {
                return Column {
                    id: new_id(),
                    title,
                    key,
                    column_type: ColumnType::Text,
                    width: self.default_column_width,
                    min_width: None,
                };
            }
            n += 1;
        }
    }

    // ---- values ----

    /// Set one cell. Returns whether the stored value changed.
    pub fn set_cell_value(
        &mut self,
        task_id: &str,
        column_id: &str,
        value: impl Into<String>,
    ) -> Result<bool> {
        let row = self
            .task_index(task_id)
            .ok_or_else(|| EngineError::UnknownTask(task_id.to_string()))?;
        let col = self
            .column_index(column_id)
            .ok_or_else(|| EngineError::UnknownColumn(column_id.to_string()))?;
        Ok(self.write(row, col, value.into()))
    }

    /// Set one cell by position.
    pub fn set_value_at(&mut self, coord: CellCoordinate, value: impl Into<String>) -> Result<bool> {
        self.check_range(&Range::single(coord.row, coord.col))?;
        Ok(self.write(coord.row, coord.col, value.into()))
    }

    fn write(&mut self, row: usize, col: usize, value: String) -> bool {
        let key = &self.columns[col].key;
        let task = &mut self.tasks[row];
        if task.get(key) == Some(value.as_str()) {
            return false;
        }
        task.set(key, value);
        true
    }

    // ---- paste ----

    /// Merge parsed clipboard data into the grid, anchored at the top-left of
    /// `range`.
    ///
    /// The whole paste is staged on copies of the grid and `formatting`, so
    /// on error neither is touched. REPLACE, VALUES_ONLY and INSERT_ROWS may
    /// anchor one row past the end, APPEND anywhere in an existing column;
    /// FORMATS_ONLY and INSERT_COLUMNS need `range` inside the grid.
    pub fn apply_paste(
        &mut self,
        range: Range,
        paste: &PasteFormatting,
        mode: PasteMode,
        formatting: &mut FormattingStore,
    ) -> Result<PasteOutcome> {
        self.check_paste_target(&range, mode)?;
        if paste.is_empty() {
            return Ok(PasteOutcome::empty(mode));
        }

        let mut grid = self.clone();
        let mut styles = formatting.clone();
        let outcome = grid.stage_paste(range.top_left(), paste, mode, &mut styles);

        *self = grid;
        *formatting = styles;
        Ok(outcome)
    }

    /// Modes that grow the grid downwards accept an anchor row one past the
    /// last row (APPEND ignores the row entirely); the columns must exist.
    fn check_paste_target(&self, range: &Range, mode: PasteMode) -> Result<()> {
        let rows_ok = match mode {
            PasteMode::Append => true,
            PasteMode::Replace | PasteMode::ValuesOnly | PasteMode::InsertRows => {
                range.start_row <= self.row_count()
            }
            PasteMode::FormatsOnly | PasteMode::InsertColumns => return self.check_range(range),
        };
        if rows_ok && range.end_col < self.column_count() {
            Ok(())
        } else {
            Err(EngineError::InvalidRange {
                row: range.end_row,
                col: range.end_col,
                rows: self.row_count(),
                cols: self.column_count(),
            })
        }
    }

    fn stage_paste(
        &mut self,
        anchor: CellCoordinate,
        paste: &PasteFormatting,
        mode: PasteMode,
        styles: &mut FormattingStore,
    ) -> PasteOutcome {
        let (rows, cols) = (paste.row_count(), paste.col_count());
        let mut outcome = PasteOutcome::empty(mode);
        let clip_cols = |available: usize| cols.min(available - anchor.col);

        let (origin, write_rows, write_cols) = match mode {
            PasteMode::Replace | PasteMode::ValuesOnly => {
                while self.row_count() < anchor.row + rows {
                    self.add_row();
                    outcome.rows_added += 1;
                }
                (anchor, rows, clip_cols(self.column_count()))
            }
            PasteMode::FormatsOnly => {
                let write_rows = rows.min(self.row_count() - anchor.row);
                (anchor, write_rows, clip_cols(self.column_count()))
            }
            PasteMode::InsertRows => {
                for i in 0..rows {
                    let task = self.blank_task();
                    self.tasks.insert(anchor.row + i, task);
                }
                outcome.rows_added = rows;
                outcome.changes.push(StructuralChange::RowsInserted {
                    at: anchor.row,
                    count: rows,
                });
                (anchor, rows, clip_cols(self.column_count()))
            }
            PasteMode::InsertColumns => {
                for j in 0..cols {
                    let column = self.generated_column();
                    self.insert_column(anchor.col + j, column);
                }
                outcome.columns_added = cols;
                outcome.changes.push(StructuralChange::ColumnsInserted {
                    at: anchor.col,
                    count: cols,
                });
                let write_rows = rows.min(self.row_count() - anchor.row);
                (anchor, write_rows, cols)
            }
            PasteMode::Append => {
                let origin = CellCoordinate::new(self.row_count(), anchor.col);
                for _ in 0..rows {
                    self.add_row();
                }
                outcome.rows_added = rows;
                (origin, rows, clip_cols(self.column_count()))
            }
        };

        outcome.rows_clipped = rows - write_rows;
        outcome.columns_clipped = cols - write_cols;

        let wants_styles = mode.writes_formatting() && paste.has_formatting;
        if !mode.writes_values() && !wants_styles {
            return outcome;
        }

        for i in 0..write_rows {
            for j in 0..write_cols {
                let (row, col) = (origin.row + i, origin.col + j);
                if mode.writes_values() {
                    let value = paste.value(i, j).unwrap_or_default().to_string();
                    self.write(row, col, value);
                }
                if wants_styles {
                    if let Some(style) = paste.formatting(i, j) {
                        let cell = CellIdentifier::new(&self.tasks[row].id, &self.columns[col].id);
                        styles.set_formatting(cell, style.clone());
                    }
                }
            }
        }

        outcome.affected = Range::from_extent(origin, write_rows, write_cols);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{CellFormatting, FormattedCellData};
    use crate::model::FIELD_NAME;

    fn values(rows: &[&[&str]]) -> PasteFormatting {
        PasteFormatting::from_values(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn styled(rows: &[&[(&str, CellFormatting)]]) -> PasteFormatting {
        PasteFormatting::from_formatted(
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|(v, f)| FormattedCellData {
                            value: v.to_string(),
                            formatting: f.clone(),
                        })
                        .collect()
                })
                .collect(),
            None,
        )
    }

    fn grid_with_names(names: &[&str]) -> GridStore {
        let mut grid = GridStore::new();
        for name in names {
            let id = grid.add_row();
            grid.set_cell_value(&id, "col-name", *name).unwrap();
        }
        grid
    }

    fn column_values(grid: &GridStore, col: usize) -> Vec<&str> {
        (0..grid.row_count())
            .map(|row| grid.value_at(CellCoordinate::new(row, col)).unwrap())
            .collect()
    }

    #[test]
    fn test_add_column_derives_key_and_fills_tasks() {
        let mut grid = GridStore::with_rows(2);
        let column = grid.add_column(ColumnSpec::new("Story Points")).unwrap().clone();

        assert_eq!(column.key, "storyPoints");
        assert_eq!(column.width, DEFAULT_COLUMN_WIDTH);
        assert!(grid.tasks().iter().all(|t| t.get("storyPoints") == Some("")));
    }

    #[test]
    fn test_add_column_rejects_duplicates() {
        let mut grid = GridStore::with_rows(1);
        let before = grid.clone();

        let err = grid.add_column(ColumnSpec::new("Start Date")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateColumn { ref key, .. } if key == "startDate"));

        let err = grid.add_column(ColumnSpec::new("Other").with_id("col-status")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateColumn { .. }));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_delete_missing_ids_are_noops() {
        let mut grid = GridStore::with_rows(1);
        assert!(grid.delete_row("nope").is_none());
        assert!(grid.delete_column("nope").is_none());
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_delete_column_drops_dynamic_field() {
        let mut grid = GridStore::with_rows(1);
        let id = grid.add_column(ColumnSpec::new("Owner")).unwrap().id.clone();
        let (index, column) = grid.delete_column(&id).unwrap();
        assert_eq!(index, 5);
        assert_eq!(column.key, "owner");
        assert!(!grid.tasks()[0].has_field("owner"));
    }

    #[test]
    fn test_set_cell_value_reports_change() {
        let mut grid = GridStore::with_rows(1);
        let task = grid.tasks()[0].id.clone();
        assert!(grid.set_cell_value(&task, "col-name", "Plan").unwrap());
        assert!(!grid.set_cell_value(&task, "col-name", "Plan").unwrap());
        assert!(matches!(
            grid.set_cell_value(&task, "missing", "x"),
            Err(EngineError::UnknownColumn(_))
        ));
        assert!(matches!(
            grid.set_cell_value("missing", "col-name", "x"),
            Err(EngineError::UnknownTask(_))
        ));
    }

    #[test]
    fn test_coordinates_and_identifiers_agree() {
        let grid = GridStore::with_rows(3);
        let coord = CellCoordinate::new(2, 1);
        let cell = grid.cell_id_at(coord).unwrap();
        assert_eq!(cell.column_id, "col-status");
        assert_eq!(grid.coord_of(&cell), Some(coord));
        assert!(grid.cell_id_at(CellCoordinate::new(3, 0)).is_none());
    }

    #[test]
    fn test_append_keeps_existing_rows() {
        let mut grid = grid_with_names(&["one", "two", "three"]);
        let before: Vec<Task> = grid.tasks().to_vec();
        let mut styles = FormattingStore::new();

        let outcome = grid
            .apply_paste(Range::single(1, 0), &values(&[&["a", "b"], &["c", "d"]]), PasteMode::Append, &mut styles)
            .unwrap();

        assert_eq!(grid.row_count(), 5);
        assert_eq!(&grid.tasks()[..3], &before[..]);
        assert_eq!(column_values(&grid, 0), vec!["one", "two", "three", "a", "c"]);
        assert_eq!(column_values(&grid, 1)[3..], ["b", "d"]);
        assert_eq!(outcome.rows_added, 2);
        assert_eq!(outcome.affected, Some(Range::new(3, 0, 4, 1)));
        assert!(outcome.changes.is_empty());
    }

    #[test]
    fn test_replace_grows_rows_and_clips_columns() {
        let mut grid = grid_with_names(&["one", "two"]);
        let mut styles = FormattingStore::new();
        let paste = values(&[&["x", "y", "z"], &["p", "q", "r"], &["s", "t", "u"]]);

        let outcome = grid
            .apply_paste(Range::single(1, 3), &paste, PasteMode::Replace, &mut styles)
            .unwrap();

        assert_eq!(grid.row_count(), 4);
        assert_eq!(outcome.rows_added, 2);
        assert_eq!(outcome.affected, Some(Range::new(1, 3, 3, 4)));
        assert_eq!(column_values(&grid, 0), vec!["one", "two", "", ""]);
        assert_eq!(column_values(&grid, 3), vec!["", "x", "p", "s"]);
        assert_eq!(column_values(&grid, 4), vec!["", "y", "q", "t"]);
        assert_eq!(outcome.columns_clipped, 1);
        assert_eq!(outcome.rows_clipped, 0);
    }

    #[test]
    fn test_replace_smaller_than_selection_only_covers_pasted_cells() {
        let mut grid = grid_with_names(&["one", "two", "three"]);
        let mut styles = FormattingStore::new();

        grid.apply_paste(Range::new(0, 0, 2, 0), &values(&[&["new"]]), PasteMode::Replace, &mut styles)
            .unwrap();

        assert_eq!(column_values(&grid, 0), vec!["new", "two", "three"]);
    }

    #[test]
    fn test_replace_applies_pasted_formatting() {
        let mut grid = grid_with_names(&["one", "two"]);
        let mut styles = FormattingStore::new();
        let first = grid.cell_id_at(CellCoordinate::new(0, 0)).unwrap();
        let second = grid.cell_id_at(CellCoordinate::new(1, 0)).unwrap();
        styles.set_formatting(second.clone(), CellFormatting::default().with_background("#ccc"));

        let paste = styled(&[&[("A", CellFormatting::bold())], &[("B", CellFormatting::default())]]);
        grid.apply_paste(Range::single(0, 0), &paste, PasteMode::Replace, &mut styles)
            .unwrap();

        assert_eq!(styles.get_formatting(&first), CellFormatting::bold());
        assert!(!styles.has_formatting(&second));
    }

    #[test]
    fn test_values_only_leaves_formatting() {
        let mut grid = grid_with_names(&["one"]);
        let mut styles = FormattingStore::new();
        let paste = styled(&[&[("A", CellFormatting::bold())]]);

        grid.apply_paste(Range::single(0, 0), &paste, PasteMode::ValuesOnly, &mut styles)
            .unwrap();

        assert_eq!(column_values(&grid, 0), vec!["A"]);
        assert!(styles.is_empty());
    }

    #[test]
    fn test_formats_only_touches_no_values() {
        let mut grid = grid_with_names(&["one", "two"]);
        let before = grid.clone();
        let mut styles = FormattingStore::new();
        let untouched = grid.cell_id_at(CellCoordinate::new(1, 1)).unwrap();
        styles.set_formatting(untouched.clone(), CellFormatting::bold());

        let paste = styled(&[&[("X", CellFormatting::default().with_text_color("red"))]]);
        let outcome = grid
            .apply_paste(Range::single(0, 0), &paste, PasteMode::FormatsOnly, &mut styles)
            .unwrap();

        assert_eq!(grid, before);
        assert_eq!(styles.len(), 2);
        let target = grid.cell_id_at(CellCoordinate::new(0, 0)).unwrap();
        assert_eq!(styles.get_formatting(&target).text_color.as_deref(), Some("red"));
        assert_eq!(styles.get_formatting(&untouched), CellFormatting::bold());
        assert_eq!(outcome.affected, Some(Range::single(0, 0)));
    }

    #[test]
    fn test_formats_only_with_plain_text_changes_nothing() {
        let mut grid = grid_with_names(&["one"]);
        let mut styles = FormattingStore::new();
        let outcome = grid
            .apply_paste(Range::single(0, 0), &values(&[&["x"]]), PasteMode::FormatsOnly, &mut styles)
            .unwrap();
        assert_eq!(column_values(&grid, 0), vec!["one"]);
        assert!(styles.is_empty());
        assert_eq!(outcome.affected, None);
    }

    #[test]
    fn test_insert_rows_shifts_existing_down() {
        let mut grid = grid_with_names(&["one", "two", "three"]);
        let mut styles = FormattingStore::new();

        let outcome = grid
            .apply_paste(Range::single(1, 0), &values(&[&["a"], &["b"]]), PasteMode::InsertRows, &mut styles)
            .unwrap();

        assert_eq!(column_values(&grid, 0), vec!["one", "a", "b", "two", "three"]);
        assert_eq!(outcome.changes, vec![StructuralChange::RowsInserted { at: 1, count: 2 }]);
    }

    #[test]
    fn test_insert_columns_creates_unique_text_columns() {
        let mut grid = grid_with_names(&["one", "two"]);
        let mut styles = FormattingStore::new();
        let paste = values(&[&["a", "b"], &["c", "d"], &["clipped", "clipped"]]);

        let outcome = grid
            .apply_paste(Range::single(0, 1), &paste, PasteMode::InsertColumns, &mut styles)
            .unwrap();

        assert_eq!(grid.column_count(), 7);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.columns()[1].title, "Column 6");
        assert_eq!(grid.columns()[2].title, "Column 7");
        assert_eq!(grid.columns()[1].column_type, ColumnType::Text);
        assert_eq!(grid.columns()[3].id, "col-status");
        assert_eq!(column_values(&grid, 1), vec!["a", "c"]);
        assert_eq!(column_values(&grid, 2), vec!["b", "d"]);
        assert_eq!(outcome.columns_added, 2);
        assert_eq!(outcome.changes, vec![StructuralChange::ColumnsInserted { at: 1, count: 2 }]);
    }

    #[test]
    fn test_invalid_anchor_leaves_grid_untouched() {
        let mut grid = grid_with_names(&["one"]);
        let before = grid.clone();
        let mut styles = FormattingStore::new();

        let err = grid
            .apply_paste(Range::single(4, 0), &values(&[&["x"]]), PasteMode::Replace, &mut styles)
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidRange { row: 4, .. }));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_append_into_empty_grid() {
        let mut grid = GridStore::new();
        let mut styles = FormattingStore::new();
        grid.apply_paste(Range::single(0, 0), &values(&[&["first"]]), PasteMode::Append, &mut styles)
            .unwrap();
        assert_eq!(grid.tasks()[0].get(FIELD_NAME), Some("first"));
    }

    #[test]
    fn test_replace_and_insert_rows_into_empty_grid() {
        let mut styles = FormattingStore::new();

        let mut grid = GridStore::new();
        let outcome = grid
            .apply_paste(Range::single(0, 0), &values(&[&["a"], &["b"]]), PasteMode::Replace, &mut styles)
            .unwrap();
        assert_eq!(outcome.rows_added, 2);
        assert_eq!(column_values(&grid, 0), vec!["a", "b"]);

        let mut grid = GridStore::new();
        grid.apply_paste(Range::single(0, 1), &values(&[&["open"]]), PasteMode::InsertRows, &mut styles)
            .unwrap();
        assert_eq!(column_values(&grid, 1), vec!["open"]);

        let mut grid = GridStore::new();
        let err = grid
            .apply_paste(Range::single(0, 0), &values(&[&["x"]]), PasteMode::FormatsOnly, &mut styles)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { .. }));
    }

    #[test]
    fn test_id_title_gets_unreserved_key() {
        let mut grid = GridStore::with_rows(1);
        let column = grid.add_column(ColumnSpec::new("ID")).unwrap().clone();
        assert_eq!(column.key, "id2");

        let task = grid.tasks()[0].id.clone();
        grid.set_cell_value(&task, &column.id, "T-1").unwrap();
        assert_eq!(grid.tasks()[0].id, task);
        assert_eq!(grid.tasks()[0].get("id2"), Some("T-1"));

        let err = grid.add_column(ColumnSpec::new("Ident").with_key("id")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateColumn { ref key, .. } if key == "id"));
    }
}
