//! Selection model.
//!
//! Holds at most one rectangular range. The range is stored as the user made
//! it; every query goes through [`SelectionRange::normalized`], so callers
//! never see an unordered range.

use crate::range::{CellCoordinate, Range, SelectionRange};

/// A row/column insertion or deletion that shifts positional coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralChange {
    RowsInserted { at: usize, count: usize },
    RowsDeleted { at: usize, count: usize },
    ColumnsInserted { at: usize, count: usize },
    ColumnsDeleted { at: usize, count: usize },
}

#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    range: Option<SelectionRange>,
    /// Bumped on every change, including clears and re-maps.
    revision: u64,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_range(&mut self, range: SelectionRange) {
        self.range = Some(range);
        self.revision += 1;
    }

    /// Select a single cell.
    pub fn select_cell(&mut self, cell: CellCoordinate) {
        self.set_range(SelectionRange::single(cell));
    }

    /// The range as the user made it (possibly unordered).
    pub fn range(&self) -> Option<SelectionRange> {
        self.range
    }

    pub fn normalized_range(&self) -> Option<Range> {
        self.range.map(|r| r.normalized())
    }

    /// All selected cells in row-major order.
    pub fn cells_in_range(&self) -> Vec<CellCoordinate> {
        self.normalized_range()
            .map(|r| r.cells().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        if self.range.take().is_some() {
            self.revision += 1;
        }
    }

    pub fn is_cell_selected(&self, cell: CellCoordinate) -> bool {
        self.normalized_range()
            .is_some_and(|r| r.contains(cell.row, cell.col))
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Shrink the selection to a `rows x cols` grid, clearing it when no
    /// selected cell survives. Used after the grid is swapped wholesale.
    pub fn clamp_to(&mut self, rows: usize, cols: usize) {
        let Some(current) = self.normalized_range() else {
            return;
        };
        if current.fits(rows, cols) {
            return;
        }
        if current.start_row >= rows || current.start_col >= cols {
            self.clear();
            return;
        }
        let clamped = Range::new(
            current.start_row,
            current.start_col,
            current.end_row.min(rows - 1),
            current.end_col.min(cols - 1),
        );
        self.set_range(SelectionRange::from(clamped));
    }

    /// Re-map the selection after rows or columns moved underneath it.
    ///
    /// Insertions shift the range. Deletions shift it and drop the deleted
    /// band; a range that was entirely deleted is cleared.
    pub fn apply_structural_change(&mut self, change: StructuralChange) {
        let Some(current) = self.normalized_range() else {
            return;
        };

        let rows = (current.start_row, current.end_row);
        let cols = (current.start_col, current.end_col);

        let remapped = match change {
            StructuralChange::RowsInserted { at, count } => {
                Some((shift_inserted(rows, at, count), cols))
            }
            StructuralChange::ColumnsInserted { at, count } => {
                Some((rows, shift_inserted(cols, at, count)))
            }
            StructuralChange::RowsDeleted { at, count } => {
                shift_deleted(rows, at, count).map(|rows| (rows, cols))
            }
            StructuralChange::ColumnsDeleted { at, count } => {
                shift_deleted(cols, at, count).map(|cols| (rows, cols))
            }
        };

        match remapped {
            Some(((r1, r2), (c1, c2))) => {
                self.set_range(SelectionRange::from(Range::new(r1, c1, r2, c2)));
            }
            None => self.clear(),
        }
    }
}

fn shift_inserted((min, max): (usize, usize), at: usize, count: usize) -> (usize, usize) {
    let shift = |i: usize| if i >= at { i + count } else { i };
    (shift(min), shift(max))
}

/// Survivors of `[min, max]` once `[at, at + count)` is removed, re-indexed.
fn shift_deleted((min, max): (usize, usize), at: usize, count: usize) -> Option<(usize, usize)> {
    if count == 0 {
        return Some((min, max));
    }
    let end = at + count;

    let first = if min < at { min } else { min.max(end) };
    let last = if max >= end { max } else if max < at { max } else { at.checked_sub(1)? };

    if first > last {
        return None;
    }

    let remap = |i: usize| if i >= end { i - count } else { i };
    Some((remap(first), remap(last)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(r1: usize, c1: usize, r2: usize, c2: usize) -> SelectionModel {
        let mut s = SelectionModel::new();
        s.set_range(SelectionRange::new((r1, c1), (r2, c2)));
        s
    }

    #[test]
    fn test_normalizes_reversed_range() {
        let s = sel(2, 3, 0, 1);
        let r = s.normalized_range().unwrap();
        assert_eq!(r.rows(), 0..=2);
        assert_eq!(r.cols(), 1..=3);
    }

    #[test]
    fn test_single_cell_selection() {
        let mut s = SelectionModel::new();
        s.select_cell(CellCoordinate::new(4, 2));
        let r = s.range().unwrap();
        assert_eq!(r.start, r.end);
        assert_eq!(s.cells_in_range(), vec![CellCoordinate::new(4, 2)]);
    }

    #[test]
    fn test_is_cell_selected() {
        let s = sel(3, 3, 1, 1);
        assert!(s.is_cell_selected(CellCoordinate::new(2, 2)));
        assert!(s.is_cell_selected(CellCoordinate::new(1, 3)));
        assert!(!s.is_cell_selected(CellCoordinate::new(0, 2)));
    }

    #[test]
    fn test_clear() {
        let mut s = sel(0, 0, 1, 1);
        let rev = s.revision();
        s.clear();
        assert!(s.is_empty());
        assert!(s.cells_in_range().is_empty());
        assert!(s.revision() > rev);
    }

    #[test]
    fn test_rows_inserted_above_shifts_down() {
        let mut s = sel(2, 0, 3, 1);
        s.apply_structural_change(StructuralChange::RowsInserted { at: 1, count: 2 });
        assert_eq!(s.normalized_range(), Some(Range::new(4, 0, 5, 1)));
    }

    #[test]
    fn test_rows_inserted_below_is_untouched() {
        let mut s = sel(2, 0, 3, 1);
        s.apply_structural_change(StructuralChange::RowsInserted { at: 4, count: 2 });
        assert_eq!(s.normalized_range(), Some(Range::new(2, 0, 3, 1)));
    }

    #[test]
    fn test_columns_inserted_inside_widens() {
        let mut s = sel(0, 1, 0, 3);
        s.apply_structural_change(StructuralChange::ColumnsInserted { at: 2, count: 1 });
        assert_eq!(s.normalized_range(), Some(Range::new(0, 1, 0, 4)));
    }

    #[test]
    fn test_rows_deleted_above_shifts_up() {
        let mut s = sel(5, 0, 6, 0);
        s.apply_structural_change(StructuralChange::RowsDeleted { at: 1, count: 2 });
        assert_eq!(s.normalized_range(), Some(Range::new(3, 0, 4, 0)));
    }

    #[test]
    fn test_rows_deleted_overlapping_shrinks() {
        // rows 2..=6 selected, rows 4..=5 deleted -> survivors 2,3,6 -> 2..=4
        let mut s = sel(2, 0, 6, 0);
        s.apply_structural_change(StructuralChange::RowsDeleted { at: 4, count: 2 });
        assert_eq!(s.normalized_range(), Some(Range::new(2, 0, 4, 0)));

        // rows 2..=4 selected, rows 1..=2 deleted -> survivors 3,4 -> 1..=2
        let mut s = sel(2, 0, 4, 0);
        s.apply_structural_change(StructuralChange::RowsDeleted { at: 1, count: 2 });
        assert_eq!(s.normalized_range(), Some(Range::new(1, 0, 2, 0)));

        // rows 2..=4 selected, rows 4..=7 deleted -> survivors 2,3
        let mut s = sel(2, 0, 4, 0);
        s.apply_structural_change(StructuralChange::RowsDeleted { at: 4, count: 4 });
        assert_eq!(s.normalized_range(), Some(Range::new(2, 0, 3, 0)));
    }

    #[test]
    fn test_fully_deleted_selection_is_cleared() {
        let mut s = sel(2, 1, 3, 1);
        s.apply_structural_change(StructuralChange::RowsDeleted { at: 2, count: 2 });
        assert!(s.is_empty());

        let mut s = sel(0, 2, 4, 2);
        s.apply_structural_change(StructuralChange::ColumnsDeleted { at: 2, count: 1 });
        assert!(s.is_empty());
    }

    #[test]
    fn test_change_on_empty_selection_is_noop() {
        let mut s = SelectionModel::new();
        s.apply_structural_change(StructuralChange::RowsInserted { at: 0, count: 1 });
        assert!(s.is_empty());
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn test_clamp_to_smaller_grid() {
        let mut s = sel(1, 1, 5, 5);
        s.clamp_to(3, 4);
        assert_eq!(s.normalized_range(), Some(Range::new(1, 1, 2, 3)));

        let rev = s.revision();
        s.clamp_to(10, 10);
        assert_eq!(s.revision(), rev);

        s.clamp_to(1, 10);
        assert!(s.is_empty());
    }
}
