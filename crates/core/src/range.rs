use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Positional cell address (0-based).
///
/// Only meaningful against the rows/columns it was taken from: inserting or
/// deleting rows or columns invalidates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub row: usize,
    pub col: usize,
}

impl CellCoordinate {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellCoordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// A selection as the user made it.
///
/// `start` is where the gesture began and may lie below or to the right of
/// `end`. Call [`SelectionRange::normalized`] before doing anything with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: CellCoordinate,
    pub end: CellCoordinate,
}

impl SelectionRange {
    pub fn new(start: impl Into<CellCoordinate>, end: impl Into<CellCoordinate>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// A single selected cell (`start == end`).
    pub fn single(cell: impl Into<CellCoordinate>) -> Self {
        let cell = cell.into();
        Self { start: cell, end: cell }
    }

    pub fn normalized(&self) -> Range {
        Range::new(self.start.row, self.start.col, self.end.row, self.end.col)
    }
}

impl From<Range> for SelectionRange {
    fn from(range: Range) -> Self {
        Self {
            start: CellCoordinate::new(range.start_row, range.start_col),
            end: CellCoordinate::new(range.end_row, range.end_col),
        }
    }
}

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// Range covering `rows x cols` cells with its top-left at `origin`.
    /// Returns `None` for an empty extent.
    pub fn from_extent(origin: CellCoordinate, rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Self {
            start_row: origin.row,
            start_col: origin.col,
            end_row: origin.row + rows - 1,
            end_col: origin.col + cols - 1,
        })
    }

    pub fn top_left(&self) -> CellCoordinate {
        CellCoordinate::new(self.start_row, self.start_col)
    }

    pub fn bottom_right(&self) -> CellCoordinate {
        CellCoordinate::new(self.end_row, self.end_col)
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.start_row..=self.end_row
    }

    pub fn cols(&self) -> RangeInclusive<usize> {
        self.start_col..=self.end_col
    }

    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = CellCoordinate> {
        let start_col = self.start_col;
        let end_col = self.end_col;

        self.rows().flat_map(move |r| {
            (start_col..=end_col).map(move |c| CellCoordinate::new(r, c))
        })
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// True if every cell lies inside a `rows x cols` grid.
    pub fn fits(&self, rows: usize, cols: usize) -> bool {
        self.end_row < rows && self.end_col < cols
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &Range) -> Range {
        Range {
            start_row: self.start_row.min(other.start_row),
            start_col: self.start_col.min(other.start_col),
            end_row: self.end_row.max(other.end_row),
            end_col: self.end_col.max(other.end_col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_single() {
        let r = Range::single(5, 3);
        assert!(r.contains(5, 3));
        assert!(!r.contains(5, 4));
        assert!(r.is_single());
        assert_eq!(r.cell_count(), 1);
    }

    #[test]
    fn test_range_multi() {
        let r = Range::new(1, 1, 3, 2);
        assert!(r.contains(1, 1));
        assert!(r.contains(2, 2));
        assert!(r.contains(3, 1));
        assert!(!r.contains(0, 0));
        assert!(!r.is_single());
        assert_eq!(r.cell_count(), 6); // 3 rows x 2 cols
    }

    #[test]
    fn test_selection_range_normalizes_reversed_drag() {
        let sel = SelectionRange::new((2, 3), (0, 1));
        let r = sel.normalized();
        assert_eq!(r.rows(), 0..=2);
        assert_eq!(r.cols(), 1..=3);
    }

    #[test]
    fn test_cells_row_major() {
        let r = Range::new(0, 0, 1, 1);
        let cells: Vec<_> = r.cells().map(|c| (c.row, c.col)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_from_extent() {
        let r = Range::from_extent(CellCoordinate::new(2, 1), 3, 2).unwrap();
        assert_eq!(r, Range::new(2, 1, 4, 2));
        assert!(Range::from_extent(CellCoordinate::new(0, 0), 0, 4).is_none());
    }

    #[test]
    fn test_fits() {
        let r = Range::new(0, 0, 2, 4);
        assert!(r.fits(3, 5));
        assert!(!r.fits(2, 5));
        assert!(!r.fits(3, 4));
    }
}
