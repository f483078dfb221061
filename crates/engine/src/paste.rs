//! Paste modes and the result of applying a paste to the grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskgrid_core::{Range, StructuralChange};

/// How clipboard data merges with the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PasteMode {
    /// Overwrite cells from the anchor; rows grow past the end, columns clip.
    #[default]
    Replace,
    /// Insert one new row per pasted row at the anchor.
    InsertRows,
    /// Insert one new text column per pasted column at the anchor.
    InsertColumns,
    /// Add pasted rows after the last row, aligned at the anchor column.
    Append,
    /// Like `Replace`, but pasted formatting is ignored.
    ValuesOnly,
    /// Apply pasted formatting only; values stay as they are.
    FormatsOnly,
}

impl PasteMode {
    pub const ALL: [PasteMode; 6] = [
        PasteMode::Replace,
        PasteMode::InsertRows,
        PasteMode::InsertColumns,
        PasteMode::Append,
        PasteMode::ValuesOnly,
        PasteMode::FormatsOnly,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PasteMode::Replace => "replace",
            PasteMode::InsertRows => "insert-rows",
            PasteMode::InsertColumns => "insert-columns",
            PasteMode::Append => "append",
            PasteMode::ValuesOnly => "values-only",
            PasteMode::FormatsOnly => "formats-only",
        }
    }

    /// Whether values from the clipboard are written.
    pub fn writes_values(&self) -> bool {
        !matches!(self, PasteMode::FormatsOnly)
    }

    /// Whether styles from the clipboard are written (when it carries any).
    pub fn writes_formatting(&self) -> bool {
        !matches!(self, PasteMode::ValuesOnly)
    }
}

impl fmt::Display for PasteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PasteMode {
    type Err = String;

    /// Accepts `insert-rows`, `insert_rows`, `INSERT_ROWS` and `insertrows`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && *c != ' ')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "replace" => Ok(PasteMode::Replace),
            "insertrows" => Ok(PasteMode::InsertRows),
            "insertcolumns" | "insertcols" => Ok(PasteMode::InsertColumns),
            "append" => Ok(PasteMode::Append),
            "valuesonly" | "values" => Ok(PasteMode::ValuesOnly),
            "formatsonly" | "formats" => Ok(PasteMode::FormatsOnly),
            _ => Err(format!("unknown paste mode: {}", s)),
        }
    }
}

/// What a paste did to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteOutcome {
    pub mode: PasteMode,
    /// Cells written (values or formatting), in post-paste coordinates.
    /// `None` when nothing landed in the grid.
    pub affected: Option<Range>,
    pub rows_added: usize,
    pub columns_added: usize,
    /// Pasted rows and columns that fell outside the grid and were dropped.
    pub rows_clipped: usize,
    pub columns_clipped: usize,
    /// Positional shifts the selection has to follow.
    pub changes: Vec<StructuralChange>,
}

impl PasteOutcome {
    pub(crate) fn empty(mode: PasteMode) -> Self {
        Self {
            mode,
            affected: None,
            rows_added: 0,
            columns_added: 0,
            rows_clipped: 0,
            columns_clipped: 0,
            changes: Vec::new(),
        }
    }
}
