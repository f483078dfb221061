use std::fmt;

/// Errors reported by structural grid operations.
///
/// Every operation that returns one of these has left the grid, formatting
/// and history exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A column with this id or field key already exists.
    DuplicateColumn { id: String, key: String },
    /// A range or coordinate lies outside the current grid.
    InvalidRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// No task with this id.
    UnknownTask(String),
    /// No column with this id.
    UnknownColumn(String),
    /// An imported snapshot is unreadable or inconsistent.
    InvalidSnapshot(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn { id, key } => {
                write!(f, "duplicate column: id '{id}' or key '{key}' already exists")
            }
            Self::InvalidRange { row, col, rows, cols } => {
                write!(f, "cell ({row}, {col}) is outside the {rows}x{cols} grid")
            }
            Self::UnknownTask(id) => write!(f, "unknown task: {id}"),
            Self::UnknownColumn(id) => write!(f, "unknown column: {id}"),
            Self::InvalidSnapshot(msg) => write!(f, "invalid snapshot: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;
