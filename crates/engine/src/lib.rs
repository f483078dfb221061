pub mod clipboard;
pub mod document;
pub mod error;
pub mod format;
pub mod formatting_store;
pub mod generation;
pub mod grid;
pub mod history;
pub mod model;
pub mod paste;
pub mod snapshot;

pub use clipboard::{ClipboardParser, PasteFormatting, SourceFormat};
pub use document::{Document, DocumentOptions, PasteTicket};
pub use error::{EngineError, Result};
pub use format::{CellFormatting, FontStyle, FontWeight, FormattedCellData, TextAlign};
pub use formatting_store::{FormattingEntry, FormattingStore};
pub use generation::{GenerationRequest, GenerationSuggestion, Generator, SuggestedColumn};
pub use grid::GridStore;
pub use history::{ActionType, HistoryManager, HistoryState};
pub use model::{CellIdentifier, Column, ColumnSpec, ColumnType, Task};
pub use paste::{PasteMode, PasteOutcome};
pub use snapshot::Snapshot;

pub use taskgrid_core::{CellCoordinate, Range, SelectionModel, SelectionRange, StructuralChange};
