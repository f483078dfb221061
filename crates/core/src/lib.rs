//! Core types shared by the engine and its front ends: positional cell
//! coordinates, rectangular ranges and the selection model.

pub mod range;
pub mod selection;

pub use range::{CellCoordinate, Range, SelectionRange};
pub use selection::{SelectionModel, StructuralChange};
