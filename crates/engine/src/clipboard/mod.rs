//! Clipboard payload parsing.
//!
//! Turns the two payload kinds a system clipboard offers (`text/html` and
//! `text/plain`) into one rectangular grid. HTML wins when it holds a
//! well-formed table; anything else falls back to tab-separated text.
//! Parsing never fails: the worst case is an empty grid.

mod html;
mod text;

use serde::{Deserialize, Serialize};

use crate::format::{CellFormatting, FormattedCellData};

pub use html::parse_html_table;
pub use text::parse_tsv;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Html,
    #[default]
    Text,
}

/// Parsed clipboard contents, ready to merge into the grid.
///
/// `raw_data` is always present and rectangular. `formatted_data`, when
/// present, has the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteFormatting {
    pub has_formatting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_data: Option<Vec<Vec<FormattedCellData>>>,
    pub raw_data: Vec<Vec<String>>,
    pub source_format: SourceFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
}

impl PasteFormatting {
    /// Unstyled values, padded to a rectangle.
    pub fn from_values(mut rows: Vec<Vec<String>>) -> Self {
        pad_rows(&mut rows);
        Self {
            has_formatting: false,
            formatted_data: None,
            raw_data: rows,
            source_format: SourceFormat::Text,
            html_content: None,
        }
    }

    /// Styled cells, padded to a rectangle.
    pub fn from_formatted(mut rows: Vec<Vec<FormattedCellData>>, html: Option<String>) -> Self {
        pad_rows(&mut rows);
        let raw_data = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.value.clone()).collect())
            .collect();
        Self {
            has_formatting: true,
            formatted_data: Some(rows),
            raw_data,
            source_format: SourceFormat::Html,
            html_content: html,
        }
    }

    pub fn row_count(&self) -> usize {
        self.raw_data.len()
    }

    pub fn col_count(&self) -> usize {
        self.raw_data.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.col_count() == 0
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&str> {
        self.raw_data.get(row)?.get(col).map(String::as_str)
    }

    /// Pasted style for a cell, if this payload carries styles.
    pub fn formatting(&self, row: usize, col: usize) -> Option<&CellFormatting> {
        if !self.has_formatting {
            return None;
        }
        self.formatted_data
            .as_ref()?
            .get(row)?
            .get(col)
            .map(|cell| &cell.formatting)
    }
}

/// Converts raw clipboard payloads into [`PasteFormatting`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipboardParser;

impl ClipboardParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, clipboard_html: Option<&str>, clipboard_text: &str) -> PasteFormatting {
        parse(clipboard_html, clipboard_text)
    }
}

/// Parse a clipboard payload, preferring an HTML table over plain text.
pub fn parse(clipboard_html: Option<&str>, clipboard_text: &str) -> PasteFormatting {
    if let Some(html) = clipboard_html.filter(|h| !h.trim().is_empty()) {
        match parse_html_table(html) {
            Some(rows) => return PasteFormatting::from_formatted(rows, Some(html.to_string())),
            None => log::debug!("clipboard html unusable ({} bytes), using plain text", html.len()),
        }
    }
    PasteFormatting::from_values(parse_tsv(clipboard_text))
}

/// Pad short rows so every row is as wide as the widest one.
pub(crate) fn pad_rows<T: Clone + Default>(rows: &mut [Vec<T>]) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, T::default());
    }
}
