//! Seam for generated content.
//!
//! A [`Generator`] turns a free-text prompt into suggested columns and rows.
//! The engine never talks to a network itself; suggestions are merged by
//! [`Document::merge_suggestion`](crate::Document::merge_suggestion) through
//! the regular add-column and append-paste paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{derive_key, ColumnType};

/// What the generator is asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    /// Titles of the columns the document already has, in order.
    pub column_titles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedColumn {
    pub title: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
}

impl SuggestedColumn {
    pub fn key(&self) -> String {
        derive_key(&self.title)
    }
}

/// Columns to add and rows to append.
///
/// Row maps are keyed by column title or field key; anything that matches
/// neither is dropped on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSuggestion {
    #[serde(default)]
    pub columns: Vec<SuggestedColumn>,
    #[serde(default)]
    pub rows: Vec<BTreeMap<String, String>>,
}

impl GenerationSuggestion {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// Anything that can answer a [`GenerationRequest`].
pub trait Generator {
    type Error: std::error::Error;

    fn generate(&self, request: &GenerationRequest) -> Result<GenerationSuggestion, Self::Error>;
}
