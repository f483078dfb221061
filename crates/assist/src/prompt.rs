// Prompt construction and reply parsing for generated table content.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use taskgrid_engine::generation::{GenerationRequest, GenerationSuggestion, SuggestedColumn};
use taskgrid_engine::ColumnType;

use crate::client::AssistError;

pub fn build_system_prompt() -> String {
    r#"You are a project planning assistant that fills in a task table.

CRITICAL INSTRUCTIONS:
1. Return ONLY valid JSON with exactly these keys: "columns" and "rows"
2. "columns" lists NEW columns to add: [{"title": "...", "type": "text|select|date|number|checkbox"}]
3. "rows" lists tasks to append; each row is an object keyed by column title
4. Every value in a row must be a string
5. Do NOT repeat columns that already exist
6. Do NOT include any text before or after the JSON
7. Do NOT use markdown code blocks

RESPONSE FORMAT:
{"columns": [{"title": "Owner", "type": "text"}], "rows": [{"Task Name": "Write launch post", "Status": "Not Started", "Owner": "Dana"}]}"#
        .to_string()
}

pub fn build_user_prompt(request: &GenerationRequest) -> String {
    let mut prompt = String::new();

    prompt.push_str("EXISTING COLUMNS:\n");
    if request.column_titles.is_empty() {
        prompt.push_str("(none)\n");
    }
    for title in &request.column_titles {
        prompt.push_str("- ");
        prompt.push_str(title);
        prompt.push('\n');
    }

    prompt.push_str("\nREQUEST:\n");
    prompt.push_str(request.prompt.trim());
    prompt.push('\n');

    prompt.push_str("\nRemember: Return ONLY valid JSON with \"columns\" and \"rows\" keys.");

    prompt
}

/// Loosely-typed reply; values are normalized to strings afterwards.
#[derive(Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    columns: Vec<RawColumn>,
    #[serde(default)]
    rows: Vec<serde_json::Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawColumn {
    Titled {
        title: String,
        #[serde(rename = "type", default)]
        column_type: Option<String>,
    },
    Bare(String),
}

/// Parsed reply plus anything we had to repair on the way.
#[derive(Debug, Clone)]
pub struct ParsedSuggestion {
    pub suggestion: GenerationSuggestion,
    pub warnings: Vec<String>,
}

/// Parse the model's reply text into a suggestion.
///
/// Accepts bare JSON, JSON wrapped in prose or a code fence, non-string
/// scalar values, and bare-string column entries.
pub fn parse_suggestion(content: &str) -> Result<ParsedSuggestion, AssistError> {
    let mut warnings = Vec::new();

    let raw: RawSuggestion = match serde_json::from_str(content.trim()) {
        Ok(p) => p,
        Err(e) => {
            // Try to extract JSON from the response if it's wrapped in text
            let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) else {
                return Err(not_json(&e, content));
            };
            if end < start {
                return Err(not_json(&e, content));
            }
            match serde_json::from_str(&content[start..=end]) {
                Ok(p) => {
                    warnings.push("Response contained extra text around JSON".to_string());
                    p
                }
                Err(_) => return Err(unparsable(&e, content)),
            }
        }
    };

    let mut columns = Vec::new();
    for column in raw.columns {
        let (title, column_type) = match column {
            RawColumn::Titled { title, column_type } => (title, column_type),
            RawColumn::Bare(title) => (title, None),
        };
        let title = title.trim().to_string();
        if title.is_empty() {
            warnings.push("Dropped column with empty title".to_string());
            continue;
        }
        columns.push(SuggestedColumn {
            title,
            column_type: column_type
                .as_deref()
                .map(ColumnType::from_name)
                .unwrap_or_default(),
        });
    }

    let mut rows = Vec::new();
    for object in raw.rows {
        let row: BTreeMap<String, String> = object
            .into_iter()
            .map(|(key, value)| (key, value_to_string(value)))
            .collect();
        if row.values().all(|v| v.is_empty()) {
            warnings.push("Dropped empty row".to_string());
            continue;
        }
        rows.push(row);
    }

    Ok(ParsedSuggestion {
        suggestion: GenerationSuggestion { columns, rows },
        warnings,
    })
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn not_json(e: &serde_json::Error, content: &str) -> AssistError {
    AssistError::ParseError(format!("Response is not JSON: {}. Raw: {}", e, content))
}

fn unparsable(e: &serde_json::Error, content: &str) -> AssistError {
    AssistError::ParseError(format!("Failed to parse JSON: {}. Raw: {}", e, content))
}
