//! Tasks (rows), columns and identity-stable cell references.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default width for new columns, in pixels.
pub const DEFAULT_COLUMN_WIDTH: u32 = 150;

pub const FIELD_NAME: &str = "name";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_PRIORITY: &str = "priority";
pub const FIELD_START_DATE: &str = "startDate";
pub const FIELD_DEADLINE: &str = "deadline";

/// Field keys every task carries regardless of columns.
pub const KNOWN_FIELDS: [&str; 5] = [FIELD_NAME, FIELD_STATUS, FIELD_PRIORITY, FIELD_START_DATE, FIELD_DEADLINE];

/// Serialized task members that are not fields; no column may use them as a key.
pub const RESERVED_KEYS: [&str; 1] = ["id"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Select,
    Date,
    Number,
    Checkbox,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Select => "select",
            ColumnType::Date => "date",
            ColumnType::Number => "number",
            ColumnType::Checkbox => "checkbox",
        }
    }

    /// Lenient parse used for generated column suggestions; unknown names map to text.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "select" | "status" | "enum" => ColumnType::Select,
            "date" | "datetime" => ColumnType::Date,
            "number" | "numeric" | "integer" => ColumnType::Number,
            "checkbox" | "boolean" | "bool" => ColumnType::Checkbox,
            _ => ColumnType::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub title: String,
    /// Field identifier on every task.
    pub key: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
}

/// Caller-supplied description of a column to add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Generated when absent.
    pub id: Option<String>,
    pub title: String,
    /// Derived from the title when absent.
    pub key: Option<String>,
    pub column_type: ColumnType,
    pub width: Option<u32>,
    pub min_width: Option<u32>,
}

impl ColumnSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// The field key this column will use.
    pub fn resolved_key(&self) -> String {
        match &self.key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => derive_key(&self.title),
        }
    }
}

/// Derive a camelCase field key from a column title ("Start Date" -> "startDate").
pub fn derive_key(title: &str) -> String {
    let mut key = String::new();
    for (i, word) in title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_lowercase();
        if i == 0 {
            key.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                key.extend(first.to_uppercase());
                key.push_str(chars.as_str());
            }
        }
    }
    key
}

/// One row of the grid. All values are strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub status: String,
    pub priority: String,
    pub start_date: String,
    pub deadline: String,
    /// Values for user-defined columns, keyed by column key.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Task {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_known_field(key: &str) -> bool {
        KNOWN_FIELDS.contains(&key)
    }

    /// Keys that would collide with the task's own serialized members.
    pub fn is_reserved_key(key: &str) -> bool {
        RESERVED_KEYS.contains(&key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            FIELD_NAME => Some(&self.name),
            FIELD_STATUS => Some(&self.status),
            FIELD_PRIORITY => Some(&self.priority),
            FIELD_START_DATE => Some(&self.start_date),
            FIELD_DEADLINE => Some(&self.deadline),
            _ => self.fields.get(key).map(String::as_str),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            FIELD_NAME => self.name = value,
            FIELD_STATUS => self.status = value,
            FIELD_PRIORITY => self.priority = value,
            FIELD_START_DATE => self.start_date = value,
            FIELD_DEADLINE => self.deadline = value,
            _ => {
                self.fields.insert(key.to_string(), value);
            }
        }
    }

    pub fn has_field(&self, key: &str) -> bool {
        Self::is_known_field(key) || self.fields.contains_key(key)
    }

    /// Drop a user-defined field. Known fields are blanked instead.
    pub fn remove_field(&mut self, key: &str) {
        if Self::is_known_field(key) {
            self.set(key, String::new());
        } else {
            self.fields.remove(key);
        }
    }
}

/// Identity-stable reference to a cell. Survives row and column reordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellIdentifier {
    pub task_id: String,
    pub column_id: String,
}

impl CellIdentifier {
    pub fn new(task_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            column_id: column_id.into(),
        }
    }
}

impl std::fmt::Display for CellIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.task_id, self.column_id)
    }
}

/// The columns a fresh document starts with, one per known task field.
pub fn default_columns() -> Vec<Column> {
    [
        ("col-name", "Task Name", FIELD_NAME, ColumnType::Text, 240),
        ("col-status", "Status", FIELD_STATUS, ColumnType::Select, 140),
        ("col-priority", "Priority", FIELD_PRIORITY, ColumnType::Select, 120),
        ("col-start-date", "Start Date", FIELD_START_DATE, ColumnType::Date, 140),
        ("col-deadline", "Deadline", FIELD_DEADLINE, ColumnType::Date, 140),
    ]
    .into_iter()
    .map(|(id, title, key, column_type, width)| Column {
        id: id.to_string(),
        title: title.to_string(),
        key: key.to_string(),
        column_type,
        width,
        min_width: Some(80),
    })
    .collect()
}
