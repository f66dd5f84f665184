//! One site row from the table.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Marker that identifies the store-identifier column (case-insensitive).
pub const STORE_COLUMN_MARKER: &str = "store";

/// Ordered column -> value mapping for one table row.
///
/// Column names keep their case; values are trimmed by the ingester.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    /// 1-based line number in the source table.
    pub line: usize,
    pub fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(line: usize, fields: Vec<(String, String)>) -> Record {
        Record { line, fields }
    }

    /// Value of an exactly named column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }

    /// Value of an exactly named column, `None` when absent or blank.
    pub fn non_blank(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// All columns whose name contains [`STORE_COLUMN_MARKER`].
    pub fn store_columns(&self) -> Vec<&str> {
        self.columns()
            .filter(|k| k.to_lowercase().contains(STORE_COLUMN_MARKER))
            .collect()
    }

    /// The store identifier, if exactly one store column exists.
    pub fn store_id(&self) -> Option<&str> {
        match self.store_columns().as_slice() {
            [column] => self.get(column),
            _ => None,
        }
    }
}

lazy_static! {
    static ref UNSAFE_KEY_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.-]").expect("Invalid Regex?");
}

/// Trim and map every character outside `[A-Za-z0-9_.-]` to `_`.
///
/// Used for both the hostname and the output key, so the key never holds a
/// path separator.
pub fn sanitize_store_id(raw: &str) -> String {
    UNSAFE_KEY_CHARS.replace_all(raw.trim(), "_").into_owned()
}
