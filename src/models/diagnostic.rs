//! Non-fatal findings collected during a run.

use serde::Serialize;
use std::fmt;

/// Something the caller should see but that did not stop generation.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Row field count did not match the header; the row was skipped.
    RowSkipped {
        line: usize,
        prefix: String,
        expected: usize,
        actual: usize,
    },
    /// Table name hints at another topology than the one chosen.
    TopologyMismatch {
        chosen: String,
        table_hint: String,
    },
    /// A substitution rule found nothing to replace.
    PatternMissing { key: String, rule: String },
    /// Record has an empty store identifier; the row was skipped.
    BlankStoreId { line: usize },
    /// A later record produced an output key that was already taken.
    DuplicateKey {
        key: String,
        first_line: usize,
        line: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::RowSkipped {
                line,
                prefix,
                expected,
                actual,
            } => write!(
                f,
                "line {line}: skipped row '{prefix}' - expected {expected} fields, got {actual}"
            ),
            Diagnostic::TopologyMismatch { chosen, table_hint } => write!(
                f,
                "template resolved to {chosen} but table name suggests {table_hint}"
            ),
            Diagnostic::PatternMissing { key, rule } => {
                write!(f, "{key}: template has no match for '{rule}', left unchanged")
            }
            Diagnostic::BlankStoreId { line } => {
                write!(f, "line {line}: blank store identifier, row skipped")
            }
            Diagnostic::DuplicateKey {
                key,
                first_line,
                line,
            } => write!(
                f,
                "{key}: line {line} overwrites output from line {first_line}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_row_skipped() {
        let d = Diagnostic::RowSkipped {
            line: 3,
            prefix: "Store A,1.1.1.1".to_string(),
            expected: 8,
            actual: 7,
        };
        assert_eq!(
            d.to_string(),
            "line 3: skipped row 'Store A,1.1.1.1' - expected 8 fields, got 7"
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let d = Diagnostic::PatternMissing {
            key: "BR1".to_string(),
            rule: "hostname".to_string(),
        };
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"pattern_missing","key":"BR1","rule":"hostname"}"#
        );
    }
}
