//! Fatal error taxonomy.
//!
//! Anything in [`GenError`] aborts the whole run. Recoverable problems are
//! reported as [`crate::models::Diagnostic`] values instead.

/// Errors that stop a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("Empty table: no header line found")]
    EmptyTable,

    #[error("Table must have exactly one store column (name containing 'store'), found {found:?}")]
    MissingStoreColumn { found: Vec<String> },

    #[error("Line {line}: store identifier is blank")]
    BlankStoreId { line: usize },

    #[error("Unable to classify template topology (Flat or Inter): {0}")]
    UnresolvedTopology(String),

    #[error("Invalid address {ip}/{mask}: {reason}")]
    Address {
        ip: String,
        mask: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    pub fn address(ip: &str, mask: &str, reason: impl Into<String>) -> GenError {
        GenError::Address {
            ip: ip.to_string(),
            mask: mask.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
