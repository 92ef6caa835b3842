//! # Agenda - conference agenda store and lookup
//!
//! Imports a spreadsheet agenda (sessions, sub-sessions, speakers) into SQLite
//! and answers column lookups over it.
//!
//! Agenda provides:
//! - A small schema-driven SQLite table layer (create/select/insert/update)
//! - An import pipeline that rebuilds the session hierarchy from row order
//! - A lookup engine with exact, substring and speaker matching plus
//!   parent/child expansion

pub mod session;
pub mod storage;
pub mod import;
pub mod query;
pub mod config;
pub mod logging;
pub mod ui;

// Re-exports for convenient access
pub use session::{NewSession, Session, SessionKind, SessionSpeaker, Speaker};
pub use storage::SqliteStore;
pub use import::{ImportOptions, ImportReport, Importer};
pub use query::{LookupColumn, LookupEngine, SessionMatch};

/// Result type alias for Agenda operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Agenda operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File '{0}' not found.")]
    SourceNotFound(String),

    #[error("Unable to read the agenda file '{path}': {reason}")]
    UnreadableSource { path: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Invalid lookup column '{0}'")]
    InvalidColumn(String),

    #[error("Unknown column '{column}' for table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

impl Error {
    /// Source-access failures abort an import without being treated as fatal.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Error::SourceNotFound(_) | Error::UnreadableSource { .. } | Error::Csv(_)
        )
    }
}
