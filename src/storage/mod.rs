//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite file with tables:
//! - sessions(id, data, time_start, time_end, session_type, title, location, description, parent_id)
//! - speakers(id, name)
//! - session_speakers(session_id, speaker_id)
//!
//! Deleting the file is the way to reset the store or apply schema changes.

pub mod schema;
pub mod sqlite;

pub use schema::{ColumnDef, ColumnType, TableSchema};
pub use sqlite::{DbStats, Row, SqliteStore};
