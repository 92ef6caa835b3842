//! Import pipeline
//!
//! Turns spreadsheet rows into stored sessions, speakers and links:
//! - `source`: reads CSV or workbook rows past the header offset
//! - `normalize`: speaker splitting and date/time normalization
//! - `importer`: rebuilds the session hierarchy from row order

pub mod importer;
pub mod normalize;
pub mod source;

pub use importer::{DEFAULT_HEADER_ROWS, ImportOptions, ImportReport, Importer};
pub use source::{AgendaRow, read_rows};
