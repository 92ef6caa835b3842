//! Agenda importer
//!
//! Walks agenda rows in order and writes sessions, speakers and links.
//! Sub-sessions attach to the most recent top-level session; there is no
//! explicit parent column in the source.

use std::path::Path;
use serde::Serialize;
use crate::Result;
use crate::session::{NewSession, SessionKind};
use crate::storage::SqliteStore;
use super::normalize::{normalize_schedule, split_speakers};
use super::source::{AgendaRow, read_rows};

/// Default number of leading spreadsheet rows before the agenda starts
pub const DEFAULT_HEADER_ROWS: usize = 15;

/// Options controlling how rows are read and stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Rows to skip at the top of the sheet
    pub header_rows: usize,
    /// Store dates as `YYYY-MM-DD` and times as `YYYY-MM-DD HH:MM`
    pub normalize_times: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            header_rows: DEFAULT_HEADER_ROWS,
            normalize_times: true,
        }
    }
}

/// Summary of one import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Top-level sessions inserted, including promoted ones
    pub sessions: usize,
    pub sub_sessions: usize,
    /// Rows with an unrecognized kind that were stored as top-level sessions
    pub promoted: usize,
    pub speakers_created: usize,
    pub links: usize,
    pub skipped_empty: usize,
    pub skipped_orphans: usize,
    pub warnings: Vec<String>,
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Import Summary:")?;
        writeln!(f, "  Sessions: {} ({} unrecognized kind)", self.sessions, self.promoted)?;
        writeln!(f, "  Sub-sessions: {}", self.sub_sessions)?;
        writeln!(f, "  New speakers: {}", self.speakers_created)?;
        writeln!(f, "  Speaker links: {}", self.links)?;
        writeln!(f, "  Skipped: {} empty, {} orphaned", self.skipped_empty, self.skipped_orphans)
    }
}

/// Streams agenda rows into a store
pub struct Importer<'a> {
    store: &'a SqliteStore,
    options: ImportOptions,
    last_session_id: Option<i64>,
    report: ImportReport,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a SqliteStore, options: ImportOptions) -> Self {
        Self {
            store,
            options,
            last_session_id: None,
            report: ImportReport::default(),
        }
    }

    /// Read `path` and import every row.
    ///
    /// Source errors are returned before anything is written. A store or
    /// timestamp error mid-way leaves earlier rows committed.
    pub fn import_file(self, path: &Path) -> Result<ImportReport> {
        self.import_file_with(path, |_, _, _| {})
    }

    /// Like `import_file`, calling `on_row(done, total, row)` after each row
    pub fn import_file_with<F>(mut self, path: &Path, mut on_row: F) -> Result<ImportReport>
    where
        F: FnMut(usize, usize, &AgendaRow),
    {
        let rows = read_rows(path, self.options.header_rows)?;
        tracing::info!("Read {} agenda rows from {}", rows.len(), path.display());
        for (idx, row) in rows.iter().enumerate() {
            self.import_row(row)?;
            on_row(idx + 1, rows.len(), row);
        }
        Ok(self.finish())
    }

    /// Import a single row, returning the inserted session id if any
    pub fn import_row(&mut self, row: &AgendaRow) -> Result<Option<i64>> {
        if row.is_empty() {
            self.report.skipped_empty += 1;
            return Ok(None);
        }

        let kind = SessionKind::classify(&row.kind);
        let parent_id = match kind {
            SessionKind::Session => None,
            SessionKind::SubSession => match self.last_session_id {
                Some(parent) => Some(parent),
                None => {
                    let warning = format!("Sub-session '{}' found without a parent session.", row.title);
                    tracing::warn!("{}", warning);
                    self.report.warnings.push(warning);
                    self.report.skipped_orphans += 1;
                    return Ok(None);
                }
            },
            SessionKind::Unrecognized => {
                tracing::debug!(
                    "Unrecognized session type '{}' for '{}', importing as a top-level session",
                    row.kind,
                    row.title
                );
                None
            }
        };

        let session = self.build_session(row, parent_id)?;
        let session_id = self.store.insert_session(&session)?;
        tracing::debug!("Inserted {} #{} '{}'", kind, session_id, session.title);

        match kind {
            SessionKind::SubSession => self.report.sub_sessions += 1,
            SessionKind::Session => {
                self.report.sessions += 1;
                self.last_session_id = Some(session_id);
            }
            SessionKind::Unrecognized => {
                self.report.sessions += 1;
                self.report.promoted += 1;
                self.last_session_id = Some(session_id);
            }
        }

        for name in split_speakers(&row.speakers) {
            let speaker_id = self.resolve_speaker(&name)?;
            self.store.link_speaker(session_id, speaker_id)?;
            self.report.links += 1;
        }

        Ok(Some(session_id))
    }

    /// Consume the importer and return its report
    pub fn finish(self) -> ImportReport {
        tracing::info!(
            "Imported {} sessions and {} sub-sessions",
            self.report.sessions,
            self.report.sub_sessions
        );
        self.report
    }

    fn build_session(&self, row: &AgendaRow, parent_id: Option<i64>) -> Result<NewSession> {
        let session = NewSession::new(row.kind.as_str(), row.title.as_str())
            .with_location(row.location.as_str())
            .with_description(row.description.as_str());

        let session = if self.options.normalize_times {
            let schedule = normalize_schedule(&row.date, &row.time_start, &row.time_end)?;
            session.with_schedule(schedule.date, schedule.time_start, schedule.time_end)
        } else {
            session.with_schedule(row.date.as_str(), row.time_start.as_str(), row.time_end.as_str())
        };

        Ok(match parent_id {
            Some(parent) => session.with_parent(parent),
            None => session,
        })
    }

    /// Reuse an existing speaker with exactly this name, or create one
    fn resolve_speaker(&mut self, name: &str) -> Result<i64> {
        if let Some(speaker) = self.store.find_speaker_by_name(name)? {
            return Ok(speaker.id);
        }
        let id = self.store.insert_speaker(name)?;
        self.report.speakers_created += 1;
        Ok(id)
    }
}
