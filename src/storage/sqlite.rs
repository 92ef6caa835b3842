//! SQLite storage implementation

use std::collections::BTreeMap;
use std::path::Path;
use rusqlite::{Connection, params_from_iter};
use rusqlite::types::Value;
use crate::{Error, Result};
use crate::session::{NewSession, Session, SessionSpeaker, Speaker};
use super::schema::{self, TableSchema};

/// A selected row, keyed by column name
pub type Row = BTreeMap<String, Value>;

/// SQLite-backed storage for the agenda.
///
/// Every statement runs in autocommit mode, so each insert/update is durable
/// once it returns. The connection is released when the store is dropped.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Close the connection, reporting any error instead of swallowing it in `Drop`
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::from(e))
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for table in schema::AGENDA_TABLES {
            self.create_table(table)?;
        }
        for stmt in schema::CREATE_INDEXES {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Table Primitives ==========

    /// Create the table if it does not exist yet.
    ///
    /// An existing table is left untouched even if `table` has different columns.
    pub fn create_table(&self, table: &TableSchema) -> Result<()> {
        table.validate()?;
        self.conn.execute(&table.create_sql(), [])?;
        Ok(())
    }

    /// Select rows, in insertion order.
    ///
    /// `columns = None` selects every schema column. Filters are combined with
    /// AND and compared with strict equality.
    pub fn select(
        &self,
        table: &TableSchema,
        columns: Option<&[&str]>,
        filters: &[(&str, Value)],
    ) -> Result<Vec<Row>> {
        let columns: Vec<&str> = match columns {
            Some(columns) => columns.to_vec(),
            None => table.column_names(),
        };
        for column in &columns {
            table.require_column(column)?;
        }

        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), table.name);
        sql.push_str(&where_clause(table, filters, 1)?);
        sql.push_str(" ORDER BY rowid");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(filters.iter().map(|(_, v)| v)), |row| {
                let mut record = Row::new();
                for (idx, column) in columns.iter().enumerate() {
                    record.insert(column.to_string(), row.get::<_, Value>(idx)?);
                }
                Ok(record)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Insert a record and return its row id
    pub fn insert(&self, table: &TableSchema, record: &[(&str, Value)]) -> Result<i64> {
        if record.is_empty() {
            self.conn
                .execute(&format!("INSERT INTO {} DEFAULT VALUES", table.name), [])?;
            return Ok(self.conn.last_insert_rowid());
        }

        let mut columns = Vec::with_capacity(record.len());
        for (column, _) in record {
            table.require_column(column)?;
            columns.push(*column);
        }
        let placeholders: Vec<String> = (1..=record.len()).map(|i| format!("?{}", i)).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name,
            columns.join(", "),
            placeholders.join(", ")
        );
        self.conn
            .execute(&sql, params_from_iter(record.iter().map(|(_, v)| v)))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update every row matching `filters`, returning the number of rows changed
    pub fn update(
        &self,
        table: &TableSchema,
        values: &[(&str, Value)],
        filters: &[(&str, Value)],
    ) -> Result<usize> {
        if values.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "update on '{}' without any values",
                table.name
            )));
        }

        let mut assignments = Vec::with_capacity(values.len());
        for (idx, (column, _)) in values.iter().enumerate() {
            table.require_column(column)?;
            assignments.push(format!("{} = ?{}", column, idx + 1));
        }

        let mut sql = format!("UPDATE {} SET {}", table.name, assignments.join(", "));
        sql.push_str(&where_clause(table, filters, values.len() + 1)?);

        let params = values.iter().chain(filters.iter()).map(|(_, v)| v);
        let changed = self.conn.execute(&sql, params_from_iter(params))?;
        Ok(changed)
    }

    /// Count rows in a table
    pub fn count(&self, table: &TableSchema) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ========== Session Operations ==========

    /// Insert a session and return its id
    pub fn insert_session(&self, session: &NewSession) -> Result<i64> {
        self.insert(
            &schema::SESSIONS,
            &[
                ("data", Value::Text(session.date.clone())),
                ("time_start", Value::Text(session.time_start.clone())),
                ("time_end", Value::Text(session.time_end.clone())),
                ("session_type", Value::Text(session.session_type.clone())),
                ("title", Value::Text(session.title.clone())),
                ("location", Value::Text(session.location.clone())),
                ("description", Value::Text(session.description.clone())),
                ("parent_id", session.parent_id.map_or(Value::Null, Value::Integer)),
            ],
        )
    }

    /// Get a session by id
    pub fn get_session(&self, id: i64) -> Result<Option<Session>> {
        let rows = self.select(&schema::SESSIONS, None, &[("id", Value::Integer(id))])?;
        rows.first().map(row_to_session).transpose()
    }

    /// All sessions in insertion order
    pub fn sessions(&self) -> Result<Vec<Session>> {
        self.select(&schema::SESSIONS, None, &[])?
            .iter()
            .map(row_to_session)
            .collect()
    }

    // ========== Speaker Operations ==========

    /// Find a speaker by exact (case-sensitive) name
    pub fn find_speaker_by_name(&self, name: &str) -> Result<Option<Speaker>> {
        let rows = self.select(
            &schema::SPEAKERS,
            None,
            &[("name", Value::Text(name.to_string()))],
        )?;
        rows.first().map(row_to_speaker).transpose()
    }

    /// Insert a speaker and return its id
    pub fn insert_speaker(&self, name: &str) -> Result<i64> {
        self.insert(&schema::SPEAKERS, &[("name", Value::Text(name.to_string()))])
    }

    /// All speakers in insertion order
    pub fn speakers(&self) -> Result<Vec<Speaker>> {
        self.select(&schema::SPEAKERS, None, &[])?
            .iter()
            .map(row_to_speaker)
            .collect()
    }

    // ========== Link Operations ==========

    /// Link a speaker to a session (duplicates are kept)
    pub fn link_speaker(&self, session_id: i64, speaker_id: i64) -> Result<()> {
        self.insert(
            &schema::SESSION_SPEAKERS,
            &[
                ("session_id", Value::Integer(session_id)),
                ("speaker_id", Value::Integer(speaker_id)),
            ],
        )?;
        Ok(())
    }

    /// All session/speaker links in insertion order
    pub fn session_speakers(&self) -> Result<Vec<SessionSpeaker>> {
        self.select(&schema::SESSION_SPEAKERS, None, &[])?
            .iter()
            .map(|row| {
                Ok(SessionSpeaker {
                    session_id: required_integer(&schema::SESSION_SPEAKERS, row, "session_id")?,
                    speaker_id: required_integer(&schema::SESSION_SPEAKERS, row, "speaker_id")?,
                })
            })
            .collect()
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let sub_sessions: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE parent_id IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(DbStats {
            sessions: self.count(&schema::SESSIONS)?,
            sub_sessions: sub_sessions as usize,
            speakers: self.count(&schema::SPEAKERS)?,
            links: self.count(&schema::SESSION_SPEAKERS)?,
        })
    }
}

fn where_clause(table: &TableSchema, filters: &[(&str, Value)], first_param: usize) -> Result<String> {
    if filters.is_empty() {
        return Ok(String::new());
    }
    let mut clauses = Vec::with_capacity(filters.len());
    for (offset, (column, _)) in filters.iter().enumerate() {
        table.require_column(column)?;
        clauses.push(format!("{} = ?{}", column, first_param + offset));
    }
    Ok(format!(" WHERE {}", clauses.join(" AND ")))
}

/// Render a stored value as text; NULL becomes the empty string
fn text(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(Value::Text(s)) => s.clone(),
        Some(Value::Integer(i)) => i.to_string(),
        Some(Value::Real(f)) => f.to_string(),
        Some(Value::Blob(b)) => String::from_utf8_lossy(b).into_owned(),
        Some(Value::Null) | None => String::new(),
    }
}

fn integer(row: &Row, column: &str) -> Option<i64> {
    match row.get(column) {
        Some(Value::Integer(i)) => Some(*i),
        _ => None,
    }
}

fn required_integer(table: &TableSchema, row: &Row, column: &str) -> Result<i64> {
    integer(row, column).ok_or_else(|| Error::UnknownColumn {
        table: table.name.to_string(),
        column: column.to_string(),
    })
}

fn row_to_session(row: &Row) -> Result<Session> {
    Ok(Session {
        id: required_integer(&schema::SESSIONS, row, "id")?,
        date: text(row, "data"),
        time_start: text(row, "time_start"),
        time_end: text(row, "time_end"),
        session_type: text(row, "session_type"),
        title: text(row, "title"),
        location: text(row, "location"),
        description: text(row, "description"),
        parent_id: integer(row, "parent_id"),
    })
}

fn row_to_speaker(row: &Row) -> Result<Speaker> {
    Ok(Speaker {
        id: required_integer(&schema::SPEAKERS, row, "id")?,
        name: text(row, "name"),
    })
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    pub sessions: usize,
    pub sub_sessions: usize,
    pub speakers: usize,
    pub links: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Sessions: {}", self.sessions)?;
        writeln!(f, "  Sub-sessions: {}", self.sub_sessions)?;
        writeln!(f, "  Speakers: {}", self.speakers)?;
        writeln!(f, "  Links: {}", self.links)
    }
}
