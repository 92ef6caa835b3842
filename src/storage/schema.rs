//! Database schema definitions
//!
//! Tables are described with typed column definitions and validated once when
//! the store is opened. `CREATE TABLE IF NOT EXISTS` means a changed schema is
//! never applied to an existing file; delete the database to pick it up.

use crate::{Error, Result};

/// Primitive SQLite column types used by the agenda tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }
}

/// A single column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    /// Integer primary key with AUTOINCREMENT
    pub primary_key: bool,
}

impl ColumnDef {
    /// Nullable, non-unique column
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: true,
            unique: false,
            primary_key: false,
        }
    }

    /// Auto-assigned integer identifier
    pub const fn id(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::Integer,
            nullable: false,
            unique: false,
            primary_key: true,
        }
    }

    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.ty.as_sql());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
            return sql;
        }
        if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        sql
    }
}

/// A table name plus its ordered columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableSchema {
    pub const fn new(name: &'static str, columns: &'static [ColumnDef]) -> Self {
        Self { name, columns }
    }

    /// Check names and constraints before any SQL is generated from them.
    ///
    /// Table and column names are formatted directly into statements, so they
    /// are restricted to `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(self.name) {
            return Err(Error::InvalidSchema(format!("invalid table name '{}'", self.name)));
        }
        if self.columns.is_empty() {
            return Err(Error::InvalidSchema(format!("table '{}' has no columns", self.name)));
        }

        let mut seen = std::collections::HashSet::new();
        let mut primary_keys = 0;
        for column in self.columns {
            if !is_identifier(column.name) {
                return Err(Error::InvalidSchema(format!(
                    "invalid column name '{}' in table '{}'",
                    column.name, self.name
                )));
            }
            if !seen.insert(column.name) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column '{}' in table '{}'",
                    column.name, self.name
                )));
            }
            if column.primary_key {
                primary_keys += 1;
                if column.ty != ColumnType::Integer {
                    return Err(Error::InvalidSchema(format!(
                        "primary key '{}' in table '{}' must be an integer",
                        column.name, self.name
                    )));
                }
            }
        }
        if primary_keys > 1 {
            return Err(Error::InvalidSchema(format!(
                "table '{}' declares more than one primary key",
                self.name
            )));
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Fail with `UnknownColumn` unless `name` is part of this table
    pub fn require_column(&self, name: &str) -> Result<()> {
        match self.column(name) {
            Some(_) => Ok(()),
            None => Err(Error::UnknownColumn {
                table: self.name.to_string(),
                column: name.to_string(),
            }),
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this schema
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDef::to_sql).collect();
        format!("CREATE TABLE IF NOT EXISTS {} ({})", self.name, columns.join(", "))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Agenda sessions; `data` holds the session date
pub const SESSIONS: TableSchema = TableSchema::new(
    "sessions",
    &[
        ColumnDef::id("id"),
        ColumnDef::new("data", ColumnType::Text),
        ColumnDef::new("time_start", ColumnType::Text),
        ColumnDef::new("time_end", ColumnType::Text),
        ColumnDef::new("session_type", ColumnType::Text),
        ColumnDef::new("title", ColumnType::Text),
        ColumnDef::new("location", ColumnType::Text),
        ColumnDef::new("description", ColumnType::Text),
        ColumnDef::new("parent_id", ColumnType::Integer),
    ],
);

/// Speakers, unique by exact name
pub const SPEAKERS: TableSchema = TableSchema::new(
    "speakers",
    &[
        ColumnDef::id("id"),
        ColumnDef::new("name", ColumnType::Text).not_null().unique(),
    ],
);

/// Many-to-many session/speaker links
pub const SESSION_SPEAKERS: TableSchema = TableSchema::new(
    "session_speakers",
    &[
        ColumnDef::new("session_id", ColumnType::Integer),
        ColumnDef::new("speaker_id", ColumnType::Integer),
    ],
);

/// All agenda tables, in creation order
pub const AGENDA_TABLES: &[TableSchema] = &[SESSIONS, SPEAKERS, SESSION_SPEAKERS];

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_sessions_parent ON sessions(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_session_speakers_session ON session_speakers(session_id)",
    "CREATE INDEX IF NOT EXISTS idx_session_speakers_speaker ON session_speakers(speaker_id)",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agenda_tables_validate() {
        for table in AGENDA_TABLES {
            table.validate().unwrap();
        }
    }

    #[test]
    fn test_create_sql() {
        assert_eq!(
            SPEAKERS.create_sql(),
            "CREATE TABLE IF NOT EXISTS speakers (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE)"
        );
    }

    #[test]
    fn test_rejects_bad_names() {
        const BAD_TABLE: TableSchema =
            TableSchema::new("drop table", &[ColumnDef::new("a", ColumnType::Text)]);
        assert!(BAD_TABLE.validate().is_err());

        const BAD_COLUMN: TableSchema =
            TableSchema::new("t", &[ColumnDef::new("a;b", ColumnType::Text)]);
        assert!(BAD_COLUMN.validate().is_err());

        const DUPLICATE: TableSchema = TableSchema::new(
            "t",
            &[
                ColumnDef::new("a", ColumnType::Text),
                ColumnDef::new("a", ColumnType::Integer),
            ],
        );
        assert!(DUPLICATE.validate().is_err());

        const EMPTY: TableSchema = TableSchema::new("t", &[]);
        assert!(EMPTY.validate().is_err());
    }

    #[test]
    fn test_require_column() {
        assert!(SESSIONS.require_column("parent_id").is_ok());
        assert!(matches!(
            SESSIONS.require_column("date"),
            Err(Error::UnknownColumn { .. })
        ));
    }
}
