//! Agenda records
//!
//! Three record sets make up an agenda:
//! - `Session`: a scheduled entry, either top-level or a sub-session one level deep
//! - `Speaker`: a uniquely named person
//! - `SessionSpeaker`: a many-to-many link between the two

use serde::{Deserialize, Serialize};

/// Kind of an agenda row, as read from the `session_type` column.
///
/// Hierarchy is exactly two levels: a `SubSession` always hangs off the most
/// recent top-level session seen during import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// A top-level agenda entry
    Session,
    /// A child entry nested under the previous `Session`
    SubSession,
    /// Any other label; imported as a top-level session
    Unrecognized,
}

impl SessionKind {
    /// Label used in the source spreadsheet for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Session => "Session",
            SessionKind::SubSession => "Sub-session",
            SessionKind::Unrecognized => "Unrecognized",
        }
    }

    /// Classify a raw label. Matching is case-sensitive; surrounding whitespace is ignored.
    pub fn classify(label: &str) -> Self {
        match label.trim() {
            "Session" => SessionKind::Session,
            "Sub-session" => SessionKind::SubSession,
            _ => SessionKind::Unrecognized,
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored agenda session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Row id assigned on insert
    pub id: i64,
    /// Date column (stored as `data` for compatibility with existing databases)
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    /// Raw kind label exactly as imported
    pub session_type: String,
    pub title: String,
    pub location: String,
    pub description: String,
    /// Parent session for sub-sessions; `None` for top-level sessions
    pub parent_id: Option<i64>,
}

impl Session {
    pub fn kind(&self) -> SessionKind {
        SessionKind::classify(&self.session_type)
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A session that has not been inserted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSession {
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub session_type: String,
    pub title: String,
    pub location: String,
    pub description: String,
    pub parent_id: Option<i64>,
}

impl NewSession {
    /// Create a top-level session with the given kind label and title
    pub fn new(session_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            session_type: session_type.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set date and start/end times
    pub fn with_schedule(
        mut self,
        date: impl Into<String>,
        time_start: impl Into<String>,
        time_end: impl Into<String>,
    ) -> Self {
        self.date = date.into();
        self.time_start = time_start.into();
        self.time_end = time_end.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach to a parent session
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// A speaker; names are unique and compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: i64,
    pub name: String,
}

/// Link between a session and one of its speakers. Duplicates are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSpeaker {
    pub session_id: i64,
    pub speaker_id: i64,
}
