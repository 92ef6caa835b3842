//! Lookup columns and their matching rules

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::Error;
use crate::session::Session;

/// How a lookup value is compared against a stored field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Byte-for-byte equality
    Exact,
    /// Case-insensitive containment
    Substring,
}

impl MatchRule {
    /// Compare a stored field against the lookup value
    pub fn matches(&self, stored: &str, value: &str) -> bool {
        match self {
            MatchRule::Exact => stored == value,
            MatchRule::Substring => stored.to_lowercase().contains(&value.to_lowercase()),
        }
    }
}

/// Columns accepted by the lookup command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupColumn {
    Date,
    TimeStart,
    TimeEnd,
    Title,
    Location,
    Description,
    Speaker,
}

impl LookupColumn {
    /// Name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupColumn::Date => "date",
            LookupColumn::TimeStart => "time_start",
            LookupColumn::TimeEnd => "time_end",
            LookupColumn::Title => "title",
            LookupColumn::Location => "location",
            LookupColumn::Description => "description",
            LookupColumn::Speaker => "speaker",
        }
    }

    /// Get all lookup columns
    pub fn all() -> &'static [LookupColumn] {
        &[
            LookupColumn::Date,
            LookupColumn::TimeStart,
            LookupColumn::TimeEnd,
            LookupColumn::Title,
            LookupColumn::Location,
            LookupColumn::Description,
            LookupColumn::Speaker,
        ]
    }

    pub fn match_rule(&self) -> MatchRule {
        match self {
            LookupColumn::Date | LookupColumn::TimeStart | LookupColumn::TimeEnd => MatchRule::Exact,
            LookupColumn::Title
            | LookupColumn::Location
            | LookupColumn::Description
            | LookupColumn::Speaker => MatchRule::Substring,
        }
    }

    /// The session field this column reads; `None` for `Speaker`, which goes through links
    pub fn field<'s>(&self, session: &'s Session) -> Option<&'s str> {
        match self {
            LookupColumn::Date => Some(session.date.as_str()),
            LookupColumn::TimeStart => Some(session.time_start.as_str()),
            LookupColumn::TimeEnd => Some(session.time_end.as_str()),
            LookupColumn::Title => Some(session.title.as_str()),
            LookupColumn::Location => Some(session.location.as_str()),
            LookupColumn::Description => Some(session.description.as_str()),
            LookupColumn::Speaker => None,
        }
    }
}

impl FromStr for LookupColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LookupColumn::all()
            .iter()
            .copied()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| Error::InvalidColumn(s.to_string()))
    }
}

impl std::fmt::Display for LookupColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
