//! Lookup engine implementation
//!
//! Each lookup loads the whole agenda once, then matches and joins in memory:
//! - Exact columns (date, time_start, time_end) compare byte-for-byte
//! - Substring columns (title, location, description) compare case-insensitively
//! - Speaker lookups resolve speakers by name substring, then follow links
//!
//! A matching top-level session pulls in all of its sub-sessions, and a
//! sub-session whose parent's field matches is included on its own.

use std::collections::{BTreeSet, HashMap};
use serde::Serialize;
use crate::Result;
use crate::session::{Session, SessionSpeaker, Speaker};
use crate::storage::SqliteStore;
use super::column::{LookupColumn, MatchRule};

/// Placeholder shown for sessions without speakers
pub const NO_SPEAKERS: &str = "N/A";

/// Separator between speaker names
pub const SPEAKER_SEPARATOR: &str = "; ";

/// A matched session with its resolved speaker names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionMatch {
    #[serde(flatten)]
    pub session: Session,
    /// Speaker names in link order
    pub speakers: Vec<String>,
}

impl SessionMatch {
    /// Speakers joined for display, or `N/A`
    pub fn speakers_label(&self) -> String {
        if self.speakers.is_empty() {
            NO_SPEAKERS.to_string()
        } else {
            self.speakers.join(SPEAKER_SEPARATOR)
        }
    }
}

/// Lookup engine over an agenda store
pub struct LookupEngine<'a> {
    store: &'a SqliteStore,
}

impl<'a> LookupEngine<'a> {
    /// Create a new lookup engine
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Find sessions where `column` matches `value`.
    ///
    /// Results are unique and sorted by (date, time_start) as plain strings.
    /// No matches is an empty vector, not an error.
    pub fn find(&self, column: LookupColumn, value: &str) -> Result<Vec<SessionMatch>> {
        let agenda = AgendaSnapshot::load(self.store)?;

        let matched = match column {
            LookupColumn::Speaker => agenda.match_speakers(value),
            _ => agenda.match_field(column, value),
        };
        tracing::debug!("{} = '{}' matched {} sessions", column, value, matched.len());

        let mut results: Vec<SessionMatch> = matched
            .iter()
            .filter_map(|id| agenda.session(*id))
            .map(|session| SessionMatch {
                session: session.clone(),
                speakers: agenda.names_for(session.id),
            })
            .collect();

        results.sort_by(|a, b| {
            (a.session.date.as_str(), a.session.time_start.as_str())
                .cmp(&(b.session.date.as_str(), b.session.time_start.as_str()))
        });

        Ok(results)
    }
}

/// Per-query, in-memory copy of the store with the indexes a lookup needs
struct AgendaSnapshot {
    sessions: Vec<Session>,
    /// Speaker id -> name
    speaker_names: HashMap<i64, String>,
    /// Session id -> position in `sessions`
    by_id: HashMap<i64, usize>,
    /// Parent id -> sub-session ids, in insertion order
    children: HashMap<i64, Vec<i64>>,
    /// Session id -> speaker ids, in link order
    speakers_of: HashMap<i64, Vec<i64>>,
}

impl AgendaSnapshot {
    fn load(store: &SqliteStore) -> Result<Self> {
        let sessions = store.sessions()?;
        let speakers = store.speakers()?;
        let links = store.session_speakers()?;
        Ok(Self::build(sessions, speakers, links))
    }

    fn build(sessions: Vec<Session>, speakers: Vec<Speaker>, links: Vec<SessionSpeaker>) -> Self {
        let mut by_id = HashMap::with_capacity(sessions.len());
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        for (idx, session) in sessions.iter().enumerate() {
            by_id.insert(session.id, idx);
            if let Some(parent) = session.parent_id {
                children.entry(parent).or_default().push(session.id);
            }
        }

        let mut speakers_of: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in &links {
            speakers_of.entry(link.session_id).or_default().push(link.speaker_id);
        }

        let speaker_names = speakers
            .into_iter()
            .map(|speaker| (speaker.id, speaker.name))
            .collect();

        Self {
            sessions,
            speaker_names,
            by_id,
            children,
            speakers_of,
        }
    }

    fn session(&self, id: i64) -> Option<&Session> {
        self.by_id.get(&id).map(|&idx| &self.sessions[idx])
    }

    fn children_of(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add a session, and for top-level sessions all of its sub-sessions
    fn include_with_children(&self, session: &Session, matched: &mut BTreeSet<i64>) {
        matched.insert(session.id);
        if session.is_top_level() {
            matched.extend(self.children_of(session.id));
        }
    }

    fn match_field(&self, column: LookupColumn, value: &str) -> BTreeSet<i64> {
        let rule = column.match_rule();
        let field_matches = |session: &Session| {
            column
                .field(session)
                .is_some_and(|stored| rule.matches(stored, value))
        };

        let mut matched = BTreeSet::new();
        for session in &self.sessions {
            if field_matches(session) {
                self.include_with_children(session, &mut matched);
            } else if let Some(parent) = session.parent_id.and_then(|id| self.session(id)) {
                if field_matches(parent) {
                    matched.insert(session.id);
                }
            }
        }
        matched
    }

    fn match_speakers(&self, value: &str) -> BTreeSet<i64> {
        let speaker_ids: BTreeSet<i64> = self
            .speaker_names
            .iter()
            .filter(|(_, name)| MatchRule::Substring.matches(name, value))
            .map(|(id, _)| *id)
            .collect();

        let mut matched = BTreeSet::new();
        if speaker_ids.is_empty() {
            return matched;
        }

        for session in &self.sessions {
            let linked = self
                .speakers_of
                .get(&session.id)
                .is_some_and(|ids| ids.iter().any(|id| speaker_ids.contains(id)));
            if linked {
                self.include_with_children(session, &mut matched);
            }
        }
        matched
    }

    fn names_for(&self, session_id: i64) -> Vec<String> {
        self.speakers_of
            .get(&session_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.speaker_names.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
