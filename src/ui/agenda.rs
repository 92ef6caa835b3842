//! Text rendering of lookup results

use crate::query::{LookupColumn, SessionMatch};

/// Characters of the description shown per result
pub const DESCRIPTION_PREVIEW: usize = 70;

/// Message printed when a lookup matches nothing
pub const NO_RESULTS: &str = "No sessions found matching the criteria.";

pub fn separator() -> String {
    "-".repeat(40)
}

/// Header line naming the query
pub fn query_header(column: LookupColumn, value: &str) -> String {
    format!("Looking up sessions where {} = '{}'...", column, value)
}

/// One result block, ending with the separator line
pub fn format_session(result: &SessionMatch) -> String {
    let session = &result.session;
    let preview: String = session.description.chars().take(DESCRIPTION_PREVIEW).collect();
    format!(
        "Title: {}\nType: {}\nSpeakers:    {}\nLocation: {}\nTime: {} - {}\nDescription: {}...\n{}",
        session.title,
        session.session_type,
        result.speakers_label(),
        session.location,
        session.time_start,
        session.time_end,
        preview,
        separator()
    )
}

/// Render every result, or the no-results message
pub fn format_results(results: &[SessionMatch]) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }
    results
        .iter()
        .map(format_session)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn sample(description: &str, speakers: &[&str]) -> SessionMatch {
        SessionMatch {
            session: Session {
                id: 1,
                date: "2024-06-18".into(),
                time_start: "2024-06-18 09:00".into(),
                time_end: "2024-06-18 10:00".into(),
                session_type: "Session".into(),
                title: "Opening Keynote".into(),
                location: "Hall A".into(),
                description: description.into(),
                parent_id: None,
            },
            speakers: speakers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_session() {
        let block = format_session(&sample("Welcome", &["Jane Doe", "John Smith"]));
        assert_eq!(
            block,
            "Title: Opening Keynote\nType: Session\nSpeakers:    Jane Doe; John Smith\nLocation: Hall A\n\
             Time: 2024-06-18 09:00 - 2024-06-18 10:00\nDescription: Welcome...\n\
             ----------------------------------------"
        );
    }

    #[test]
    fn test_description_is_truncated() {
        let long = "é".repeat(100);
        let block = format_session(&sample(&long, &[]));
        let expected = format!("Description: {}...", "é".repeat(DESCRIPTION_PREVIEW));
        assert!(block.contains(&expected));
        assert!(block.contains("Speakers:    N/A"));
    }

    #[test]
    fn test_no_results() {
        assert_eq!(format_results(&[]), NO_RESULTS);
    }

    #[test]
    fn test_query_header() {
        assert_eq!(
            query_header(LookupColumn::Speaker, "Jane"),
            "Looking up sessions where speaker = 'Jane'..."
        );
    }
}
