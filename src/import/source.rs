//! Agenda source readers
//!
//! Rows come from the first worksheet of an Excel/ODS workbook (via calamine)
//! or from a CSV file. The leading `header_rows` rows are skipped in both cases.

use std::path::Path;
use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};
use crate::{Error, Result};

/// One raw agenda row: date, start, end, kind, title, location, description, speakers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaRow {
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub kind: String,
    pub title: String,
    pub location: String,
    pub description: String,
    pub speakers: String,
}

impl AgendaRow {
    /// Build a row from cell values; missing fields are empty, extra fields are dropped.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells = fields.into_iter().map(Into::into);
        let mut next = || cells.next().unwrap_or_default();
        Self {
            date: next(),
            time_start: next(),
            time_end: next(),
            kind: next(),
            title: next(),
            location: next(),
            description: next(),
            speakers: next(),
        }
    }

    /// True when every field is blank
    pub fn is_empty(&self) -> bool {
        [
            &self.date,
            &self.time_start,
            &self.time_end,
            &self.kind,
            &self.title,
            &self.location,
            &self.description,
            &self.speakers,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// Read every row after the header offset from `path`.
pub fn read_rows(path: &Path, header_rows: usize) -> Result<Vec<AgendaRow>> {
    if !path.exists() {
        return Err(Error::SourceNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv(path, header_rows),
        "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => read_workbook(path, header_rows),
        _ => Err(Error::UnreadableSource {
            path: path.display().to_string(),
            reason: format!("unsupported file type '{}'", extension),
        }),
    }
}

fn read_csv(path: &Path, header_rows: usize) -> Result<Vec<AgendaRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records().skip(header_rows) {
        let record = record?;
        rows.push(AgendaRow::from_fields(record.iter()));
    }
    Ok(rows)
}

fn read_workbook(path: &Path, header_rows: usize) -> Result<Vec<AgendaRow>> {
    let unreadable = |reason: String| Error::UnreadableSource {
        path: path.display().to_string(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("workbook has no worksheets".to_string()))?
        .map_err(|e| unreadable(e.to_string()))?;

    // The range starts at the first used cell, not at A1
    let (first_row, first_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let rows = range
        .rows()
        .skip(header_rows.saturating_sub(first_row))
        .map(|cells| {
            let leading = std::iter::repeat_n(String::new(), first_col);
            AgendaRow::from_fields(leading.chain(cells.iter().map(cell_to_string)))
        })
        .collect();
    Ok(rows)
}

/// Render a spreadsheet cell the way it reads in the sheet
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (*f as i64).to_string(),
        Data::DateTime(dt) => excel_datetime_to_string(dt),
        other => other.to_string(),
    }
}

fn excel_datetime_to_string(dt: &ExcelDateTime) -> String {
    let Some(value) = dt.as_datetime() else {
        return dt.as_f64().to_string();
    };

    if dt.as_f64() < 1.0 {
        // Time-of-day only
        value.format("%I:%M %p").to_string()
    } else if value.time() == chrono::NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_row_from_fields_pads_and_truncates() {
        let row = AgendaRow::from_fields(["2024-01-01", "09:00"]);
        assert_eq!(row.time_start, "09:00");
        assert_eq!(row.speakers, "");

        let row = AgendaRow::from_fields(["a", "b", "c", "d", "e", "f", "g", "h", "extra"]);
        assert_eq!(row.speakers, "h");
    }

    #[test]
    fn test_blank_row_is_empty() {
        assert!(AgendaRow::from_fields(["", " ", ""]).is_empty());
        assert!(!AgendaRow::from_fields(["", "", "", "", "Title"]).is_empty());
    }

    #[test]
    fn test_read_csv_skips_header_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Conference Agenda").unwrap();
        writeln!(file, "Date,Start,End,Type,Title,Location,Description,Speakers").unwrap();
        writeln!(file, "06/18/2024,09:00 AM,10:00 AM,Session,Opening,Hall A,Welcome,\"Jane; John\"").unwrap();
        writeln!(file, ",,,,,,,").unwrap();
        drop(file);

        let rows = read_rows(&path, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Opening");
        assert_eq!(rows[0].speakers, "Jane; John");
        assert!(rows[1].is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = read_rows(Path::new("/definitely/not/here.xls"), 15).unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
        assert!(err.is_source_error());
    }

    #[test]
    fn test_unreadable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.xls");
        std::fs::write(&path, b"not really a spreadsheet").unwrap();

        let err = read_rows(&path, 15).unwrap_err();
        assert!(matches!(err, Error::UnreadableSource { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.txt");
        std::fs::write(&path, b"").unwrap();

        assert!(read_rows(&path, 0).unwrap_err().is_source_error());
    }
}
