//! Facility list ingestion.
//!
//! The list is a comma-separated table with case-sensitive `facility_name`
//! and `facility_id` header columns. Any malformed row aborts ingestion.

use std::path::Path;

use teetimes_core::{Facility, IngestionError};

use crate::csv::{parse_rows, Record};

pub const NAME_COLUMN: &str = "facility_name";
pub const ID_COLUMN: &str = "facility_id";

/// Reads and parses the facility list at `path`.
///
/// # Errors
///
/// Returns [`IngestionError::Io`] if the file cannot be read, or any error
/// from [`parse_facilities`].
pub async fn read_facilities(path: &Path) -> Result<Vec<Facility>, IngestionError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| IngestionError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let facilities = parse_facilities(&text)?;
    tracing::debug!(
        path = %path.display(),
        count = facilities.len(),
        "facility list parsed"
    );
    Ok(facilities)
}

/// Parses facility rows in input order. A leading byte-order mark is
/// ignored and every field is trimmed.
///
/// # Errors
///
/// - [`IngestionError::Empty`] when there is no header row.
/// - [`IngestionError::MissingColumn`] when a required header is absent.
/// - [`IngestionError::MissingField`] when a row lacks a value (or has only
///   whitespace) for a required column. `line` is the 1-based line in `text`
///   where the row starts; a separator-only or whitespace-only line is such a
///   row, only lines with no characters at all are skipped.
pub fn parse_facilities(text: &str) -> Result<Vec<Facility>, IngestionError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = parse_rows(text).into_iter();

    let header = rows.next().ok_or(IngestionError::Empty)?;
    let name_idx = column_index(&header.fields, NAME_COLUMN)?;
    let id_idx = column_index(&header.fields, ID_COLUMN)?;

    rows.map(|row| {
        Ok(Facility {
            name: required_field(&row, name_idx, NAME_COLUMN)?,
            id: required_field(&row, id_idx, ID_COLUMN)?,
        })
    })
    .collect()
}

fn column_index(header: &[String], column: &str) -> Result<usize, IngestionError> {
    header
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| IngestionError::MissingColumn {
            column: column.to_owned(),
        })
}

fn required_field(row: &Record, idx: usize, column: &str) -> Result<String, IngestionError> {
    row.fields
        .get(idx)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| IngestionError::MissingField {
            line: row.line,
            column: column.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_order_and_trims_fields() {
        let facilities =
            parse_facilities("facility_name,facility_id\n Oakwood , 100\nRiverside,200 \n")
                .unwrap();
        assert_eq!(
            facilities,
            vec![
                Facility::new("Oakwood", "100"),
                Facility::new("Riverside", "200"),
            ]
        );
    }

    #[test]
    fn tolerates_byte_order_mark_and_extra_columns() {
        let text = "\u{feff}region,facility_id,facility_name\r\nnorth,7,Hilltop\r\n";
        let facilities = parse_facilities(text).unwrap();
        assert_eq!(facilities, vec![Facility::new("Hilltop", "7")]);
    }

    #[test]
    fn duplicate_rows_are_kept() {
        let text = "facility_name,facility_id\nA,1\nA,1\n";
        assert_eq!(parse_facilities(text).unwrap().len(), 2);
    }

    #[test]
    fn header_only_yields_no_facilities() {
        assert!(parse_facilities("facility_name,facility_id\n")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_facilities(""), Err(IngestionError::Empty)));
        assert!(matches!(
            parse_facilities("\u{feff}"),
            Err(IngestionError::Empty)
        ));
    }

    #[test]
    fn header_names_are_case_sensitive() {
        let result = parse_facilities("Facility_Name,facility_id\nA,1\n");
        assert!(
            matches!(result, Err(IngestionError::MissingColumn { ref column }) if column == "facility_name"),
            "got: {result:?}"
        );
    }

    #[test]
    fn row_missing_id_is_rejected() {
        let result = parse_facilities("facility_name,facility_id\nA,1\nB\n");
        assert!(
            matches!(result, Err(IngestionError::MissingField { line: 3, ref column }) if column == "facility_id"),
            "got: {result:?}"
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = parse_facilities("facility_name,facility_id\n  ,9\n");
        assert!(
            matches!(result, Err(IngestionError::MissingField { line: 2, ref column }) if column == "facility_name"),
            "got: {result:?}"
        );
    }

    #[test]
    fn separator_only_row_is_rejected_not_skipped() {
        let result = parse_facilities("facility_name,facility_id\nA,1\n,\nB,2\n");
        assert!(
            matches!(result, Err(IngestionError::MissingField { line: 3, ref column }) if column == "facility_name"),
            "got: {result:?}"
        );
    }

    #[test]
    fn whitespace_only_row_is_rejected_not_skipped() {
        let result = parse_facilities("facility_name,facility_id\nA,1\n  ,  \nB,2\n");
        assert!(
            matches!(result, Err(IngestionError::MissingField { line: 3, .. })),
            "got: {result:?}"
        );
    }

    #[test]
    fn error_line_counts_skipped_empty_lines() {
        let result = parse_facilities("facility_name,facility_id\n\nA,1\n\nB,\n");
        assert!(
            matches!(result, Err(IngestionError::MissingField { line: 5, ref column }) if column == "facility_id"),
            "got: {result:?}"
        );
    }

    #[test]
    fn empty_lines_between_rows_are_ignored() {
        let facilities = parse_facilities("facility_name,facility_id\n\nA,1\n\r\nB,2").unwrap();
        assert_eq!(facilities, vec![Facility::new("A", "1"), Facility::new("B", "2")]);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = read_facilities(Path::new("/nonexistent/teetimes/facilities.csv")).await;
        assert!(matches!(result, Err(IngestionError::Io { .. })));
    }
}
