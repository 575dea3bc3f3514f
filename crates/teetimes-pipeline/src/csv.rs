//! Minimal comma-separated reader/writer (quotes and CRLF tolerant).

use std::mem::take;

pub(crate) const SEP: char = ',';

/// One parsed record and the 1-based line on which it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Splits `text` into records. Only lines with no characters at all are
/// dropped; separator-only or whitespace-only lines are kept as records.
pub(crate) fn parse_rows(text: &str) -> Vec<Record> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut start_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == SEP && !in_quotes => {
                fields.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                fields.push(take(&mut field));
                push_record(&mut rows, start_line, take(&mut fields));
                line += 1;
                start_line = line;
            }
            '\n' => {
                line += 1;
                field.push(ch);
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing record without a final newline, even if quotes were unterminated.
    fields.push(field);
    push_record(&mut rows, start_line, fields);

    rows
}

fn push_record(rows: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let empty_line = fields.len() == 1 && fields[0].is_empty();
    if !empty_line {
        rows.push(Record { line, fields });
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Appends one row terminated by `\r\n`.
pub(crate) fn write_row<S: AsRef<str>>(out: &mut String, row: &[S]) {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(SEP);
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(rows: &[Record]) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|r| r.fields.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn parses_quoted_fields_with_separators_and_escapes() {
        let rows = parse_rows("a,\"b, c\",\"say \"\"hi\"\"\"\r\n1,2,3\n");
        assert_eq!(
            fields(&rows),
            vec![vec!["a", "b, c", "say \"hi\""], vec!["1", "2", "3"]]
        );
    }

    #[test]
    fn drops_only_empty_lines_and_keeps_trailing_row() {
        let rows = parse_rows("h1,h2\n\n  \n,\nx,y");
        assert_eq!(
            fields(&rows),
            vec![vec!["h1", "h2"], vec!["  "], vec!["", ""], vec!["x", "y"]]
        );
    }

    #[test]
    fn records_carry_their_starting_line() {
        let rows = parse_rows("h\n\n\"multi\nline\"\r\n\nlast\n");
        let lines: Vec<usize> = rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 3, 6]);
        assert_eq!(rows[1].fields, vec!["multi\nline".to_string()]);
    }

    #[test]
    fn writes_quotes_only_when_needed() {
        let mut out = String::new();
        write_row(&mut out, &["plain", "a,b", "q\"q"]);
        assert_eq!(out, "plain,\"a,b\",\"q\"\"q\"\r\n");
    }
}
