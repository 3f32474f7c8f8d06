//! Markdown rendering helpers.

use chrono::{DateTime, Utc};

use crate::truncation::truncate_string;

/// Longest cell rendered in a table.
pub const MAX_CELL_CHARS: usize = 80;

const EMPTY_CELL: &str = "-";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render a Markdown table. Rows shorter than the header are padded with
/// empty cells; extra cells are dropped.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str(&render_row(headers.iter().map(String::as_str)));
    output.push('\n');
    output.push_str(&render_row(headers.iter().map(|_| "---")));

    for row in rows {
        output.push('\n');
        let cells = (0..headers.len()).map(|i| row.get(i).map(String::as_str).unwrap_or(""));
        output.push_str(&render_row(cells));
    }

    output
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let cells: Vec<String> = cells.map(escape_cell).collect();
    format!("| {} |", cells.join(" | "))
}

/// Make a value safe for a single table cell.
pub fn escape_cell(value: &str) -> String {
    let flat = value
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if flat.is_empty() {
        return EMPTY_CELL.to_string();
    }

    truncate_string(&flat, MAX_CELL_CHARS).replace('|', "\\|")
}

/// Render milliseconds since the Unix epoch.
pub fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Render seconds since the Unix epoch.
pub fn format_seconds(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| seconds.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_render_table() {
        let table = render_table(
            &strings(&["Name", "Branch"]),
            &[strings(&["web", "master"]), strings(&["api"])],
        );
        insta::assert_snapshot!(table, @r"
        | Name | Branch |
        | --- | --- |
        | web | master |
        | api | - |
        ");
    }

    #[test]
    fn test_render_table_without_headers() {
        assert_eq!(render_table(&[], &[strings(&["x"])]), "");
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a | b"), "a \\| b");
        assert_eq!(escape_cell("line one\nline two\r\n"), "line one line two");
        assert_eq!(escape_cell("   "), "-");

        let long = "word ".repeat(40);
        assert!(escape_cell(&long).chars().count() <= MAX_CELL_CHARS);
        assert!(escape_cell(&long).ends_with("..."));
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(format_millis(1_700_000_000_000), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_seconds(1_700_000_000), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_millis(0), "1970-01-01 00:00:00 UTC");
    }
}
