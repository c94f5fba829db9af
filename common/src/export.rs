//! CSV rendering of the submission history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::submission::Submission;

pub const HEADER: [&str; 8] = [
    "Date",
    "Name",
    "Email",
    "Phone",
    "Service",
    "Message",
    "Contact Methods",
    "Status",
];

pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// How cells are protected from the column delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Quote every cell and double embedded quotes. Lossless.
    #[default]
    Escaped,
    /// Quote every cell and replace commas in the message with `;`.
    /// Matches files exported by earlier versions of the site. Embedded
    /// `"` become `'` so every cell stays in its own column.
    LegacySemicolon,
}

/// A downloadable export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub body: String,
}

/// `submissions-YYYY-MM-DD.csv`, or `<prefix>-submissions-YYYY-MM-DD.csv`.
pub fn file_name_for(prefix: Option<&str>, date: NaiveDate) -> String {
    let stamp = date.format("%Y-%m-%d");
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}-submissions-{stamp}.csv"),
        _ => format!("submissions-{stamp}.csv"),
    }
}

/// Render `submissions` (already in display order) as a table.
pub fn render_table(submissions: &[Submission], format: ExportFormat) -> String {
    let mut lines = Vec::with_capacity(submissions.len() + 1);
    lines.push(HEADER.join(","));
    for s in submissions {
        let message = match format {
            ExportFormat::Escaped => s.message.clone(),
            ExportFormat::LegacySemicolon => s.message.replace(',', ";"),
        };
        let cells = [
            s.timestamp.to_rfc3339(),
            s.name.clone(),
            s.email.clone(),
            s.phone.clone(),
            s.service.clone(),
            message,
            s.joined_methods(";"),
            s.status.as_str().to_string(),
        ];
        let row = cells
            .iter()
            .map(|cell| quote(cell, format))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

fn quote(cell: &str, format: ExportFormat) -> String {
    match format {
        ExportFormat::Escaped => format!("\"{}\"", cell.replace('"', "\"\"")),
        ExportFormat::LegacySemicolon => format!("\"{}\"", cell.replace('"', "'")),
    }
}

/// Split CSV text produced by [`render_table`] back into rows of cells.
///
/// Understands quoted cells with doubled quotes and embedded newlines.
pub fn parse_table(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    cell.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => cell.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            '\r' => {}
            _ => cell.push(c),
        }
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    rows
}
