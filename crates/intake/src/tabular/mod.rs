//! Tabular reshape: a pure, synchronous grid library.
//!
//! A [`Tabular`] holds a 2-D grid of string cells (rows × columns) whose
//! first row is the header. It converts between tab-separated text,
//! comma-separated text with minimal quoting, HTML tables and arrays of
//! records keyed by canonical headers.
//!
//! Header canonicalization collapses non-word runs to a single
//! underscore, trims and lower-cases (`"Col 1"` → `"col_1"`); collisions
//! are resolved with the first free numeric suffix (`_2`, `_3`, …).
//!
//! [`TabularTransform`] wires the module into the batch orchestrator as a
//! per-item transform for TSV content.

use crate::error::IntakeError;
use crate::source::FileSource;
use crate::transform::{Transform, TransformError};
use async_trait::async_trait;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// A record produced by [`Tabular::to_records`]: canonical header →
/// cell value, in column order.
pub type Record = IndexMap<String, String>;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("static pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Canonicalize one header cell: non-word runs to spaces, trim, spaces to
/// underscores, lowercase.
fn canonical_header(text: &str) -> String {
    let spaced = NON_WORD.replace_all(text, " ");
    WHITESPACE.replace_all(spaced.trim(), "_").to_lowercase()
}

/// Resolve duplicate header names in place by appending the first free
/// `_2`, `_3`, … suffix, scanning the whole row for each collision.
fn dedup_header_row(headers: &mut [String]) {
    for index in 0..headers.len() {
        let first = headers.iter().position(|h| *h == headers[index]);
        if first == Some(index) {
            continue;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", headers[index], n);
            if !headers.iter().any(|h| *h == candidate) {
                headers[index] = candidate;
                break;
            }
            n += 1;
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A 2-D grid of string cells; row 0 is the header row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tabular {
    rows: Vec<Vec<String>>,
}

impl Tabular {
    /// Build from tab-separated text: carriage returns are stripped,
    /// blank lines dropped, each remaining line split on tabs.
    pub fn from_tsv(text: &str) -> Self {
        let rows = text
            .replace('\r', "")
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();
        Self { rows }
    }

    /// Build from records. The header row is the union of keys in
    /// first-seen order across all records; missing fields become empty
    /// strings.
    pub fn from_records(records: &[Record]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(headers.clone());
        for record in records {
            rows.push(
                headers
                    .iter()
                    .map(|h| record.get(h).cloned().unwrap_or_default())
                    .collect(),
            );
        }
        Self { rows }
    }

    /// Build directly from a cell grid.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// The underlying grid.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header row after canonicalization and dedup.
    pub fn canonical_headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = self
            .rows
            .first()
            .map(|row| row.iter().map(|cell| canonical_header(cell)).collect())
            .unwrap_or_default();
        dedup_header_row(&mut headers);
        headers
    }

    /// Canonicalize the header row in place, without dedup.
    pub fn snake_headers(&mut self) -> &mut Self {
        if let Some(first) = self.rows.first_mut() {
            for cell in first.iter_mut() {
                *cell = canonical_header(cell);
            }
        }
        self
    }

    /// Resolve duplicate header names in place with numeric suffixes.
    pub fn dedup_headers(&mut self) -> &mut Self {
        if let Some(first) = self.rows.first_mut() {
            dedup_header_row(first);
        }
        self
    }

    /// Reorder columns so the named ones come first, in the given order;
    /// unnamed columns keep their relative order after them. Names are
    /// matched against the current header row.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Configuration` naming the offending column
    /// when it does not exist in the header row.
    pub fn reorder_columns(&mut self, column_names: &[&str]) -> crate::Result<&mut Self> {
        let Some(headers) = self.rows.first() else {
            return Ok(self);
        };

        for name in column_names {
            if !headers.iter().any(|h| h == name) {
                return Err(IntakeError::configuration(format!(
                    "column name \"{name}\" does not exist in the data"
                )));
            }
        }

        let mut order: Vec<usize> = column_names
            .iter()
            .map(|name| headers.iter().position(|h| h == name).expect("checked above"))
            .collect();
        for index in 0..headers.len() {
            if !order.contains(&index) {
                order.push(index);
            }
        }

        for row in self.rows.iter_mut() {
            let reordered = order
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect();
            *row = reordered;
        }
        Ok(self)
    }

    /// Render as tab-separated text. The header row is canonicalized and
    /// deduped first.
    pub fn to_tsv(&self) -> String {
        self.render(|cell| cell.to_string(), "\t")
    }

    /// Render as comma-separated text. The header row is canonicalized
    /// and deduped first. A cell containing a comma or a double quote is
    /// wrapped in double quotes with embedded quotes doubled; any other
    /// cell is emitted unquoted.
    pub fn to_csv(&self) -> String {
        self.render(
            |cell| {
                if cell.contains('"') || cell.contains(',') {
                    format!("\"{}\"", cell.replace('"', "\"\""))
                } else {
                    cell.to_string()
                }
            },
            ",",
        )
    }

    fn render(&self, cell_fn: impl Fn(&str) -> String, separator: &str) -> String {
        let headers = self.canonical_headers();
        let mut lines = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            let cells: Vec<String> = if index == 0 {
                headers.iter().map(|cell| cell_fn(cell)).collect()
            } else {
                row.iter().map(|cell| cell_fn(cell)).collect()
            };
            lines.push(cells.join(separator));
        }
        lines.join("\n")
    }

    /// Convert the data rows to records keyed by the canonical deduped
    /// headers. Short rows pad with empty strings.
    pub fn to_records(&self) -> Vec<Record> {
        let headers = self.canonical_headers();
        self.rows
            .iter()
            .skip(1)
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| (h.clone(), row.get(i).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect()
    }

    /// Render as an HTML table. Row 0 uses `<th>` cells; cell text is
    /// escaped.
    pub fn to_html(&self) -> String {
        let mut html = vec!["<table>".to_string()];
        for (row_index, row) in self.rows.iter().enumerate() {
            let tag = if row_index == 0 { "th" } else { "td" };
            html.push("<tr>".to_string());
            for cell in row {
                html.push(format!("<{tag}>{}</{tag}>", escape_html(cell)));
            }
            html.push("</tr>".to_string());
        }
        html.push("</table>".to_string());
        html.join("\n")
    }
}

/// A [`Transform`] parsing each item's content as UTF-8 TSV into a
/// [`Tabular`].
///
/// Non-UTF-8 content is a transform failure, ending the item in
/// `DoneFail`. Callers who want to exclude binary files instead can wrap
/// this in their own transform and return a skip signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TabularTransform;

#[async_trait]
impl Transform for TabularTransform {
    type Output = Tabular;

    async fn apply(&self, content: Vec<u8>, source: &dyn FileSource) -> Result<Tabular, TransformError> {
        let text = String::from_utf8(content).map_err(|err| {
            TransformError::failed_with_source(format!("{} is not valid UTF-8 text", source.name()), err)
        })?;
        Ok(Tabular::from_tsv(&text))
    }
}

#[cfg(test)]
mod tests;
