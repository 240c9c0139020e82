//! CSV Parser - Spreadsheet Export to Records
//!
//! Header line is split naively. Data lines are split with a quote toggle.
//! Rows whose field count differs from the header are dropped, never reported.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const QUOTE: char = '"';
const DELIMITER: char = ',';
const BOM: char = '\u{feff}';

/// One parsed data row, keyed by lower-cased header name in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn slug(&self) -> Option<&str> {
        self.get("slug")
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Empty values count as absent, same as a missing column.
    fn lacks(&self, key: &str) -> bool {
        self.get(key).map_or(true, str::is_empty)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Raw text split into lines; line 0 is the header.
#[derive(Debug, Clone)]
pub struct RawTable<'a> {
    lines: Vec<&'a str>,
}

impl<'a> RawTable<'a> {
    pub fn from_text(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
        }
    }

    pub fn header(&self) -> Option<&'a str> {
        self.lines.first().copied()
    }

    /// Data lines paired with their index in the original text (header is 0).
    pub fn data_lines(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines.iter().copied().enumerate().skip(1)
    }
}

/// Parse CSV export text into records.
pub fn parse(text: &str) -> Vec<Record> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let table = RawTable::from_text(text);
    let Some(header) = table.header() else {
        return vec![];
    };

    let headers = parse_header(header);
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (index, line) in table.data_lines() {
        let values = parse_line(line);
        if values.len() != headers.len() {
            dropped += 1;
            continue;
        }

        let mut record: Record = headers.iter().cloned().zip(values).collect();

        if record.lacks("id") {
            record.insert("id", index.to_string());
        }
        if record.lacks("slug") {
            let slug = record.title().filter(|t| !t.is_empty()).map(slugify);
            if let Some(slug) = slug {
                record.insert("slug", slug);
            }
        }

        records.push(record);
    }

    if dropped > 0 {
        log::debug!("Dropped {} CSV rows with mismatched field count", dropped);
    }

    records
}

/// Header tokens: naive comma split, trimmed, unquoted, lower-cased.
pub fn parse_header(line: &str) -> Vec<String> {
    line.split(DELIMITER)
        .map(|h| strip_quotes(trim_blank(h)).to_lowercase())
        .collect()
}

/// Quote-aware split of a single data line.
///
/// Every `"` flips the in-quotes state and is consumed. There is no escape
/// for a literal quote inside a quoted field. An empty line has no fields.
pub fn parse_line(line: &str) -> Vec<String> {
    if line.is_empty() {
        return vec![];
    }

    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == QUOTE {
            in_quotes = !in_quotes;
        } else if ch == DELIMITER && !in_quotes {
            values.push(finish_field(&current));
            current.clear();
        } else {
            current.push(ch);
        }
    }

    values.push(finish_field(&current));
    values
}

fn finish_field(raw: &str) -> String {
    strip_quotes(trim_blank(raw))
}

/// Whitespace trim that also drops a byte order mark.
fn trim_blank(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == BOM)
}

fn strip_quotes(s: &str) -> String {
    s.chars().filter(|&c| c != QUOTE).collect()
}

/// URL slug from a title: `"Hello, World!"` becomes `"hello-world"`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_space = false;
    for ch in kept.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
                in_space = true;
            }
        } else {
            slug.push(ch);
            in_space = false;
        }
    }

    slug.trim_matches('-').to_string()
}
