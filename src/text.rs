//! Delimited-text input
//!
//! The record stores consume already-decoded field values with explicit
//! byte lengths; this module produces them, from import files and from
//! the one-record-per-line format the CLI reads on standard input.
//!
//! ## Record line format
//!
//! Comma-separated values, one record per line. The literal `NULO` and
//! the empty string decode as a null field. A leading `*` on the first
//! field marks the whole record as logically removed; it is stored
//! tombstoned and counted, never served by queries. The first line of an
//! import file carries the column labels stored into the store header.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransitError};

// =============================================================================
// Decoded fields
// =============================================================================

/// One decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Explicitly null (`NULO` or empty in the source text)
    Null,
    Int(i32),
    Text(String),
}

impl Field {
    /// Encoded byte length this field contributes to a record body.
    pub fn byte_len(&self) -> i32 {
        match self {
            Field::Null => 0,
            Field::Int(_) => 4,
            Field::Text(s) => s.len() as i32,
        }
    }

    /// Integer view: null becomes the `-1` sentinel, text must parse.
    pub fn int(&self) -> Result<i32> {
        match self {
            Field::Null => Ok(-1),
            Field::Int(v) => Ok(*v),
            Field::Text(s) => s
                .parse()
                .map_err(|_| TransitError::Parse(format!("expected integer, got {:?}", s))),
        }
    }

    /// Text view: null becomes the empty string.
    pub fn text(&self) -> String {
        match self {
            Field::Null => String::new(),
            Field::Int(v) => v.to_string(),
            Field::Text(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }
}

/// A full record decoded from one text line.
#[derive(Debug, Clone)]
pub struct TextRecord {
    /// False when the line carried the removal marker
    pub live: bool,
    pub fields: Vec<Field>,
}

// =============================================================================
// Line decoding
// =============================================================================

/// Decode one comma-separated record line.
pub fn decode_record(line: &str) -> TextRecord {
    let mut live = true;
    let mut fields = Vec::new();

    for (i, raw) in line.trim_end_matches(&['\r', '\n'][..]).split(',').enumerate() {
        let mut token = raw.trim();

        if i == 0 {
            if let Some(rest) = token.strip_prefix('*') {
                live = false;
                token = rest.trim();
            }
        }

        fields.push(decode_field(token));
    }

    TextRecord { live, fields }
}

fn decode_field(token: &str) -> Field {
    if token.is_empty() || token == "NULO" {
        return Field::Null;
    }
    match token.parse::<i32>() {
        Ok(v) => Field::Int(v),
        Err(_) => Field::Text(token.to_string()),
    }
}

/// Decode a label line into column label strings.
pub fn decode_labels(line: &str) -> Vec<String> {
    line.trim_end_matches(&['\r', '\n'][..])
        .split(',')
        .map(|s| s.trim().to_string())
        .collect()
}

// =============================================================================
// File import
// =============================================================================

/// Read an import file: the label line, then every record line.
pub fn read_import_file(path: &Path) -> Result<(Vec<String>, Vec<TextRecord>)> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let label_line = lines
        .next()
        .transpose()?
        .ok_or_else(|| TransitError::Parse(format!("{}: empty import file", path.display())))?;
    let labels = decode_labels(&label_line);

    let mut records = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(decode_record(&line));
    }

    debug!(path = %path.display(), records = records.len(), "decoded import file");

    Ok((labels, records))
}
