//! Attribute-table readers.
//!
//! Attribute files are whitespace-separated: a header line of column names,
//! then one row per node. `NA` marks missing data in every family. Set
//! columns hold brace-delimited category lists (`{0,2,5}`, `{}` for the
//! empty set, or `NA`); the category universe of a column is the largest id
//! it mentions.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::attributes::{Attributes, Column, SetMember};

/// Errors raised while reading an attribute table.
#[derive(Debug, Error)]
pub enum AttributeFileError {
    /// The file could not be read.
    #[error("cannot read attribute file `{path}`: {source}")]
    Io {
        /// The requested path.
        path: PathBuf,
        /// Underlying operating-system error.
        #[source]
        source: std::io::Error,
    },
    /// The file has no header line.
    #[error("attribute file is empty")]
    Empty,
    /// A row has a different number of fields than the header.
    #[error("row {row} has {got} fields but the header names {expected} columns")]
    FieldCountMismatch {
        /// 1-based data-row number.
        row: usize,
        /// Fields found.
        got: usize,
        /// Columns named in the header.
        expected: usize,
    },
    /// A value does not parse for its family.
    #[error("row {row}, column `{column}`: bad {family} value `{value}`")]
    BadValue {
        /// 1-based data-row number.
        row: usize,
        /// Column name.
        column: String,
        /// Attribute family being parsed.
        family: &'static str,
        /// The offending text.
        value: String,
    },
}

fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), AttributeFileError> {
    let text = fs::read_to_string(path).map_err(|source| AttributeFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rows(&text)
}

fn parse_rows(text: &str) -> Result<(Vec<String>, Vec<Vec<String>>), AttributeFileError> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<String> = lines
        .next()
        .ok_or(AttributeFileError::Empty)?
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    let mut rows = Vec::new();
    for (row_idx, line) in lines.enumerate() {
        let fields: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
        if fields.len() != header.len() {
            return Err(AttributeFileError::FieldCountMismatch {
                row: row_idx + 1,
                got: fields.len(),
                expected: header.len(),
            });
        }
        rows.push(fields);
    }
    Ok((header, rows))
}

fn is_na(field: &str) -> bool {
    field.eq_ignore_ascii_case("NA")
}

/// Reads binary columns (`0`, `1`, or `NA`) into `attrs`.
///
/// # Errors
/// Returns [`AttributeFileError`] for unreadable or malformed tables.
pub fn read_binary_attributes(path: &Path, attrs: &mut Attributes) -> Result<(), AttributeFileError> {
    let (header, rows) = read_rows(path)?;
    for (col, name) in header.iter().enumerate() {
        let mut values = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let field = &row[col];
            let value = if is_na(field) {
                None
            } else {
                match field.as_str() {
                    "0" => Some(false),
                    "1" => Some(true),
                    _ => {
                        return Err(AttributeFileError::BadValue {
                            row: row_idx + 1,
                            column: name.clone(),
                            family: "binary",
                            value: field.clone(),
                        });
                    }
                }
            };
            values.push(value);
        }
        attrs.push_binary(Column::new(name.clone(), values));
    }
    Ok(())
}

/// Reads categorical columns (non-negative integers or `NA`) into `attrs`.
///
/// # Errors
/// Returns [`AttributeFileError`] for unreadable or malformed tables.
pub fn read_categorical_attributes(
    path: &Path,
    attrs: &mut Attributes,
) -> Result<(), AttributeFileError> {
    let (header, rows) = read_rows(path)?;
    for (col, name) in header.iter().enumerate() {
        let mut values = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let field = &row[col];
            let value = if is_na(field) {
                None
            } else {
                Some(field.parse::<u32>().map_err(|_| {
                    AttributeFileError::BadValue {
                        row: row_idx + 1,
                        column: name.clone(),
                        family: "categorical",
                        value: field.clone(),
                    }
                })?)
            };
            values.push(value);
        }
        attrs.push_categorical(Column::new(name.clone(), values));
    }
    Ok(())
}

/// Reads continuous columns (floating point or `NA`, stored as NaN) into
/// `attrs`.
///
/// # Errors
/// Returns [`AttributeFileError`] for unreadable or malformed tables.
pub fn read_continuous_attributes(
    path: &Path,
    attrs: &mut Attributes,
) -> Result<(), AttributeFileError> {
    let (header, rows) = read_rows(path)?;
    for (col, name) in header.iter().enumerate() {
        let mut values = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let field = &row[col];
            let value = if is_na(field) {
                f64::NAN
            } else {
                field.parse::<f64>().map_err(|_| AttributeFileError::BadValue {
                    row: row_idx + 1,
                    column: name.clone(),
                    family: "continuous",
                    value: field.clone(),
                })?
            };
            values.push(value);
        }
        attrs.push_continuous(Column::new(name.clone(), values));
    }
    Ok(())
}

/// Reads set-of-category columns into `attrs`.
///
/// # Errors
/// Returns [`AttributeFileError`] for unreadable or malformed tables.
pub fn read_set_attributes(path: &Path, attrs: &mut Attributes) -> Result<(), AttributeFileError> {
    let (header, rows) = read_rows(path)?;
    for (col, name) in header.iter().enumerate() {
        let mut parsed: Vec<Option<Vec<u32>>> = Vec::with_capacity(rows.len());
        let mut universe = 0usize;
        for (row_idx, row) in rows.iter().enumerate() {
            let field = &row[col];
            if is_na(field) {
                parsed.push(None);
                continue;
            }
            let inner = field
                .strip_prefix('{')
                .and_then(|f| f.strip_suffix('}'))
                .ok_or_else(|| AttributeFileError::BadValue {
                    row: row_idx + 1,
                    column: name.clone(),
                    family: "set",
                    value: field.clone(),
                })?;
            let mut ids = Vec::new();
            for piece in inner.split(',') {
                let piece = piece.trim();
                if piece.is_empty() {
                    continue;
                }
                let id: u32 = piece.parse().map_err(|_| AttributeFileError::BadValue {
                    row: row_idx + 1,
                    column: name.clone(),
                    family: "set",
                    value: field.clone(),
                })?;
                universe = universe.max(id as usize + 1);
                ids.push(id);
            }
            parsed.push(Some(ids));
        }
        let values: Vec<Vec<SetMember>> = parsed
            .into_iter()
            .map(|cell| match cell {
                None => vec![SetMember::Na; universe],
                Some(ids) => {
                    let mut members = vec![SetMember::Absent; universe];
                    for id in ids {
                        members[id as usize] = SetMember::Present;
                    }
                    members
                }
            })
            .collect();
        attrs.push_set(Column::new(name.clone(), values));
    }
    Ok(())
}
