//! Per-node integer vectors: snowball zone files and citation term files.
//!
//! Both formats are one non-negative integer per node, whitespace- or
//! line-separated, optionally preceded by a single non-numeric header
//! token.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading a zone or term file.
#[derive(Debug, Error)]
pub enum NodeFileError {
    /// The file could not be read.
    #[error("cannot read {what} file `{path}`: {source}")]
    Io {
        /// Which vector was being read.
        what: &'static str,
        /// The requested path.
        path: PathBuf,
        /// Underlying operating-system error.
        #[source]
        source: std::io::Error,
    },
    /// A token is not a non-negative integer.
    #[error("{what} file: bad value `{value}`")]
    BadValue {
        /// Which vector was being read.
        what: &'static str,
        /// The offending token.
        value: String,
    },
}

/// Reads one integer per node. `what` names the vector in diagnostics
/// (`"zone"` or `"term"`).
///
/// # Errors
/// Returns [`NodeFileError`] for unreadable files or non-integer tokens.
pub fn read_node_integers(path: &Path, what: &'static str) -> Result<Vec<u32>, NodeFileError> {
    let text = fs::read_to_string(path).map_err(|source| NodeFileError::Io {
        what,
        path: path.to_path_buf(),
        source,
    })?;
    let mut tokens = text.split_whitespace().peekable();
    // Tolerate a single header token such as "zone".
    if tokens.peek().is_some_and(|t| t.parse::<u32>().is_err()) {
        let _ = tokens.next();
    }
    tokens
        .map(|t| {
            t.parse::<u32>().map_err(|_| NodeFileError::BadValue {
                what,
                value: t.to_owned(),
            })
        })
        .collect()
}
