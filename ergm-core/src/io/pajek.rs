//! Pajek network reading and writing.
//!
//! The accepted subset is what the samplers need: a `*vertices N` header
//! (with a second count for two-mode networks), an `*arcs` or `*edges`
//! marker, and one tie per line as 1-based endpoint ids with an optional,
//! ignored weight. Vertex label lines between the header and the marker are
//! skipped.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::graph::{Graph, GraphMode};

/// Errors raised while reading a Pajek file.
#[derive(Debug, Error)]
pub enum NetworkFileError {
    /// The file could not be read.
    #[error("cannot read network `{path}`: {source}")]
    Io {
        /// The requested path.
        path: PathBuf,
        /// Underlying operating-system error.
        #[source]
        source: std::io::Error,
    },
    /// The `*vertices` header is missing or malformed.
    #[error("line {line}: expected `*vertices N [N_A]`")]
    BadHeader {
        /// 1-based line number.
        line: usize,
    },
    /// No `*arcs` or `*edges` section marker was found.
    #[error("missing `*arcs` or `*edges` section")]
    MissingSection,
    /// A tie line is not two (or three) numeric fields.
    #[error("line {line}: malformed tie `{text}`")]
    BadTie {
        /// 1-based line number.
        line: usize,
        /// The offending text.
        text: String,
    },
    /// A tie endpoint is outside `1..=N`.
    #[error("line {line}: node id {id} is outside 1..={n}")]
    NodeOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The offending id (1-based, as written).
        id: usize,
        /// Declared node count.
        n: usize,
    },
    /// A two-mode file contains a within-mode edge.
    #[error("line {line}: edge {i}-{j} stays within one mode")]
    IntraModeEdge {
        /// 1-based line number.
        line: usize,
        /// First endpoint (1-based).
        i: usize,
        /// Second endpoint (1-based).
        j: usize,
    },
    /// A self-loop appeared without loops being permitted.
    #[error("line {line}: self-loop at node {id} is not permitted")]
    UnexpectedLoop {
        /// 1-based line number.
        line: usize,
        /// The node (1-based).
        id: usize,
    },
}

/// A parsed Pajek network with 0-based tie endpoints.
#[derive(Clone, Debug)]
pub struct PajekNetwork {
    /// Declared node count.
    pub n: usize,
    /// Mode-A node count for two-mode files.
    pub mode_a: Option<usize>,
    /// Whether the file declared `*arcs` (directed) rather than `*edges`.
    pub directed: bool,
    /// Ties with 0-based endpoints, in file order.
    pub ties: Vec<(usize, usize)>,
}

/// Reads a Pajek file from disk.
///
/// # Errors
/// Returns [`NetworkFileError`] for unreadable files or any deviation from
/// the accepted format, including within-mode edges of two-mode files and
/// self-loops when `allow_loops` is false.
pub fn read_pajek(path: &Path, allow_loops: bool) -> Result<PajekNetwork, NetworkFileError> {
    let text = fs::read_to_string(path).map_err(|source| NetworkFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pajek(&text, allow_loops)
}

/// Parses Pajek text.
///
/// # Errors
/// As [`read_pajek`], minus the I/O failure case.
pub fn parse_pajek(text: &str, allow_loops: bool) -> Result<PajekNetwork, NetworkFileError> {
    let mut lines = text.lines().enumerate();

    let (header_line, header) = lines
        .by_ref()
        .map(|(idx, l)| (idx + 1, l.trim()))
        .find(|(_, l)| !l.is_empty())
        .ok_or(NetworkFileError::BadHeader { line: 1 })?;
    let mut fields = header.split_whitespace();
    let marker = fields.next().unwrap_or_default();
    if !marker.eq_ignore_ascii_case("*vertices") {
        return Err(NetworkFileError::BadHeader { line: header_line });
    }
    let n: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or(NetworkFileError::BadHeader { line: header_line })?;
    let mode_a: Option<usize> = match fields.next() {
        Some(f) => Some(
            f.parse()
                .ok()
                .filter(|&a: &usize| a <= n)
                .ok_or(NetworkFileError::BadHeader { line: header_line })?,
        ),
        None => None,
    };

    // Skip vertex label lines until the section marker.
    let mut directed = None;
    for (_, raw) in lines.by_ref() {
        let line = raw.trim();
        if line.eq_ignore_ascii_case("*arcs") {
            directed = Some(true);
            break;
        }
        if line.eq_ignore_ascii_case("*edges") {
            directed = Some(false);
            break;
        }
    }
    let directed = directed.ok_or(NetworkFileError::MissingSection)?;

    let mut ties = Vec::new();
    for (idx, raw) in lines {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('*') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (i, j) = match (fields.next(), fields.next()) {
            (Some(a), Some(b)) => {
                let i: usize = a.parse().map_err(|_| NetworkFileError::BadTie {
                    line: line_no,
                    text: line.to_owned(),
                })?;
                let j: usize = b.parse().map_err(|_| NetworkFileError::BadTie {
                    line: line_no,
                    text: line.to_owned(),
                })?;
                (i, j)
            }
            _ => {
                return Err(NetworkFileError::BadTie {
                    line: line_no,
                    text: line.to_owned(),
                });
            }
        };
        for id in [i, j] {
            if id == 0 || id > n {
                return Err(NetworkFileError::NodeOutOfRange { line: line_no, id, n });
            }
        }
        if i == j && !allow_loops {
            return Err(NetworkFileError::UnexpectedLoop { line: line_no, id: i });
        }
        if let Some(a) = mode_a {
            if (i <= a) == (j <= a) {
                return Err(NetworkFileError::IntraModeEdge { line: line_no, i, j });
            }
        }
        ties.push((i - 1, j - 1));
    }

    Ok(PajekNetwork {
        n,
        mode_a,
        directed,
        ties,
    })
}

/// Writes a graph in the same Pajek subset the reader accepts, with 1-based
/// tie endpoints.
///
/// # Errors
/// Propagates any write failure.
pub fn write_pajek<W: Write>(g: &Graph, out: &mut W) -> std::io::Result<()> {
    match g.mode() {
        GraphMode::Bipartite { mode_a } => {
            writeln!(out, "*vertices {} {mode_a}", g.node_count())?;
        }
        _ => writeln!(out, "*vertices {}", g.node_count())?,
    }
    for v in 0..g.node_count() {
        writeln!(out, "{}", v + 1)?;
    }
    if g.is_directed() {
        writeln!(out, "*arcs")?;
    } else {
        writeln!(out, "*edges")?;
    }
    for tie in g.ties() {
        writeln!(out, "{} {}", tie.tail + 1, tie.head + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_directed_network() {
        let text = "*vertices 3\n1\n2\n3\n*arcs\n1 2\n2 3 0.5\n";
        let net = parse_pajek(text, false).expect("file is well-formed");
        assert_eq!(net.n, 3);
        assert!(net.directed);
        assert_eq!(net.ties, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn parses_a_two_mode_network() {
        let text = "*vertices 4 2\n*edges\n1 3\n2 4\n";
        let net = parse_pajek(text, false).expect("file is well-formed");
        assert_eq!(net.mode_a, Some(2));
        assert!(!net.directed);
        assert_eq!(net.ties, vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn rejects_within_mode_edges() {
        let text = "*vertices 4 2\n*edges\n1 2\n";
        let err = parse_pajek(text, false).expect_err("edge stays in mode A");
        assert!(matches!(err, NetworkFileError::IntraModeEdge { .. }));
    }

    #[test]
    fn rejects_out_of_range_ids() {
        let text = "*vertices 2\n*arcs\n1 5\n";
        let err = parse_pajek(text, false).expect_err("id 5 exceeds 2");
        assert!(matches!(err, NetworkFileError::NodeOutOfRange { id: 5, .. }));
    }

    #[test]
    fn round_trips_through_the_writer() {
        use crate::graph::TwoPathCacheKind;
        let mut g = Graph::directed(4, TwoPathCacheKind::Sparse, false);
        for &(i, j) in &[(0, 1), (2, 3), (3, 0)] {
            g.insert_updating_list(i, j);
        }
        let mut buffer = Vec::new();
        write_pajek(&g, &mut buffer).expect("write succeeds");
        let text = String::from_utf8(buffer).expect("output is UTF-8");
        let net = parse_pajek(&text, false).expect("own output parses");
        assert_eq!(net.n, 4);
        let mut expected: Vec<_> = g.ties().map(|t| (t.tail, t.head)).collect();
        let mut actual = net.ties;
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(expected, actual);
    }
}
