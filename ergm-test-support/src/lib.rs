//! Shared fixtures for the ergm workspace test suites.
//!
//! Provides the literal scenario networks the scenario tests are built
//! around, plus a scratch directory that writes fixture files for the
//! loaders and binaries.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Directed path `0 -> 1 -> 2`; adding `0 -> 2` closes a transitive triad.
pub const TRIANGLE_NET: &str = "*vertices 3\n1\n2\n3\n*arcs\n1 2\n2 3\n";

/// Single arc `0 -> 1`; adding `1 -> 0` closes a mutual dyad.
pub const RECIPROCITY_NET: &str = "*vertices 2\n1\n2\n*arcs\n1 2\n";

/// Five isolated nodes.
pub const EMPTY_FIVE_NET: &str = "*vertices 5\n1\n2\n3\n4\n5\n*arcs\n";

/// Two-mode network on modes `{0, 1}` and `{2, 3}` with edges
/// `0-2, 0-3, 1-2`; adding `1-3` closes a four-cycle.
pub const BIPARTITE_FOUR_CYCLE_NET: &str = "*vertices 4 2\n1\n2\n3\n4\n*edges\n1 3\n1 4\n2 3\n";

/// Continuous attribute table with a missing value in the second row.
pub const WEALTH_WITH_NA: &str = "wealth\n1.0\nNA\n";

/// A scratch directory for fixture files, removed on drop.
#[derive(Debug)]
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    /// Creates a fresh scratch directory.
    ///
    /// # Panics
    /// Panics when the temporary directory cannot be created; fixtures are
    /// test-only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create fixture directory"),
        }
    }

    /// Writes `contents` to `name` inside the scratch directory and returns
    /// the full path.
    ///
    /// # Panics
    /// Panics when the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// The scratch directory's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A path inside the scratch directory, as a string, for configuration
    /// values and output prefixes.
    ///
    /// # Panics
    /// Panics when the path is not valid UTF-8.
    #[must_use]
    pub fn join_str(&self, name: &str) -> String {
        self.dir
            .path()
            .join(name)
            .to_str()
            .expect("fixture paths are UTF-8")
            .to_owned()
    }
}

impl Default for FixtureDir {
    fn default() -> Self {
        Self::new()
    }
}
