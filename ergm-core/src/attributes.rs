//! Per-node attribute storage.
//!
//! Four attribute families are supported: binary, categorical, continuous,
//! and set-of-category. Each family holds named columns with one value per
//! node. Missing data is first-class: binary and categorical columns store
//! `None`, continuous columns store NaN, and set columns mark individual
//! categories as unobserved. The change-statistic kernels treat any missing
//! operand as contributing zero, so the NA representation here is
//! load-bearing.

use thiserror::Error;

use crate::graph::NodeId;

/// Membership state of one category inside a set-of-category value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetMember {
    /// The category is present in the node's set.
    Present,
    /// The category is absent from the node's set.
    Absent,
    /// No observation for this category.
    Na,
}

/// A named column of one attribute family.
#[derive(Clone, Debug)]
pub struct Column<T> {
    name: String,
    values: Vec<T>,
}

impl<T> Column<T> {
    /// Builds a column from a name and per-node values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column name as it appeared in the attribute file header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Errors raised when resolving attribute names against the loaded columns.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// No column of the requested family carries the requested name.
    #[error("no {family} attribute named `{name}`")]
    UnknownAttribute {
        /// Attribute family searched.
        family: &'static str,
        /// Requested column name.
        name: String,
    },
    /// A column's row count does not match the graph's node count.
    #[error("attribute `{name}` has {got} rows but the graph has {expected} nodes")]
    RowCountMismatch {
        /// Offending column name.
        name: String,
        /// Number of rows supplied.
        got: usize,
        /// Number of rows required.
        expected: usize,
    },
}

/// All attribute columns loaded for one graph.
#[derive(Clone, Debug, Default)]
pub struct Attributes {
    binary: Vec<Column<Option<bool>>>,
    categorical: Vec<Column<Option<u32>>>,
    continuous: Vec<Column<f64>>,
    sets: Vec<Column<Vec<SetMember>>>,
}

impl Attributes {
    /// An attribute store with no columns.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a binary column.
    pub fn push_binary(&mut self, column: Column<Option<bool>>) {
        self.binary.push(column);
    }

    /// Adds a categorical column.
    pub fn push_categorical(&mut self, column: Column<Option<u32>>) {
        self.categorical.push(column);
    }

    /// Adds a continuous column; NaN encodes missing data.
    pub fn push_continuous(&mut self, column: Column<f64>) {
        self.continuous.push(column);
    }

    /// Adds a set-of-category column.
    pub fn push_set(&mut self, column: Column<Vec<SetMember>>) {
        self.sets.push(column);
    }

    /// Checks that every column covers exactly `n` nodes.
    ///
    /// # Errors
    /// Returns [`AttributeError::RowCountMismatch`] naming the first column
    /// whose row count differs from `n`.
    pub fn validate_row_counts(&self, n: usize) -> Result<(), AttributeError> {
        let mismatch = |name: &str, got: usize| AttributeError::RowCountMismatch {
            name: name.to_owned(),
            got,
            expected: n,
        };
        for c in &self.binary {
            if c.len() != n {
                return Err(mismatch(c.name(), c.len()));
            }
        }
        for c in &self.categorical {
            if c.len() != n {
                return Err(mismatch(c.name(), c.len()));
            }
        }
        for c in &self.continuous {
            if c.len() != n {
                return Err(mismatch(c.name(), c.len()));
            }
        }
        for c in &self.sets {
            if c.len() != n {
                return Err(mismatch(c.name(), c.len()));
            }
        }
        Ok(())
    }

    fn find<T>(columns: &[Column<T>], family: &'static str, name: &str) -> Result<usize, AttributeError> {
        columns
            .iter()
            .position(|c| c.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| AttributeError::UnknownAttribute {
                family,
                name: name.to_owned(),
            })
    }

    /// Resolves a binary column name to its slot index.
    ///
    /// # Errors
    /// Returns [`AttributeError::UnknownAttribute`] when no such column exists.
    pub fn find_binary(&self, name: &str) -> Result<usize, AttributeError> {
        Self::find(&self.binary, "binary", name)
    }

    /// Resolves a categorical column name to its slot index.
    ///
    /// # Errors
    /// Returns [`AttributeError::UnknownAttribute`] when no such column exists.
    pub fn find_categorical(&self, name: &str) -> Result<usize, AttributeError> {
        Self::find(&self.categorical, "categorical", name)
    }

    /// Resolves a continuous column name to its slot index.
    ///
    /// # Errors
    /// Returns [`AttributeError::UnknownAttribute`] when no such column exists.
    pub fn find_continuous(&self, name: &str) -> Result<usize, AttributeError> {
        Self::find(&self.continuous, "continuous", name)
    }

    /// Resolves a set column name to its slot index.
    ///
    /// # Errors
    /// Returns [`AttributeError::UnknownAttribute`] when no such column exists.
    pub fn find_set(&self, name: &str) -> Result<usize, AttributeError> {
        Self::find(&self.sets, "set", name)
    }

    /// Binary value of node `v` in slot `attr`; `None` is missing data.
    #[must_use]
    pub fn binary(&self, attr: usize, v: NodeId) -> Option<bool> {
        self.binary[attr].values[v]
    }

    /// Categorical value of node `v` in slot `attr`; `None` is missing data.
    #[must_use]
    pub fn categorical(&self, attr: usize, v: NodeId) -> Option<u32> {
        self.categorical[attr].values[v]
    }

    /// Continuous value of node `v` in slot `attr`; NaN is missing data.
    #[must_use]
    pub fn continuous(&self, attr: usize, v: NodeId) -> f64 {
        self.continuous[attr].values[v]
    }

    /// Set value of node `v` in slot `attr`.
    #[must_use]
    pub fn set(&self, attr: usize, v: NodeId) -> &[SetMember] {
        &self.sets[attr].values[v]
    }

    /// Names of the binary columns, in slot order.
    pub fn binary_names(&self) -> impl Iterator<Item = &str> {
        self.binary.iter().map(Column::name)
    }

    /// Names of the categorical columns, in slot order.
    pub fn categorical_names(&self) -> impl Iterator<Item = &str> {
        self.categorical.iter().map(Column::name)
    }

    /// Names of the continuous columns, in slot order.
    pub fn continuous_names(&self) -> impl Iterator<Item = &str> {
        self.continuous.iter().map(Column::name)
    }

    /// Names of the set columns, in slot order.
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(Column::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut attrs = Attributes::empty();
        attrs.push_binary(Column::new("Gender", vec![Some(true), None]));
        assert_eq!(attrs.find_binary("gender").expect("column exists"), 0);
        assert!(attrs.find_binary("class").is_err());
    }

    #[test]
    fn row_count_validation_names_the_offender() {
        let mut attrs = Attributes::empty();
        attrs.push_continuous(Column::new("wealth", vec![1.0, 2.0, f64::NAN]));
        attrs.validate_row_counts(3).expect("three rows for three nodes");
        let err = attrs.validate_row_counts(4).expect_err("row count differs");
        assert!(matches!(
            err,
            AttributeError::RowCountMismatch { got: 3, expected: 4, .. }
        ));
    }
}
