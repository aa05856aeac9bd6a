//! This module implements the column algebra.
//!
//! A column is a vector of field elements whose size is a power of two. The
//! protocol declares [`Leaf`] columns in a [`Store`]; the other variants of
//! [`Column`] are virtual and derived from leaves without any new
//! commitment:
//!
//! - [`Shifted`]: the rows of a column rotated by a fixed offset;
//! - [`Repeated`]: a column tiled a power-of-two number of times;
//! - [`Interleaved`]: several columns of the same size interleaved row by
//!   row.
//!
//! Composite columns are values: two columns built the same way compare
//! equal and have the same [`ColumnId`].

use crate::{error::ColumnError, runtime::Runtime};
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

pub mod interleaved;
pub mod leaf;
pub mod repeated;
pub mod shifted;
pub mod status;
pub mod store;
pub mod traversal;

pub use interleaved::{interleave, Interleaved};
pub use leaf::{ColumnPosition, Leaf};
pub use repeated::{repeat, Repeated};
pub use shifted::{shift, Shifted};
pub use status::Status;
pub use store::{ColumnInfo, Store};
pub use traversal::{nb_leaves, root_parents, stack_offsets};

/// The textual identifier of a column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        ColumnId(s)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        ColumnId(s.to_string())
    }
}

impl AsRef<str> for ColumnId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ColumnId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A column of the protocol, committed or derived.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Leaf(Leaf),
    Shifted(Shifted),
    Repeated(Repeated),
    Interleaved(Interleaved),
}

impl Column {
    pub fn id(&self) -> ColumnId {
        match self {
            Column::Leaf(c) => c.id().clone(),
            Column::Shifted(c) => c.id(),
            Column::Repeated(c) => c.id(),
            Column::Interleaved(c) => c.id(),
        }
    }

    /// Number of rows. Always a power of two.
    pub fn size(&self) -> usize {
        match self {
            Column::Leaf(c) => c.size(),
            Column::Shifted(c) => c.size(),
            Column::Repeated(c) => c.size(),
            Column::Interleaved(c) => c.size(),
        }
    }

    /// The round at which all the values of the column are known.
    pub fn round(&self) -> usize {
        match self {
            Column::Leaf(c) => c.round(),
            Column::Shifted(c) => c.parent().round(),
            Column::Repeated(c) => c.parent().round(),
            Column::Interleaved(c) => c.round(),
        }
    }

    pub fn is_composite(&self) -> bool {
        !matches!(self, Column::Leaf(_))
    }

    /// Panics if one of the leaves of the column is not registered in
    /// `store` as cached in its handle.
    pub fn must_exist(&self, store: &Store) {
        match self {
            Column::Leaf(c) => c.must_exist(store),
            Column::Shifted(c) => c.parent().must_exist(store),
            Column::Repeated(c) => c.parent().must_exist(store),
            Column::Interleaved(c) => c.parents().iter().for_each(|p| p.must_exist(store)),
        }
    }

    /// The full vector of values of the column.
    pub fn assignment<F: Clone, R: Runtime<F>>(&self, run: &R) -> Result<Vec<F>, ColumnError> {
        match self {
            Column::Leaf(c) => c.assignment(run),
            Column::Shifted(c) => c.assignment(run),
            Column::Repeated(c) => c.assignment(run),
            Column::Interleaved(c) => c.assignment(run),
        }
    }

    /// The value of the column at row `position`.
    pub fn assignment_at<F: Clone, R: Runtime<F>>(
        &self,
        run: &R,
        position: usize,
    ) -> Result<F, ColumnError> {
        match self {
            Column::Leaf(c) => c.assignment_at(run, position),
            Column::Shifted(c) => c.assignment_at(run, position),
            Column::Repeated(c) => c.assignment_at(run, position),
            Column::Interleaved(c) => c.assignment_at(run, position),
        }
    }
}

impl From<Leaf> for Column {
    fn from(leaf: Leaf) -> Self {
        Column::Leaf(leaf)
    }
}

impl From<&Leaf> for Column {
    fn from(leaf: &Leaf) -> Self {
        Column::Leaf(leaf.clone())
    }
}
