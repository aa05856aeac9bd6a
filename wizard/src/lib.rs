//! Column algebra of a polynomial IOP.
//!
//! Protocol code declares committed columns in a [`column::Store`] and
//! builds virtual columns on top of them with [`column::shift`],
//! [`column::repeat`] and [`column::interleave`]. The [`eval`] module
//! reduces an evaluation claim on such a virtual column to evaluation
//! claims on the committed columns it is made of.

pub mod column;
pub mod error;
pub mod eval;
pub mod runtime;
pub mod serialization;
pub mod utils;

pub use column::{interleave, repeat, shift, Column, ColumnId, Leaf, Status, Store};
pub use error::{ColumnError, EvaluationError, PackError, StatusError};
pub use eval::{
    derive_evaluation_point, evaluate_derived, leaf_evaluations, verify_y_consistency, EvalPath,
};
pub use runtime::{MemoryRuntime, Runtime};
