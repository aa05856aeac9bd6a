//! This module implements the error types of the column algebra.
//!
//! Invariant violations made while describing a protocol (non power-of-two
//! sizes, duplicated names, forbidden status transitions, ...) are bugs in
//! the protocol description and panic at the call site. The types below
//! cover the failures that depend on data supplied at proving or verifying
//! time: a missing witness, a malformed proof, or a corrupted metadata blob.

use crate::{column::ColumnId, column::Status, eval::EvalPath};
use thiserror::Error;

/// Errors that can arise when reading the assignment of a column
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("no assignment was provided for the column {0}")]
    MissingAssignment(ColumnId),

    #[error("the assignment of {column} has size {got} but the column has size {expected}")]
    AssignmentSize {
        column: ColumnId,
        expected: usize,
        got: usize,
    },

    #[error("position {position} is out of bounds for {column} (size {size})")]
    OutOfBounds {
        column: ColumnId,
        position: usize,
        size: usize,
    },
}

/// Errors that can arise when deriving evaluation points or when
/// recombining claimed evaluations. Any of them means that the proof must be
/// rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("the proof is malformed: no evaluation was provided for {0}")]
    MissingLeafEvaluation(EvalPath),

    #[error("no evaluation point was derived for {0}")]
    MissingPoint(EvalPath),

    #[error("the evaluation points of the interleaved column {column} are inconsistent at branch {branch}")]
    InconsistentInterleavedPoints { column: ColumnId, branch: usize },

    #[error("the evaluation point of branch {branch} of {column} is a root of unity of order {size}")]
    DegenerateEvaluationPoint {
        column: ColumnId,
        branch: usize,
        size: usize,
    },

    #[error("the field has no root of unity of order {0}")]
    MissingRootOfUnity(usize),

    #[error("division by zero")]
    DivisionByZero,

    #[error("the circuit constraint {0} is not satisfied")]
    UnsatisfiedConstraint(usize),

    #[error("the circuit constraint {constraint} uses the variable {index}, which is not in the witness")]
    UnknownVariable { constraint: usize, index: usize },

    #[error(transparent)]
    Column(#[from] ColumnError),
}

/// Errors that can arise when changing the status of a column
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusError {
    #[error("illegal status transition from {old} to {new}")]
    IllegalTransition { old: Status, new: Status },
}

/// Errors that can arise when packing or unpacking column metadata
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("the packed size 2^{0} does not fit in a usize")]
    SizeOverflow(u32),

    #[error("a packed column has an empty name")]
    EmptyName,

    #[error("the packed round {round} skips a round: only {num_rounds} rounds are known")]
    RoundOutOfRange { round: usize, num_rounds: usize },

    #[error("the back-reference index {index} is out of range ({len} definitions)")]
    DanglingReference { index: usize, len: usize },

    #[error("the column {0} is not registered in the store")]
    UnknownColumn(ColumnId),

    #[error("the definition of {0} does not match the store")]
    DefinitionMismatch(ColumnId),

    #[error("the packed store lists {0} twice")]
    DuplicateColumn(ColumnId),

    #[error(transparent)]
    Status(#[from] StatusError),
}
