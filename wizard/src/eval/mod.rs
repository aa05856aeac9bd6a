//! This module implements the reduction of an evaluation claim on a derived
//! column to evaluation claims on its leaves.
//!
//! The verifier holds a point `x` at which a (possibly composite) column is
//! claimed to evaluate to `y`. [`derive_evaluation_point`] walks down the
//! column tree and computes the point each leaf must be opened at:
//!
//! - a shift by `o` of a column of size `n` maps `x` to `x * w_n^o`;
//! - a repetition `count` times maps `x` to `x^count`;
//! - an interleaving of `k` columns of size `n` maps `x` to the `k` points
//!   `x * w_{nk}^{-j}`, one per parent.
//!
//! Given the openings of the leaves, [`verify_y_consistency`] walks the tree
//! back up: shifts and repetitions leave the value unchanged, and
//! interleavings recombine the values of their parents (see
//! [`interleave::recombine_interleaved`]).
//!
//! Points and openings are keyed by an [`EvalPath`]: the sequence of nodes
//! traversed from the root. The same leaf reached through two different
//! paths is opened twice, at two different points.
//!
//! The caches are owned by the caller for the duration of one verification.
//! They must not be shared between concurrent verifications.

use crate::{
    column::{Column, ColumnId, Leaf},
    error::{ColumnError, EvaluationError},
    runtime::Runtime,
    utils::evaluate_lagrange,
};
use ark_ff::FftField;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

pub mod arithmetic;
pub mod circuit;
pub mod interleave;

use arithmetic::{FieldOps, Native};
use interleave::{interleaved_points, recombine_interleaved};

/// One step in the traversal of a column tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathNode {
    /// A leaf, with the size its assignment must have
    Leaf { column: ColumnId, size: usize },
    Shifted(ColumnId),
    Repeated(ColumnId),
    Interleaved { column: ColumnId, branch: usize },
}

impl PathNode {
    pub fn leaf(leaf: &Leaf) -> Self {
        PathNode::Leaf {
            column: leaf.id().clone(),
            size: leaf.size(),
        }
    }
}

impl fmt::Display for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathNode::Leaf { column, .. } => write!(f, "{column}"),
            PathNode::Shifted(id) => write!(f, "{id}"),
            PathNode::Repeated(id) => write!(f, "{id}"),
            PathNode::Interleaved { column, branch } => write!(f, "{column}[{branch}]"),
        }
    }
}

/// The key under which derived points and leaf openings are stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvalPath(Vec<PathNode>);

impl EvalPath {
    /// The empty path, where the traversal of a column tree starts.
    pub fn root() -> Self {
        EvalPath(vec![])
    }

    pub fn child(&self, node: PathNode) -> Self {
        let mut nodes = self.0.clone();
        nodes.push(node);
        EvalPath(nodes)
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.0
    }

    /// The leaf the path ends on and its size, if any.
    pub fn leaf(&self) -> Option<(&ColumnId, usize)> {
        match self.0.last() {
            Some(PathNode::Leaf { column, size }) => Some((column, *size)),
            _ => None,
        }
    }
}

impl fmt::Display for EvalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, node) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

/// The primitive root of unity of order `size` that generates the
/// evaluation domain of a column of that size.
pub fn root_of_unity<F: FftField>(size: usize) -> Result<F, EvaluationError> {
    F::get_root_of_unity(size as u64).ok_or(EvaluationError::MissingRootOfUnity(size))
}

/// Compute the points at which the leaves of `column` must be opened to
/// check a claimed evaluation of `column` at `x`, and record them in
/// `cached_xs`. Returns the points of the leaves, in traversal order.
pub fn derive_evaluation_point<F: FftField>(
    column: &Column,
    upstream: &EvalPath,
    cached_xs: &mut HashMap<EvalPath, F>,
    x: F,
) -> Result<Vec<F>, EvaluationError> {
    derive_evaluation_point_with::<F, _>(&mut Native, column, upstream, cached_xs, x)
}

/// [`derive_evaluation_point`] over any [`FieldOps`] backend.
pub fn derive_evaluation_point_with<F: FftField, O: FieldOps<F>>(
    ops: &mut O,
    column: &Column,
    upstream: &EvalPath,
    cached_xs: &mut HashMap<EvalPath, O::Var>,
    x: O::Var,
) -> Result<Vec<O::Var>, EvaluationError> {
    match column {
        Column::Leaf(leaf) => {
            let path = upstream.child(PathNode::leaf(leaf));
            cached_xs.entry(path).or_insert_with(|| x.clone());
            Ok(vec![x])
        }
        Column::Shifted(shifted) => {
            let path = upstream.child(PathNode::Shifted(column.id()));
            let derived = match cached_xs.get(&path) {
                Some(derived) => derived.clone(),
                None => {
                    let omega = root_of_unity::<F>(shifted.size())?;
                    let omega = ops.constant(omega.pow([shifted.canonical_offset()]));
                    let derived = ops.mul(&x, &omega);
                    cached_xs.insert(path.clone(), derived.clone());
                    derived
                }
            };
            derive_evaluation_point_with::<F, O>(
                ops,
                shifted.parent(),
                &path,
                cached_xs,
                derived,
            )
        }
        Column::Repeated(repeated) => {
            let path = upstream.child(PathNode::Repeated(column.id()));
            let derived = match cached_xs.get(&path) {
                Some(derived) => derived.clone(),
                None => {
                    let derived = ops.pow(&x, repeated.count() as u64);
                    cached_xs.insert(path.clone(), derived.clone());
                    derived
                }
            };
            derive_evaluation_point_with::<F, O>(
                ops,
                repeated.parent(),
                &path,
                cached_xs,
                derived,
            )
        }
        Column::Interleaved(interleaved) => {
            let id = column.id();
            let xs = interleaved_points::<F, O>(
                ops,
                &x,
                interleaved.parent_size(),
                interleaved.arity(),
            )?;
            let mut res = Vec::with_capacity(interleaved.arity());
            for (branch, (parent, x_j)) in interleaved.parents().iter().zip(xs).enumerate() {
                let path = upstream.child(PathNode::Interleaved {
                    column: id.clone(),
                    branch,
                });
                let x_j = cached_xs.entry(path.clone()).or_insert(x_j).clone();
                res.extend(derive_evaluation_point_with::<F, O>(
                    ops, parent, &path, cached_xs, x_j,
                )?);
            }
            Ok(res)
        }
    }
}

/// Recompute the evaluation of `column` from the openings of its leaves in
/// `final_ys`, using the points recorded in `cached_xs` by
/// [`derive_evaluation_point`]. The caller compares the result with the
/// claimed evaluation.
pub fn verify_y_consistency<F: FftField>(
    column: &Column,
    upstream: &EvalPath,
    cached_xs: &HashMap<EvalPath, F>,
    final_ys: &HashMap<EvalPath, F>,
) -> Result<F, EvaluationError> {
    verify_y_consistency_with::<F, _>(&mut Native, column, upstream, cached_xs, final_ys)
}

/// [`verify_y_consistency`] over any [`FieldOps`] backend.
pub fn verify_y_consistency_with<F: FftField, O: FieldOps<F>>(
    ops: &mut O,
    column: &Column,
    upstream: &EvalPath,
    cached_xs: &HashMap<EvalPath, O::Var>,
    final_ys: &HashMap<EvalPath, O::Var>,
) -> Result<O::Var, EvaluationError> {
    match column {
        Column::Leaf(leaf) => {
            let path = upstream.child(PathNode::leaf(leaf));
            final_ys
                .get(&path)
                .cloned()
                .ok_or(EvaluationError::MissingLeafEvaluation(path))
        }
        Column::Shifted(shifted) => {
            let path = upstream.child(PathNode::Shifted(column.id()));
            verify_y_consistency_with::<F, O>(ops, shifted.parent(), &path, cached_xs, final_ys)
        }
        Column::Repeated(repeated) => {
            let path = upstream.child(PathNode::Repeated(column.id()));
            verify_y_consistency_with::<F, O>(ops, repeated.parent(), &path, cached_xs, final_ys)
        }
        Column::Interleaved(interleaved) => {
            let id = column.id();
            let mut xs = Vec::with_capacity(interleaved.arity());
            let mut ys = Vec::with_capacity(interleaved.arity());
            for (branch, parent) in interleaved.parents().iter().enumerate() {
                let path = upstream.child(PathNode::Interleaved {
                    column: id.clone(),
                    branch,
                });
                let x_j = cached_xs
                    .get(&path)
                    .cloned()
                    .ok_or_else(|| EvaluationError::MissingPoint(path.clone()))?;
                xs.push(x_j);
                ys.push(verify_y_consistency_with::<F, O>(
                    ops, parent, &path, cached_xs, final_ys,
                )?);
            }
            recombine_interleaved::<F, O>(ops, &id, interleaved.parent_size(), &xs, &ys)
        }
    }
}

/// Open every leaf recorded in `cached_xs` at its derived point, using the
/// assignment provided by `run`. This is the `final_ys` map expected by
/// [`verify_y_consistency`].
pub fn leaf_evaluations<F: FftField, R: Runtime<F>>(
    cached_xs: &HashMap<EvalPath, F>,
    run: &R,
) -> Result<HashMap<EvalPath, F>, EvaluationError> {
    let mut ys = HashMap::new();
    for (path, x) in cached_xs {
        if let Some((id, size)) = path.leaf() {
            let values = run.column_assignment(id)?;
            if values.len() != size {
                return Err(ColumnError::AssignmentSize {
                    column: id.clone(),
                    expected: size,
                    got: values.len(),
                }
                .into());
            }
            let y = evaluate_lagrange(&values, *x)
                .ok_or(EvaluationError::MissingRootOfUnity(size))?;
            ys.insert(path.clone(), y);
        }
    }
    Ok(ys)
}

/// Evaluate a column at `x` by opening its leaves at the derived points
/// and recombining the openings.
pub fn evaluate_derived<F: FftField, R: Runtime<F>>(
    column: &Column,
    run: &R,
    x: F,
) -> Result<F, EvaluationError> {
    let root = EvalPath::root();
    let mut cached_xs = HashMap::new();
    derive_evaluation_point(column, &root, &mut cached_xs, x)?;
    let final_ys = leaf_evaluations(&cached_xs, run)?;
    verify_y_consistency(column, &root, &cached_xs, &final_ys)
}
