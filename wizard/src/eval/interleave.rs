//! Evaluation points and recombination for interleaved columns.
//!
//! Let `P_0, ..., P_{k-1}` be polynomials of degree `< n` interpolating the
//! parents of an interleaved column over the roots of unity of order `n`,
//! and `P` the polynomial of degree `< nk` interpolating the interleaved
//! column over the roots of unity of order `nk`. With `w` a primitive
//! `nk`-th root of unity and `x_j = x * w^{-j}`,
//!
//! ```text
//! P(x) = sum_j  (x^{nk} - 1) / (k * (x_j^n - 1)) * P_j(x_j)
//! ```
//!
//! which only requires `x_j^n != 1`, i.e. `x^{nk} != 1`.

use crate::{
    column::ColumnId,
    error::EvaluationError,
    eval::{arithmetic::FieldOps, root_of_unity},
};
use ark_ff::FftField;

/// The points `x * w^{-j}` at which the `arity` parents of size
/// `parent_size` must be opened to recover an evaluation at `x`.
pub fn interleaved_points<F: FftField, O: FieldOps<F>>(
    ops: &mut O,
    x: &O::Var,
    parent_size: usize,
    arity: usize,
) -> Result<Vec<O::Var>, EvaluationError> {
    let size = parent_size * arity;
    let omega_inv = root_of_unity::<F>(size)?
        .inverse()
        .ok_or(EvaluationError::MissingRootOfUnity(size))?;
    let omega_inv = ops.constant(omega_inv);

    let mut xs = Vec::with_capacity(arity);
    xs.push(x.clone());
    for j in 1..arity {
        let next = ops.mul(&xs[j - 1], &omega_inv);
        xs.push(next);
    }
    Ok(xs)
}

/// Recombine the evaluations `parent_ys[j]` of the parents at
/// `parent_xs[j]` into the evaluation of the interleaved column at
/// `parent_xs[0]`.
///
/// Fails if the points are not those returned by [`interleaved_points`], or
/// if one of them is an `n`-th root of unity.
pub fn recombine_interleaved<F: FftField, O: FieldOps<F>>(
    ops: &mut O,
    column: &ColumnId,
    parent_size: usize,
    parent_xs: &[O::Var],
    parent_ys: &[O::Var],
) -> Result<O::Var, EvaluationError> {
    let arity = parent_xs.len();
    assert_eq!(
        arity,
        parent_ys.len(),
        "{column}: got {arity} points but {} evaluations",
        parent_ys.len()
    );
    let size = parent_size * arity;
    let omega = ops.constant(root_of_unity::<F>(size)?);

    for j in 1..arity {
        let prev = ops.mul(&parent_xs[j], &omega);
        if !ops.assert_equal(&prev, &parent_xs[j - 1]) {
            return Err(EvaluationError::InconsistentInterleavedPoints {
                column: column.clone(),
                branch: j,
            });
        }
    }

    let one = ops.constant(F::one());
    let arity_inv = F::from(arity as u64)
        .inverse()
        .ok_or(EvaluationError::DivisionByZero)?;
    let arity_inv = ops.constant(arity_inv);

    // (x^{nk} - 1) / k
    let x_pow = ops.pow(&parent_xs[0], size as u64);
    let vanishing = ops.sub(&x_pow, &one);
    let shared = ops.mul(&vanishing, &arity_inv);

    let mut res = ops.constant(F::zero());
    for (j, (x_j, y_j)) in parent_xs.iter().zip(parent_ys).enumerate() {
        let x_j_pow = ops.pow(x_j, parent_size as u64);
        let denominator = ops.sub(&x_j_pow, &one);
        let coeff = ops.div(&shared, &denominator).ok_or_else(|| {
            EvaluationError::DegenerateEvaluationPoint {
                column: column.clone(),
                branch: j,
                size: parent_size,
            }
        })?;
        let term = ops.mul(&coeff, y_j);
        res = ops.add(&res, &term);
    }
    Ok(res)
}
