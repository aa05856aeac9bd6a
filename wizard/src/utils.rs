//! Small helpers shared by the column variants and the evaluation protocol.

use ark_ff::FftField;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};

/// Returns `log2(n)` for a power of two `n`. Panics otherwise.
pub fn log2_exact(n: usize) -> u32 {
    assert!(n.is_power_of_two(), "{n} is not a power of two");
    n.trailing_zeros()
}

/// Reduce a row offset modulo `size`, keeping the sign of `offset`. The
/// result lies in `(-size, size)`.
pub fn reduce_offset(offset: i64, size: usize) -> i64 {
    offset % size as i64
}

/// The representative of `offset` modulo `size` in `[0, size)`.
pub fn canonical_offset(offset: i64, size: usize) -> u64 {
    offset.rem_euclid(size as i64) as u64
}

/// Evaluate at `x` the polynomial of degree `< values.len()` that takes
/// `values[i]` on the i-th power of the primitive root of unity of order
/// `values.len()`.
///
/// Returns `None` if the field has no such domain.
pub fn evaluate_lagrange<F: FftField>(values: &[F], x: F) -> Option<F> {
    let domain = Radix2EvaluationDomain::<F>::new(values.len())?;
    if domain.size() != values.len() {
        return None;
    }
    let lagrange = domain.evaluate_all_lagrange_coefficients(x);
    Some(values.iter().zip(lagrange).map(|(v, l)| *v * l).sum())
}
