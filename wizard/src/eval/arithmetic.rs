//! The arithmetic the evaluation protocol is written against.
//!
//! The same derivation and recombination code runs natively on field
//! elements ([`Native`]) and inside a circuit on circuit variables
//! ([`crate::eval::circuit::CircuitBuilder`]), so that a recursive verifier
//! follows exactly the control flow of the native one.

use ark_ff::FftField;

pub trait FieldOps<F: FftField> {
    /// A field element, or a variable standing for one
    type Var: Clone;

    fn constant(&mut self, c: F) -> Self::Var;

    fn add(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var;

    fn sub(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var;

    fn mul(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var;

    /// `a / b`, or `None` if `b` is zero.
    fn div(&mut self, a: &Self::Var, b: &Self::Var) -> Option<Self::Var>;

    /// Constrain `a == b`. Returns whether the equality holds.
    fn assert_equal(&mut self, a: &Self::Var, b: &Self::Var) -> bool;

    /// `a^exp`, by square-and-multiply.
    fn pow(&mut self, a: &Self::Var, exp: u64) -> Self::Var {
        let mut res = self.constant(F::one());
        for i in (0..u64::BITS - exp.leading_zeros()).rev() {
            res = self.mul(&res, &res);
            if (exp >> i) & 1 == 1 {
                res = self.mul(&res, a);
            }
        }
        res
    }
}

/// Plain field arithmetic.
#[derive(Clone, Copy, Debug, Default)]
pub struct Native;

impl<F: FftField> FieldOps<F> for Native {
    type Var = F;

    fn constant(&mut self, c: F) -> F {
        c
    }

    fn add(&mut self, a: &F, b: &F) -> F {
        *a + b
    }

    fn sub(&mut self, a: &F, b: &F) -> F {
        *a - b
    }

    fn mul(&mut self, a: &F, b: &F) -> F {
        *a * b
    }

    fn div(&mut self, a: &F, b: &F) -> Option<F> {
        b.inverse().map(|inv| *a * inv)
    }

    fn assert_equal(&mut self, a: &F, b: &F) -> bool {
        a == b
    }

    fn pow(&mut self, a: &F, exp: u64) -> F {
        a.pow([exp])
    }
}
