//! A circuit-variable backend for the evaluation protocol.
//!
//! Running [`crate::eval::derive_evaluation_point_with`] and
//! [`crate::eval::verify_y_consistency_with`] over a [`CircuitBuilder`]
//! produces the constraints a recursive verifier has to enforce, together
//! with a satisfying witness. Constants are folded, so that operations on
//! known values (roots of unity, inverses of the arity) do not produce
//! constraints.

use crate::{error::EvaluationError, eval::arithmetic::FieldOps};
use ark_ff::FftField;

/// A circuit variable represents a field element in the circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CVar<F> {
    Constant(F),
    /// Index of a witness cell
    Var(usize),
}

/// A constraint between circuit variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint<F> {
    /// `left + right = output`
    Add {
        left: CVar<F>,
        right: CVar<F>,
        output: CVar<F>,
    },
    /// `left * right = output`
    Mul {
        left: CVar<F>,
        right: CVar<F>,
        output: CVar<F>,
    },
    /// `left = right`
    Equal(CVar<F>, CVar<F>),
}

#[derive(Clone, Debug, Default)]
pub struct CircuitBuilder<F> {
    witness: Vec<F>,
    constraints: Vec<Constraint<F>>,
}

impl<F: FftField> CircuitBuilder<F> {
    pub fn new() -> Self {
        CircuitBuilder {
            witness: vec![],
            constraints: vec![],
        }
    }

    /// Allocate a new witness cell holding `value`.
    pub fn alloc(&mut self, value: F) -> CVar<F> {
        self.witness.push(value);
        CVar::Var(self.witness.len() - 1)
    }

    /// The value of a variable in the current witness, or `None` if the
    /// variable was allocated by another builder.
    pub fn value(&self, var: &CVar<F>) -> Option<F> {
        match var {
            CVar::Constant(c) => Some(*c),
            CVar::Var(i) => self.witness.get(*i).copied(),
        }
    }

    // Foreign variables evaluate to zero while building. `check` reports
    // them.
    fn witness_value(&self, var: &CVar<F>) -> F {
        self.value(var).unwrap_or_else(F::zero)
    }

    fn checked_value(&self, constraint: usize, var: &CVar<F>) -> Result<F, EvaluationError> {
        match var {
            CVar::Constant(c) => Ok(*c),
            CVar::Var(index) => self.witness.get(*index).copied().ok_or(
                EvaluationError::UnknownVariable {
                    constraint,
                    index: *index,
                },
            ),
        }
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    pub fn witness_mut(&mut self) -> &mut [F] {
        &mut self.witness
    }

    /// Check every constraint against the witness.
    pub fn check(&self) -> Result<(), EvaluationError> {
        for (i, constraint) in self.constraints.iter().enumerate() {
            let value = |var: &CVar<F>| self.checked_value(i, var);
            let satisfied = match constraint {
                Constraint::Add {
                    left,
                    right,
                    output,
                } => value(left)? + value(right)? == value(output)?,
                Constraint::Mul {
                    left,
                    right,
                    output,
                } => value(left)? * value(right)? == value(output)?,
                Constraint::Equal(left, right) => value(left)? == value(right)?,
            };
            if !satisfied {
                return Err(EvaluationError::UnsatisfiedConstraint(i));
            }
        }
        Ok(())
    }
}

impl<F: FftField> FieldOps<F> for CircuitBuilder<F> {
    type Var = CVar<F>;

    fn constant(&mut self, c: F) -> CVar<F> {
        CVar::Constant(c)
    }

    fn add(&mut self, a: &CVar<F>, b: &CVar<F>) -> CVar<F> {
        match (a, b) {
            (CVar::Constant(x), CVar::Constant(y)) => CVar::Constant(*x + y),
            (CVar::Constant(zero), other) | (other, CVar::Constant(zero)) if zero.is_zero() => {
                *other
            }
            _ => {
                let output = self.alloc(self.witness_value(a) + self.witness_value(b));
                self.constraints.push(Constraint::Add {
                    left: *a,
                    right: *b,
                    output,
                });
                output
            }
        }
    }

    fn sub(&mut self, a: &CVar<F>, b: &CVar<F>) -> CVar<F> {
        match (a, b) {
            (CVar::Constant(x), CVar::Constant(y)) => CVar::Constant(*x - y),
            _ => {
                // output + b = a
                let output = self.alloc(self.witness_value(a) - self.witness_value(b));
                self.constraints.push(Constraint::Add {
                    left: output,
                    right: *b,
                    output: *a,
                });
                output
            }
        }
    }

    fn mul(&mut self, a: &CVar<F>, b: &CVar<F>) -> CVar<F> {
        match (a, b) {
            (CVar::Constant(x), CVar::Constant(y)) => CVar::Constant(*x * y),
            (CVar::Constant(one), other) | (other, CVar::Constant(one)) if one.is_one() => *other,
            _ => {
                let output = self.alloc(self.witness_value(a) * self.witness_value(b));
                self.constraints.push(Constraint::Mul {
                    left: *a,
                    right: *b,
                    output,
                });
                output
            }
        }
    }

    fn div(&mut self, a: &CVar<F>, b: &CVar<F>) -> Option<CVar<F>> {
        let inv = self.witness_value(b).inverse()?;
        if let (CVar::Constant(x), CVar::Constant(_)) = (a, b) {
            return Some(CVar::Constant(*x * inv));
        }
        // b * b^{-1} = 1 makes the division fail on a zero divisor
        let inv_var = self.alloc(inv);
        self.constraints.push(Constraint::Mul {
            left: *b,
            right: inv_var,
            output: CVar::Constant(F::one()),
        });
        Some(self.mul(a, &inv_var))
    }

    fn assert_equal(&mut self, a: &CVar<F>, b: &CVar<F>) -> bool {
        if let (CVar::Constant(x), CVar::Constant(y)) = (a, b) {
            return x == y;
        }
        self.constraints.push(Constraint::Equal(*a, *b));
        self.witness_value(a) == self.witness_value(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{Field, UniformRand};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_constants_are_folded() {
        let mut cs = CircuitBuilder::<Fr>::new();
        let a = cs.constant(Fr::from(3u64));
        let b = cs.constant(Fr::from(4u64));
        let c = cs.mul(&a, &b);
        let d = cs.pow(&c, 3);
        assert_eq!(d, CVar::Constant(Fr::from(1728u64)));
        assert!(cs.constraints().is_empty());
    }

    #[test]
    fn test_operations_are_constrained() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cs = CircuitBuilder::<Fr>::new();
        let (x, y) = (Fr::rand(&mut rng), Fr::rand(&mut rng));
        let a = cs.alloc(x);
        let b = cs.alloc(y);
        let sum = cs.add(&a, &b);
        let diff = cs.sub(&a, &b);
        let prod = cs.mul(&sum, &diff);
        let quot = cs.div(&prod, &b).unwrap();
        let cube = cs.pow(&a, 3);

        assert_eq!(cs.value(&quot), Some((x + y) * (x - y) / y));
        assert_eq!(cs.value(&cube), Some(x.pow([3u64])));
        assert!(cs.check().is_ok());

        // Tampering with any intermediate cell breaks a constraint
        let i = match prod {
            CVar::Var(i) => i,
            CVar::Constant(_) => panic!("the product should be a variable"),
        };
        cs.witness_mut()[i] += Fr::from(1u64);
        assert!(cs.check().is_err());
    }

    #[test]
    fn test_division_by_zero() {
        let mut cs = CircuitBuilder::<Fr>::new();
        let a = cs.alloc(Fr::from(5u64));
        let zero = cs.alloc(Fr::from(0u64));
        assert_eq!(cs.div(&a, &zero), None);
    }

    #[test]
    fn test_failed_equality_is_recorded() {
        let mut cs = CircuitBuilder::<Fr>::new();
        let a = cs.alloc(Fr::from(5u64));
        let b = cs.alloc(Fr::from(6u64));
        assert!(!cs.assert_equal(&a, &b));
        assert_eq!(cs.check(), Err(EvaluationError::UnsatisfiedConstraint(0)));
    }

    #[test]
    fn test_variable_from_another_builder() {
        let mut other = CircuitBuilder::<Fr>::new();
        for i in 0..4 {
            other.alloc(Fr::from(i as u64));
        }
        let foreign = other.alloc(Fr::from(9u64));

        let mut cs = CircuitBuilder::<Fr>::new();
        let a = cs.alloc(Fr::from(2u64));
        assert_eq!(cs.value(&foreign), None);
        cs.mul(&a, &foreign);
        assert_eq!(
            cs.check(),
            Err(EvaluationError::UnknownVariable {
                constraint: 0,
                index: 4
            })
        );
    }
}
