//! Access to the values (the witness) of the leaf columns.

use crate::{
    column::{ColumnId, Leaf},
    error::ColumnError,
};
use std::collections::HashMap;

/// Provides the assignment of the leaf columns. Implemented by the prover
/// and verifier runtimes.
pub trait Runtime<F> {
    fn column_assignment(&self, id: &ColumnId) -> Result<Vec<F>, ColumnError>;

    fn column_assignment_at(&self, id: &ColumnId, position: usize) -> Result<F, ColumnError>;
}

/// A runtime keeping every assignment in memory.
#[derive(Clone, Debug)]
pub struct MemoryRuntime<F> {
    assignments: HashMap<ColumnId, Vec<F>>,
}

impl<F> Default for MemoryRuntime<F> {
    fn default() -> Self {
        MemoryRuntime {
            assignments: HashMap::new(),
        }
    }
}

impl<F: Clone> MemoryRuntime<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `values` to `leaf`, replacing any previous assignment.
    pub fn assign(&mut self, leaf: &Leaf, values: Vec<F>) -> Result<(), ColumnError> {
        if values.len() != leaf.size() {
            return Err(ColumnError::AssignmentSize {
                column: leaf.id().clone(),
                expected: leaf.size(),
                got: values.len(),
            });
        }
        self.assignments.insert(leaf.id().clone(), values);
        Ok(())
    }

    pub fn is_assigned(&self, id: &ColumnId) -> bool {
        self.assignments.contains_key(id)
    }
}

impl<F: Clone> Runtime<F> for MemoryRuntime<F> {
    fn column_assignment(&self, id: &ColumnId) -> Result<Vec<F>, ColumnError> {
        self.assignments
            .get(id)
            .cloned()
            .ok_or_else(|| ColumnError::MissingAssignment(id.clone()))
    }

    fn column_assignment_at(&self, id: &ColumnId, position: usize) -> Result<F, ColumnError> {
        let values = self
            .assignments
            .get(id)
            .ok_or_else(|| ColumnError::MissingAssignment(id.clone()))?;
        values
            .get(position)
            .cloned()
            .ok_or_else(|| ColumnError::OutOfBounds {
                column: id.clone(),
                position,
                size: values.len(),
            })
    }
}
