use crate::{
    column::{store::Store, ColumnId},
    error::ColumnError,
    runtime::Runtime,
};
use serde::{Deserialize, Serialize};

/// Where a leaf column was declared: the round of the protocol and its rank
/// among the columns of that round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnPosition {
    pub round: usize,
    pub index: usize,
}

/// A column registered in a [`Store`]. This is the only kind of column that
/// has a commitment (or a value known by the verifier) of its own.
///
/// A `Leaf` is a lightweight handle: it caches its metadata but holds no
/// reference to the store. It can only be obtained from
/// [`Store::add_to_round`] or [`Store::get_handle`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Leaf {
    pub(super) id: ColumnId,
    pub(super) position: ColumnPosition,
    pub(super) size: usize,
}

impl Leaf {
    pub(super) fn new(id: ColumnId, position: ColumnPosition, size: usize) -> Self {
        Leaf { id, position, size }
    }

    pub fn id(&self) -> &ColumnId {
        &self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn round(&self) -> usize {
        self.position.round
    }

    pub fn position(&self) -> ColumnPosition {
        self.position
    }

    /// Panics if the store does not hold this column at the position cached
    /// in the handle.
    pub fn must_exist(&self, store: &Store) {
        let stored = store.position_of(self.id.as_str());
        assert_eq!(
            stored, self.position,
            "the handle of {} is stale: it points to {:?} but the store has {:?}",
            self.id, self.position, stored
        );
        let size = store.size_of(self.id.as_str());
        assert_eq!(
            size, self.size,
            "the handle of {} has size {} but the store has {}",
            self.id, self.size, size
        );
    }

    pub fn assignment<F: Clone, R: Runtime<F>>(&self, run: &R) -> Result<Vec<F>, ColumnError> {
        let values = run.column_assignment(&self.id)?;
        if values.len() != self.size {
            return Err(ColumnError::AssignmentSize {
                column: self.id.clone(),
                expected: self.size,
                got: values.len(),
            });
        }
        Ok(values)
    }

    pub fn assignment_at<F: Clone, R: Runtime<F>>(
        &self,
        run: &R,
        position: usize,
    ) -> Result<F, ColumnError> {
        if position >= self.size {
            return Err(ColumnError::OutOfBounds {
                column: self.id.clone(),
                position,
                size: self.size,
            });
        }
        run.column_assignment_at(&self.id, position)
    }
}
