use crate::{
    column::{Column, ColumnId},
    error::ColumnError,
    runtime::Runtime,
};
use itertools::Itertools;

/// Round-robin interleaving of columns of equal size:
/// `interleaved[i * k + j] = parents[j][i]` where `k = parents.len()`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interleaved {
    pub(super) parents: Vec<Column>,
}

impl Interleaved {
    pub fn parents(&self) -> &[Column] {
        &self.parents
    }

    /// Number of interleaved columns
    pub fn arity(&self) -> usize {
        self.parents.len()
    }

    /// Size of each of the interleaved columns
    pub fn parent_size(&self) -> usize {
        self.parents[0].size()
    }

    pub fn size(&self) -> usize {
        self.parent_size() * self.arity()
    }

    /// The latest round among the parents.
    pub fn round(&self) -> usize {
        self.parents.iter().map(Column::round).max().unwrap_or(0)
    }

    pub fn id(&self) -> ColumnId {
        ColumnId::from(format!(
            "INTERLEAVED_{}_{}",
            self.arity(),
            self.parents.iter().map(Column::id).join("_")
        ))
    }

    pub fn assignment<F: Clone, R: Runtime<F>>(&self, run: &R) -> Result<Vec<F>, ColumnError> {
        let parents = self
            .parents
            .iter()
            .map(|p| p.assignment(run))
            .collect::<Result<Vec<_>, _>>()?;
        let mut values = Vec::with_capacity(self.size());
        for i in 0..self.parent_size() {
            values.extend(parents.iter().map(|p| p[i].clone()));
        }
        Ok(values)
    }

    pub fn assignment_at<F: Clone, R: Runtime<F>>(
        &self,
        run: &R,
        position: usize,
    ) -> Result<F, ColumnError> {
        let position = position % self.size();
        let k = self.arity();
        self.parents[position % k].assignment_at(run, position / k)
    }
}

/// Interleave `parents`. Panics unless there is a power-of-two number of
/// parents, all of the same size. A single parent is returned as is.
pub fn interleave(parents: &[Column]) -> Column {
    assert!(
        parents.len().is_power_of_two(),
        "cannot interleave {} columns: the number of columns must be a power of two",
        parents.len()
    );
    let size = parents[0].size();
    for p in parents {
        assert_eq!(
            p.size(),
            size,
            "cannot interleave {} (size {}) with {} (size {size})",
            p.id(),
            p.size(),
            parents[0].id()
        );
    }
    assert!(
        size.checked_mul(parents.len()).is_some(),
        "interleaving {} columns of size {size} overflows the column size",
        parents.len()
    );
    if parents.len() == 1 {
        return parents[0].clone();
    }
    Column::Interleaved(Interleaved {
        parents: parents.to_vec(),
    })
}
