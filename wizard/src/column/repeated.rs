use crate::{
    column::{Column, ColumnId},
    error::ColumnError,
    runtime::Runtime,
};

/// The values of `parent` tiled `count` times. `count` is a power of two
/// greater than one, and `parent` is never itself a `Repeated`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Repeated {
    pub(super) parent: Box<Column>,
    pub(super) count: usize,
}

impl Repeated {
    pub fn parent(&self) -> &Column {
        &self.parent
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn size(&self) -> usize {
        self.parent.size() * self.count
    }

    pub fn id(&self) -> ColumnId {
        ColumnId::from(format!("REPEAT_{}_{}", self.count, self.parent.id()))
    }

    pub fn assignment<F: Clone, R: Runtime<F>>(&self, run: &R) -> Result<Vec<F>, ColumnError> {
        assert!(
            self.count.is_power_of_two(),
            "repeat count {} is not a power of two",
            self.count
        );
        let size = self.size();
        let mut values = Vec::with_capacity(size);
        values.extend(self.parent.assignment(run)?);
        while values.len() < size {
            values.extend_from_within(..);
        }
        Ok(values)
    }

    pub fn assignment_at<F: Clone, R: Runtime<F>>(
        &self,
        run: &R,
        position: usize,
    ) -> Result<F, ColumnError> {
        self.parent.assignment_at(run, position % self.parent.size())
    }
}

/// Tile `parent` `count` times. Panics if `count` is not a power of two.
///
/// `repeat(c, 1)` is `c`, and repeating a repeated column multiplies the
/// counts.
pub fn repeat(parent: &Column, count: usize) -> Column {
    assert!(
        count.is_power_of_two(),
        "cannot repeat {} {count} times: the count must be a power of two",
        parent.id()
    );
    if count == 1 {
        return parent.clone();
    }
    assert!(
        parent.size().checked_mul(count).is_some(),
        "repeating {} {count} times overflows the column size",
        parent.id()
    );
    match parent {
        Column::Repeated(inner) => repeat(&inner.parent, inner.count * count),
        Column::Leaf(_) | Column::Shifted(_) | Column::Interleaved(_) => {
            Column::Repeated(Repeated {
                parent: Box::new(parent.clone()),
                count,
            })
        }
    }
}
