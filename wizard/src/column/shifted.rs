use crate::{
    column::{repeated::repeat, Column, ColumnId},
    error::ColumnError,
    runtime::Runtime,
    utils::{canonical_offset, reduce_offset},
};
use log::warn;
use std::hash::{Hash, Hasher};

/// The values of `parent` rotated to the left by `offset` rows:
/// `shifted[i] = parent[(i + offset) mod size]`.
///
/// The parent of a `Shifted` is never a `Shifted` (offsets are summed) nor a
/// `Repeated` (the shift is pushed below the repetition). See [`shift`].
#[derive(Clone, Debug)]
pub struct Shifted {
    pub(super) parent: Box<Column>,
    pub(super) offset: i64,
}

impl Shifted {
    pub fn parent(&self) -> &Column {
        &self.parent
    }

    /// The offset as requested by the protocol, in `(-size, size)`.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// The offset reduced into `[0, size)`.
    pub fn canonical_offset(&self) -> u64 {
        canonical_offset(self.offset, self.size())
    }

    pub fn size(&self) -> usize {
        self.parent.size()
    }

    pub fn id(&self) -> ColumnId {
        ColumnId::from(format!(
            "SHIFT_{}_{}_{}",
            self.canonical_offset(),
            self.size(),
            self.parent.id()
        ))
    }

    pub fn assignment<F: Clone, R: Runtime<F>>(&self, run: &R) -> Result<Vec<F>, ColumnError> {
        let mut values = self.parent.assignment(run)?;
        values.rotate_left(self.canonical_offset() as usize);
        Ok(values)
    }

    pub fn assignment_at<F: Clone, R: Runtime<F>>(
        &self,
        run: &R,
        position: usize,
    ) -> Result<F, ColumnError> {
        let size = self.size();
        let position = (position % size + self.canonical_offset() as usize) % size;
        self.parent.assignment_at(run, position)
    }
}

// Offsets `o` and `o - size` describe the same column.
impl PartialEq for Shifted {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent && self.canonical_offset() == other.canonical_offset()
    }
}

impl Eq for Shifted {}

impl Hash for Shifted {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parent.hash(state);
        self.canonical_offset().hash(state);
    }
}

/// Shift `parent` by `offset` rows.
///
/// - a zero offset (modulo the size) returns `parent` itself;
/// - offsets outside `(-size, size)` are wrapped, with a warning;
/// - shifting a shifted column sums the two offsets;
/// - shifting a repeated column shifts the repeated column instead:
///   `shift(repeat(c, n), o) == repeat(shift(c, o), n)`.
pub fn shift(parent: &Column, offset: i64) -> Column {
    let size = parent.size();
    if offset.unsigned_abs() >= size as u64 {
        warn!(
            "shift offset {offset} is out of range for {} (size {size}), wrapping it",
            parent.id()
        );
    }
    shift_reduced(parent, offset)
}

fn shift_reduced(parent: &Column, offset: i64) -> Column {
    let offset = reduce_offset(offset, parent.size());
    if offset == 0 {
        return parent.clone();
    }
    match parent {
        Column::Shifted(inner) => shift_reduced(&inner.parent, inner.offset + offset),
        Column::Repeated(inner) => repeat(&shift_reduced(&inner.parent, offset), inner.count),
        Column::Leaf(_) | Column::Interleaved(_) => Column::Shifted(Shifted {
            parent: Box::new(parent.clone()),
            offset,
        }),
    }
}
