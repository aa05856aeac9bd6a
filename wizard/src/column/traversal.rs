//! Structural queries on a column tree, used by the expression layer to
//! relate a derived column to the leaves it reads from.

use crate::column::{Column, Leaf};

/// The distinct leaves a column is built from, in order of first
/// appearance.
pub fn root_parents(column: &Column) -> Vec<Leaf> {
    fn collect(column: &Column, acc: &mut Vec<Leaf>) {
        match column {
            Column::Leaf(leaf) => {
                if !acc.contains(leaf) {
                    acc.push(leaf.clone())
                }
            }
            Column::Shifted(c) => collect(c.parent(), acc),
            Column::Repeated(c) => collect(c.parent(), acc),
            Column::Interleaved(c) => c.parents().iter().for_each(|p| collect(p, acc)),
        }
    }
    let mut acc = vec![];
    collect(column, &mut acc);
    acc
}

/// The sum of the offsets of the shifts between `column` and its leaf.
///
/// Shifting an interleaved column is supported, but interleaving shifted
/// columns is not: panics if a branch of an [`Column::Interleaved`] carries
/// a non-zero offset.
pub fn stack_offsets(column: &Column) -> i64 {
    match column {
        Column::Leaf(_) => 0,
        Column::Shifted(c) => c.offset() + stack_offsets(c.parent()),
        Column::Repeated(c) => stack_offsets(c.parent()),
        Column::Interleaved(c) => {
            for p in c.parents() {
                let offset = stack_offsets(p);
                assert_eq!(
                    offset,
                    0,
                    "{} interleaves {} which is shifted by {offset}",
                    c.id(),
                    p.id()
                );
            }
            0
        }
    }
}

/// Number of leaves of the column tree, counted with multiplicity.
pub fn nb_leaves(column: &Column) -> usize {
    match column {
        Column::Leaf(_) => 1,
        Column::Shifted(c) => nb_leaves(c.parent()),
        Column::Repeated(c) => nb_leaves(c.parent()),
        Column::Interleaved(c) => c.parents().iter().map(nb_leaves).sum(),
    }
}
