//! The registry of the leaf columns of a protocol.
//!
//! The store is filled while the protocol is being described: every call to
//! [`Store::add_to_round`] and every status change must happen before the
//! first round of a proof starts. From then on the store is only read, and
//! can be shared between threads (for instance behind an `Arc`).

use crate::{
    column::{status::Status, ColumnId, ColumnPosition, Leaf},
    utils::log2_exact,
};
use log::{debug, warn};
use std::collections::HashMap;

/// The metadata the store keeps for every leaf column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub id: ColumnId,
    pub size: usize,
    pub status: Status,
    /// Whether an ignored column should still be absorbed in the transcript
    /// of the prover. Only meaningful when `status` is [`Status::Ignored`].
    pub include_in_prover_transcript: bool,
}

impl ColumnInfo {
    pub fn log2_size(&self) -> u32 {
        log2_exact(self.size)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Store {
    /// Position of every column, by name
    by_name: HashMap<ColumnId, ColumnPosition>,
    /// Columns of each round, in insertion order
    by_rounds: Vec<Vec<ColumnInfo>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rounds that have been reserved so far.
    pub fn num_rounds(&self) -> usize {
        self.by_rounds.len()
    }

    /// Make sure that rounds `0..=round` exist.
    pub fn reserve_for_round(&mut self, round: usize) {
        if self.by_rounds.len() <= round {
            self.by_rounds.resize_with(round + 1, Vec::new);
        }
    }

    /// Register a new leaf column and return its handle.
    ///
    /// Panics if the name is empty or already taken, or if `size` is not a
    /// power of two.
    pub fn add_to_round(
        &mut self,
        round: usize,
        name: impl Into<ColumnId>,
        size: usize,
        status: Status,
    ) -> Leaf {
        let id = name.into();
        assert!(!id.is_empty(), "a column name cannot be empty");
        assert!(
            size.is_power_of_two(),
            "the size of {id} must be a power of two, got {size}"
        );
        if let Some(existing) = self.by_name.get(&id) {
            panic!("column {id} is already registered at {existing:?}");
        }

        self.reserve_for_round(round);
        let position = ColumnPosition {
            round,
            index: self.by_rounds[round].len(),
        };
        debug!(
            "Registering column {id} at round {round}, position {}, size {size}, status {status}",
            position.index
        );
        self.by_rounds[round].push(ColumnInfo {
            id: id.clone(),
            size,
            status,
            include_in_prover_transcript: false,
        });
        self.by_name.insert(id.clone(), position);
        Leaf::new(id, position, size)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Panics if `name` is not registered.
    pub fn get_handle(&self, name: &str) -> Leaf {
        self.try_get_handle(name)
            .unwrap_or_else(|| panic!("column {name} is not registered in the store"))
    }

    pub fn try_get_handle(&self, name: &str) -> Option<Leaf> {
        let position = *self.by_name.get(name)?;
        let info = &self.by_rounds[position.round][position.index];
        Some(Leaf::new(info.id.clone(), position, info.size))
    }

    /// Panics if `name` is not registered.
    pub fn position_of(&self, name: &str) -> ColumnPosition {
        *self
            .by_name
            .get(name)
            .unwrap_or_else(|| panic!("column {name} is not registered in the store"))
    }

    /// Panics if `name` is not registered.
    pub fn info(&self, name: &str) -> &ColumnInfo {
        let position = self.position_of(name);
        &self.by_rounds[position.round][position.index]
    }

    fn info_mut(&mut self, name: &str) -> &mut ColumnInfo {
        let position = self.position_of(name);
        &mut self.by_rounds[position.round][position.index]
    }

    pub fn size_of(&self, name: &str) -> usize {
        self.info(name).size
    }

    pub fn round_of(&self, name: &str) -> usize {
        self.position_of(name).round
    }

    pub fn status(&self, name: &str) -> Status {
        self.info(name).status
    }

    /// Change the status of a column. Panics if the transition is not
    /// allowed, see [`Status::check_transition`].
    ///
    /// Leaving [`Status::Ignored`] drops the request to keep the column in
    /// the prover transcript.
    pub fn set_status(&mut self, name: &str, new: Status) {
        let info = self.info_mut(name);
        let old = info.status;
        if let Err(e) = old.check_transition(new) {
            panic!("cannot change the status of {name}: {e}");
        }
        if old.is_sticky() && new == Status::Ignored {
            warn!("column {name} is ignored while having the status {old}");
        }
        debug!("Status of column {name}: {old} -> {new}");
        info.status = new;
        if new != Status::Ignored {
            info.include_in_prover_transcript = false;
        }
    }

    pub fn mark_as_ignored(&mut self, name: &str) {
        self.set_status(name, Status::Ignored);
    }

    /// Ignore the column in the commitment set while still absorbing it in
    /// the transcript of the prover.
    pub fn ignore_but_keep_in_prover_transcript(&mut self, name: &str) {
        self.set_status(name, Status::Ignored);
        self.info_mut(name).include_in_prover_transcript = true;
    }

    pub fn is_ignored_and_not_kept_in_transcript(&self, name: &str) -> bool {
        let info = self.info(name);
        info.status == Status::Ignored && !info.include_in_prover_transcript
    }

    /// Columns of `round`, in insertion order. Empty if the round does not
    /// exist.
    pub fn infos_at(&self, round: usize) -> &[ColumnInfo] {
        self.by_rounds.get(round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All the columns, ordered by round then by insertion order.
    pub fn infos(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.by_rounds.iter().flatten()
    }

    pub fn all_handles_at(&self, round: usize) -> Vec<Leaf> {
        self.infos_at(round)
            .iter()
            .enumerate()
            .map(|(index, info)| {
                Leaf::new(info.id.clone(), ColumnPosition { round, index }, info.size)
            })
            .collect()
    }

    fn keys_where(&self, pred: impl Fn(&ColumnInfo) -> bool) -> Vec<ColumnId> {
        self.infos()
            .filter(|info| pred(info))
            .map(|info| info.id.clone())
            .collect()
    }

    fn keys_at_where(&self, round: usize, pred: impl Fn(&ColumnInfo) -> bool) -> Vec<ColumnId> {
        self.infos_at(round)
            .iter()
            .filter(|info| pred(info))
            .map(|info| info.id.clone())
            .collect()
    }

    pub fn all_keys(&self) -> Vec<ColumnId> {
        self.keys_where(|_| true)
    }

    pub fn all_keys_at(&self, round: usize) -> Vec<ColumnId> {
        self.keys_at_where(round, |_| true)
    }

    pub fn all_keys_committed(&self) -> Vec<ColumnId> {
        self.keys_where(|info| info.status == Status::Committed)
    }

    pub fn all_keys_committed_at(&self, round: usize) -> Vec<ColumnId> {
        self.keys_at_where(round, |info| info.status == Status::Committed)
    }

    pub fn all_keys_ignored(&self) -> Vec<ColumnId> {
        self.keys_where(|info| info.status == Status::Ignored)
    }

    pub fn all_keys_ignored_at(&self, round: usize) -> Vec<ColumnId> {
        self.keys_at_where(round, |info| info.status == Status::Ignored)
    }

    pub fn all_keys_proof(&self) -> Vec<ColumnId> {
        self.keys_where(|info| info.status == Status::Proof)
    }

    pub fn all_keys_proof_at(&self, round: usize) -> Vec<ColumnId> {
        self.keys_at_where(round, |info| info.status == Status::Proof)
    }

    pub fn all_keys_public_input(&self) -> Vec<ColumnId> {
        self.keys_where(|info| info.status == Status::PublicInput)
    }

    pub fn all_keys_public_input_at(&self, round: usize) -> Vec<ColumnId> {
        self.keys_at_where(round, |info| info.status == Status::PublicInput)
    }

    pub fn all_precomputed(&self) -> Vec<ColumnId> {
        self.keys_where(|info| info.status == Status::Precomputed)
    }

    pub fn all_verifying_key(&self) -> Vec<ColumnId> {
        self.keys_where(|info| info.status == Status::VerifyingKey)
    }

    /// Columns of `round` that the prover absorbs in its transcript: every
    /// column that is not ignored, plus the ignored ones explicitly kept.
    pub fn all_keys_in_prover_transcript_at(&self, round: usize) -> Vec<ColumnId> {
        self.keys_at_where(round, |info| {
            info.status != Status::Ignored || info.include_in_prover_transcript
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_insertion_order() {
        let mut store = Store::new();
        let a = store.add_to_round(0, "A", 4, Status::Committed);
        let b = store.add_to_round(0, "B", 8, Status::Committed);
        let c = store.add_to_round(2, "C", 4, Status::Proof);
        assert_eq!(a.position(), ColumnPosition { round: 0, index: 0 });
        assert_eq!(b.position(), ColumnPosition { round: 0, index: 1 });
        assert_eq!(c.position(), ColumnPosition { round: 2, index: 0 });
        assert_eq!(store.num_rounds(), 3);
        assert!(store.all_keys_at(1).is_empty());
        assert_eq!(store.get_handle("B"), b);
    }

    #[test]
    #[should_panic(expected = "cannot be empty")]
    fn test_empty_name() {
        Store::new().add_to_round(0, "", 4, Status::Committed);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_size_not_power_of_two() {
        Store::new().add_to_round(0, "A", 6, Status::Committed);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_name_in_another_round() {
        let mut store = Store::new();
        store.add_to_round(0, "A", 4, Status::Committed);
        store.add_to_round(1, "A", 4, Status::Committed);
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_unknown_handle() {
        Store::new().get_handle("A");
    }

    #[test]
    fn test_transcript_axis() {
        let mut store = Store::new();
        store.add_to_round(0, "A", 4, Status::Committed);
        store.add_to_round(0, "B", 4, Status::Committed);
        store.add_to_round(0, "C", 4, Status::Committed);
        store.mark_as_ignored("A");
        store.ignore_but_keep_in_prover_transcript("B");
        assert!(store.is_ignored_and_not_kept_in_transcript("A"));
        assert!(!store.is_ignored_and_not_kept_in_transcript("B"));
        assert!(!store.is_ignored_and_not_kept_in_transcript("C"));
        assert_eq!(
            store.all_keys_in_prover_transcript_at(0),
            vec![ColumnId::from("B"), ColumnId::from("C")]
        );
        assert_eq!(
            store.all_keys_ignored(),
            vec![ColumnId::from("A"), ColumnId::from("B")]
        );
    }

    #[test]
    fn test_transcript_flag_is_reset_when_unignored() {
        let mut store = Store::new();
        store.add_to_round(0, "A", 4, Status::Committed);
        store.ignore_but_keep_in_prover_transcript("A");
        store.set_status("A", Status::Committed);
        store.mark_as_ignored("A");
        assert!(store.is_ignored_and_not_kept_in_transcript("A"));
        assert!(store.all_keys_in_prover_transcript_at(0).is_empty());
        assert!(store.pack().kept_in_transcript.is_empty());
    }
}
