//! Packing of the column metadata.
//!
//! Only leaves are ever serialized, as the 4-tuple `(name, round, status,
//! log2(size))`. Composite columns are rebuilt by the code describing the
//! protocol, by applying [`crate::column::shift`], [`crate::column::repeat`]
//! and [`crate::column::interleave`] to the deserialized leaves.

use crate::{
    column::{ColumnId, Leaf, Status, Store},
    error::PackError,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// `(name, round, status, log2(size))`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedLeaf(pub ColumnId, pub usize, pub Status, pub u32);

impl PackedLeaf {
    /// Panics if `leaf` is not registered in `store`.
    pub fn new(store: &Store, leaf: &Leaf) -> Self {
        leaf.must_exist(store);
        let info = store.info(leaf.id().as_str());
        PackedLeaf(info.id.clone(), leaf.round(), info.status, info.log2_size())
    }

    pub fn name(&self) -> &ColumnId {
        &self.0
    }

    pub fn round(&self) -> usize {
        self.1
    }

    pub fn status(&self) -> Status {
        self.2
    }

    pub fn log2_size(&self) -> u32 {
        self.3
    }

    pub fn size(&self) -> Result<usize, PackError> {
        1usize
            .checked_shl(self.3)
            .ok_or(PackError::SizeOverflow(self.3))
    }
}

/// The content of a [`Store`], in round then insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedStore {
    pub columns: Vec<PackedLeaf>,
    /// Ignored columns that are still absorbed in the prover transcript
    pub kept_in_transcript: Vec<ColumnId>,
    /// Rounds without any column, in increasing order
    #[serde(default)]
    pub empty_rounds: Vec<usize>,
}

impl Store {
    pub fn pack(&self) -> PackedStore {
        let mut packed = PackedStore::default();
        for round in 0..self.num_rounds() {
            if self.infos_at(round).is_empty() {
                packed.empty_rounds.push(round);
            }
            for info in self.infos_at(round) {
                packed.columns.push(PackedLeaf(
                    info.id.clone(),
                    round,
                    info.status,
                    info.log2_size(),
                ));
                if info.status == Status::Ignored && info.include_in_prover_transcript {
                    packed.kept_in_transcript.push(info.id.clone());
                }
            }
        }
        packed
    }
}

impl PackedStore {
    /// Rebuild the store by registering the columns again, in order.
    ///
    /// A column may only open the round right after the last one known,
    /// counting the empty rounds, so that the size of the store is bounded
    /// by the size of the packed data.
    pub fn unpack(&self) -> Result<Store, PackError> {
        let empty_rounds: HashSet<usize> = self.empty_rounds.iter().copied().collect();
        let reserve_empty_rounds = |store: &mut Store| {
            while empty_rounds.contains(&store.num_rounds()) {
                store.reserve_for_round(store.num_rounds());
            }
        };

        let mut store = Store::new();
        for packed in &self.columns {
            reserve_empty_rounds(&mut store);
            if packed.round() > store.num_rounds() {
                return Err(PackError::RoundOutOfRange {
                    round: packed.round(),
                    num_rounds: store.num_rounds(),
                });
            }
            let name = packed.name();
            if name.is_empty() {
                return Err(PackError::EmptyName);
            }
            if store.exists(name.as_str()) {
                return Err(PackError::DuplicateColumn(name.clone()));
            }
            store.add_to_round(packed.round(), name.clone(), packed.size()?, packed.status());
        }
        reserve_empty_rounds(&mut store);
        if let Some(round) = self.empty_rounds.iter().find(|r| **r >= store.num_rounds()) {
            return Err(PackError::RoundOutOfRange {
                round: *round,
                num_rounds: store.num_rounds(),
            });
        }
        for name in &self.kept_in_transcript {
            if !store.exists(name.as_str()) {
                return Err(PackError::UnknownColumn(name.clone()));
            }
            if store.status(name.as_str()) != Status::Ignored {
                return Err(PackError::DefinitionMismatch(name.clone()));
            }
            store.ignore_but_keep_in_prover_transcript(name.as_str());
        }
        Ok(store)
    }
}

/// The kind of object a [`BackReference`] points to. Other kinds of
/// objects (queries, coins, ...) share the tag space with the callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Column,
}

/// A reference to an object already written in a definitions list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackReference(pub ObjectKind, pub usize);

/// A list of leaf definitions, in which every leaf appears once however
/// many times it is referenced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PackedLeaf>", into = "Vec<PackedLeaf>")]
pub struct ColumnDefinitions {
    leaves: Vec<PackedLeaf>,
    by_name: HashMap<ColumnId, usize>,
}

impl ColumnDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn definitions(&self) -> &[PackedLeaf] {
        &self.leaves
    }

    /// Reference `leaf`, defining it first if needed.
    pub fn reference(&mut self, store: &Store, leaf: &Leaf) -> BackReference {
        if let Some(index) = self.by_name.get(leaf.id()) {
            return BackReference(ObjectKind::Column, *index);
        }
        let index = self.leaves.len();
        self.leaves.push(PackedLeaf::new(store, leaf));
        self.by_name.insert(leaf.id().clone(), index);
        BackReference(ObjectKind::Column, index)
    }

    /// Get the handle of a referenced leaf from `store`, checking that the
    /// store agrees with the definition.
    pub fn resolve(&self, store: &Store, reference: BackReference) -> Result<Leaf, PackError> {
        let BackReference(ObjectKind::Column, index) = reference;
        let packed = self
            .leaves
            .get(index)
            .ok_or(PackError::DanglingReference {
                index,
                len: self.leaves.len(),
            })?;
        let name = packed.name();
        let leaf = store
            .try_get_handle(name.as_str())
            .ok_or_else(|| PackError::UnknownColumn(name.clone()))?;
        let matches = leaf.round() == packed.round()
            && Some(leaf.size()) == packed.size().ok()
            && store.status(name.as_str()) == packed.status();
        if !matches {
            return Err(PackError::DefinitionMismatch(name.clone()));
        }
        Ok(leaf)
    }
}

impl From<Vec<PackedLeaf>> for ColumnDefinitions {
    fn from(leaves: Vec<PackedLeaf>) -> Self {
        let by_name = leaves
            .iter()
            .enumerate()
            .map(|(i, packed)| (packed.name().clone(), i))
            .collect();
        ColumnDefinitions { leaves, by_name }
    }
}

impl From<ColumnDefinitions> for Vec<PackedLeaf> {
    fn from(defs: ColumnDefinitions) -> Self {
        defs.leaves
    }
}
