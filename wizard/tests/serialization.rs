use ark_bn254::Fr;
use ark_std::UniformRand;
use rand::{rngs::StdRng, SeedableRng};
use wizard::{
    column::{ColumnId, Status, Store},
    eval::PathNode,
    evaluate_derived, interleave, repeat,
    serialization::{BackReference, ColumnDefinitions, ObjectKind, PackedLeaf, PackedStore},
    shift, Column, EvalPath, MemoryRuntime, PackError,
};

fn store() -> Store {
    let mut store = Store::new();
    store.add_to_round(0, "A", 8, Status::Committed);
    store.add_to_round(0, "VK", 4, Status::VerifyingKey);
    store.add_to_round(1, "B", 8, Status::Proof);
    store.add_to_round(1, "K", 8, Status::Committed);
    store.add_to_round(2, "PI", 2, Status::PublicInput);
    store.ignore_but_keep_in_prover_transcript("K");
    store
}

/// The composite built by the protocol description on top of its leaves
fn describe(store: &Store) -> Column {
    let a = Column::from(store.get_handle("A"));
    let b = Column::from(store.get_handle("B"));
    let vk = Column::from(store.get_handle("VK"));
    interleave(&[shift(&a, -2), b, repeat(&shift(&vk, 1), 2), a])
}

fn assert_same_store(left: &Store, right: &Store) {
    assert_eq!(left.num_rounds(), right.num_rounds());
    assert_eq!(left.all_keys(), right.all_keys());
    for id in left.all_keys() {
        let name = id.as_str();
        assert_eq!(left.get_handle(name), right.get_handle(name));
        assert_eq!(left.status(name), right.status(name));
        assert_eq!(
            left.is_ignored_and_not_kept_in_transcript(name),
            right.is_ignored_and_not_kept_in_transcript(name)
        );
    }
}

#[test]
fn test_packed_layout() {
    let packed = store().pack();
    assert_eq!(
        packed.columns,
        vec![
            PackedLeaf("A".into(), 0, Status::Committed, 3),
            PackedLeaf("VK".into(), 0, Status::VerifyingKey, 2),
            PackedLeaf("B".into(), 1, Status::Proof, 3),
            PackedLeaf("K".into(), 1, Status::Ignored, 3),
            PackedLeaf("PI".into(), 2, Status::PublicInput, 1),
        ]
    );
    assert_eq!(packed.kept_in_transcript, vec![ColumnId::from("K")]);
}

#[test]
fn test_store_through_msgpack() {
    let store = store();
    let bytes = rmp_serde::to_vec(&store.pack()).unwrap();
    let packed: PackedStore = rmp_serde::from_slice(&bytes).unwrap();
    let unpacked = packed.unpack().unwrap();
    assert_same_store(&store, &unpacked);
    assert!(!unpacked.is_ignored_and_not_kept_in_transcript("K"));
    assert_eq!(describe(&store), describe(&unpacked));
    assert_eq!(describe(&store).id(), describe(&unpacked).id());
}

#[test]
fn test_store_through_json() {
    let store = store();
    let json = serde_json::to_string(&store.pack()).unwrap();
    let packed: PackedStore = serde_json::from_str(&json).unwrap();
    assert_same_store(&store, &packed.unpack().unwrap());
}

#[test]
fn test_rebuilt_composite_evaluates_the_same() {
    let mut rng = StdRng::seed_from_u64(0);
    let store = store();
    let mut run = MemoryRuntime::new();
    for name in ["A", "B", "VK"] {
        let leaf = store.get_handle(name);
        let values = (0..leaf.size()).map(|_| Fr::rand(&mut rng)).collect();
        run.assign(&leaf, values).unwrap();
    }
    let bytes = rmp_serde::to_vec(&store.pack()).unwrap();
    let unpacked = rmp_serde::from_slice::<PackedStore>(&bytes)
        .unwrap()
        .unpack()
        .unwrap();
    let x = Fr::rand(&mut rng);
    assert_eq!(
        evaluate_derived(&describe(&store), &run, x).unwrap(),
        evaluate_derived(&describe(&unpacked), &run, x).unwrap()
    );
}

#[test]
fn test_column_definitions_round_trip() {
    let store = store();
    let mut defs = ColumnDefinitions::new();
    let refs: Vec<BackReference> = ["A", "B", "A", "VK", "B"]
        .iter()
        .map(|name| defs.reference(&store, &store.get_handle(name)))
        .collect();
    assert_eq!(defs.len(), 3);
    assert_eq!(refs[0], refs[2]);
    assert_eq!(refs[1], BackReference(ObjectKind::Column, 1));

    let bytes = rmp_serde::to_vec(&(&defs, &refs)).unwrap();
    let (decoded, decoded_refs): (ColumnDefinitions, Vec<BackReference>) =
        rmp_serde::from_slice(&bytes).unwrap();
    assert_eq!(decoded, defs);
    for (name, reference) in ["A", "B", "A", "VK", "B"].iter().zip(decoded_refs) {
        assert_eq!(decoded.resolve(&store, reference), Ok(store.get_handle(name)));
    }
}

#[test]
fn test_resolve_against_a_different_store() {
    let store = store();
    let mut defs = ColumnDefinitions::new();
    let ra = defs.reference(&store, &store.get_handle("A"));
    let rb = defs.reference(&store, &store.get_handle("B"));

    let mut other = Store::new();
    other.add_to_round(0, "A", 16, Status::Committed);
    assert_eq!(
        defs.resolve(&other, ra),
        Err(PackError::DefinitionMismatch("A".into()))
    );
    assert_eq!(
        defs.resolve(&other, rb),
        Err(PackError::UnknownColumn("B".into()))
    );
}

#[test]
fn test_unpack_errors() {
    let empty = PackedStore {
        columns: vec![PackedLeaf("".into(), 0, Status::Committed, 2)],
        kept_in_transcript: vec![],
        empty_rounds: vec![],
    };
    assert_eq!(empty.unpack().err(), Some(PackError::EmptyName));

    let unknown = PackedStore {
        columns: vec![PackedLeaf("A".into(), 0, Status::Ignored, 2)],
        kept_in_transcript: vec!["Z".into()],
        empty_rounds: vec![],
    };
    assert_eq!(
        unknown.unpack().err(),
        Some(PackError::UnknownColumn("Z".into()))
    );

    let overflow = PackedStore {
        columns: vec![PackedLeaf("A".into(), 0, Status::Committed, 200)],
        kept_in_transcript: vec![],
        empty_rounds: vec![],
    };
    assert_eq!(overflow.unpack().err(), Some(PackError::SizeOverflow(200)));
}

#[test]
fn test_eval_path_serde() {
    let path = EvalPath::root()
        .child(PathNode::Interleaved {
            column: "INTERLEAVED_2_A_B".into(),
            branch: 1,
        })
        .child(PathNode::Shifted("SHIFT_1_8_B".into()))
        .child(PathNode::Leaf {
            column: "B".into(),
            size: 8,
        });
    assert_eq!(path.to_string(), "/INTERLEAVED_2_A_B[1]/SHIFT_1_8_B/B");
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(serde_json::from_str::<EvalPath>(&json).unwrap(), path);
    let bytes = rmp_serde::to_vec(&path).unwrap();
    assert_eq!(rmp_serde::from_slice::<EvalPath>(&bytes).unwrap(), path);
}
