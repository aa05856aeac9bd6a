use proptest::prelude::*;
use wizard::column::{ColumnId, ColumnPosition, Status, Store};

fn ids(names: &[&str]) -> Vec<ColumnId> {
    names.iter().map(|n| ColumnId::from(*n)).collect()
}

fn populated() -> Store {
    let mut store = Store::new();
    store.add_to_round(0, "PRECOMP", 4, Status::Precomputed);
    store.add_to_round(0, "VK", 4, Status::VerifyingKey);
    store.add_to_round(0, "A", 4, Status::Committed);
    store.add_to_round(1, "PI", 8, Status::PublicInput);
    store.add_to_round(1, "B", 8, Status::Committed);
    store.add_to_round(1, "P", 2, Status::Proof);
    store.add_to_round(2, "C", 16, Status::Committed);
    store
}

#[test]
fn test_enumerations() {
    let store = populated();
    assert_eq!(store.num_rounds(), 3);
    assert_eq!(
        store.all_keys(),
        ids(&["PRECOMP", "VK", "A", "PI", "B", "P", "C"])
    );
    assert_eq!(store.all_keys_at(1), ids(&["PI", "B", "P"]));
    assert_eq!(store.all_keys_committed(), ids(&["A", "B", "C"]));
    assert_eq!(store.all_keys_committed_at(1), ids(&["B"]));
    assert_eq!(store.all_keys_proof(), ids(&["P"]));
    assert_eq!(store.all_keys_proof_at(0), ids(&[]));
    assert_eq!(store.all_keys_public_input(), ids(&["PI"]));
    assert_eq!(store.all_keys_public_input_at(1), ids(&["PI"]));
    assert_eq!(store.all_precomputed(), ids(&["PRECOMP"]));
    assert_eq!(store.all_verifying_key(), ids(&["VK"]));
    assert!(store.all_keys_ignored().is_empty());
    assert!(store.all_keys_at(7).is_empty());
}

#[test]
fn test_handles() {
    let store = populated();
    let b = store.get_handle("B");
    assert_eq!(b.position(), ColumnPosition { round: 1, index: 1 });
    assert_eq!(b.size(), 8);
    assert_eq!(store.size_of("C"), 16);
    assert_eq!(store.round_of("C"), 2);
    assert!(store.try_get_handle("Z").is_none());
    assert!(store.exists("PI"));
    assert_eq!(store.all_handles_at(1)[1], b);
    b.must_exist(&store);
}

#[test]
fn test_ignoring_sticky_columns_is_allowed() {
    let mut store = populated();
    store.mark_as_ignored("VK");
    store.mark_as_ignored("PI");
    assert_eq!(store.status("VK"), Status::Ignored);
    assert_eq!(store.all_keys_ignored(), ids(&["VK", "PI"]));
    assert_eq!(store.all_keys_ignored_at(0), ids(&["VK"]));
    // The status can be promoted again once ignored
    store.set_status("VK", Status::Committed);
}

#[test]
fn test_allowed_transitions() {
    let mut store = populated();
    store.set_status("A", Status::Proof);
    store.set_status("A", Status::VerifyingKey);
    store.set_status("A", Status::VerifyingKey);
    store.set_status("PRECOMP", Status::VerifyingKey);
    assert_eq!(store.all_verifying_key(), ids(&["PRECOMP", "VK", "A"]));
}

#[test]
#[should_panic(expected = "illegal status transition from VERIFYING_KEY to COMMITTED")]
fn test_verifying_key_is_sticky() {
    let mut store = populated();
    store.set_status("VK", Status::Committed);
}

#[test]
#[should_panic(expected = "illegal status transition from PUBLIC_INPUT to PROOF")]
fn test_public_input_is_sticky() {
    let mut store = populated();
    store.set_status("PI", Status::Proof);
}

#[test]
#[should_panic(expected = "illegal status transition from VERIFIER_DEFINED to PRECOMPUTED")]
fn test_verifier_defined_is_sticky() {
    let mut store = populated();
    store.add_to_round(3, "VD", 4, Status::VerifierDefined);
    store.set_status("VD", Status::Precomputed);
}

#[test]
#[should_panic(expected = "not registered")]
fn test_status_of_unknown_column() {
    populated().status("Z");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_duplicate_names_are_rejected(first in 0usize..4, second in 0usize..4) {
        let result = std::panic::catch_unwind(|| {
            let mut store = Store::new();
            store.add_to_round(first, "A", 4, Status::Committed);
            store.add_to_round(second, "A", 4, Status::Committed);
        });
        prop_assert!(result.is_err());
    }

    #[test]
    fn test_sticky_statuses(
        sticky in prop::sample::select(vec![
            Status::VerifyingKey,
            Status::PublicInput,
            Status::VerifierDefined,
        ]),
        new in prop::sample::select(Status::ALL.to_vec())
    ) {
        let result = std::panic::catch_unwind(|| {
            let mut store = Store::new();
            store.add_to_round(0, "A", 4, sticky);
            store.set_status("A", new);
        });
        prop_assert_eq!(result.is_ok(), new == Status::Ignored || new == sticky);
    }
}
