//! Property-based tests for history tree operations.
//!
//! Tests the tree's invariants under arbitrary leaf data: determinism,
//! provability of every leaf, append/rebuild equivalence, and rejection of
//! tampered proofs.

use proptest::prelude::*;

use chronicle_core::{leaf_digest, node_digest, sha256, Hash};

use crate::{verify_consistency_proof, verify_inclusion_proof, ConsistencyProof, Tree};

// ============================================================================
// Arbitrary Implementations
// ============================================================================

/// Generate one arbitrary leaf (possibly empty).
fn arb_leaf() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
}

/// Generate a non-empty list of arbitrary leaves.
fn arb_leaves(max_count: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(arb_leaf(), 1..max_count)
}

/// Generate arbitrary 32-byte digests.
fn arb_hash() -> impl Strategy<Value = Hash> {
    prop::array::uniform32(any::<u8>()).prop_map(Hash::from_bytes)
}

// ============================================================================
// Property Tests: Roots
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The root depends only on the leaf sequence.
    #[test]
    fn prop_root_deterministic(leaves in arb_leaves(50)) {
        let t1 = Tree::new(&leaves).expect("non-empty build");
        let t2 = Tree::new(&leaves).expect("non-empty build");
        prop_assert_eq!(t1.root_hash(), t2.root_hash());
    }

    /// Appending leaf-by-leaf reaches the same root as bulk construction.
    #[test]
    fn prop_append_matches_bulk_build(leaves in arb_leaves(40)) {
        let bulk = Tree::new(&leaves).expect("non-empty build");

        let incremental = Tree::new(&leaves[..1]).expect("non-empty build");
        for leaf in &leaves[1..] {
            incremental.append(leaf).expect("append never fails");
        }

        prop_assert_eq!(bulk.root_hash(), incremental.root_hash());
        prop_assert_eq!(bulk.leaf_count(), incremental.leaf_count());
    }

    /// Swapping two distinct leaves changes the root.
    #[test]
    fn prop_leaf_order_matters(leaves in arb_leaves(20), i in 0usize..20, j in 0usize..20) {
        let i = i % leaves.len();
        let j = j % leaves.len();
        prop_assume!(leaves[i] != leaves[j]);

        let mut swapped = leaves.clone();
        swapped.swap(i, j);

        let t1 = Tree::new(&leaves).expect("non-empty build");
        let t2 = Tree::new(&swapped).expect("non-empty build");
        prop_assert_ne!(t1.root_hash(), t2.root_hash());
    }

    /// Leaf and internal digests never coincide over the same bytes.
    #[test]
    fn prop_domain_separation(h in arb_hash()) {
        prop_assert_ne!(
            leaf_digest(h.as_bytes(), sha256),
            node_digest(&h, &h, sha256)
        );
    }
}

// ============================================================================
// Property Tests: Inclusion Proofs
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Every leaf has a valid inclusion proof against the current root.
    #[test]
    fn prop_all_leaves_provable(leaves in arb_leaves(40)) {
        let tree = Tree::new(&leaves).expect("non-empty build");
        let root = tree.root_hash();

        for (index, leaf) in leaves.iter().enumerate() {
            let proof = tree.inclusion_proof(index).expect("index in range");
            prop_assert!(verify_inclusion_proof(leaf, &proof, &root, None));
        }
    }

    /// Proof length is bounded by the tree depth.
    #[test]
    fn prop_proof_length_logarithmic(n in 1usize..300) {
        let leaves: Vec<Vec<u8>> = (0..n).map(|i| format!("leaf-{i}").into_bytes()).collect();
        let tree = Tree::new(&leaves).expect("non-empty build");

        let depth = (n as f64).log2().ceil() as usize;
        for index in [0, n / 2, n - 1] {
            let proof = tree.inclusion_proof(index).expect("index in range");
            prop_assert!(proof.len() <= depth);
        }
    }

    /// Flipping any sibling byte invalidates the proof.
    #[test]
    fn prop_tampered_sibling_fails(leaves in arb_leaves(30), which in any::<prop::sample::Index>()) {
        prop_assume!(leaves.len() >= 2);

        let tree = Tree::new(&leaves).expect("non-empty build");
        let root = tree.root_hash();

        let mut proof = tree.inclusion_proof(0).expect("index in range");
        prop_assume!(!proof.is_empty());

        let i = which.index(proof.path.len());
        let mut bytes = *proof.path[i].hash.as_bytes();
        bytes[0] ^= 0x01;
        proof.path[i].hash = Hash::from_bytes(bytes);

        prop_assert!(!verify_inclusion_proof(&leaves[0], &proof, &root, None));
    }

    /// Flipping any direction flag invalidates the proof.
    #[test]
    fn prop_flipped_position_fails(leaves in arb_leaves(30), which in any::<prop::sample::Index>()) {
        prop_assume!(leaves.len() >= 2);

        let tree = Tree::new(&leaves).expect("non-empty build");
        let root = tree.root_hash();

        let mut proof = tree.inclusion_proof(leaves.len() - 1).expect("index in range");
        prop_assume!(!proof.is_empty());

        let i = which.index(proof.path.len());
        proof.path[i].position = proof.path[i].position.opposite();

        prop_assert!(!verify_inclusion_proof(&leaves[leaves.len() - 1], &proof, &root, None));
    }
}

// ============================================================================
// Property Tests: Consistency Proofs
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Every prefix of a log is consistent with the full log.
    #[test]
    fn prop_all_prefixes_consistent(leaves in arb_leaves(30), m in any::<prop::sample::Index>()) {
        let n = leaves.len();
        let m = m.index(n) + 1;

        let old = Tree::new(&leaves[..m]).expect("non-empty build");
        let new = Tree::new(&leaves).expect("non-empty build");
        let proof = new.consistency_proof(m).expect("m in range");

        prop_assert!(verify_consistency_proof(
            m, n, &old.root_hash(), &new.root_hash(), &proof, None
        ));
    }

    /// Truncating a valid consistency proof invalidates it.
    #[test]
    fn prop_truncated_consistency_fails(leaves in arb_leaves(30), m in any::<prop::sample::Index>()) {
        let n = leaves.len();
        let m = m.index(n) + 1;
        prop_assume!(m < n);

        let old = Tree::new(&leaves[..m]).expect("non-empty build");
        let new = Tree::new(&leaves).expect("non-empty build");
        let mut proof = new.consistency_proof(m).expect("m in range");
        prop_assume!(!proof.hashes.is_empty());

        proof.hashes.pop();

        prop_assert!(!verify_consistency_proof(
            m, n, &old.root_hash(), &new.root_hash(), &proof, None
        ));
    }

    /// Extending a valid consistency proof invalidates it.
    #[test]
    fn prop_bloated_consistency_fails(
        leaves in arb_leaves(30),
        m in any::<prop::sample::Index>(),
        extra in arb_hash()
    ) {
        let n = leaves.len();
        let m = m.index(n) + 1;

        let old = Tree::new(&leaves[..m]).expect("non-empty build");
        let new = Tree::new(&leaves).expect("non-empty build");
        let mut proof = new.consistency_proof(m).expect("m in range");

        proof.hashes.push(extra);

        prop_assert!(!verify_consistency_proof(
            m, n, &old.root_hash(), &new.root_hash(), &proof, None
        ));
    }

    /// A consistency proof never verifies against an unrelated old root.
    #[test]
    fn prop_unrelated_old_root_fails(leaves in arb_leaves(30), bogus in arb_hash()) {
        let n = leaves.len();
        prop_assume!(n >= 2);
        let m = n / 2 + 1;

        let old = Tree::new(&leaves[..m]).expect("non-empty build");
        prop_assume!(old.root_hash() != bogus);

        let new = Tree::new(&leaves).expect("non-empty build");
        let proof = new.consistency_proof(m).expect("m in range");

        prop_assert!(!verify_consistency_proof(
            m, n, &bogus, &new.root_hash(), &proof, None
        ));
    }

    /// An empty proof only ever verifies for m == n with equal roots.
    #[test]
    fn prop_empty_proof_only_for_equal_sizes(leaves in arb_leaves(20)) {
        let n = leaves.len();
        prop_assume!(n >= 2);

        let old = Tree::new(&leaves[..1]).expect("non-empty build");
        let new = Tree::new(&leaves).expect("non-empty build");
        let empty = ConsistencyProof { hashes: vec![] };

        prop_assert!(!verify_consistency_proof(
            1, n, &old.root_hash(), &new.root_hash(), &empty, None
        ));
    }
}
