//! Property-based tests for MMR operations.
//!
//! Tests invariants of the Merkle Mountain Range under arbitrary appends.

use proptest::prelude::*;

use crate::Mmr;

// ============================================================================
// Arbitrary Implementations
// ============================================================================

/// Generate one arbitrary non-empty leaf.
fn arb_leaf() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..32)
}

/// Generate a vector of arbitrary non-empty leaves.
fn arb_leaves(max_count: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(arb_leaf(), 0..max_count)
}

// ============================================================================
// Property Tests: Structure Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Appending n leaves yields leaf_count n.
    #[test]
    fn prop_leaf_count(leaves in arb_leaves(100)) {
        let mmr = Mmr::new();
        for leaf in &leaves {
            mmr.append(leaf).expect("append should succeed");
        }
        prop_assert_eq!(mmr.leaf_count(), leaves.len() as u64);
    }

    /// Peak heights strictly decrease left to right and never repeat.
    #[test]
    fn prop_peak_heights_strictly_decrease(leaves in arb_leaves(100)) {
        let mmr = Mmr::new();
        for leaf in &leaves {
            mmr.append(leaf).expect("append should succeed");
        }

        let peaks = mmr.peaks();
        for pair in peaks.windows(2) {
            prop_assert!(pair[0].height > pair[1].height);
        }
    }

    /// The peaks cover exactly the appended leaves: sum of 2^height equals
    /// the leaf count.
    #[test]
    fn prop_peaks_cover_leaf_count(leaves in arb_leaves(100)) {
        let mmr = Mmr::new();
        for leaf in &leaves {
            mmr.append(leaf).expect("append should succeed");
        }

        let covered: u64 = mmr.peaks().iter().map(|p| 1u64 << p.height).sum();
        prop_assert_eq!(covered, mmr.leaf_count());
    }

    /// The peak count mirrors the binary representation of the leaf count.
    #[test]
    fn prop_peak_count_is_popcount(n in 0u64..300) {
        let mmr = Mmr::new();
        for i in 0..n {
            mmr.append(format!("leaf-{i}").as_bytes()).expect("append should succeed");
        }
        prop_assert_eq!(mmr.peak_count(), n.count_ones() as usize);
    }
}

// ============================================================================
// Property Tests: Roots
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Root is deterministic for the same sequence of appends.
    #[test]
    fn prop_root_deterministic(leaves in arb_leaves(50)) {
        let mmr1 = Mmr::new();
        let mmr2 = Mmr::new();

        for leaf in &leaves {
            mmr1.append(leaf).expect("append should succeed");
            mmr2.append(leaf).expect("append should succeed");
        }

        prop_assert_eq!(mmr1.root_hash(), mmr2.root_hash());
    }

    /// Appending in reverse order produces a different root.
    #[test]
    fn prop_order_matters(leaves in arb_leaves(20)) {
        prop_assume!(leaves.len() >= 2);
        prop_assume!(leaves.first() != leaves.last());

        let forward = Mmr::new();
        let backward = Mmr::new();

        for leaf in &leaves {
            forward.append(leaf).expect("append should succeed");
        }
        for leaf in leaves.iter().rev() {
            backward.append(leaf).expect("append should succeed");
        }

        prop_assert_ne!(forward.root_hash(), backward.root_hash());
    }

    /// The root moves after every append.
    #[test]
    fn prop_root_changes(leaves in arb_leaves(30)) {
        let mmr = Mmr::new();
        let mut prev_root = mmr.root_hash();

        for leaf in &leaves {
            mmr.append(leaf).expect("append should succeed");
            let root = mmr.root_hash();
            prop_assert_ne!(&prev_root, &root);
            prev_root = root;
        }
    }
}

// ============================================================================
// Property Tests: Error Cases
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// An empty leaf is rejected and leaves the structure untouched.
    #[test]
    fn prop_empty_leaf_rejected(leaves in arb_leaves(20)) {
        let mmr = Mmr::new();
        for leaf in &leaves {
            mmr.append(leaf).expect("append should succeed");
        }

        let root_before = mmr.root_hash();
        let count_before = mmr.leaf_count();

        prop_assert!(mmr.append(b"").is_err());
        prop_assert_eq!(mmr.root_hash(), root_before);
        prop_assert_eq!(mmr.leaf_count(), count_before);
    }
}
