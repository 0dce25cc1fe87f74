//! Consistency proofs: a smaller committed log is a prefix of a larger one.
//!
//! The proof is a bare sequence of subtree digests; its interpretation is
//! positional. Generation and verification walk the same recursion over the
//! RFC 6962 split points, so the verifier consumes hashes in exactly the
//! order the prover emitted them.

use serde::{Deserialize, Serialize};

use chronicle_core::{node_digest, sha256, Error, Hash, HashFn, Result};
use chronicle_core::largest_power_of_two_less_than as split;

use crate::tree::{Tree, TreeInner};

/// Proof that the first `m` leaves of a tree of size `n` form the tree that
/// committed to an earlier root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyProof {
    /// Subtree digests in the order the recursive construction emits them.
    pub hashes: Vec<Hash>,
}

impl Tree {
    /// Generate a consistency proof for the first `m` leaves.
    ///
    /// `m` must satisfy `1 <= m <= leaf_count`. `m == leaf_count` yields an
    /// empty proof (the trees are identical).
    pub fn consistency_proof(&self, m: usize) -> Result<ConsistencyProof> {
        let inner = self.inner.read();
        let n = inner.leaf_count;
        if m == 0 || m > n {
            return Err(Error::InvalidConsistencyRange);
        }

        let mut hashes = Vec::new();
        inner.sub_proof(m, 0, n, true, &mut hashes);
        Ok(ConsistencyProof { hashes })
    }
}

impl TreeInner {
    /// Emit the digests proving that the first `m` of the `sz` leaves at
    /// `start` reconstruct the old root.
    ///
    /// `complete` is true while the recursion is still on the spine that
    /// formed the old root itself; that subtree needs no digest because the
    /// verifier already holds the old root.
    fn sub_proof(&self, m: usize, start: usize, sz: usize, complete: bool, out: &mut Vec<Hash>) {
        if m == sz {
            if !complete {
                out.push(self.subtree_digest(start, sz));
            }
            return;
        }

        let k = split(sz);
        if m <= k {
            // The old tree sits entirely in the left half; the whole right
            // half is new.
            self.sub_proof(m, start, k, complete, out);
            out.push(self.subtree_digest(start + k, sz - k));
        } else {
            // The old tree filled the left half and spills into the right.
            self.sub_proof(m - k, start + k, sz - k, false, out);
            out.push(self.subtree_digest(start, k));
        }
    }

    /// Digest of the node covering leaves `[start, start + sz)`.
    ///
    /// Every range the consistency recursion asks for corresponds to an
    /// actual node of the tree, found by descending from the root along the
    /// split points.
    fn subtree_digest(&self, start: usize, sz: usize) -> Hash {
        if sz == 1 {
            return self.nodes[start].digest;
        }

        let mut id = self.root;
        let mut node_start = 0;
        let mut node_len = self.leaf_count;

        while node_start != start || node_len != sz {
            let k = split(node_len);
            let node = &self.nodes[id];
            if start < node_start + k {
                id = node.left.expect("node spanning multiple leaves has children");
                node_len = k;
            } else {
                id = node.right.expect("node spanning multiple leaves has children");
                node_start += k;
                node_len -= k;
            }
        }

        self.nodes[id].digest
    }
}

/// Verify that the log of size `m` with root `old_root` is a prefix of the
/// log of size `n` with root `new_root`.
///
/// Pure: takes no lock, touches no tree. A `None` hash function selects
/// SHA-256. Truncated, bloated, and bit-tampered proofs all fail, as do
/// out-of-range sizes.
pub fn verify_consistency_proof(
    m: usize,
    n: usize,
    old_root: &Hash,
    new_root: &Hash,
    proof: &ConsistencyProof,
    hash_fn: Option<HashFn>,
) -> bool {
    let hash_fn = hash_fn.unwrap_or(sha256);

    if m == n {
        return old_root == new_root && proof.hashes.is_empty();
    }
    if m == 0 || m > n {
        return false;
    }

    let Some((computed_old, computed_new, remaining)) =
        rebuild_roots(m, n, true, &proof.hashes, old_root, hash_fn)
    else {
        return false;
    };

    // Every hash must be consumed: leftovers mean a bloated proof.
    remaining.is_empty() && computed_old == *old_root && computed_new == *new_root
}

/// Reconstruct the old and new roots of the subtree of size `sz` whose first
/// `m` leaves belonged to the old tree, consuming digests from `hashes`.
///
/// Returns the pair of reconstructed roots plus the unconsumed tail, or
/// `None` when the proof runs short.
fn rebuild_roots<'a>(
    m: usize,
    sz: usize,
    complete: bool,
    hashes: &'a [Hash],
    old_root: &Hash,
    hash_fn: HashFn,
) -> Option<(Hash, Hash, &'a [Hash])> {
    if m == sz {
        if complete {
            // This subtree is the old root itself; the verifier supplies it.
            return Some((*old_root, *old_root, hashes));
        }
        let (h, rest) = hashes.split_first()?;
        return Some((*h, *h, rest));
    }

    let k = split(sz);
    if m <= k {
        let (old, new_left, rest) = rebuild_roots(m, k, complete, hashes, old_root, hash_fn)?;
        let (new_right, rest) = rest.split_first()?;
        let combined = node_digest(&new_left, new_right, hash_fn);
        Some((old, combined, rest))
    } else {
        let (old_right, new_right, rest) =
            rebuild_roots(m - k, sz - k, false, hashes, old_root, hash_fn)?;
        let (left, rest) = rest.split_first()?;
        let combined_old = node_digest(left, &old_right, hash_fn);
        let combined_new = node_digest(left, &new_right, hash_fn);
        Some((combined_old, combined_new, rest))
    }
}
