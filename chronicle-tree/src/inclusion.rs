//! Inclusion proofs: a leaf occupies a specific position in a committed log.

use serde::{Deserialize, Serialize};

use chronicle_core::{leaf_digest, node_digest, sha256, Error, Hash, HashFn, Position, ProofNode, Result};

use crate::tree::{Tree, TreeInner};

/// Proof that a leaf is part of the tree behind a given root digest.
///
/// `path[0]` is the digest of the leaf's own sibling; each later entry is the
/// sibling one level closer to the root. A single-leaf tree proves itself
/// with an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Sibling digests from the leaf level up to (excluding) the root.
    pub path: Vec<ProofNode>,
}

impl InclusionProof {
    /// Number of levels in the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path is empty (single-leaf tree).
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

impl Tree {
    /// Generate an inclusion proof for the leaf at `index`.
    pub fn inclusion_proof(&self, index: usize) -> Result<InclusionProof> {
        let inner = self.inner.read();
        if index >= inner.leaf_count {
            return Err(Error::InvalidIndex);
        }
        Ok(inner.inclusion_path(index))
    }

    /// Generate an inclusion proof for the earliest leaf equal to `data`.
    pub fn inclusion_proof_for(&self, data: &[u8]) -> Result<InclusionProof> {
        let inner = self.inner.read();
        let digest = leaf_digest(data, self.hash_fn);
        let index = inner
            .index
            .get(&digest)
            .and_then(|positions| positions.first().copied())
            .ok_or(Error::LeafNotFound)?;
        Ok(inner.inclusion_path(index))
    }
}

impl TreeInner {
    /// Walk from leaf `index` to the root, recording the opposite child at
    /// each step. Callers have validated the index.
    fn inclusion_path(&self, index: usize) -> InclusionProof {
        let mut path = Vec::new();
        let mut current = index;

        while let Some(parent) = self.nodes[current].parent {
            let node = &self.nodes[parent];
            if node.left == Some(current) {
                let sibling = node.right.expect("internal node has both children");
                path.push(ProofNode {
                    hash: self.nodes[sibling].digest,
                    position: Position::Right,
                });
            } else {
                let sibling = node.left.expect("internal node has both children");
                path.push(ProofNode {
                    hash: self.nodes[sibling].digest,
                    position: Position::Left,
                });
            }
            current = parent;
        }

        InclusionProof { path }
    }
}

/// Verify that `leaf_data` sits behind `root` via `proof`.
///
/// Pure: takes no lock, touches no tree. A `None` hash function selects
/// SHA-256. Any mismatch along the recomputed path yields `false`.
pub fn verify_inclusion_proof(
    leaf_data: &[u8],
    proof: &InclusionProof,
    root: &Hash,
    hash_fn: Option<HashFn>,
) -> bool {
    let hash_fn = hash_fn.unwrap_or(sha256);

    let mut acc = leaf_digest(leaf_data, hash_fn);
    for node in &proof.path {
        acc = match node.position {
            Position::Left => node_digest(&node.hash, &acc, hash_fn),
            Position::Right => node_digest(&acc, &node.hash, hash_fn),
        };
    }

    acc == *root
}
