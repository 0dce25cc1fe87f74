//! History tree for the Chronicle append-only log.
//!
//! An RFC 6962 (Certificate Transparency) Merkle tree over an ordered
//! sequence of leaves, providing:
//!
//! - a deterministic root digest over the committed log
//! - **inclusion proofs**: a leaf is the i-th entry of the log
//! - **consistency proofs**: a smaller committed log is a prefix of a
//!   larger one
//!
//! Proof verification is pure and lock-free; both verify functions reject
//! truncated, bloated, and bit-tampered proofs.
//!
//! # Example
//!
//! ```rust
//! use chronicle_tree::{verify_consistency_proof, verify_inclusion_proof, Tree};
//!
//! let tree = Tree::new(&[b"tx1".as_slice(), b"tx2", b"tx3"]).unwrap();
//! let old_root = tree.root_hash();
//!
//! // Prove tx2 is the second entry.
//! let proof = tree.inclusion_proof(1).unwrap();
//! assert!(verify_inclusion_proof(b"tx2", &proof, &old_root, None));
//!
//! // Grow the log and prove the 3-leaf tree is a prefix of the 4-leaf tree.
//! tree.append(b"tx4").unwrap();
//! let consistency = tree.consistency_proof(3).unwrap();
//! assert!(verify_consistency_proof(
//!     3,
//!     4,
//!     &old_root,
//!     &tree.root_hash(),
//!     &consistency,
//!     None,
//! ));
//! ```

mod consistency;
mod inclusion;
mod tree;

#[cfg(test)]
mod proptest;

pub use consistency::{verify_consistency_proof, ConsistencyProof};
pub use inclusion::{verify_inclusion_proof, InclusionProof};
pub use tree::Tree;
