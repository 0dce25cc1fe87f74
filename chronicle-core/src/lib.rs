//! Chronicle Core - shared primitives for the Chronicle append-only log.
//!
//! This crate provides the pieces the two log structures are built from:
//!
//! - [`crypto`] - the [`Hash`] digest type, the injectable [`HashFn`]
//!   primitive (default SHA-256), and RFC 6962 domain-separated leaf/node
//!   digests
//! - [`arith`] - the bitwise split rule shared by both structures
//! - [`proof`] - the sibling/position vocabulary proofs are made of
//! - [`error`] - typed failures
//!
//! # Example
//!
//! ```rust
//! use chronicle_core::{leaf_digest, node_digest, sha256};
//!
//! let left = leaf_digest(b"first entry", sha256);
//! let right = leaf_digest(b"second entry", sha256);
//! let parent = node_digest(&left, &right, sha256);
//!
//! assert_ne!(parent, left);
//! assert_ne!(parent, right);
//! ```

pub mod arith;
pub mod crypto;
pub mod error;
pub mod proof;

// Re-exports for convenience
pub use arith::largest_power_of_two_less_than;
pub use crypto::{leaf_digest, node_digest, sha256, Hash, HashFn};
pub use error::{Error, Result};
pub use proof::{Position, ProofNode};
