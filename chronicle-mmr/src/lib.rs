//! Merkle Mountain Range (MMR) for the Chronicle append-only log.
//!
//! An MMR is a forest of perfect binary Merkle trees ("peaks") of strictly
//! decreasing height, providing:
//! - O(log n) amortised streaming append
//! - a deterministic bagged root (peaks folded right-to-left)
//!
//! The structure is exported for visualisation and future extension; it
//! carries no proof machinery of its own.
//!
//! # Example
//!
//! ```rust
//! use chronicle_mmr::Mmr;
//!
//! let mmr = Mmr::new();
//!
//! mmr.append(b"event-1").unwrap();
//! mmr.append(b"event-2").unwrap();
//! mmr.append(b"event-3").unwrap();
//!
//! // 3 = 0b11: a two-leaf mountain plus a lone leaf.
//! assert_eq!(mmr.leaf_count(), 3);
//! assert_eq!(mmr.peak_count(), 2);
//! assert!(mmr.root_hash().is_some());
//! ```

mod mmr;

#[cfg(test)]
mod proptest;

pub use mmr::{Mmr, PeakInfo};
