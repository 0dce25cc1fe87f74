//! Core MMR implementation.
//!
//! A Merkle Mountain Range is a forest of perfect binary trees ("peaks") of
//! strictly decreasing height. Appending a leaf pushes a height-0 peak and
//! then merges equal-height neighbours, so the forest always mirrors the
//! binary representation of the leaf count:
//!
//! ```text
//! 5 leaves = 0b101:
//!
//! Height 2:      p0
//!               /  \
//! Height 1:    .    .
//!             / \  / \
//! Height 0:  A  B C   D    E = p1
//! ```
//!
//! The bagged root folds the peak digests right-to-left under the internal
//! node rule. Unlike the history tree, MMR leaves are hashed **without** the
//! 0x00 prefix; the two structures are self-consistent but not
//! interoperable, and both rules are load-bearing for reproducibility.

use std::fmt::Write as _;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use chronicle_core::{node_digest, sha256, Error, Hash, HashFn, Result};

/// A node of the peak forest.
///
/// Children are both present (merged peak) or both absent (leaf); the
/// height counts merges, so a peak of height `h` covers `2^h` leaves.
#[derive(Debug, Clone)]
struct PeakNode {
    digest: Hash,
    height: u32,
    left: Option<Box<PeakNode>>,
    right: Option<Box<PeakNode>>,
}

/// Snapshot of one peak, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakInfo {
    /// Height of the peak (0 for a bare leaf).
    pub height: u32,
    /// Digest of the peak.
    pub digest: Hash,
}

struct MmrInner {
    /// Peaks with strictly decreasing height, left to right.
    peaks: Vec<PeakNode>,
    /// Number of leaves appended so far.
    leaf_count: u64,
}

/// An append-only Merkle Mountain Range.
///
/// Like the history tree, the structure is internally guarded by a
/// read/write lock and safe to share behind an `Arc`: root and peak reads
/// run concurrently, appends are exclusive.
pub struct Mmr {
    inner: RwLock<MmrInner>,
    hash_fn: HashFn,
}

impl Mmr {
    /// Create an empty MMR using the default SHA-256 primitive.
    pub fn new() -> Self {
        Self::with_hash_fn(None)
    }

    /// Create an empty MMR with an injected hash primitive.
    ///
    /// `None` selects SHA-256.
    pub fn with_hash_fn(hash_fn: Option<HashFn>) -> Self {
        Self {
            inner: RwLock::new(MmrInner {
                peaks: Vec::new(),
                leaf_count: 0,
            }),
            hash_fn: hash_fn.unwrap_or(sha256),
        }
    }

    /// Append one leaf.
    ///
    /// The leaf digest is the hash of the raw bytes (no leaf prefix). While
    /// the rightmost peak matches the pending peak's height the two merge,
    /// older peak on the left. O(log n) amortised, O(log n) worst case.
    pub fn append(&self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyLeaf);
        }

        let mut inner = self.inner.write();

        let mut node = PeakNode {
            digest: (self.hash_fn)(data),
            height: 0,
            left: None,
            right: None,
        };

        while inner
            .peaks
            .last()
            .is_some_and(|peak| peak.height == node.height)
        {
            let left = inner.peaks.pop().expect("rightmost peak checked above");
            node = PeakNode {
                digest: node_digest(&left.digest, &node.digest, self.hash_fn),
                height: left.height + 1,
                left: Some(Box::new(left)),
                right: Some(Box::new(node)),
            };
        }

        inner.peaks.push(node);
        inner.leaf_count += 1;

        Ok(())
    }

    /// The bagged root: peaks folded right-to-left under the internal node
    /// rule. `None` while the MMR is empty; a lone peak is its own root.
    pub fn root_hash(&self) -> Option<Hash> {
        let inner = self.inner.read();

        let mut peaks = inner.peaks.iter().rev();
        let mut root = peaks.next()?.digest;
        for peak in peaks {
            root = node_digest(&peak.digest, &root, self.hash_fn);
        }
        Some(root)
    }

    /// Number of leaves appended so far.
    pub fn leaf_count(&self) -> u64 {
        self.inner.read().leaf_count
    }

    /// Number of peaks (the count of 1-bits in the leaf count).
    pub fn peak_count(&self) -> usize {
        self.inner.read().peaks.len()
    }

    /// Snapshot of the current peaks, left to right.
    pub fn peaks(&self) -> Vec<PeakInfo> {
        self.inner
            .read()
            .peaks
            .iter()
            .map(|peak| PeakInfo {
                height: peak.height,
                digest: peak.digest,
            })
            .collect()
    }

    /// One-line-per-fact overview: leaf count, peak count, root.
    ///
    /// Debug aid only; the format is not part of any contract.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "leaves: {}", self.leaf_count());
        let _ = writeln!(out, "peaks:  {}", self.peak_count());
        match self.root_hash() {
            Some(root) => {
                let _ = writeln!(out, "root:   {}", root);
            }
            None => {
                let _ = writeln!(out, "root:   <none>");
            }
        }
        out
    }

    /// Render every peak's tree sideways, right subtree on top.
    ///
    /// Debug aid only; the format is not part of any contract.
    pub fn render(&self) -> String {
        let inner = self.inner.read();
        let mut out = String::new();

        for (i, peak) in inner.peaks.iter().enumerate() {
            let _ = writeln!(out, "peak {} (height {}):", i, peak.height);
            render_node(peak, "", true, &mut out);
            let _ = writeln!(out);
        }

        out
    }
}

impl Default for Mmr {
    fn default() -> Self {
        Self::new()
    }
}

fn render_node(node: &PeakNode, prefix: &str, is_tail: bool, out: &mut String) {
    if let Some(right) = &node.right {
        let pre = format!("{}{}", prefix, if is_tail { "│   " } else { "    " });
        render_node(right, &pre, false, out);
    }

    let _ = writeln!(
        out,
        "{}{} {}",
        prefix,
        if is_tail { "└──" } else { "┌──" },
        &node.digest.to_hex()[..8]
    );

    if let Some(left) = &node.left {
        let pre = format!("{}{}", prefix, if is_tail { "    " } else { "│   " });
        render_node(left, &pre, true, out);
    }
}
