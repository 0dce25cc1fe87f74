//! The history tree: an RFC 6962-shaped Merkle tree over an ordered log.
//!
//! The tree over `n` leaves always puts the first `split(n)` leaves (the
//! largest power of two strictly less than `n`) into a perfect left subtree
//! and the remainder into the right subtree, recursively. Because the shape
//! depends on the total leaf count, `append` rebuilds the tree from the leaf
//! digests instead of maintaining a dynamic spine.
//!
//! Nodes live in a single arena; leaf `i` of the log occupies arena slot `i`
//! and each node holds the integer id of its parent, which is what the
//! leaf-to-root walk of inclusion proof generation follows.

use std::collections::HashMap;
use std::fmt::Write as _;

use parking_lot::RwLock;
use rayon::prelude::*;

use chronicle_core::{leaf_digest, node_digest, sha256, Error, Hash, HashFn, Result};
use chronicle_core::largest_power_of_two_less_than as split;

/// Leaf-count threshold above which bulk construction hashes leaves in
/// parallel.
const PARALLEL_THRESHOLD: usize = 64;

/// A node of the history tree.
///
/// Children are both present (internal node) or both absent (leaf). The
/// parent id is absent only at the root.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) digest: Hash,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
    pub(crate) parent: Option<usize>,
}

impl Node {
    fn leaf(digest: Hash) -> Self {
        Self {
            digest,
            left: None,
            right: None,
            parent: None,
        }
    }
}

pub(crate) struct TreeInner {
    /// Arena of all nodes; slots `0..leaf_count` are the leaves in log order.
    pub(crate) nodes: Vec<Node>,
    /// Number of leaves in the log.
    pub(crate) leaf_count: usize,
    /// Leaf digest -> log positions, duplicates in insertion order.
    pub(crate) index: HashMap<Hash, Vec<usize>>,
    /// Arena id of the root.
    pub(crate) root: usize,
}

/// An append-only Merkle tree over an ordered sequence of leaves.
///
/// The tree is internally guarded by a read/write lock: root and proof reads
/// run concurrently, appends are exclusive, and all operations on one tree
/// are linearised. Share it across threads behind an `Arc`.
pub struct Tree {
    pub(crate) inner: RwLock<TreeInner>,
    pub(crate) hash_fn: HashFn,
}

impl Tree {
    /// Build a tree over `data` using the default SHA-256 primitive.
    ///
    /// Returns an error when `data` is empty; individual zero-length leaves
    /// are accepted.
    pub fn new<D: AsRef<[u8]> + Sync>(data: &[D]) -> Result<Self> {
        Self::with_hash_fn(data, None)
    }

    /// Build a tree over `data` with an injected hash primitive.
    ///
    /// `None` selects SHA-256.
    pub fn with_hash_fn<D: AsRef<[u8]> + Sync>(
        data: &[D],
        hash_fn: Option<HashFn>,
    ) -> Result<Self> {
        let hash_fn = hash_fn.unwrap_or(sha256);

        if data.is_empty() {
            return Err(Error::NoData);
        }

        let leaf_digests: Vec<Hash> = if data.len() >= PARALLEL_THRESHOLD {
            data.par_iter()
                .map(|d| leaf_digest(d.as_ref(), hash_fn))
                .collect()
        } else {
            data.iter()
                .map(|d| leaf_digest(d.as_ref(), hash_fn))
                .collect()
        };

        let mut index: HashMap<Hash, Vec<usize>> = HashMap::new();
        for (pos, digest) in leaf_digests.iter().enumerate() {
            index.entry(*digest).or_default().push(pos);
        }

        let leaf_count = leaf_digests.len();
        let (nodes, root) = build_arena(leaf_digests, hash_fn);

        Ok(Self {
            inner: RwLock::new(TreeInner {
                nodes,
                leaf_count,
                index,
                root,
            }),
            hash_fn,
        })
    }

    /// Append one leaf to the end of the log.
    ///
    /// The digest index gains the new position and the tree is rebuilt from
    /// the leaf digests: the RFC 6962 split point of the root moves with the
    /// total leaf count, so appending is not a simple edge extension.
    pub fn append(&self, data: &[u8]) -> Result<()> {
        let mut inner = self.inner.write();

        let digest = leaf_digest(data, self.hash_fn);
        let pos = inner.leaf_count;
        inner.index.entry(digest).or_default().push(pos);

        let mut leaves: Vec<Hash> = inner.nodes[..inner.leaf_count]
            .iter()
            .map(|n| n.digest)
            .collect();
        leaves.push(digest);

        let (nodes, root) = build_arena(leaves, self.hash_fn);
        inner.nodes = nodes;
        inner.root = root;
        inner.leaf_count += 1;

        Ok(())
    }

    /// The current root digest.
    pub fn root_hash(&self) -> Hash {
        let inner = self.inner.read();
        inner.nodes[inner.root].digest
    }

    /// Number of leaves in the log.
    pub fn leaf_count(&self) -> usize {
        self.inner.read().leaf_count
    }

    /// All log positions holding a leaf equal to `data`, in insertion order.
    pub fn positions_of(&self, data: &[u8]) -> Vec<usize> {
        let digest = leaf_digest(data, self.hash_fn);
        self.inner
            .read()
            .index
            .get(&digest)
            .cloned()
            .unwrap_or_default()
    }

    /// Render the tree sideways, one node per line, right subtree on top.
    ///
    /// Debug aid only; the output format is not part of any contract.
    pub fn render(&self) -> String {
        let inner = self.inner.read();
        let mut out = String::new();
        render_node(&inner.nodes, inner.root, "", true, &mut out);
        out
    }
}

/// Build the node arena over the given leaf digests and return it together
/// with the root id.
fn build_arena(leaves: Vec<Hash>, hash_fn: HashFn) -> (Vec<Node>, usize) {
    let len = leaves.len();
    let mut nodes: Vec<Node> = leaves.into_iter().map(Node::leaf).collect();
    nodes.reserve(len.saturating_sub(1));
    let root = build_range(&mut nodes, 0, len, hash_fn);
    (nodes, root)
}

/// Recursively build the subtree over leaves `[start, start + len)`.
///
/// Returns the arena id of the subtree root. Leaves already occupy slots
/// equal to their log position, so the single-leaf base case is `start`
/// itself.
fn build_range(nodes: &mut Vec<Node>, start: usize, len: usize, hash_fn: HashFn) -> usize {
    if len == 1 {
        return start;
    }

    let k = split(len);
    let left = build_range(nodes, start, k, hash_fn);
    let right = build_range(nodes, start + k, len - k, hash_fn);

    let digest = node_digest(&nodes[left].digest, &nodes[right].digest, hash_fn);
    let id = nodes.len();
    nodes.push(Node {
        digest,
        left: Some(left),
        right: Some(right),
        parent: None,
    });
    nodes[left].parent = Some(id);
    nodes[right].parent = Some(id);

    id
}

fn render_node(nodes: &[Node], id: usize, prefix: &str, is_tail: bool, out: &mut String) {
    let node = &nodes[id];

    if let Some(right) = node.right {
        let pre = format!("{}{}", prefix, if is_tail { "│   " } else { "    " });
        render_node(nodes, right, &pre, false, out);
    }

    let _ = writeln!(
        out,
        "{}{} {}",
        prefix,
        if is_tail { "└──" } else { "┌──" },
        &node.digest.to_hex()[..8]
    );

    if let Some(left) = node.left {
        let pre = format!("{}{}", prefix, if is_tail { "    " } else { "│   " });
        render_node(nodes, left, &pre, true, out);
    }
}
