//! Shared proof vocabulary.
//!
//! Both proof kinds produced by the history tree are sequences over these
//! types. They carry no behaviour of their own; generation lives with the
//! tree and verification with the free functions in `chronicle-tree`.

use serde::{Deserialize, Serialize};

use crate::crypto::Hash;

/// Position of a sibling relative to the path being proved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Sibling is on the left (the walker is the right child).
    Left,
    /// Sibling is on the right (the walker is the left child).
    Right,
}

impl Position {
    /// Flip the position.
    pub fn opposite(self) -> Self {
        match self {
            Position::Left => Position::Right,
            Position::Right => Position::Left,
        }
    }
}

/// One step of an authentication path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    /// Digest of the sibling node at this level.
    pub hash: Hash,
    /// Which side of the walker the sibling lies on.
    pub position: Position,
}
