//! A self-balancing ordered map and set implemented with an AVL tree.
//!
//! The tree maintains the invariant that the heights of the two child subtrees of any node
//! differ by at most one, which bounds the height of the tree by `O(log n)` regardless of
//! the order of insertions and deletions.

#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;

mod entry;
pub mod avl_tree;
