//! Arena-backed AVL tree over string keys.
//!
//! Nodes live in a `Vec` owned by the tree. Every "pointer" (parent, left,
//! right) is an `Option<u32>` index into that arena, so parent back-links
//! are plain navigation data and never own anything.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] link trait, [`HeightNode`], [`WordNode`] |
//! [`util`] | `first`, `last`, `next`, `prev`, `find` over any [`Node`] arena |
//! [`avl::util`] | rotations, `rebalance`, balanced / unbalanced insertion, checks |
//! [`avl::tree`] | [`AvlTree`] |
//! [`print`] | tree-dump and sideways printers |
//! [`error`] | [`TreeError`] |

pub mod avl;
pub mod error;
pub mod print;
pub mod types;
pub mod util;

pub use avl::AvlTree;
pub use error::{Side, TreeError};
pub use types::{HeightNode, Node, WordNode};
pub use util::{find, first, last, next, prev};
