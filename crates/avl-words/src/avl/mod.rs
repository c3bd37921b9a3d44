//! AVL tree over string keys.

pub mod tree;
pub mod util;

pub use tree::AvlTree;
