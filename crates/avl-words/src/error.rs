use std::fmt;

use thiserror::Error;

/// Which child link an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Contract violations reported by insertion, rotations and the invariant
/// checker.
///
/// Apart from [`TreeError::CapacityExceeded`], none of these are expected at
/// runtime: each one means either a caller asked for an impossible rotation
/// or the tree's links are already corrupt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("arena is full: {0} nodes already stored")]
    CapacityExceeded(usize),
    #[error("node {0} is not in the arena")]
    UnknownNode(u32),
    #[error("cannot rotate node {node}: {side} child is missing")]
    MissingChild { node: u32, side: Side },
    #[error("root node {0} has a parent")]
    RootHasParent(u32),
    #[error("broken parent link: {side} child {child} of node {node} points to {actual:?}")]
    BrokenParentLink {
        node: u32,
        child: u32,
        side: Side,
        actual: Option<u32>,
    },
    #[error("height mismatch at node {node}: stored {stored}, computed {computed}")]
    HeightMismatch { node: u32, stored: i32, computed: i32 },
    #[error("AVL balance violated at node {node}: balance factor {bf}")]
    Unbalanced { node: u32, bf: i32 },
    #[error("key order violated between {prev:?} and {next:?}")]
    OrderViolated { prev: String, next: String },
    #[error("size mismatch: recorded {recorded}, reachable {reachable}")]
    SizeMismatch { recorded: usize, reachable: usize },
}
