//! Node trait definitions.
//!
//! Each link is an `Option<u32>` index into a [`Vec`]-backed arena. All
//! tree-manipulation functions take the arena as a slice and work with
//! indices, so a parent link never owns the node it points to.

use std::fmt;

/// Tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// A keyed node that caches the height of its subtree.
///
/// Height follows the textbook convention: a leaf is `0` and an empty
/// subtree is `-1`.
pub trait HeightNode: Node {
    fn key(&self) -> &str;
    fn height(&self) -> i32;
    fn set_height(&mut self, h: i32);
}

/// One stored word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordNode {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub key: String,
    pub height: i32,
}

impl WordNode {
    /// A detached leaf.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            key: key.into(),
            height: 0,
        }
    }

    /// A leaf already hanging off `parent`.
    pub fn with_parent(key: impl Into<String>, parent: u32) -> Self {
        Self {
            p: Some(parent),
            ..Self::new(key)
        }
    }
}

impl Node for WordNode {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl HeightNode for WordNode {
    fn key(&self) -> &str {
        &self.key
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn set_height(&mut self, h: i32) {
        self.height = h;
    }
}

/// `word(height)`, the form used by the sideways printer.
impl fmt::Display for WordNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.key, self.height)
    }
}
