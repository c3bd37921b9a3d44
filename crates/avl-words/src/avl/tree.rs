use std::fmt;
use std::io;

use tracing::debug;

use crate::error::TreeError;
use crate::print;
use crate::types::WordNode;
use crate::util::{find, first, last, next, prev};

use super::util::{self as avl, balance_factor, height};

fn default_comparator(a: &str, b: &str) -> i32 {
    a.cmp(b) as i32
}

/// Ordered set of unique strings kept AVL-balanced.
///
/// Nodes are never removed, so the `u32` indices handed out by
/// [`search`](Self::search), [`first`](Self::first) and friends stay valid
/// for the lifetime of the tree.
pub struct AvlTree<C = fn(&str, &str) -> i32>
where
    C: Fn(&str, &str) -> i32,
{
    root: Option<u32>,
    size: usize,
    comparator: C,
    arena: Vec<WordNode>,
}

impl AvlTree<fn(&str, &str) -> i32> {
    pub fn new() -> Self {
        Self::with_comparator(default_comparator)
    }
}

impl Default for AvlTree<fn(&str, &str) -> i32> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> AvlTree<C>
where
    C: Fn(&str, &str) -> i32,
{
    /// Tree ordered by `comparator`, which returns a negative number, zero
    /// or a positive number like [`str::cmp`].
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            size: 0,
            comparator,
            arena: Vec::new(),
        }
    }

    fn push_node(&mut self, key: String) -> Result<u32, TreeError> {
        let node = avl::next_index(self.arena.len())?;
        self.arena.push(WordNode::new(key));
        Ok(node)
    }

    /// Inserts `key`, keeping the tree AVL-balanced.
    ///
    /// Returns `Ok(false)` and leaves the tree untouched when `key` is
    /// already present. Fails only when the arena already holds
    /// `u32::MAX + 1` nodes, before anything is modified.
    pub fn insert(&mut self, key: impl Into<String>) -> Result<bool, TreeError> {
        let key = key.into();
        if self.search(&key).is_some() {
            debug!(key = %key, "duplicate key ignored");
            return Ok(false);
        }
        let node = self.push_node(key)?;
        self.root = avl::insert(&mut self.arena, self.root, node, &self.comparator)?;
        self.size += 1;
        Ok(true)
    }

    /// Inserts `key` as a plain BST leaf without rotating.
    ///
    /// The result is still ordered and every stored height is correct, but
    /// the AVL balance is no longer guaranteed, and calling [`insert`]
    /// afterwards gives no balance guarantee either. Fails like [`insert`].
    ///
    /// [`insert`]: Self::insert
    pub fn insert_unbalanced(&mut self, key: impl Into<String>) -> Result<bool, TreeError> {
        let key = key.into();
        if self.search(&key).is_some() {
            debug!(key = %key, "duplicate key ignored");
            return Ok(false);
        }
        let node = self.push_node(key)?;
        self.root = avl::insert_unbalanced(&mut self.arena, self.root, node, &self.comparator)?;
        self.size += 1;
        Ok(true)
    }

    /// Index of the node holding `key`.
    pub fn search(&self, key: &str) -> Option<u32> {
        find(&self.arena, self.root, key, &self.comparator)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.search(key).is_some()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn root(&self) -> Option<u32> {
        self.root
    }

    /// # Panics
    ///
    /// If `idx` was not handed out by this tree.
    pub fn node(&self, idx: u32) -> &WordNode {
        &self.arena[idx as usize]
    }

    pub fn key(&self, idx: u32) -> &str {
        &self.arena[idx as usize].key
    }

    pub fn height(&self, idx: u32) -> i32 {
        self.arena[idx as usize].height
    }

    pub fn balance_factor(&self, idx: u32) -> i32 {
        balance_factor(&self.arena, Some(idx))
    }

    /// Height of the whole tree, `-1` when empty.
    pub fn tree_height(&self) -> i32 {
        height(&self.arena, self.root)
    }

    /// Left rotation on `idx`. Returns the index that took its place.
    ///
    /// Cached heights are refreshed all the way up to the root.
    pub fn rotate_left(&mut self, idx: u32) -> Result<u32, TreeError> {
        let parent = self.parent_of(idx);
        self.root = avl::rotate_left(&mut self.arena, self.root, idx)?;
        avl::refresh_heights(&mut self.arena, parent);
        Ok(self.arena[idx as usize].p.unwrap_or(idx))
    }

    /// Right rotation on `idx`. Returns the index that took its place.
    ///
    /// Cached heights are refreshed all the way up to the root.
    pub fn rotate_right(&mut self, idx: u32) -> Result<u32, TreeError> {
        let parent = self.parent_of(idx);
        self.root = avl::rotate_right(&mut self.arena, self.root, idx)?;
        avl::refresh_heights(&mut self.arena, parent);
        Ok(self.arena[idx as usize].p.unwrap_or(idx))
    }

    /// Refreshes the height of `idx` and rotates it if it is out of balance,
    /// then refreshes the heights of its ancestors. Ancestors are not
    /// rotated.
    pub fn rebalance(&mut self, idx: u32) -> Result<(), TreeError> {
        let parent = self.parent_of(idx);
        self.root = avl::rebalance(&mut self.arena, self.root, idx)?;
        avl::refresh_heights(&mut self.arena, parent);
        Ok(())
    }

    // Unknown indices have no parent; the rotation itself reports them.
    fn parent_of(&self, idx: u32) -> Option<u32> {
        self.arena.get(idx as usize).and_then(|n| n.p)
    }

    pub fn first(&self) -> Option<u32> {
        first(&self.arena, self.root)
    }

    pub fn last(&self) -> Option<u32> {
        last(&self.arena, self.root)
    }

    pub fn next(&self, curr: u32) -> Option<u32> {
        next(&self.arena, curr)
    }

    pub fn prev(&self, curr: u32) -> Option<u32> {
        prev(&self.arena, curr)
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        let mut curr = self.first();
        std::iter::from_fn(move || {
            let i = curr?;
            curr = self.next(i);
            Some(self.key(i))
        })
    }

    /// Keys in node, left, right order.
    pub fn preorder(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.size);
        let mut stack: Vec<u32> = self.root.into_iter().collect();
        while let Some(i) = stack.pop() {
            let n = &self.arena[i as usize];
            out.push(n.key.as_str());
            stack.extend(n.r);
            stack.extend(n.l);
        }
        out
    }

    /// Pre-order keys joined by single spaces. Runs of spaces collapse, so
    /// empty keys leave no trace.
    pub fn preorder_string(&self) -> String {
        self.preorder()
            .join(" ")
            .split(' ')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sideways sketch: root at the left margin, right subtree above, left
    /// subtree below, each node as `key(height)`.
    pub fn to_sideways_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = print::write_sideways(&self.arena, self.root, 0, &mut out);
        out
    }

    pub fn write_sideways<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(self.to_sideways_string().as_bytes())
    }

    /// Writes [`to_sideways_string`](Self::to_sideways_string) to stdout.
    pub fn print_debug(&self) {
        print!("{}", self.to_sideways_string());
    }

    /// Checks ordering, parent links, stored heights and size.
    pub fn assert_valid(&self) -> Result<(), TreeError> {
        avl::assert_tree(&self.arena, self.root, self.size, &self.comparator, false)
    }

    /// [`assert_valid`](Self::assert_valid) plus the AVL balance of every
    /// node.
    pub fn assert_balanced(&self) -> Result<(), TreeError> {
        avl::assert_tree(&self.arena, self.root, self.size, &self.comparator, true)
    }
}

impl<C> fmt::Display for AvlTree<C>
where
    C: Fn(&str, &str) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print::print(&self.arena, self.root, ""))
    }
}

impl<C> fmt::Debug for AvlTree<C>
where
    C: Fn(&str, &str) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvlTree")
            .field("size", &self.size)
            .field("root", &self.root)
            .field("keys", &self.preorder())
            .finish()
    }
}

impl<S: Into<String>> FromIterator<S> for AvlTree<fn(&str, &str) -> i32> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<C, S> Extend<S> for AvlTree<C>
where
    C: Fn(&str, &str) -> i32,
    S: Into<String>,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for key in iter {
            if let Err(err) = self.insert(key) {
                panic!("AvlTree::extend: {err}");
            }
        }
    }
}
