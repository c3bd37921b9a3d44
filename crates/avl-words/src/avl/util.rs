use tracing::{debug, trace};

use crate::error::{Side, TreeError};
use crate::types::HeightNode;
use crate::util::{first, get_l, get_p, get_r, next, set_l, set_p, set_r};

/// Stored height of `node`, `-1` for an empty subtree.
#[inline]
pub fn height<N: HeightNode>(arena: &[N], node: Option<u32>) -> i32 {
    node.map_or(-1, |i| arena[i as usize].height())
}

/// `height(left) - height(right)` from stored heights; `0` for an empty
/// subtree.
#[inline]
pub fn balance_factor<N: HeightNode>(arena: &[N], node: Option<u32>) -> i32 {
    match node {
        None => 0,
        Some(i) => height(arena, get_l(arena, i)) - height(arena, get_r(arena, i)),
    }
}

/// Height recomputed by walking the whole subtree, ignoring stored values.
pub fn subtree_height<N: HeightNode>(arena: &[N], node: Option<u32>) -> i32 {
    match node {
        None => -1,
        Some(i) => {
            1 + subtree_height(arena, get_l(arena, i)).max(subtree_height(arena, get_r(arena, i)))
        }
    }
}

#[inline]
fn update_height<N: HeightNode>(arena: &mut [N], i: u32) {
    let h = 1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i)));
    arena[i as usize].set_height(h);
}

#[inline]
fn check_index<N>(arena: &[N], i: u32) -> Result<(), TreeError> {
    if (i as usize) < arena.len() {
        Ok(())
    } else {
        Err(TreeError::UnknownNode(i))
    }
}

/// Points whatever referenced `old` (its parent, or the root) at `new`.
fn replace_child<N: HeightNode>(
    arena: &mut [N],
    root: Option<u32>,
    parent: Option<u32>,
    old: u32,
    new: u32,
) -> Option<u32> {
    set_p(arena, new, parent);
    match parent {
        None => Some(new),
        Some(p) => {
            if get_l(arena, p) == Some(old) {
                set_l(arena, p, Some(new));
            } else {
                set_r(arena, p, Some(new));
            }
            root
        }
    }
}

/// Lifts `nr`, the right child of `n`, into `n`'s place. Returns the new
/// root.
///
/// ```text
///     n              nr
///    / \            /  \
///   a   nr   =>    n    c
///      /  \       / \
///     b    c     a   b
/// ```
///
/// Only `n` and `nr` get their heights refreshed.
fn rr_rotate<N: HeightNode>(arena: &mut [N], root: Option<u32>, n: u32, nr: u32) -> Option<u32> {
    let p = get_p(arena, n);
    let nrl = get_l(arena, nr);

    set_r(arena, n, nrl);
    if let Some(nrl) = nrl {
        set_p(arena, nrl, Some(n));
    }
    let root = replace_child(arena, root, p, n, nr);
    set_l(arena, nr, Some(n));
    set_p(arena, n, Some(nr));

    update_height(arena, n);
    update_height(arena, nr);
    trace!(n, nr, "left rotation");
    root
}

/// Lifts `nl`, the left child of `n`, into `n`'s place. Mirror image of
/// [`rr_rotate`].
fn ll_rotate<N: HeightNode>(arena: &mut [N], root: Option<u32>, n: u32, nl: u32) -> Option<u32> {
    let p = get_p(arena, n);
    let nlr = get_r(arena, nl);

    set_l(arena, n, nlr);
    if let Some(nlr) = nlr {
        set_p(arena, nlr, Some(n));
    }
    let root = replace_child(arena, root, p, n, nl);
    set_r(arena, nl, Some(n));
    set_p(arena, n, Some(nl));

    update_height(arena, n);
    update_height(arena, nl);
    trace!(n, nl, "right rotation");
    root
}

/// Rotates on the edge from `x` to its right child. Returns the new root.
///
/// Only `x` and its right child get their heights refreshed; ancestors are
/// left to [`refresh_heights`] or a retrace. Fails without touching any
/// link if `x` has no right child.
pub fn rotate_left<N: HeightNode>(
    arena: &mut [N],
    root: Option<u32>,
    x: u32,
) -> Result<Option<u32>, TreeError> {
    check_index(arena, x)?;
    let y = get_r(arena, x).ok_or(TreeError::MissingChild {
        node: x,
        side: Side::Right,
    })?;
    Ok(rr_rotate(arena, root, x, y))
}

/// Rotates on the edge from `y` to its left child. Returns the new root.
///
/// Mirror image of [`rotate_left`].
pub fn rotate_right<N: HeightNode>(
    arena: &mut [N],
    root: Option<u32>,
    y: u32,
) -> Result<Option<u32>, TreeError> {
    check_index(arena, y)?;
    let x = get_l(arena, y).ok_or(TreeError::MissingChild {
        node: y,
        side: Side::Left,
    })?;
    Ok(ll_rotate(arena, root, y, x))
}

/// Recomputes the cached height of `from` and of every ancestor above it.
pub fn refresh_heights<N: HeightNode>(arena: &mut [N], from: Option<u32>) {
    let mut curr = from;
    while let Some(i) = curr {
        update_height(arena, i);
        curr = get_p(arena, i);
    }
}

/// Refreshes the height of `n` and rotates if `n` is out of balance.
///
/// Assumes every descendant of `n` already satisfies the AVL property.
/// Ancestors keep their cached heights. Returns the new root.
pub fn rebalance<N: HeightNode>(
    arena: &mut [N],
    root: Option<u32>,
    n: u32,
) -> Result<Option<u32>, TreeError> {
    check_index(arena, n)?;
    Ok(rebalance_at(arena, root, n))
}

// |bf| > 1 guarantees the heavy child exists, and a heavy child leaning
// the other way guarantees its inner child exists.
fn rebalance_at<N: HeightNode>(arena: &mut [N], root: Option<u32>, n: u32) -> Option<u32> {
    update_height(arena, n);
    let bf = balance_factor(arena, Some(n));

    if bf > 1 {
        let Some(l) = get_l(arena, n) else {
            return root;
        };
        if balance_factor(arena, Some(l)) >= 0 {
            debug!(node = n, bf, "rebalance: left-left");
            return ll_rotate(arena, root, n, l);
        }
        let Some(lr) = get_r(arena, l) else {
            return root;
        };
        debug!(node = n, bf, "rebalance: left-right");
        let root = rr_rotate(arena, root, l, lr);
        ll_rotate(arena, root, n, lr)
    } else if bf < -1 {
        let Some(r) = get_r(arena, n) else {
            return root;
        };
        if balance_factor(arena, Some(r)) <= 0 {
            debug!(node = n, bf, "rebalance: right-right");
            return rr_rotate(arena, root, n, r);
        }
        let Some(rl) = get_l(arena, r) else {
            return root;
        };
        debug!(node = n, bf, "rebalance: right-left");
        let root = ll_rotate(arena, root, r, rl);
        rr_rotate(arena, root, n, rl)
    } else {
        root
    }
}

/// Rebalances `from` and every ancestor above it. Returns the new root.
fn retrace<N: HeightNode>(arena: &mut [N], mut root: Option<u32>, from: u32) -> Option<u32> {
    let mut curr = Some(from);
    while let Some(i) = curr {
        // Read before rebalancing: a rotation moves `i` below its replacement.
        curr = get_p(arena, i);
        root = rebalance_at(arena, root, i);
    }
    root
}

/// Arena index for a node pushed onto an arena of length `len`.
pub fn next_index(len: usize) -> Result<u32, TreeError> {
    u32::try_from(len).map_err(|_| TreeError::CapacityExceeded(len))
}

/// Walks down from `root` to the attachment point for `n` and links it in
/// as a leaf. Returns the parent, or `None` if the tree was empty.
fn attach_leaf<N, C>(arena: &mut [N], root: Option<u32>, n: u32, comparator: &C) -> Option<u32>
where
    N: HeightNode,
    C: Fn(&str, &str) -> i32,
{
    let mut curr = root?;
    loop {
        let cmp = comparator(arena[n as usize].key(), arena[curr as usize].key());
        let child = if cmp < 0 {
            get_l(arena, curr)
        } else {
            get_r(arena, curr)
        };
        match child {
            Some(child) => curr = child,
            None => {
                if cmp < 0 {
                    set_l(arena, curr, Some(n));
                } else {
                    set_r(arena, curr, Some(n));
                }
                set_p(arena, n, Some(curr));
                arena[n as usize].set_height(0);
                return Some(curr);
            }
        }
    }
}

/// Inserts the detached node `n` and restores AVL balance on the way back
/// up. Returns the new root.
///
/// `n`'s key must not already be present; the caller checks with
/// [`crate::util::find`]. The only failure is an unknown `n`, reported
/// before any link changes.
pub fn insert<N, C>(
    arena: &mut [N],
    root: Option<u32>,
    n: u32,
    comparator: &C,
) -> Result<Option<u32>, TreeError>
where
    N: HeightNode,
    C: Fn(&str, &str) -> i32,
{
    check_index(arena, n)?;
    Ok(match attach_leaf(arena, root, n, comparator) {
        None => Some(n),
        Some(parent) => retrace(arena, root, parent),
    })
}

/// Plain BST insertion: links `n` in as a leaf and refreshes heights along
/// the path, without any rotation. Returns the new root.
///
/// Same precondition and failure as [`insert`].
pub fn insert_unbalanced<N, C>(
    arena: &mut [N],
    root: Option<u32>,
    n: u32,
    comparator: &C,
) -> Result<Option<u32>, TreeError>
where
    N: HeightNode,
    C: Fn(&str, &str) -> i32,
{
    check_index(arena, n)?;
    match attach_leaf(arena, root, n, comparator) {
        None => Ok(Some(n)),
        parent => {
            refresh_heights(arena, parent);
            Ok(root)
        }
    }
}

fn validate_links<N: HeightNode>(
    arena: &[N],
    node: u32,
    balanced: bool,
) -> Result<i32, TreeError> {
    let mut child_height = [-1; 2];
    for (slot, side, child) in [
        (0, Side::Left, get_l(arena, node)),
        (1, Side::Right, get_r(arena, node)),
    ] {
        let Some(child) = child else {
            continue;
        };
        let actual = get_p(arena, child);
        if actual != Some(node) {
            return Err(TreeError::BrokenParentLink {
                node,
                child,
                side,
                actual,
            });
        }
        child_height[slot] = validate_links(arena, child, balanced)?;
    }

    let computed = 1 + child_height[0].max(child_height[1]);
    let stored = arena[node as usize].height();
    if stored != computed {
        return Err(TreeError::HeightMismatch {
            node,
            stored,
            computed,
        });
    }
    let bf = child_height[0] - child_height[1];
    if balanced && !(-1..=1).contains(&bf) {
        return Err(TreeError::Unbalanced { node, bf });
    }
    Ok(computed)
}

/// Checks links, stored heights, key order and `size`; with `balanced`
/// also checks every balance factor.
pub fn assert_tree<N, C>(
    arena: &[N],
    root: Option<u32>,
    size: usize,
    comparator: &C,
    balanced: bool,
) -> Result<(), TreeError>
where
    N: HeightNode,
    C: Fn(&str, &str) -> i32,
{
    if let Some(root) = root {
        check_index(arena, root)?;
        if get_p(arena, root).is_some() {
            return Err(TreeError::RootHasParent(root));
        }
        validate_links(arena, root, balanced)?;
    }

    let mut reachable = 0;
    let mut prev: Option<u32> = None;
    let mut curr = first(arena, root);
    while let Some(i) = curr {
        if let Some(prev) = prev {
            let (a, b) = (arena[prev as usize].key(), arena[i as usize].key());
            if comparator(a, b) >= 0 {
                return Err(TreeError::OrderViolated {
                    prev: a.to_string(),
                    next: b.to_string(),
                });
            }
        }
        reachable += 1;
        prev = Some(i);
        curr = next(arena, i);
    }

    if reachable != size {
        return Err(TreeError::SizeMismatch {
            recorded: size,
            reachable,
        });
    }
    Ok(())
}
