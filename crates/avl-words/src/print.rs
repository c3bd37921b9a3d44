//! Text renderings of a tree.
//!
//! [`print_tree`] draws children with `├─` / `└─` connectors, in the style of
//! `tree-dump`. [`write_sideways`] lays the tree on its side: root at the
//! left margin, right subtree above it and left subtree below it.

use std::fmt;

use crate::types::HeightNode;
use crate::util::{get_l, get_r};

/// Renders one child, given the indentation prefix for its own children.
pub type PrintChild<'a> = dyn Fn(&str) -> String + 'a;

const SIDEWAYS_INDENT: &str = "        ";

pub fn print_tree(tab: Option<&str>, children: &[Option<&PrintChild>]) -> String {
    let tab = tab.unwrap_or("");
    let mut out = String::new();

    let Some(last) = children.iter().rposition(Option::is_some) else {
        return out;
    };

    for (i, child_opt) in children.iter().enumerate().take(last + 1) {
        let Some(child_fn) = *child_opt else {
            continue;
        };

        let is_last = i == last;
        let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
        let child = child_fn(&child_tab);
        let branch = if child.is_empty() {
            "│"
        } else if is_last {
            "└─"
        } else {
            "├─"
        };

        out.push('\n');
        out.push_str(tab);
        out.push_str(branch);
        if !child.is_empty() {
            out.push(' ');
            out.push_str(&child);
        }
    }

    out
}

/// Structural dump of the subtree at `node`: `key [h=height]` per line, left
/// child first. Leaves print no children; a node with one child prints `∅`
/// in place of the missing one.
pub fn print<N: HeightNode>(arena: &[N], node: Option<u32>, tab: &str) -> String {
    let Some(i) = node else {
        return "∅".to_string();
    };
    let n = &arena[i as usize];
    let head = format!("{} [h={}]", n.key(), n.height());
    let (l, r) = (get_l(arena, i), get_r(arena, i));
    if l.is_none() && r.is_none() {
        return head;
    }
    let left: &PrintChild = &|t: &str| print(arena, l, t);
    let right: &PrintChild = &|t: &str| print(arena, r, t);
    format!("{head}{}", print_tree(Some(tab), &[Some(left), Some(right)]))
}

/// Sideways sketch of the subtree at `node`, one node per line in its
/// `Display` form, indented eight columns per level.
pub fn write_sideways<N, W>(arena: &[N], node: Option<u32>, level: usize, out: &mut W) -> fmt::Result
where
    N: HeightNode + fmt::Display,
    W: fmt::Write,
{
    let Some(i) = node else {
        return Ok(());
    };
    write_sideways(arena, get_r(arena, i), level + 1, out)?;
    writeln!(out, "{}{}", SIDEWAYS_INDENT.repeat(level), arena[i as usize])?;
    write_sideways(arena, get_l(arena, i), level + 1, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordNode;

    fn three() -> Vec<WordNode> {
        let mut arena = vec![
            WordNode::new("b"),
            WordNode::with_parent("a", 0),
            WordNode::with_parent("c", 0),
        ];
        arena[0].l = Some(1);
        arena[0].r = Some(2);
        arena[0].height = 1;
        arena
    }

    #[test]
    fn print_tree_skips_trailing_empty_children() {
        let a: &PrintChild = &|_: &str| "a".to_string();
        assert_eq!(print_tree(None, &[Some(a), None]), "\n└─ a");
        assert_eq!(print_tree(None, &[None, None]), "");
    }

    #[test]
    fn structural_dump() {
        let arena = three();
        assert_eq!(
            print(&arena, Some(0), ""),
            "b [h=1]\n├─ a [h=0]\n└─ c [h=0]"
        );
        assert_eq!(print(&arena, None, ""), "∅");
    }

    #[test]
    fn structural_dump_marks_missing_child() {
        let mut arena = vec![WordNode::new("b"), WordNode::with_parent("c", 0)];
        arena[0].r = Some(1);
        arena[0].height = 1;
        assert_eq!(print(&arena, Some(0), ""), "b [h=1]\n├─ ∅\n└─ c [h=0]");
    }

    #[test]
    fn sideways_puts_right_subtree_on_top() {
        let arena = three();
        let mut out = String::new();
        write_sideways(&arena, Some(0), 0, &mut out).unwrap();
        assert_eq!(out, "        c(0)\nb(1)\n        a(0)\n");
    }
}
