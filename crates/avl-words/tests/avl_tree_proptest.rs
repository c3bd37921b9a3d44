use std::collections::BTreeSet;

use avl_words::AvlTree;
use proptest::prelude::*;

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{0,6}", 0..120)
}

proptest! {
    #[test]
    fn balanced_insert_keeps_every_invariant(keys in words()) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();
        for key in &keys {
            let inserted = tree.insert(key.as_str()).unwrap();
            prop_assert_eq!(inserted, model.insert(key.clone()));
            prop_assert!(tree.assert_balanced().is_ok());
            prop_assert_eq!(tree.size(), model.len());
        }

        let in_order: Vec<&str> = tree.iter().collect();
        let expected: Vec<&str> = model.iter().map(String::as_str).collect();
        prop_assert_eq!(in_order, expected);

        if let Some(root) = tree.root() {
            for i in tree.iter().filter_map(|k| tree.search(k)) {
                prop_assert!((-1..=1).contains(&tree.balance_factor(i)));
            }
            // AVL height bound.
            let n = tree.size() as f64;
            prop_assert!(f64::from(tree.height(root)) <= 1.45 * (n + 2.0).log2());
        }
    }

    #[test]
    fn unbalanced_insert_keeps_order_and_heights(keys in words()) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();
        for key in &keys {
            prop_assert_eq!(tree.insert_unbalanced(key.as_str()).unwrap(), model.insert(key.clone()));
        }
        prop_assert!(tree.assert_valid().is_ok());
        prop_assert_eq!(tree.size(), model.len());
        let in_order: Vec<&str> = tree.iter().collect();
        let expected: Vec<&str> = model.iter().map(String::as_str).collect();
        prop_assert_eq!(in_order, expected);
    }

    #[test]
    fn rebalancing_every_node_of_a_chain_restores_order(len in 1usize..40) {
        let mut tree = AvlTree::new();
        for i in (0..len).rev() {
            tree.insert_unbalanced(format!("{i:02}")).unwrap();
        }
        prop_assert_eq!(tree.tree_height(), len as i32 - 1);
        // Deepest first, as a retrace would.
        let mut order: Vec<u32> = Vec::new();
        let mut curr = tree.first();
        while let Some(i) = curr {
            order.push(i);
            curr = tree.next(i);
        }
        for i in order {
            tree.rebalance(i).unwrap();
        }
        prop_assert!(tree.assert_valid().is_ok());
        prop_assert_eq!(tree.iter().count(), len);
    }

    #[test]
    fn search_and_preorder_are_pure(keys in words(), needle in "[a-z]{0,6}") {
        let tree: AvlTree = keys.iter().map(String::as_str).collect();
        let before = tree.preorder_string();
        let height = tree.tree_height();
        let found = tree.search(&needle);
        prop_assert_eq!(found, tree.search(&needle));
        prop_assert_eq!(found.is_some(), keys.contains(&needle));
        prop_assert_eq!(tree.preorder_string(), before);
        prop_assert_eq!(tree.tree_height(), height);
    }
}
