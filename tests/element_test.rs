//! Tests for element construction, linking, path addressing and traversal

use rstest::{fixture, rstest};

use xmlnode::domain::{Attribute, DomainError, ElementSpec, NodeId, NodePath, Value, XmlArena};
use xmlnode::util::testing::{assert_tree_invariants, init_test_setup};

struct Tree {
    arena: XmlArena,
    root: NodeId,
}

#[fixture]
fn tree() -> Tree {
    init_test_setup();
    let mut arena = XmlArena::new();
    let root = arena.new_node("bookstore", true);
    Tree { arena, root }
}

/// root -> book -> [title, length, price -> [euro, pound]]
fn nested(t: &mut Tree) -> (NodeId, NodeId, NodeId) {
    let book = t.arena.new_node("book", true);
    t.arena.attach_child(t.root, book).unwrap();
    t.arena.make_child(book, "title").unwrap();
    t.arena.make_child(book, "length").unwrap();
    let price = t.arena.make_child(book, "price").unwrap();
    t.arena
        .make_child(price, ElementSpec::new("euro").value(20))
        .unwrap();
    let pound = t
        .arena
        .make_child(price, ElementSpec::new("pound").value(18))
        .unwrap();
    (book, price, pound)
}

// ============================================================
// Construction
// ============================================================

#[rstest]
fn given_new_root_when_inspecting_then_defaults_are_set(tree: Tree) {
    let node = tree.arena.node(tree.root).unwrap();
    assert_eq!(node.tag(), "bookstore");
    assert!(node.attribute().is_none());
    assert!(node.value().is_none());
    assert!(node.is_root());
    assert_eq!(node.no_children(), 0);
    assert!(node.parent().is_none());
    assert_eq!(node.root_id(), tree.root);
}

#[rstest]
fn given_standalone_node_when_not_root_then_is_still_own_root(mut tree: Tree) {
    let book = tree.arena.new_node("book", false);
    let node = tree.arena.node(book).unwrap();
    assert!(!node.is_root());
    assert_eq!(node.root_id(), book);
}

// ============================================================
// attach_child
// ============================================================

#[rstest]
fn given_child_when_attaching_then_parent_is_set(mut tree: Tree) {
    let book = tree.arena.new_node("book", false);
    tree.arena.attach_child(tree.root, book).unwrap();

    let last = tree.arena.last_child(tree.root).unwrap().unwrap();
    assert_eq!(last, book);
    assert_eq!(
        tree.arena.node(last).unwrap().parent().map(|p| p.id()),
        Some(tree.root)
    );
}

#[rstest]
fn given_root_flagged_child_when_attaching_then_flag_is_cleared(mut tree: Tree) {
    let book = tree.arena.new_node("book", true);
    tree.arena.attach_child(tree.root, book).unwrap();
    assert!(!tree.arena.node(book).unwrap().is_root());
}

#[rstest]
fn given_self_when_attaching_then_invalid_operation(mut tree: Tree) {
    let err = tree.arena.attach_child(tree.root, tree.root).unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation { .. }));
    assert_eq!(err.to_string(), "cannot add descendant as child");
    assert_eq!(tree.arena.size(tree.root).unwrap(), 1);
}

#[rstest]
fn given_ancestor_when_attaching_then_tree_is_unchanged(mut tree: Tree) {
    let (book, price, pound) = nested(&mut tree);
    let before = tree.arena.to_xml_string(tree.root).unwrap();

    for ancestor in [tree.root, book, price] {
        let err = tree.arena.attach_child(pound, ancestor).unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation { .. }));
    }

    assert_eq!(tree.arena.to_xml_string(tree.root).unwrap(), before);
    assert_tree_invariants(&tree.arena, tree.root);
}

#[rstest]
fn given_subtree_when_attaching_then_roots_are_restamped(mut tree: Tree) {
    let book = tree.arena.new_node("book", true);
    let title = tree.arena.new_node("title", false);
    tree.arena.attach_child(book, title).unwrap();
    assert_eq!(tree.arena.node(title).unwrap().root_id(), book);

    tree.arena.attach_child(tree.root, book).unwrap();

    assert_eq!(tree.arena.node(book).unwrap().root_id(), tree.root);
    assert_eq!(tree.arena.node(title).unwrap().root_id(), tree.root);
    assert_tree_invariants(&tree.arena, tree.root);
}

// ============================================================
// make_child / make_sibling
// ============================================================

#[rstest]
fn given_attribute_when_making_child_then_attribute_is_stored(mut tree: Tree) {
    let book = tree
        .arena
        .make_child(tree.root, ElementSpec::new("book").attribute("category", "cooking"))
        .unwrap();
    assert_eq!(
        tree.arena.node(book).unwrap().attribute(),
        Some(&Attribute::new("category", "cooking"))
    );
}

#[rstest]
fn given_value_when_making_child_then_value_is_stored(mut tree: Tree) {
    let book = tree
        .arena
        .make_child(tree.root, ElementSpec::new("book").value("Matthew"))
        .unwrap();
    assert_eq!(
        tree.arena.node(book).unwrap().value(),
        Some(&Value::from("Matthew"))
    );
}

#[rstest]
fn given_child_when_making_sibling_then_parent_gains_child(mut tree: Tree) {
    let book = tree.arena.make_child(tree.root, "book").unwrap();
    let sibling = tree
        .arena
        .make_sibling(book, |s| s.value("Carrots"))
        .unwrap();

    assert_eq!(tree.arena.no_children(tree.root).unwrap(), 2);
    let node = tree.arena.node(sibling).unwrap();
    assert_eq!(node.tag(), "book");
    assert_eq!(node.value(), Some(&Value::from("Carrots")));
}

#[rstest]
fn given_explicit_tag_when_making_sibling_then_tag_is_used(mut tree: Tree) {
    let book = tree.arena.make_child(tree.root, "book").unwrap();
    let sibling = tree
        .arena
        .make_sibling(book, |s| s.tag("magazine").attribute("issue", "12"))
        .unwrap();
    assert_eq!(tree.arena.node(sibling).unwrap().tag(), "magazine");
    assert_eq!(tree.arena.path(sibling).unwrap(), NodePath::from([1]));
}

#[rstest]
fn given_root_when_making_sibling_then_invalid_operation(mut tree: Tree) {
    let err = tree
        .arena
        .make_sibling(tree.root, |s| s)
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation { .. }));
    assert_eq!(tree.arena.len(), 1);
}

// ============================================================
// path / get_from_path
// ============================================================

#[rstest]
fn given_root_when_getting_path_then_empty(tree: Tree) {
    assert_eq!(tree.arena.path(tree.root).unwrap(), NodePath::root());
}

#[rstest]
fn given_nested_tree_when_getting_paths_then_positional(mut tree: Tree) {
    let (book, price, pound) = nested(&mut tree);
    assert_eq!(tree.arena.path(book).unwrap(), NodePath::from([0]));
    assert_eq!(tree.arena.path(price).unwrap(), NodePath::from([0, 2]));
    assert_eq!(tree.arena.path(pound).unwrap(), NodePath::from([0, 2, 1]));
}

#[rstest]
fn given_paths_when_resolving_then_returns_same_nodes(mut tree: Tree) {
    let (_, price, pound) = nested(&mut tree);
    assert_eq!(
        tree.arena.get_from_path(tree.root, &NodePath::root()),
        Ok(tree.root)
    );
    assert_eq!(
        tree.arena.get_from_path(tree.root, &NodePath::from([0, 2])),
        Ok(price)
    );
    assert_eq!(
        tree.arena.get_from_path(tree.root, &NodePath::from([0, 2, 1])),
        Ok(pound)
    );
    assert_tree_invariants(&tree.arena, tree.root);
}

#[rstest]
fn given_missing_path_when_resolving_then_out_of_range_names_full_path(mut tree: Tree) {
    let err = tree
        .arena
        .get_from_path(tree.root, &NodePath::from([0]))
        .unwrap_err();
    assert_eq!(err.to_string(), "no element found at path [0]");

    tree.arena.make_child(tree.root, "book").unwrap();
    let err = tree
        .arena
        .get_from_path(tree.root, &NodePath::from([0, 0]))
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::OutOfRange {
            path: NodePath::from([0, 0])
        }
    );
    assert_eq!(err.to_string(), "no element found at path [0, 0]");
}

// ============================================================
// remove_from_path
// ============================================================

#[rstest]
fn given_empty_path_when_removing_then_root_is_kept(mut tree: Tree) {
    let err = tree
        .arena
        .remove_from_path(tree.root, &NodePath::root())
        .unwrap_err();
    assert_eq!(err.to_string(), "cannot remove root element");
    assert!(tree.arena.contains(tree.root));
}

#[rstest]
fn given_missing_path_when_removing_then_out_of_range(mut tree: Tree) {
    let err = tree
        .arena
        .remove_from_path(tree.root, &NodePath::from([0]))
        .unwrap_err();
    assert_eq!(err.to_string(), "no element found at path [0]");

    let err = tree
        .arena
        .remove_from_path(tree.root, &NodePath::from([3, 1]))
        .unwrap_err();
    assert_eq!(err.to_string(), "no element found at path [3, 1]");
}

#[rstest]
fn given_leaf_when_removing_then_size_shrinks(mut tree: Tree) {
    tree.arena.make_child(tree.root, "book").unwrap();
    let second = tree.arena.make_child(tree.root, "book").unwrap();

    let removed = tree
        .arena
        .remove_from_path(tree.root, &NodePath::from([1]))
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(tree.arena.size(tree.root).unwrap(), 2);
    assert!(tree
        .arena
        .descendants(tree.root)
        .unwrap()
        .all(|n| n.id() != second));
}

#[rstest]
fn given_subtree_when_removing_then_all_descendants_are_gone(mut tree: Tree) {
    let (_, price, pound) = nested(&mut tree);
    let before = tree.arena.size(tree.root).unwrap();
    let subtree = tree.arena.size(price).unwrap();

    tree.arena
        .remove_from_path(tree.root, &NodePath::from([0, 2]))
        .unwrap();

    assert_eq!(tree.arena.size(tree.root).unwrap(), before - subtree);
    assert_eq!(tree.arena.size(tree.root).unwrap(), 4);
    let remaining: Vec<NodeId> = tree
        .arena
        .descendants(tree.root)
        .unwrap()
        .map(|n| n.id())
        .collect();
    assert!(!remaining.contains(&price));
    assert!(!remaining.contains(&pound));
    assert_tree_invariants(&tree.arena, tree.root);
}

#[rstest]
fn given_three_children_when_removing_first_then_paths_shift(mut tree: Tree) {
    let _first = tree.arena.make_child(tree.root, "a").unwrap();
    let second = tree.arena.make_child(tree.root, "b").unwrap();
    let third = tree.arena.make_child(tree.root, "c").unwrap();
    assert_eq!(tree.arena.path(third).unwrap(), NodePath::from([2]));

    tree.arena
        .remove_from_path(tree.root, &NodePath::from([0]))
        .unwrap();

    assert_eq!(tree.arena.path(second).unwrap(), NodePath::from([0]));
    assert_eq!(tree.arena.path(third).unwrap(), NodePath::from([1]));
}

// ============================================================
// Metrics
// ============================================================

#[rstest]
fn given_chain_when_measuring_depth_then_counts_hops(mut tree: Tree) {
    assert_eq!(tree.arena.depth(tree.root).unwrap(), 0);
    let book = tree.arena.make_child(tree.root, "book").unwrap();
    let title = tree.arena.make_child(book, "title").unwrap();
    let colour = tree.arena.make_child(title, "colour").unwrap();
    assert_eq!(tree.arena.depth(book).unwrap(), 1);
    assert_eq!(tree.arena.depth(title).unwrap(), 2);
    assert_eq!(tree.arena.depth(colour).unwrap(), 3);
}

#[rstest]
fn given_children_and_grandchildren_when_counting_then_only_direct(mut tree: Tree) {
    assert_eq!(tree.arena.no_children(tree.root).unwrap(), 0);
    let book = tree.arena.make_child(tree.root, "book").unwrap();
    let sibling = tree.arena.make_sibling(book, |s| s).unwrap();
    tree.arena.make_child(sibling, "title").unwrap();
    assert_eq!(tree.arena.no_children(tree.root).unwrap(), 2);
    assert_eq!(tree.arena.size(tree.root).unwrap(), 4);
}

#[rstest]
fn given_no_children_when_last_child_then_none(tree: Tree) {
    assert_eq!(tree.arena.last_child(tree.root).unwrap(), None);
    assert_eq!(tree.arena.size(tree.root).unwrap(), 1);
}

#[rstest]
fn given_many_children_when_last_child_then_most_recent(mut tree: Tree) {
    let ids: Vec<NodeId> = (0..3)
        .map(|_| tree.arena.make_child(tree.root, "book").unwrap())
        .collect();
    assert_eq!(tree.arena.last_child(tree.root).unwrap(), Some(ids[2]));
}

// ============================================================
// Iteration
// ============================================================

#[rstest]
fn given_lone_root_when_iterating_then_yields_only_root(tree: Tree) {
    let all: Vec<NodeId> = tree
        .arena
        .descendants(tree.root)
        .unwrap()
        .map(|n| n.id())
        .collect();
    assert_eq!(all, vec![tree.root]);
}

#[rstest]
fn given_deep_tree_when_iterating_then_pre_order(mut tree: Tree) {
    let b1 = tree.arena.make_child(tree.root, "book").unwrap();
    let t1 = tree
        .arena
        .make_child(b1, ElementSpec::new("title").value("Harry Potter"))
        .unwrap();
    let b2 = tree.arena.make_child(tree.root, "book").unwrap();
    let t2 = tree
        .arena
        .make_child(b2, ElementSpec::new("title").value("Normal People"))
        .unwrap();
    let b3 = tree.arena.make_child(tree.root, "book").unwrap();
    let t3 = tree
        .arena
        .make_child(b3, ElementSpec::new("title").value("To Kill a Mockingbird"))
        .unwrap();
    let p3 = tree
        .arena
        .make_child(b3, ElementSpec::new("price").value(9.99))
        .unwrap();

    let first: Vec<NodeId> = tree
        .arena
        .descendants(tree.root)
        .unwrap()
        .map(|n| n.id())
        .collect();
    let second: Vec<NodeId> = tree
        .arena
        .descendants(tree.root)
        .unwrap()
        .map(|n| n.id())
        .collect();

    assert_eq!(first, vec![tree.root, b1, t1, b2, t2, b3, t3, p3]);
    assert_eq!(first, second);
    assert_eq!(tree.arena.size(tree.root).unwrap(), 8);
}

#[rstest]
fn given_mutation_between_walks_when_iterating_then_reflects_live_state(mut tree: Tree) {
    let book = tree.arena.make_child(tree.root, "book").unwrap();
    assert_eq!(tree.arena.descendants(tree.root).unwrap().count(), 2);

    let title = tree.arena.make_child(book, "title").unwrap();
    let walk: Vec<NodeId> = tree
        .arena
        .descendants(tree.root)
        .unwrap()
        .map(|n| n.id())
        .collect();
    assert_eq!(walk, vec![tree.root, book, title]);
}
