//! Order properties over generated terms.

#![allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

mod common;

use std::cmp::Ordering;

use common::{fixture, Fixture};
use morel_heap::{Heap, Word};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Tree {
    Leaf(i64),
    Node(Box<Tree>, Box<Tree>),
}

#[derive(Clone, Debug)]
enum Shape {
    Dot,
    Circle(i64),
    Rect(i64, i64),
    Label(String),
}

fn tree() -> impl Strategy<Value = Tree> {
    (-4i64..4).prop_map(Tree::Leaf).prop_recursive(4, 24, 2, |inner| {
        (inner.clone(), inner).prop_map(|(l, r)| Tree::Node(Box::new(l), Box::new(r)))
    })
}

fn shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::Dot),
        (-3i64..3).prop_map(Shape::Circle),
        (-2i64..2, -2i64..2).prop_map(|(w, h)| Shape::Rect(w, h)),
        "[a-c\u{e9}]{0,3}".prop_map(Shape::Label),
    ]
}

/// Declaration order first, then arguments left to right.
fn tree_order(a: &Tree, b: &Tree) -> Ordering {
    match (a, b) {
        (Tree::Leaf(x), Tree::Leaf(y)) => x.cmp(y),
        (Tree::Leaf(_), Tree::Node(..)) => Ordering::Less,
        (Tree::Node(..), Tree::Leaf(_)) => Ordering::Greater,
        (Tree::Node(al, ar), Tree::Node(bl, br)) => {
            tree_order(al, bl).then_with(|| tree_order(ar, br))
        }
    }
}

fn shape_order(a: &Shape, b: &Shape) -> Ordering {
    fn ordinal(s: &Shape) -> u8 {
        match s {
            Shape::Dot => 0,
            Shape::Circle(_) => 1,
            Shape::Rect(..) => 2,
            Shape::Label(_) => 3,
        }
    }
    match (a, b) {
        (Shape::Circle(x), Shape::Circle(y)) => x.cmp(y),
        (Shape::Rect(aw, ah), Shape::Rect(bw, bh)) => aw.cmp(bw).then(ah.cmp(bh)),
        (Shape::Label(x), Shape::Label(y)) => x.as_bytes().cmp(y.as_bytes()),
        _ => ordinal(a).cmp(&ordinal(b)),
    }
}

fn build_tree(f: &Fixture, heap: &mut Heap, t: &Tree) -> Word {
    match t {
        Tree::Leaf(n) => f.leaf(heap, *n),
        Tree::Node(l, r) => {
            let l = build_tree(f, heap, l);
            let r = build_tree(f, heap, r);
            f.node(heap, l, r)
        }
    }
}

fn build_shape(f: &Fixture, heap: &mut Heap, s: &Shape) -> Word {
    match s {
        Shape::Dot => f.dot(heap),
        Shape::Circle(r) => f.circle(heap, *r),
        Shape::Rect(w, h) => f.rect(heap, *w, *h),
        Shape::Label(text) => f.label(heap, text),
    }
}

proptest! {
    #[test]
    fn tree_compare_matches_declaration_order(a in tree(), b in tree()) {
        let f = fixture();
        let mut heap = f.runtime.new_heap();
        let x = build_tree(&f, &mut heap, &a);
        let y = build_tree(&f, &mut heap, &b);
        let ti = f.ti(f.tree, vec![]);
        let mut engine = f.runtime.engine(&mut heap);

        let expected = tree_order(&a, &b);
        prop_assert_eq!(engine.compare(&ti, x, y), expected);
        prop_assert_eq!(engine.compare_representation(&ti, x, y), expected);
        prop_assert_eq!(engine.unify(&ti, x, y), expected == Ordering::Equal);
    }

    #[test]
    fn compare_is_reflexive_and_antisymmetric(a in shape(), b in shape()) {
        let f = fixture();
        let mut heap = f.runtime.new_heap();
        let x = build_shape(&f, &mut heap, &a);
        let x_copy = build_shape(&f, &mut heap, &a);
        let y = build_shape(&f, &mut heap, &b);
        let ti = f.ti(f.shape, vec![]);
        let mut engine = f.runtime.engine(&mut heap);

        prop_assert!(engine.unify(&ti, x, x));
        prop_assert!(engine.unify(&ti, x, x_copy));
        prop_assert_eq!(engine.compare(&ti, x, x_copy), Ordering::Equal);

        let xy = engine.compare(&ti, x, y);
        let yx = engine.compare(&ti, y, x);
        prop_assert_eq!(xy, yx.reverse());
        prop_assert_eq!(xy, shape_order(&a, &b));
    }

    #[test]
    fn compare_is_transitive(a in shape(), b in shape(), c in shape()) {
        let f = fixture();
        let mut heap = f.runtime.new_heap();
        let x = build_shape(&f, &mut heap, &a);
        let y = build_shape(&f, &mut heap, &b);
        let z = build_shape(&f, &mut heap, &c);
        let list_shape = f.ti(f.list, vec![f.ti(f.shape, vec![])]);
        // Lift into single-element lists to exercise the polymorphic path.
        let mut lists = Vec::new();
        for w in [x, y, z] {
            lists.push(f.list_of(&mut heap, &[w]));
        }
        let mut engine = f.runtime.engine(&mut heap);

        let (lx, ly, lz) = (lists[0], lists[1], lists[2]);
        let xy = engine.compare(&list_shape, lx, ly);
        let yz = engine.compare(&list_shape, ly, lz);
        let xz = engine.compare(&list_shape, lx, lz);
        if xy == Ordering::Less && yz == Ordering::Less {
            prop_assert_eq!(xz, Ordering::Less);
        }
        if xy == Ordering::Equal && yz == Ordering::Equal {
            prop_assert_eq!(xz, Ordering::Equal);
        }
    }

    #[test]
    fn unify_agrees_with_compare(a in shape(), b in shape()) {
        let f = fixture();
        let mut heap = f.runtime.new_heap();
        let x = build_shape(&f, &mut heap, &a);
        let y = build_shape(&f, &mut heap, &b);
        let ti = f.ti(f.shape, vec![]);
        let mut engine = f.runtime.engine(&mut heap);

        let equal = engine.compare(&ti, x, y) == Ordering::Equal;
        prop_assert_eq!(engine.unify(&ti, x, y), equal);
    }
}
