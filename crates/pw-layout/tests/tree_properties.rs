//! Property invariants for split tree insertion and removal.
//!
//! Trees are grown from random operation streams so every property is checked
//! against many shapes rather than a handful of fixtures.

use proptest::prelude::*;
use pw_layout::{LayoutError, NewDirection, SplitTree, ViewId};

const EDGES: [NewDirection; 4] = [
    NewDirection::Left,
    NewDirection::Right,
    NewDirection::Up,
    NewDirection::Down,
];

/// Grow a tree from (anchor pick, edge pick) pairs. Views are numbered from 1.
fn grow(steps: &[(usize, usize)]) -> SplitTree {
    let mut tree = SplitTree::with_view(ViewId(1));
    for (i, (anchor_pick, edge_pick)) in steps.iter().enumerate() {
        let leaves: Vec<ViewId> = tree.leaves().collect();
        let anchor = leaves[anchor_pick % leaves.len()];
        let view = ViewId(i as u64 + 2);
        tree = tree
            .inserting(view, anchor, EDGES[edge_pick % EDGES.len()])
            .expect("fresh view next to existing anchor");
    }
    tree
}

fn steps() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..64, 0usize..4), 0..24)
}

proptest! {
    #[test]
    fn insert_adds_exactly_one_and_keeps_order(
        steps in steps(),
        anchor_pick in 0usize..64,
        edge_pick in 0usize..4,
    ) {
        let tree = grow(&steps);
        let before: Vec<ViewId> = tree.leaves().collect();
        let anchor = before[anchor_pick % before.len()];
        let view = ViewId(10_000);

        let after = tree.inserting(view, anchor, EDGES[edge_pick]).unwrap();
        let leaves: Vec<ViewId> = after.leaves().collect();

        prop_assert!(after.contains(view));
        prop_assert_eq!(leaves.len(), before.len() + 1);
        prop_assert_eq!(leaves.iter().filter(|v| **v == view).count(), 1);
        let without: Vec<ViewId> = leaves.into_iter().filter(|v| *v != view).collect();
        prop_assert_eq!(without, before);
    }

    #[test]
    fn duplicate_insert_fails_and_leaves_tree_unchanged(
        steps in steps(),
        dup_pick in 0usize..64,
        anchor_pick in 0usize..64,
    ) {
        let tree = grow(&steps);
        let leaves: Vec<ViewId> = tree.leaves().collect();
        let duplicate = leaves[dup_pick % leaves.len()];
        let anchor = leaves[anchor_pick % leaves.len()];
        let snapshot = tree.clone();

        prop_assert_eq!(
            tree.inserting(duplicate, anchor, NewDirection::Right),
            Err(LayoutError::DuplicateView)
        );
        prop_assert_eq!(tree, snapshot);
    }

    #[test]
    fn remove_drops_exactly_one(steps in steps(), pick in 0usize..64) {
        let tree = grow(&steps);
        let before: Vec<ViewId> = tree.leaves().collect();
        let victim = before[pick % before.len()];

        let after = tree.removing(victim);
        let leaves: Vec<ViewId> = after.leaves().collect();

        prop_assert!(!after.contains(victim));
        prop_assert_eq!(leaves.len(), before.len() - 1);
        let expected: Vec<ViewId> = before.into_iter().filter(|v| *v != victim).collect();
        prop_assert_eq!(leaves, expected);
    }

    #[test]
    fn remove_missing_is_identity(steps in steps()) {
        let tree = grow(&steps);
        prop_assert_eq!(tree.removing(ViewId(99_999)), tree);
    }

    #[test]
    fn rects_tile_the_unit_square(steps in steps()) {
        let tree = grow(&steps);
        let area: f32 = tree
            .rects(pw_layout::Rect::full())
            .iter()
            .map(|(_, r)| r.width * r.height)
            .sum();
        prop_assert!((area - 1.0).abs() < 1e-3);
    }
}
