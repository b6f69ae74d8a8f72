// ABOUTME: Structural identity token for split trees.
// ABOUTME: Lets renderers skip rebuilding views when the layout shape is unchanged.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use pw_core::Direction;

use crate::tree::{Node, SplitTree};

const EMPTY_TAG: u8 = 0;
const LEAF_TAG: u8 = 1;
const SPLIT_TAG: u8 = 2;

/// Hash over tree shape, split direction and ratio, and leaf views in
/// traversal order. Zoom is a display override and does not contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructuralIdentity(u64);

impl StructuralIdentity {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl SplitTree {
    pub fn structural_identity(&self) -> StructuralIdentity {
        let mut hasher = FxHasher::default();
        match self.root() {
            Some(root) => hash_node(root, &mut hasher),
            None => hasher.write_u8(EMPTY_TAG),
        }
        StructuralIdentity(hasher.finish())
    }
}

fn hash_node(node: &Node, hasher: &mut FxHasher) {
    match node {
        Node::Leaf(view) => {
            hasher.write_u8(LEAF_TAG);
            hasher.write_u64(view.0);
        }
        Node::Split {
            direction,
            ratio,
            left,
            right,
        } => {
            hasher.write_u8(SPLIT_TAG);
            hasher.write_u8(match direction {
                Direction::Horizontal => 0,
                Direction::Vertical => 1,
            });
            hasher.write_u32(ratio.to_bits());
            hash_node(left, hasher);
            hash_node(right, hasher);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tree::NewDirection;
    use pw_core::ViewId;

    fn pair(a: u64, b: u64) -> SplitTree {
        SplitTree::with_view(ViewId(a))
            .inserting(ViewId(b), ViewId(a), NewDirection::Right)
            .unwrap()
    }

    #[test]
    fn equal_layouts_from_distinct_instances_match() {
        assert_eq!(pair(1, 2).structural_identity(), pair(1, 2).structural_identity());
    }

    #[test]
    fn shape_change_invalidates() {
        let tree = pair(1, 2);
        let grown = tree
            .inserting(ViewId(3), ViewId(2), NewDirection::Down)
            .unwrap();
        assert_ne!(tree.structural_identity(), grown.structural_identity());
        assert_ne!(
            tree.structural_identity(),
            tree.removing(ViewId(2)).structural_identity()
        );
    }

    #[test]
    fn leaf_identity_and_order_matter() {
        assert_ne!(pair(1, 2).structural_identity(), pair(2, 1).structural_identity());
        assert_ne!(pair(1, 2).structural_identity(), pair(1, 3).structural_identity());
    }

    #[test]
    fn ratio_and_direction_matter() {
        let tree = pair(1, 2);
        let root = Arc::clone(tree.root().unwrap());
        assert_ne!(
            tree.structural_identity(),
            tree.resizing(&root, 0.3).structural_identity()
        );

        let vertical = SplitTree::with_view(ViewId(1))
            .inserting(ViewId(2), ViewId(1), NewDirection::Down)
            .unwrap();
        assert_ne!(tree.structural_identity(), vertical.structural_identity());
    }

    #[test]
    fn zoom_does_not_change_identity() {
        let tree = pair(1, 2);
        let leaf = Arc::clone(tree.find_leaf(ViewId(1)).unwrap());
        assert_eq!(
            tree.structural_identity(),
            tree.zoom(&leaf).structural_identity()
        );
    }

    #[test]
    fn empty_tree_has_stable_identity() {
        assert_eq!(
            SplitTree::new().structural_identity(),
            SplitTree::with_view(ViewId(1)).removing(ViewId(1)).structural_identity()
        );
    }
}
