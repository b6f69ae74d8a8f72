// ABOUTME: Immutable binary tree structure for terminal pane layout.
// ABOUTME: Every operation returns a new tree; untouched subtrees are shared.

use std::sync::Arc;

use pw_core::{Direction, Point, Rect, ViewId};

use crate::error::LayoutError;

pub const MIN_RATIO: f32 = 0.05;
pub const MAX_RATIO: f32 = 0.95;
pub const DEFAULT_RATIO: f32 = 0.5;

const EPSILON: f32 = 1e-4;

/// Clamp a split ratio into the range that keeps both panes visible.
pub fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        DEFAULT_RATIO
    } else {
        ratio.clamp(MIN_RATIO, MAX_RATIO)
    }
}

/// Edge of the anchor pane where a new pane is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NewDirection {
    pub fn direction(self) -> Direction {
        match self {
            NewDirection::Left | NewDirection::Right => Direction::Horizontal,
            NewDirection::Up | NewDirection::Down => Direction::Vertical,
        }
    }

    /// Whether the new pane becomes the first (left or top) child
    pub fn new_view_first(self) -> bool {
        matches!(self, NewDirection::Left | NewDirection::Up)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    Previous,
    Next,
    Spatial(SpatialDirection),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(ViewId),
    Split {
        direction: Direction,
        ratio: f32,
        left: Arc<Node>,
        right: Arc<Node>,
    },
}

impl Node {
    pub fn leaf(view: ViewId) -> Arc<Node> {
        Arc::new(Node::Leaf(view))
    }

    pub fn split(direction: Direction, ratio: f32, left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Arc::new(Node::Split {
            direction,
            ratio: clamp_ratio(ratio),
            left,
            right,
        })
    }

    pub fn view(&self) -> Option<ViewId> {
        match self {
            Node::Leaf(view) => Some(*view),
            Node::Split { .. } => None,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Node::Split { .. })
    }

    /// Left-to-right depth-first walk over the views in this subtree
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn leftmost(&self) -> ViewId {
        match self {
            Node::Leaf(view) => *view,
            Node::Split { left, .. } => left.leftmost(),
        }
    }

    fn rightmost(&self) -> ViewId {
        match self {
            Node::Leaf(view) => *view,
            Node::Split { right, .. } => right.rightmost(),
        }
    }

    fn child(&self, side: Side) -> Option<&Arc<Node>> {
        match (self, side) {
            (Node::Split { left, .. }, Side::Left) => Some(left),
            (Node::Split { right, .. }, Side::Right) => Some(right),
            (Node::Leaf(_), _) => None,
        }
    }
}

/// Lazy leaf iterator. Call `leaves()` again to restart.
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Leaf(view) => return Some(*view),
                Node::Split { left, right, .. } => {
                    self.stack.push(right.as_ref());
                    self.stack.push(left.as_ref());
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A binary tree of panes plus an optional zoomed subtree.
///
/// Cloning is cheap. Nodes are handed out as `Arc<Node>` and addressed by
/// pointer identity, so a node taken from an older tree is simply not found in
/// a newer one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitTree {
    root: Option<Arc<Node>>,
    zoomed: Option<Arc<Node>>,
}

impl SplitTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(view: ViewId) -> Self {
        Self {
            root: Some(Node::leaf(view)),
            zoomed: None,
        }
    }

    /// Wrap an existing node, rejecting trees that hold a view twice.
    pub fn from_node(root: Arc<Node>) -> Result<Self, LayoutError> {
        let mut seen: Vec<ViewId> = root.leaves().collect();
        seen.sort_unstable();
        if seen.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(LayoutError::DuplicateView);
        }
        Ok(Self {
            root: Some(root),
            zoomed: None,
        })
    }

    pub fn root(&self) -> Option<&Arc<Node>> {
        self.root.as_ref()
    }

    pub fn zoomed(&self) -> Option<&Arc<Node>> {
        self.zoomed.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: self.root.iter().map(|root| root.as_ref()).collect(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.leaf_count())
    }

    pub fn contains(&self, view: ViewId) -> bool {
        self.leaves().any(|leaf| leaf == view)
    }

    pub fn leftmost_leaf(&self) -> Result<ViewId, LayoutError> {
        self.root
            .as_ref()
            .map(|root| root.leftmost())
            .ok_or(LayoutError::EmptyTree)
    }

    pub fn rightmost_leaf(&self) -> Result<ViewId, LayoutError> {
        self.root
            .as_ref()
            .map(|root| root.rightmost())
            .ok_or(LayoutError::EmptyTree)
    }

    /// The leaf node holding `view`
    pub fn find_leaf(&self, view: ViewId) -> Option<&Arc<Node>> {
        let root = self.root.as_ref()?;
        let path = path_where(root, |node| node.view() == Some(view))?;
        node_at(root, &path)
    }

    /// Deepest split above `view` that divides space along `direction`
    pub fn nearest_split(&self, view: ViewId, direction: Direction) -> Option<&Arc<Node>> {
        let root = self.root.as_ref()?;
        let path = path_where(root, |node| node.view() == Some(view))?;
        (0..path.len())
            .rev()
            .filter_map(|depth| node_at(root, &path[..depth]))
            .find(|node| matches!(***node, Node::Split { direction: d, .. } if d == direction))
    }

    /// Replace the `anchor` leaf with a split holding both `anchor` and `view`.
    pub fn inserting(
        &self,
        view: ViewId,
        anchor: ViewId,
        direction: NewDirection,
    ) -> Result<SplitTree, LayoutError> {
        let root = self.root.as_ref().ok_or(LayoutError::AnchorNotFound)?;
        let path = path_where(root, |node| node.view() == Some(anchor))
            .ok_or(LayoutError::AnchorNotFound)?;
        if self.contains(view) {
            return Err(LayoutError::DuplicateView);
        }

        let anchor_node = Node::leaf(anchor);
        let new_node = Node::leaf(view);
        let (left, right) = if direction.new_view_first() {
            (new_node, anchor_node)
        } else {
            (anchor_node, new_node)
        };
        let split = Node::split(direction.direction(), DEFAULT_RATIO, left, right);

        Ok(SplitTree {
            root: Some(replace_at(root, &path, split)),
            zoomed: None,
        })
    }

    /// Remove the leaf holding `view`, collapsing its parent split into the
    /// sibling. Removing a view that is not present returns the tree unchanged.
    ///
    /// Zoom survives only while the zoomed node itself is still in the new
    /// tree. Zooming the removed leaf, the split that collapsed, or any
    /// ancestor rebuilt on the way up clears it.
    pub fn removing(&self, view: ViewId) -> SplitTree {
        let Some(root) = self.root.as_ref() else {
            tracing::debug!("Remove of {} from empty tree ignored", view);
            return self.clone();
        };
        let Some(path) = path_where(root, |node| node.view() == Some(view)) else {
            tracing::debug!("Remove of {} ignored, not in tree", view);
            return self.clone();
        };
        let Some((last, parent_path)) = path.split_last() else {
            return SplitTree::new();
        };
        let sibling = node_at(root, parent_path).and_then(|parent| match last {
            Side::Left => parent.child(Side::Right),
            Side::Right => parent.child(Side::Left),
        });
        let Some(sibling) = sibling else {
            return self.clone();
        };

        let new_root = replace_at(root, parent_path, Arc::clone(sibling));
        let zoomed = self
            .zoomed
            .as_ref()
            .filter(|zoomed| path_where(&new_root, |node| Arc::ptr_eq(node, zoomed)).is_some())
            .cloned();
        SplitTree {
            root: Some(new_root),
            zoomed,
        }
    }

    /// Set the ratio of the split `node`. Leaves and nodes outside this tree
    /// leave the tree unchanged.
    pub fn resizing(&self, node: &Arc<Node>, ratio: f32) -> SplitTree {
        let Node::Split {
            direction,
            left,
            right,
            ..
        } = node.as_ref()
        else {
            tracing::debug!("Resize ignored, node is not a split");
            return self.clone();
        };
        let Some(root) = self.root.as_ref() else {
            return self.clone();
        };
        let Some(path) = path_where(root, |candidate| Arc::ptr_eq(candidate, node)) else {
            tracing::debug!("Resize ignored, split is not in this tree");
            return self.clone();
        };

        let replacement = Node::split(*direction, ratio, Arc::clone(left), Arc::clone(right));
        let new_root = replace_at(root, &path, replacement);
        SplitTree {
            zoomed: self.remap_zoom(&new_root),
            root: Some(new_root),
        }
    }

    /// Display only `node` until `unzoom`. Nodes outside this tree are ignored.
    pub fn zoom(&self, node: &Arc<Node>) -> SplitTree {
        let found = self
            .root
            .as_ref()
            .and_then(|root| path_where(root, |candidate| Arc::ptr_eq(candidate, node)));
        if found.is_none() {
            tracing::debug!("Zoom ignored, node is not in this tree");
            return self.clone();
        }
        SplitTree {
            root: self.root.clone(),
            zoomed: Some(Arc::clone(node)),
        }
    }

    pub fn unzoom(&self) -> SplitTree {
        SplitTree {
            root: self.root.clone(),
            zoomed: None,
        }
    }

    /// Exchange the positions of two views.
    pub fn swapping(&self, a: ViewId, b: ViewId) -> Result<SplitTree, LayoutError> {
        if !self.contains(a) || !self.contains(b) {
            return Err(LayoutError::AnchorNotFound);
        }
        if a == b {
            return Ok(self.clone());
        }
        let Some(root) = self.root.as_ref() else {
            return Err(LayoutError::EmptyTree);
        };
        let new_root = map_leaves(root, &|view| {
            if view == a {
                b
            } else if view == b {
                a
            } else {
                view
            }
        });
        Ok(SplitTree {
            zoomed: self.remap_zoom(&new_root),
            root: Some(new_root),
        })
    }

    /// Give every pane along a run of same-direction splits an equal share.
    pub fn equalized(&self) -> SplitTree {
        let Some(root) = self.root.as_ref() else {
            return self.clone();
        };
        let new_root = equalize(root);
        SplitTree {
            zoomed: self.remap_zoom(&new_root),
            root: Some(new_root),
        }
    }

    /// Rects for every visible pane inside `bounds`, in leaf order. When a
    /// node is zoomed only its subtree is laid out.
    pub fn rects(&self, bounds: Rect) -> Vec<(ViewId, Rect)> {
        let mut out = Vec::new();
        if let Some(node) = self.zoomed.as_ref().or(self.root.as_ref()) {
            collect_rects(node, bounds, &mut out);
        }
        out
    }

    pub fn view_at(&self, point: Point, bounds: Rect) -> Option<(ViewId, Rect)> {
        self.rects(bounds)
            .into_iter()
            .find(|(_, rect)| rect.contains(point))
    }

    /// The pane focus should move to from `from`.
    pub fn focus_target(&self, from: ViewId, direction: FocusDirection) -> Option<ViewId> {
        match direction {
            FocusDirection::Previous | FocusDirection::Next => {
                let leaves: Vec<ViewId> = self.leaves().collect();
                let index = leaves.iter().position(|view| *view == from)?;
                let next = if direction == FocusDirection::Next {
                    (index + 1) % leaves.len()
                } else if index == 0 {
                    leaves.len() - 1
                } else {
                    index - 1
                };
                Some(leaves[next])
            }
            FocusDirection::Spatial(spatial) => self.spatial_neighbor(from, spatial),
        }
    }

    fn spatial_neighbor(&self, from: ViewId, direction: SpatialDirection) -> Option<ViewId> {
        let mut rects = Vec::new();
        if let Some(root) = self.root.as_ref() {
            collect_rects(root, Rect::full(), &mut rects);
        }
        let origin = rects.iter().find(|(view, _)| *view == from)?.1;

        let mut best: Option<(ViewId, f32, f32)> = None;
        for (view, rect) in &rects {
            if *view == from {
                continue;
            }
            let (distance, overlap) = match direction {
                SpatialDirection::Left => (
                    origin.x - rect.right(),
                    overlap(origin.y, origin.bottom(), rect.y, rect.bottom()),
                ),
                SpatialDirection::Right => (
                    rect.x - origin.right(),
                    overlap(origin.y, origin.bottom(), rect.y, rect.bottom()),
                ),
                SpatialDirection::Up => (
                    origin.y - rect.bottom(),
                    overlap(origin.x, origin.right(), rect.x, rect.right()),
                ),
                SpatialDirection::Down => (
                    rect.y - origin.bottom(),
                    overlap(origin.x, origin.right(), rect.x, rect.right()),
                ),
            };
            if distance < -EPSILON || overlap <= EPSILON {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_distance, best_overlap)) => {
                    distance < best_distance - EPSILON
                        || ((distance - best_distance).abs() <= EPSILON
                            && overlap > best_overlap + EPSILON)
                }
            };
            if better {
                best = Some((*view, distance, overlap));
            }
        }
        best.map(|(view, _, _)| view)
    }

    /// Point the zoom at the node occupying the same position in `new_root`.
    /// Only valid when `new_root` has the same shape as the current root.
    fn remap_zoom(&self, new_root: &Arc<Node>) -> Option<Arc<Node>> {
        let root = self.root.as_ref()?;
        let zoomed = self.zoomed.as_ref()?;
        let path = path_where(root, |node| Arc::ptr_eq(node, zoomed))?;
        node_at(new_root, &path).cloned()
    }
}

fn overlap(a_start: f32, a_end: f32, b_start: f32, b_end: f32) -> f32 {
    (a_end.min(b_end) - a_start.max(b_start)).max(0.0)
}

fn path_where<F>(root: &Arc<Node>, matches: F) -> Option<Vec<Side>>
where
    F: Fn(&Arc<Node>) -> bool,
{
    let mut path = Vec::new();
    find_path(root, &matches, &mut path).then_some(path)
}

fn find_path<F>(node: &Arc<Node>, matches: &F, path: &mut Vec<Side>) -> bool
where
    F: Fn(&Arc<Node>) -> bool,
{
    if matches(node) {
        return true;
    }
    for side in [Side::Left, Side::Right] {
        if let Some(child) = node.child(side) {
            path.push(side);
            if find_path(child, matches, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

fn node_at<'a>(root: &'a Arc<Node>, path: &[Side]) -> Option<&'a Arc<Node>> {
    path.iter()
        .try_fold(root, |node, side| node.child(*side))
}

/// Rebuild the ancestors along `path` with `replacement` at its end.
fn replace_at(node: &Arc<Node>, path: &[Side], replacement: Arc<Node>) -> Arc<Node> {
    let Some((side, rest)) = path.split_first() else {
        return replacement;
    };
    match node.as_ref() {
        Node::Split {
            direction,
            ratio,
            left,
            right,
        } => {
            let (left, right) = match side {
                Side::Left => (replace_at(left, rest, replacement), Arc::clone(right)),
                Side::Right => (Arc::clone(left), replace_at(right, rest, replacement)),
            };
            Arc::new(Node::Split {
                direction: *direction,
                ratio: *ratio,
                left,
                right,
            })
        }
        Node::Leaf(_) => Arc::clone(node),
    }
}

fn map_leaves(node: &Arc<Node>, f: &dyn Fn(ViewId) -> ViewId) -> Arc<Node> {
    match node.as_ref() {
        Node::Leaf(view) => Node::leaf(f(*view)),
        Node::Split {
            direction,
            ratio,
            left,
            right,
        } => Arc::new(Node::Split {
            direction: *direction,
            ratio: *ratio,
            left: map_leaves(left, f),
            right: map_leaves(right, f),
        }),
    }
}

fn equalize(node: &Arc<Node>) -> Arc<Node> {
    match node.as_ref() {
        Node::Leaf(_) => Arc::clone(node),
        Node::Split {
            direction,
            left,
            right,
            ..
        } => {
            let left_weight = axis_weight(left, *direction) as f32;
            let right_weight = axis_weight(right, *direction) as f32;
            Node::split(
                *direction,
                left_weight / (left_weight + right_weight),
                equalize(left),
                equalize(right),
            )
        }
    }
}

/// Number of panes a subtree contributes along `direction`
fn axis_weight(node: &Node, direction: Direction) -> usize {
    match node {
        Node::Split {
            direction: d,
            left,
            right,
            ..
        } if *d == direction => axis_weight(left, direction) + axis_weight(right, direction),
        _ => 1,
    }
}

fn collect_rects(node: &Node, rect: Rect, out: &mut Vec<(ViewId, Rect)>) {
    match node {
        Node::Leaf(view) => out.push((*view, rect)),
        Node::Split {
            direction,
            ratio,
            left,
            right,
        } => {
            let (first, second) = rect.split(*direction, *ratio);
            collect_rects(left, first, out);
            collect_rects(right, second, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ViewId = ViewId(1);
    const B: ViewId = ViewId(2);
    const C: ViewId = ViewId(3);
    const D: ViewId = ViewId(4);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    /// [A | [B / C]]
    fn three_panes() -> SplitTree {
        SplitTree::with_view(A)
            .inserting(B, A, NewDirection::Right)
            .unwrap()
            .inserting(C, B, NewDirection::Down)
            .unwrap()
    }

    #[test]
    fn new_tree_is_empty() {
        let tree = SplitTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.leaves().count(), 0);
        assert_eq!(tree.leftmost_leaf(), Err(LayoutError::EmptyTree));
        assert_eq!(tree.rightmost_leaf(), Err(LayoutError::EmptyTree));
    }

    #[test]
    fn insert_right_places_new_view_second() {
        let tree = SplitTree::with_view(A)
            .inserting(B, A, NewDirection::Right)
            .unwrap();
        let Some(root) = tree.root() else { panic!("empty") };
        match root.as_ref() {
            Node::Split {
                direction,
                ratio,
                left,
                right,
            } => {
                assert_eq!(*direction, Direction::Horizontal);
                assert!(approx(*ratio, 0.5));
                assert_eq!(left.view(), Some(A));
                assert_eq!(right.view(), Some(B));
            }
            Node::Leaf(_) => panic!("expected split"),
        }
    }

    #[test]
    fn insert_up_places_new_view_first() {
        let tree = SplitTree::with_view(A).inserting(B, A, NewDirection::Up).unwrap();
        match tree.root().unwrap().as_ref() {
            Node::Split {
                direction,
                left,
                right,
                ..
            } => {
                assert_eq!(*direction, Direction::Vertical);
                assert_eq!(left.view(), Some(B));
                assert_eq!(right.view(), Some(A));
            }
            Node::Leaf(_) => panic!("expected split"),
        }
    }

    #[test]
    fn insert_missing_anchor_fails() {
        let tree = SplitTree::with_view(A);
        assert_eq!(
            tree.inserting(B, C, NewDirection::Right),
            Err(LayoutError::AnchorNotFound)
        );
        assert_eq!(
            SplitTree::new().inserting(B, A, NewDirection::Right),
            Err(LayoutError::AnchorNotFound)
        );
    }

    #[test]
    fn insert_duplicate_fails_and_leaves_tree_alone() {
        let tree = three_panes();
        let before = tree.clone();
        assert_eq!(
            tree.inserting(C, A, NewDirection::Left),
            Err(LayoutError::DuplicateView)
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn insert_shares_untouched_subtrees() {
        let tree = three_panes();
        let next = tree.inserting(D, A, NewDirection::Down).unwrap();
        let old_right = tree.root().unwrap().child(Side::Right).unwrap();
        let new_right = next.root().unwrap().child(Side::Right).unwrap();
        assert!(Arc::ptr_eq(old_right, new_right));
    }

    #[test]
    fn leaves_are_left_to_right() {
        let tree = three_panes();
        assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![A, B, C]);
        // Restartable
        assert_eq!(tree.leaves().count(), 3);
        assert_eq!(tree.leftmost_leaf(), Ok(A));
        assert_eq!(tree.rightmost_leaf(), Ok(C));
    }

    #[test]
    fn remove_collapses_parent_into_sibling() {
        let tree = three_panes().removing(B);
        assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![A, C]);
        match tree.root().unwrap().as_ref() {
            Node::Split { direction, right, .. } => {
                assert_eq!(*direction, Direction::Horizontal);
                assert_eq!(right.view(), Some(C));
            }
            Node::Leaf(_) => panic!("expected split"),
        }
    }

    #[test]
    fn remove_sole_leaf_empties_tree() {
        assert!(SplitTree::with_view(A).removing(A).is_empty());
    }

    #[test]
    fn remove_missing_view_is_noop() {
        let tree = three_panes();
        assert_eq!(tree.removing(D), tree);
        assert!(SplitTree::new().removing(A).is_empty());
    }

    #[test]
    fn remove_then_reinsert_loses_split_metadata() {
        let tree = SplitTree::with_view(A)
            .inserting(B, A, NewDirection::Right)
            .unwrap();
        let root = Arc::clone(tree.root().unwrap());
        let tree = tree.resizing(&root, 0.7);

        let rebuilt = tree
            .removing(B)
            .inserting(B, A, NewDirection::Right)
            .unwrap();
        assert_eq!(rebuilt.leaves().collect::<Vec<_>>(), vec![A, B]);
        assert_ne!(rebuilt, tree);
        match rebuilt.root().unwrap().as_ref() {
            Node::Split { ratio, .. } => assert!(approx(*ratio, DEFAULT_RATIO)),
            Node::Leaf(_) => panic!("expected split"),
        }
    }

    #[test]
    fn resize_clamps_ratio() {
        let tree = three_panes();
        let root = Arc::clone(tree.root().unwrap());
        let resized = tree.resizing(&root, 0.0);
        match resized.root().unwrap().as_ref() {
            Node::Split { ratio, .. } => assert!(approx(*ratio, MIN_RATIO)),
            Node::Leaf(_) => panic!("expected split"),
        }
        let root = Arc::clone(resized.root().unwrap());
        match resized.resizing(&root, 2.0).root().unwrap().as_ref() {
            Node::Split { ratio, .. } => assert!(approx(*ratio, MAX_RATIO)),
            Node::Leaf(_) => panic!("expected split"),
        }
    }

    #[test]
    fn resize_leaf_or_stale_node_is_noop() {
        let tree = three_panes();
        let leaf = Arc::clone(tree.find_leaf(A).unwrap());
        assert_eq!(tree.resizing(&leaf, 0.3), tree);

        let stale = Arc::clone(tree.root().unwrap());
        let newer = tree.inserting(D, A, NewDirection::Down).unwrap();
        assert_eq!(newer.resizing(&stale, 0.3), newer);
    }

    #[test]
    fn zoom_survives_resize_of_ancestor() {
        let tree = three_panes();
        let inner = Arc::clone(tree.nearest_split(B, Direction::Vertical).unwrap());
        let zoomed = tree.zoom(&inner);
        assert!(zoomed.zoomed().is_some());

        let root = Arc::clone(zoomed.root().unwrap());
        let resized = zoomed.resizing(&root, 0.3);
        assert_eq!(resized.zoomed().map(|z| z.leaf_count()), Some(2));

        let zoomed_split = Arc::clone(resized.zoomed().unwrap());
        let resized = resized.resizing(&zoomed_split, 0.8);
        match resized.zoomed().unwrap().as_ref() {
            Node::Split { ratio, .. } => assert!(approx(*ratio, 0.8)),
            Node::Leaf(_) => panic!("expected split"),
        }
    }

    #[test]
    fn insert_clears_zoom() {
        let tree = three_panes();
        let leaf = Arc::clone(tree.find_leaf(A).unwrap());
        let zoomed = tree.zoom(&leaf);
        assert!(zoomed.zoomed().is_some());
        let next = zoomed.inserting(D, C, NewDirection::Right).unwrap();
        assert!(next.zoomed().is_none());
    }

    #[test]
    fn remove_clears_zoom_only_when_zoomed_node_goes() {
        let tree = three_panes();
        let a = Arc::clone(tree.find_leaf(A).unwrap());
        let zoomed = tree.zoom(&a);
        assert!(zoomed.removing(C).zoomed().is_some());
        assert!(zoomed.removing(A).zoomed().is_none());
    }

    #[test]
    fn remove_clears_zoom_on_collapsed_or_rebuilt_split() {
        let tree = three_panes();
        let root = Arc::clone(tree.root().unwrap());
        let column = Arc::clone(root.child(Side::Right).unwrap());

        let zoomed = tree.zoom(&column);
        assert!(zoomed.removing(C).zoomed().is_none());
        assert!(Arc::ptr_eq(zoomed.removing(A).zoomed().unwrap(), &column));

        assert!(tree.zoom(&root).removing(B).zoomed().is_none());
    }

    #[test]
    fn zoom_of_foreign_node_is_ignored() {
        let tree = three_panes();
        let foreign = Node::leaf(D);
        assert!(tree.zoom(&foreign).zoomed().is_none());
        let leaf = Arc::clone(tree.find_leaf(B).unwrap());
        assert!(tree.zoom(&leaf).unzoom().zoomed().is_none());
    }

    #[test]
    fn rects_partition_bounds() {
        let rects = three_panes().rects(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0], (A, Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(rects[1], (B, Rect::new(50.0, 0.0, 50.0, 25.0)));
        assert_eq!(rects[2], (C, Rect::new(50.0, 25.0, 50.0, 25.0)));
    }

    #[test]
    fn rects_honour_zoom() {
        let tree = three_panes();
        let leaf = Arc::clone(tree.find_leaf(C).unwrap());
        let rects = tree.zoom(&leaf).rects(Rect::full());
        assert_eq!(rects, vec![(C, Rect::full())]);
    }

    #[test]
    fn view_at_hit_tests() {
        let tree = three_panes();
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(tree.view_at(Point::new(10.0, 90.0), bounds).map(|(v, _)| v), Some(A));
        assert_eq!(tree.view_at(Point::new(60.0, 90.0), bounds).map(|(v, _)| v), Some(C));
        assert!(tree.view_at(Point::new(200.0, 10.0), bounds).is_none());
    }

    #[test]
    fn focus_previous_and_next_wrap() {
        let tree = three_panes();
        assert_eq!(tree.focus_target(C, FocusDirection::Next), Some(A));
        assert_eq!(tree.focus_target(A, FocusDirection::Previous), Some(C));
        assert_eq!(tree.focus_target(D, FocusDirection::Next), None);
    }

    #[test]
    fn focus_spatial_picks_adjacent_pane() {
        let tree = three_panes();
        let right = FocusDirection::Spatial(SpatialDirection::Right);
        let left = FocusDirection::Spatial(SpatialDirection::Left);
        let down = FocusDirection::Spatial(SpatialDirection::Down);
        assert_eq!(tree.focus_target(A, right), Some(B));
        assert_eq!(tree.focus_target(C, left), Some(A));
        assert_eq!(tree.focus_target(B, down), Some(C));
        assert_eq!(tree.focus_target(A, left), None);
    }

    #[test]
    fn equalize_weights_runs_of_same_direction() {
        let tree = SplitTree::with_view(A)
            .inserting(B, A, NewDirection::Right)
            .unwrap()
            .inserting(C, B, NewDirection::Right)
            .unwrap()
            .equalized();
        let widths: Vec<f32> = tree
            .rects(Rect::full())
            .into_iter()
            .map(|(_, r)| r.width)
            .collect();
        for width in widths {
            assert!(approx(width, 1.0 / 3.0));
        }
    }

    #[test]
    fn swapping_exchanges_positions() {
        let tree = three_panes().swapping(A, C).unwrap();
        assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![C, B, A]);
        assert_eq!(
            three_panes().swapping(A, D),
            Err(LayoutError::AnchorNotFound)
        );
    }

    #[test]
    fn from_node_rejects_duplicates() {
        let node = Node::split(Direction::Horizontal, 0.5, Node::leaf(A), Node::leaf(A));
        assert_eq!(SplitTree::from_node(node), Err(LayoutError::DuplicateView));
    }

    #[test]
    fn nearest_split_matches_axis() {
        let tree = three_panes();
        let horizontal = tree.nearest_split(C, Direction::Horizontal).unwrap();
        assert!(Arc::ptr_eq(horizontal, tree.root().unwrap()));
        assert!(tree.nearest_split(A, Direction::Vertical).is_none());
    }
}
