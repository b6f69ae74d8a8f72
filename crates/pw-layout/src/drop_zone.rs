// ABOUTME: Maps a pointer position over a pane to the edge it is closest to.
// ABOUTME: The four zones meet on the pane's diagonals.

use pw_core::{Point, Rect};

use crate::tree::NewDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    Top,
    Bottom,
    Left,
    Right,
}

impl DropZone {
    /// Portion of `bounds` a dropped pane would occupy, for drop previews.
    pub fn preview(self, bounds: Rect) -> Rect {
        let half_w = bounds.width / 2.0;
        let half_h = bounds.height / 2.0;
        match self {
            DropZone::Left => Rect::new(bounds.x, bounds.y, half_w, bounds.height),
            DropZone::Right => Rect::new(bounds.x + half_w, bounds.y, half_w, bounds.height),
            DropZone::Top => Rect::new(bounds.x, bounds.y, bounds.width, half_h),
            DropZone::Bottom => Rect::new(bounds.x, bounds.y + half_h, bounds.width, half_h),
        }
    }
}

impl From<DropZone> for NewDirection {
    fn from(zone: DropZone) -> Self {
        match zone {
            DropZone::Left => NewDirection::Left,
            DropZone::Right => NewDirection::Right,
            DropZone::Top => NewDirection::Up,
            DropZone::Bottom => NewDirection::Down,
        }
    }
}

/// Classify `point` against `bounds` by nearest edge.
///
/// Ties (points on a diagonal, or the exact center) resolve in the order
/// left, right, top, bottom.
pub fn classify(point: Point, bounds: Rect) -> DropZone {
    let rel = bounds.normalize(point);
    let candidates = [
        (DropZone::Left, rel.x),
        (DropZone::Right, 1.0 - rel.x),
        (DropZone::Top, rel.y),
        (DropZone::Bottom, 1.0 - rel.y),
    ];
    let min = candidates
        .iter()
        .map(|(_, distance)| *distance)
        .fold(f32::INFINITY, f32::min);

    candidates
        .iter()
        .find(|(_, distance)| *distance == min)
        .map(|(zone, _)| *zone)
        .unwrap_or(DropZone::Left)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn near_left_edge_is_left() {
        assert_eq!(classify(Point::new(10.0, 50.0), square()), DropZone::Left);
    }

    #[test]
    fn near_top_edge_is_top() {
        assert_eq!(classify(Point::new(50.0, 10.0), square()), DropZone::Top);
    }

    #[test]
    fn near_right_and_bottom_edges() {
        assert_eq!(classify(Point::new(95.0, 40.0), square()), DropZone::Right);
        assert_eq!(classify(Point::new(40.0, 95.0), square()), DropZone::Bottom);
    }

    #[test]
    fn center_tie_breaks_to_left() {
        assert_eq!(classify(Point::new(50.0, 50.0), square()), DropZone::Left);
    }

    #[test]
    fn diagonal_ties_follow_priority_order() {
        // On the top-right diagonal right and top are equally close.
        assert_eq!(classify(Point::new(75.0, 25.0), square()), DropZone::Right);
        // On the bottom-left diagonal left wins over bottom.
        assert_eq!(classify(Point::new(25.0, 75.0), square()), DropZone::Left);
    }

    #[test]
    fn offset_bounds_are_normalized() {
        let bounds = Rect::new(200.0, 100.0, 400.0, 100.0);
        assert_eq!(classify(Point::new(580.0, 150.0), bounds), DropZone::Right);
        assert_eq!(classify(Point::new(400.0, 195.0), bounds), DropZone::Bottom);
    }

    #[test]
    fn zone_maps_to_insertion_edge() {
        assert_eq!(NewDirection::from(DropZone::Top), NewDirection::Up);
        assert_eq!(NewDirection::from(DropZone::Bottom), NewDirection::Down);
        assert_eq!(NewDirection::from(DropZone::Left), NewDirection::Left);
        assert_eq!(NewDirection::from(DropZone::Right), NewDirection::Right);
    }

    #[test]
    fn preview_covers_half_the_pane() {
        let preview = DropZone::Right.preview(square());
        assert_eq!(preview, Rect::new(50.0, 0.0, 50.0, 100.0));
    }
}
