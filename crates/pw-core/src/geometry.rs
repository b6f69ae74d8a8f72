// ABOUTME: View handles and normalized geometry shared by every crate.
// ABOUTME: Rects and points are plain f32 values in window or unit space.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to one terminal surface.
///
/// Two handles are equal iff they name the same surface instance. Handles are
/// minted by whoever owns surface lifecycle; the layout engine only stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Axis along which a split divides its space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Children sit side by side (left | right)
    Horizontal,
    /// Children are stacked (top / bottom)
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. Layout code works either in window pixels or in
/// normalized coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment: the right and bottom edges belong to the
    /// neighbouring rect.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Map `point` into unit space relative to this rect, clamped to [0, 1].
    /// A zero-sized axis normalizes to the middle.
    pub fn normalize(&self, point: Point) -> Point {
        let axis = |value: f32, origin: f32, extent: f32| {
            if extent <= 0.0 {
                0.5
            } else {
                ((value - origin) / extent).clamp(0.0, 1.0)
            }
        };
        Point::new(
            axis(point.x, self.x, self.width),
            axis(point.y, self.y, self.height),
        )
    }

    /// Split into (first, second) along `direction` at `ratio`.
    pub fn split(&self, direction: Direction, ratio: f32) -> (Rect, Rect) {
        match direction {
            Direction::Horizontal => {
                let first_width = self.width * ratio;
                (
                    Rect::new(self.x, self.y, first_width, self.height),
                    Rect::new(self.x + first_width, self.y, self.width - first_width, self.height),
                )
            }
            Direction::Vertical => {
                let first_height = self.height * ratio;
                (
                    Rect::new(self.x, self.y, self.width, first_height),
                    Rect::new(self.x, self.y + first_height, self.width, self.height - first_height),
                )
            }
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_into_unit_square() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        let p = rect.normalize(Point::new(150.0, 100.0));
        assert!((p.x - 0.25).abs() < 1e-6);
        assert!((p.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn normalize_clamps_outside_points() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.normalize(Point::new(-5.0, 20.0)), Point::new(0.0, 1.0));
    }

    #[test]
    fn normalize_degenerate_rect_is_centered() {
        let rect = Rect::new(3.0, 3.0, 0.0, 0.0);
        assert_eq!(rect.normalize(Point::new(3.0, 3.0)), Point::new(0.5, 0.5));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
    }

    #[test]
    fn split_horizontal_divides_width() {
        let (a, b) = Rect::full().split(Direction::Horizontal, 0.25);
        assert!((a.width - 0.25).abs() < 1e-6);
        assert!((b.x - 0.25).abs() < 1e-6);
        assert!((b.width - 0.75).abs() < 1e-6);
        assert_eq!(a.height, 1.0);
    }
}
