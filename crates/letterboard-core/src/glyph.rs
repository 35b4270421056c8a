//! Glyph model: one positioned, draggable character.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for glyphs.
pub type GlyphId = Uuid;

/// A single rendered character on the board.
///
/// The bounding box is never stored; it is derived from the current
/// position and the measured size whenever it is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub(crate) id: GlyphId,
    /// The character this glyph renders.
    pub ch: char,
    /// Top-left position in screen coordinates.
    pub position: Point,
    /// Measured size of the rendered character.
    pub size: Size,
    /// Whether the glyph carries the "selected" marker.
    pub selected: bool,
}

impl Glyph {
    /// Create a new unselected glyph at `position`.
    pub fn new(ch: char, position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            ch,
            position,
            size,
            selected: false,
        }
    }

    pub fn id(&self) -> GlyphId {
        self.id
    }

    /// Screen-space bounding box at the current position.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Check if a point lies inside the bounding box (edges included).
    pub fn hit_test(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_position() {
        let mut glyph = Glyph::new('a', Point::new(10.0, 20.0), Size::new(16.0, 28.0));
        assert_eq!(glyph.bounds(), Rect::new(10.0, 20.0, 26.0, 48.0));

        glyph.position = Point::new(-4.0, 0.0);
        assert_eq!(glyph.bounds(), Rect::new(-4.0, 0.0, 12.0, 28.0));
    }

    #[test]
    fn test_unique_ids() {
        let a = Glyph::new('a', Point::ZERO, Size::new(1.0, 1.0));
        let b = Glyph::new('a', Point::ZERO, Size::new(1.0, 1.0));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_hit_test_includes_edges() {
        let glyph = Glyph::new('x', Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(glyph.hit_test(Point::new(5.0, 5.0)));
        assert!(glyph.hit_test(Point::new(10.0, 10.0)));
        assert!(!glyph.hit_test(Point::new(10.5, 5.0)));
    }
}
