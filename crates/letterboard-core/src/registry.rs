//! Glyph registry: the authoritative set of live glyphs.

use crate::glyph::{Glyph, GlyphId};
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// Access to the live glyphs as seen by the selection engine.
///
/// Selectability is decided by registry membership: anything the
/// registry knows about can be selected, anything else cannot.
pub trait Registry {
    /// Ids of all live glyphs, in insertion order.
    fn glyph_ids(&self) -> Vec<GlyphId>;

    /// Current bounding box of a glyph, computed from its position.
    fn bounds(&self, id: GlyphId) -> Option<Rect>;

    /// Check whether a candidate can take part in selection.
    fn is_selectable(&self, id: GlyphId) -> bool;

    /// Move a glyph so its top-left sits at `position`.
    /// Returns false if the glyph is unknown.
    fn move_to(&mut self, id: GlyphId, position: Point) -> bool;

    /// Set or clear the visual "selected" marker.
    fn set_marked(&mut self, id: GlyphId, marked: bool);

    /// Detach a glyph. Returns false if it was already gone.
    fn remove(&mut self, id: GlyphId) -> bool;
}

/// In-memory glyph registry.
#[derive(Debug, Clone, Default)]
pub struct GlyphRegistry {
    glyphs: HashMap<GlyphId, Glyph>,
    /// Insertion order (back to front).
    order: Vec<GlyphId>,
}

impl GlyphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a glyph and return its id.
    pub fn add(&mut self, glyph: Glyph) -> GlyphId {
        let id = glyph.id();
        if self.glyphs.insert(id, glyph).is_none() {
            self.order.push(id);
        }
        id
    }

    pub fn get(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(&id)
    }

    /// Iterate glyphs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.order.iter().filter_map(|id| self.glyphs.get(id))
    }

    /// Topmost glyph containing `point`, if any.
    pub fn glyph_at(&self, point: Point) -> Option<GlyphId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.glyphs.get(id).is_some_and(|g| g.hit_test(point)))
    }

    /// Remove every glyph.
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl Registry for GlyphRegistry {
    fn glyph_ids(&self) -> Vec<GlyphId> {
        self.order.clone()
    }

    fn bounds(&self, id: GlyphId) -> Option<Rect> {
        self.glyphs.get(&id).map(Glyph::bounds)
    }

    fn is_selectable(&self, id: GlyphId) -> bool {
        self.glyphs.contains_key(&id)
    }

    fn move_to(&mut self, id: GlyphId, position: Point) -> bool {
        match self.glyphs.get_mut(&id) {
            Some(glyph) => {
                glyph.position = position;
                true
            }
            None => false,
        }
    }

    fn set_marked(&mut self, id: GlyphId, marked: bool) {
        if let Some(glyph) = self.glyphs.get_mut(&id) {
            glyph.selected = marked;
        }
    }

    fn remove(&mut self, id: GlyphId) -> bool {
        self.order.retain(|&glyph_id| glyph_id != id);
        self.glyphs.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn glyph(x: f64, y: f64) -> Glyph {
        Glyph::new('g', Point::new(x, y), Size::new(10.0, 10.0))
    }

    #[test]
    fn test_add_and_order() {
        let mut registry = GlyphRegistry::new();
        let a = registry.add(glyph(0.0, 0.0));
        let b = registry.add(glyph(20.0, 0.0));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.glyph_ids(), vec![a, b]);
        assert!(registry.is_selectable(a));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = GlyphRegistry::new();
        let a = registry.add(glyph(0.0, 0.0));

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(registry.is_empty());
        assert!(!registry.is_selectable(a));
        assert!(registry.bounds(a).is_none());
    }

    #[test]
    fn test_move_to_updates_bounds() {
        let mut registry = GlyphRegistry::new();
        let a = registry.add(glyph(0.0, 0.0));

        assert!(registry.move_to(a, Point::new(30.0, 40.0)));
        assert_eq!(registry.bounds(a), Some(Rect::new(30.0, 40.0, 40.0, 50.0)));

        assert!(!registry.move_to(uuid::Uuid::new_v4(), Point::ZERO));
    }

    #[test]
    fn test_glyph_at_prefers_topmost() {
        let mut registry = GlyphRegistry::new();
        let a = registry.add(glyph(0.0, 0.0));
        let b = registry.add(glyph(5.0, 5.0));

        assert_eq!(registry.glyph_at(Point::new(7.0, 7.0)), Some(b));
        assert_eq!(registry.glyph_at(Point::new(2.0, 2.0)), Some(a));
        assert_eq!(registry.glyph_at(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_set_marked() {
        let mut registry = GlyphRegistry::new();
        let a = registry.add(glyph(0.0, 0.0));

        registry.set_marked(a, true);
        assert!(registry.get(a).unwrap().selected);
        registry.set_marked(a, false);
        assert!(!registry.get(a).unwrap().selected);
    }
}
