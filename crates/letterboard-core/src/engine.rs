//! Selection and drag state machine.
//!
//! The engine tracks two sessions that never run at the same time: a
//! rectangle selection and a drag of the selected glyphs. Entering one
//! forces the other idle. The selection set itself outlives both.
//!
//! Calls made in the wrong state (updating a selection that was never
//! started, ending a drag twice, ...) are ignored.

use crate::collision::{Correction, correct_positions, rects_overlap};
use crate::config::{EngineConfig, HitMode, PrunePolicy};
use crate::glyph::GlyphId;
use crate::registry::Registry;
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// Per-glyph selection data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionEntry {
    /// Offset from the drag-start pointer to the glyph's top-left.
    pub delta: Vec2,
    /// Whether a plain click may deselect this glyph.
    pub can_be_unselected: bool,
}

impl SelectionEntry {
    fn fresh(delta: Vec2) -> Self {
        Self {
            delta,
            can_be_unselected: false,
        }
    }
}

/// Rectangle (marquee) selection state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub start: Point,
    pub end: Point,
    pub active: bool,
}

impl SelectionRect {
    /// The axis-aligned rectangle spanned by start and end.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }
}

/// Drag session state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSession {
    pub start: Point,
    pub end: Point,
    pub active: bool,
}

impl DragSession {
    /// True if the pointer ended somewhere other than where it started.
    pub fn was_moved(&self) -> bool {
        self.start.x != self.end.x || self.start.y != self.end.y
    }
}

/// Owns selection membership and the selecting/moving sessions.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    config: EngineConfig,
    selecting: SelectionRect,
    moving: DragSession,
    /// Visible overlay bounds, set once a rectangle selection is updated.
    overlay: Option<Rect>,
    entries: HashMap<GlyphId, SelectionEntry>,
    /// Selection order.
    order: Vec<GlyphId>,
}

impl SelectionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting.active
    }

    pub fn is_moving(&self) -> bool {
        self.moving.active
    }

    pub fn selection_rect(&self) -> &SelectionRect {
        &self.selecting
    }

    /// Bounds of the selection overlay while it is visible.
    pub fn overlay(&self) -> Option<Rect> {
        self.overlay
    }

    /// Whether the last drag session ended away from where it started.
    pub fn was_moved(&self) -> bool {
        self.moving.was_moved()
    }

    pub fn is_selected(&self, id: GlyphId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn can_be_unselected(&self, id: GlyphId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.can_be_unselected)
    }

    pub fn entry(&self, id: GlyphId) -> Option<&SelectionEntry> {
        self.entries.get(&id)
    }

    /// Selected glyph ids in the order they were selected.
    pub fn selected_ids(&self) -> &[GlyphId] {
        &self.order
    }

    pub fn selection_len(&self) -> usize {
        self.order.len()
    }

    // --- Rectangle selection ---

    /// Begin a rectangle selection at `position`. Cancels any drag.
    pub fn start_selection(&mut self, position: Point) {
        self.selecting = SelectionRect {
            start: position,
            end: position,
            active: true,
        };
        self.moving = DragSession::default();
        log::debug!("Selection started at ({}, {})", position.x, position.y);
    }

    /// Stretch the rectangle to `position` and resync membership with it.
    pub fn update_selection<R: Registry + ?Sized>(&mut self, registry: &mut R, position: Point) {
        if !self.selecting.active {
            return;
        }
        self.selecting.end = position;
        let rect = self.selecting.to_rect();

        for id in registry.glyph_ids() {
            let Some(bounds) = registry.bounds(id) else {
                continue;
            };
            let hit = match self.config.hit_mode {
                HitMode::Overlap => rects_overlap(rect, bounds),
                HitMode::Anchor => {
                    bounds.x0 >= rect.x0
                        && bounds.x0 <= rect.x1
                        && bounds.y0 >= rect.y0
                        && bounds.y0 <= rect.y1
                }
            };
            if hit {
                self.insert(registry, id, Vec2::ZERO);
            } else {
                self.take(registry, id);
            }
        }

        self.overlay = Some(rect);
        log::trace!("Selection rect {:?} holds {} glyphs", rect, self.order.len());
    }

    /// Finish the rectangle selection. Selected glyphs stay selected.
    pub fn end_selection(&mut self, position: Point) {
        if !self.selecting.active {
            return;
        }
        self.selecting.end = position;
        self.selecting.active = false;
        self.overlay = None;
        log::debug!("Selection ended with {} glyphs", self.order.len());
    }

    // --- Membership ---

    /// Add a single glyph to the selection with a zero delta.
    ///
    /// A glyph picked up by the press that started the current drag has its
    /// top-left snap to the pointer.
    pub fn select_one<R: Registry + ?Sized>(&mut self, registry: &mut R, id: GlyphId) -> bool {
        if !registry.is_selectable(id) || self.is_selected(id) {
            return false;
        }
        self.insert(registry, id, Vec2::ZERO)
    }

    /// Deselect a glyph, but only once it has been through a drag session.
    pub fn unselect_one<R: Registry + ?Sized>(&mut self, registry: &mut R, id: GlyphId) -> bool {
        if !self.can_be_unselected(id) {
            return false;
        }
        self.take(registry, id)
    }

    /// Deselect everything.
    pub fn clear_selection<R: Registry + ?Sized>(&mut self, registry: &mut R) {
        for id in self.order.drain(..) {
            registry.set_marked(id, false);
        }
        self.entries.clear();
    }

    // --- Dragging ---

    /// Begin dragging the selection from `position`. Cancels any
    /// rectangle selection.
    pub fn start_moving<R: Registry + ?Sized>(&mut self, registry: &R, position: Point) {
        self.moving = DragSession {
            start: position,
            end: position,
            active: true,
        };
        self.selecting = SelectionRect::default();
        self.overlay = None;

        let mut stale = Vec::new();
        for &id in &self.order {
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            match registry.bounds(id) {
                Some(bounds) => {
                    entry.delta = bounds.origin() - position;
                    entry.can_be_unselected = true;
                }
                None => stale.push(id),
            }
        }
        for id in stale {
            self.forget(id);
        }
        log::debug!(
            "Drag started at ({}, {}) with {} glyphs",
            position.x,
            position.y,
            self.order.len()
        );
    }

    /// Move every selected glyph to `position + delta`.
    pub fn update_moving<R: Registry + ?Sized>(&mut self, registry: &mut R, position: Point) {
        if !self.moving.active {
            return;
        }
        let mut pruned = Vec::new();
        for &id in &self.order {
            let Some(entry) = self.entries.get(&id) else {
                continue;
            };
            let target = position + entry.delta;
            registry.move_to(id, target);
            if target.x < 0.0 && self.config.prune == PrunePolicy::RemoveOutOfBounds {
                registry.remove(id);
                pruned.push(id);
            }
        }
        for id in pruned {
            log::debug!("Glyph {} dragged off canvas, removing", id);
            self.forget(id);
        }
    }

    /// Finish the drag and push apart anything the dragged glyphs landed on.
    pub fn end_moving<R: Registry + ?Sized>(
        &mut self,
        registry: &mut R,
        position: Point,
    ) -> Option<Correction> {
        if !self.moving.active {
            return None;
        }
        self.moving.end = position;
        self.moving.active = false;

        let moved = self.order.clone();
        let report = correct_positions(registry, &moved, &self.config);
        for &id in &report.removed {
            self.forget(id);
        }
        log::debug!(
            "Drag ended, {} glyphs displaced in {} passes",
            report.displaced.len(),
            report.passes
        );
        Some(report)
    }

    fn insert<R: Registry + ?Sized>(&mut self, registry: &mut R, id: GlyphId, delta: Vec2) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, SelectionEntry::fresh(delta));
        self.order.push(id);
        registry.set_marked(id, true);
        true
    }

    fn take<R: Registry + ?Sized>(&mut self, registry: &mut R, id: GlyphId) -> bool {
        if !self.forget(id) {
            return false;
        }
        registry.set_marked(id, false);
        true
    }

    /// Drop an entry without touching the glyph (it may already be gone).
    fn forget(&mut self, id: GlyphId) -> bool {
        if self.entries.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|&selected| selected != id);
        true
    }
}
