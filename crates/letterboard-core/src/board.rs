//! The playground board: glyphs, selection engine and pointer dispatch.

use crate::collision::{Correction, correct_positions};
use crate::config::BoardConfig;
use crate::engine::SelectionEngine;
use crate::glyph::GlyphId;
use crate::input::{Modifiers, PointerEvent, PointerTarget};
use crate::layout::{GlyphMetrics, batch_origin, layout_text};
use crate::registry::{GlyphRegistry, Registry};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Renderable view of one glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphView {
    pub id: GlyphId,
    pub ch: char,
    pub bounds: Rect,
    pub selected: bool,
}

/// Renderable view of the whole board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Glyphs in insertion order.
    pub glyphs: Vec<GlyphView>,
    /// Selection overlay, while a rectangle selection is showing.
    pub overlay: Option<Rect>,
    pub selecting: bool,
    pub moving: bool,
}

/// Owns the glyph registry and the selection engine, and turns pointer
/// events into engine calls.
#[derive(Debug, Clone)]
pub struct Board {
    registry: GlyphRegistry,
    engine: SelectionEngine,
    config: BoardConfig,
    viewport_size: Size,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            registry: GlyphRegistry::new(),
            engine: SelectionEngine::new(config.engine.clone()),
            config,
            viewport_size: Size::new(800.0, 600.0),
        }
    }

    pub fn registry(&self) -> &GlyphRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    /// Replace the board's glyphs with one per non-whitespace character
    /// of `text`, spread into a row by collision correction.
    pub fn submit_text(&mut self, text: &str, metrics: &dyn GlyphMetrics) -> Vec<GlyphId> {
        self.registry.clear();
        self.engine = SelectionEngine::new(self.config.engine.clone());

        let origin = batch_origin(self.viewport_size, &self.config.layout);
        let ids: Vec<GlyphId> = layout_text(text, metrics, origin)
            .into_iter()
            .map(|glyph| self.registry.add(glyph))
            .collect();
        let report = correct_positions(&mut self.registry, &ids, &self.config.engine);

        log::info!(
            "Submitted {} glyphs, {} passes to spread them",
            ids.len(),
            report.passes
        );
        ids.into_iter()
            .filter(|&id| self.registry.is_selectable(id))
            .collect()
    }

    /// Classify a position: the topmost glyph under it, or the canvas.
    pub fn target_at(&self, position: Point) -> PointerTarget {
        match self.registry.glyph_at(position) {
            Some(id) => PointerTarget::Glyph(id),
            None => PointerTarget::Canvas,
        }
    }

    /// Pointer pressed. On a glyph this starts a drag (selecting the glyph
    /// first if needed), anywhere else a rectangle selection.
    pub fn pointer_down(&mut self, target: PointerTarget, position: Point, modifiers: Modifiers) {
        let glyph = target.glyph().filter(|&id| self.registry.is_selectable(id));
        match glyph {
            Some(id) => {
                self.engine.start_moving(&self.registry, position);
                if !self.engine.is_selected(id) {
                    if !modifiers.extends_selection() {
                        self.engine.clear_selection(&mut self.registry);
                    }
                    self.engine.select_one(&mut self.registry, id);
                }
            }
            None => self.engine.start_selection(position),
        }
    }

    pub fn pointer_move(&mut self, position: Point) {
        self.engine.update_moving(&mut self.registry, position);
        self.engine.update_selection(&mut self.registry, position);
    }

    /// Pointer released. A real drag clears the selection afterwards; a
    /// stationary click tries to deselect the clicked glyph.
    pub fn pointer_up(&mut self, target: PointerTarget, position: Point) -> Option<Correction> {
        let correction = self.engine.end_moving(&mut self.registry, position);
        if let Some(report) = correction.as_ref().filter(|r| !r.is_noop()) {
            log::debug!(
                "Drop displaced {} glyphs, removed {}",
                report.displaced.len(),
                report.removed.len()
            );
        }
        self.engine.end_selection(position);

        if self.engine.was_moved() {
            self.engine.clear_selection(&mut self.registry);
        } else if let Some(id) = target.glyph() {
            self.engine.unselect_one(&mut self.registry, id);
        }
        correction
    }

    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        log::trace!("Pointer event at {:?}", event.position());
        match event {
            PointerEvent::Down {
                target,
                position,
                modifiers,
            } => self.pointer_down(target, position, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { target, position } => {
                self.pointer_up(target, position);
            }
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            glyphs: self
                .registry
                .iter()
                .map(|g| GlyphView {
                    id: g.id(),
                    ch: g.ch,
                    bounds: g.bounds(),
                    selected: g.selected,
                })
                .collect(),
            overlay: self.engine.overlay(),
            selecting: self.engine.is_selecting(),
            moving: self.engine.is_moving(),
        }
    }
}
