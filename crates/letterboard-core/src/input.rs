//! Pointer input types forwarded by the platform layer.

use crate::glyph::GlyphId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl (or Cmd on macOS) adds to the selection instead of replacing it.
    pub fn extends_selection(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// A glyph element.
    Glyph(GlyphId),
    /// Empty canvas, or anything that isn't a glyph.
    Canvas,
}

impl PointerTarget {
    pub fn glyph(&self) -> Option<GlyphId> {
        match self {
            PointerTarget::Glyph(id) => Some(*id),
            PointerTarget::Canvas => None,
        }
    }
}

/// Raw pointer event, already classified by target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        target: PointerTarget,
        position: Point,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        target: PointerTarget,
        position: Point,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => *position,
        }
    }
}
