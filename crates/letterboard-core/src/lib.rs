//! Letterboard Core Library
//!
//! Platform-agnostic glyph model, selection/drag engine and collision
//! correction for the Letterboard text playground.

pub mod board;
pub mod collision;
pub mod config;
pub mod engine;
pub mod events;
pub mod glyph;
pub mod input;
pub mod layout;
pub mod registry;

pub use board::{Board, BoardSnapshot, GlyphView};
pub use collision::{Correction, correct_positions, rects_collide, rects_overlap};
pub use config::{BoardConfig, ConfigError, EngineConfig, HitMode, LayoutConfig, PrunePolicy};
pub use engine::{DragSession, SelectionEngine, SelectionEntry, SelectionRect};
pub use events::{EventBinder, EventKind, Subscriptions};
pub use glyph::{Glyph, GlyphId};
pub use input::{Modifiers, PointerEvent, PointerTarget};
pub use layout::{GlyphMetrics, MonospaceMetrics, layout_text};
pub use registry::{GlyphRegistry, Registry};
