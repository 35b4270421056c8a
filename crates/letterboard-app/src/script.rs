//! Gesture scripts: replay pointer input against a board without a browser.
//!
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "steps": [
//!     { "submit": { "text": "ab" } },
//!     { "down": { "x": 408, "y": 134 } },
//!     { "move": { "x": 416, "y": 120 } },
//!     { "up": { "x": 416, "y": 120 } }
//!   ]
//! }
//! ```

use kurbo::Point;
use letterboard_core::{Board, BoardConfig, BoardSnapshot, ConfigError, Modifiers, MonospaceMetrics};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Script loading errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Script parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Viewport size the glyphs are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Submit text through the form.
    Submit { text: String },
    /// Press the pointer. The target is whatever glyph lies under it.
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
    },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
}

/// A full gesture script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: BoardConfig,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Play every step on a fresh board and return the final state.
    pub fn run(&self) -> BoardSnapshot {
        let mut board = Board::new(self.config.clone());
        board.set_viewport_size(self.viewport.width, self.viewport.height);
        let metrics = MonospaceMetrics::from(&self.config.layout);

        for step in &self.steps {
            log::debug!("Step {:?}", step);
            match step {
                Step::Submit { text } => {
                    board.submit_text(text, &metrics);
                }
                Step::Down { x, y, ctrl, meta } => {
                    let position = Point::new(*x, *y);
                    let modifiers = Modifiers {
                        ctrl: *ctrl,
                        meta: *meta,
                        ..Modifiers::default()
                    };
                    let target = board.target_at(position);
                    board.pointer_down(target, position, modifiers);
                }
                Step::Move { x, y } => board.pointer_move(Point::new(*x, *y)),
                Step::Up { x, y } => {
                    let position = Point::new(*x, *y);
                    let target = board.target_at(position);
                    board.pointer_up(target, position);
                }
            }
        }

        board.snapshot()
    }
}
