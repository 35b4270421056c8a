//! Letterboard Application
//!
//! The browser shell wiring the core board into the DOM, plus a gesture
//! script runner used by the native binary.

pub mod script;

pub use script::{Script, ScriptError, Step, Viewport};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{run_wasm, unmount_wasm};
