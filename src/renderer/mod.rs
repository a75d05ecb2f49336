//! Canvas-2D rendering module
//!
//! Immediate mode: the whole scene is redrawn from `GameState` every frame.
//! Reads simulation state, never mutates it.

mod canvas;

pub use canvas::CanvasRenderer;
