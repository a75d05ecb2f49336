//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, monotonic entity IDs)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use rect::Rect;
pub use state::{Bullet, Direction, GamePhase, GameState, Tank, TankKind};
pub use tick::{TickInput, spawn_wave, tick};
