//! Tank Arena - a top-down tank battle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, enemy AI, collisions, game state)
//! - `renderer`: Canvas-2D rendering pass (wasm only)
//! - `settings`: Player preferences
//! - `highscores`: LocalStorage leaderboard

pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, matches the original frame-locked tuning)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Thickness of the border walls lining the arena edges
    pub const BORDER_THICKNESS: f32 = 20.0;

    /// Player tank
    pub const PLAYER_SIZE: f32 = 45.0;
    pub const PLAYER_SPEED: f32 = 180.0;
    pub const PLAYER_MAX_HEALTH: u8 = 3;
    /// Ticks between player shots
    pub const PLAYER_SHOOT_COOLDOWN: u32 = 20;
    /// Player bullets are big and slow
    pub const PLAYER_BULLET_SPEED: f32 = 180.0;
    pub const PLAYER_BULLET_RADIUS: f32 = 8.0;
    pub const PLAYER_SPAWN: Vec2 = Vec2::new(400.0, 500.0);

    /// Enemy tank
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const ENEMY_SPEED: f32 = 90.0;
    pub const ENEMY_MAX_HEALTH: u8 = 1;
    /// Ticks between enemy shots
    pub const ENEMY_SHOOT_COOLDOWN: u32 = 60;
    pub const ENEMY_BULLET_SPEED: f32 = 300.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 4.0;

    /// Per-tick probability that an enemy picks a new facing
    pub const ENEMY_TURN_CHANCE: f64 = 0.02;
    /// Per-tick probability that an enemy attempts to fire
    pub const ENEMY_FIRE_CHANCE: f64 = 0.03;

    /// Score awarded per destroyed enemy
    pub const KILL_SCORE: u64 = 100;
    /// A wave holds `BASE_WAVE_SIZE + level` enemies, capped by spawn points
    pub const BASE_WAVE_SIZE: u32 = 3;
}
