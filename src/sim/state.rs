//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// One of the four cardinal facings a tank can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector in screen coordinates (+y is down)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }

    /// Facing for a free movement axis: the dominant component wins,
    /// vertical wins exact ties. `None` for a zero axis.
    pub fn from_axis(axis: Vec2) -> Option<Direction> {
        if axis == Vec2::ZERO {
            return None;
        }
        Some(if axis.x.abs() > axis.y.abs() {
            if axis.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if axis.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }

    /// Rotation for rendering, clockwise from Up
    pub fn angle(self) -> f32 {
        use std::f32::consts::FRAC_PI_2;
        match self {
            Direction::Up => 0.0,
            Direction::Right => FRAC_PI_2,
            Direction::Down => 2.0 * FRAC_PI_2,
            Direction::Left => 3.0 * FRAC_PI_2,
        }
    }
}

/// Tank flavors; all per-kind tuning hangs off this
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankKind {
    Player,
    Enemy,
}

impl TankKind {
    /// Side length of the square hull
    pub fn size(self) -> f32 {
        match self {
            TankKind::Player => PLAYER_SIZE,
            TankKind::Enemy => ENEMY_SIZE,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            TankKind::Player => PLAYER_SPEED,
            TankKind::Enemy => ENEMY_SPEED,
        }
    }

    pub fn max_health(self) -> u8 {
        match self {
            TankKind::Player => PLAYER_MAX_HEALTH,
            TankKind::Enemy => ENEMY_MAX_HEALTH,
        }
    }

    /// Ticks a tank must wait between shots
    pub fn shoot_cooldown(self) -> u32 {
        match self {
            TankKind::Player => PLAYER_SHOOT_COOLDOWN,
            TankKind::Enemy => ENEMY_SHOOT_COOLDOWN,
        }
    }

    pub fn bullet_speed(self) -> f32 {
        match self {
            TankKind::Player => PLAYER_BULLET_SPEED,
            TankKind::Enemy => ENEMY_BULLET_SPEED,
        }
    }

    pub fn bullet_radius(self) -> f32 {
        match self {
            TankKind::Player => PLAYER_BULLET_RADIUS,
            TankKind::Enemy => ENEMY_BULLET_RADIUS,
        }
    }
}

/// A tank entity; the player and enemies share this type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub id: u32,
    pub kind: TankKind,
    /// Top-left corner of the hull
    pub pos: Vec2,
    pub facing: Direction,
    pub health: u8,
    /// Ticks remaining until the tank may fire again
    pub cooldown: u32,
}

impl Tank {
    pub fn new(id: u32, kind: TankKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            facing: Direction::Up,
            health: kind.max_health(),
            cooldown: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.kind.size()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size())
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Fire a bullet from the facing edge of the hull, centered on the
    /// perpendicular axis. Returns `None` while the cooldown is running.
    pub fn shoot(&mut self, bullet_id: u32) -> Option<Bullet> {
        if self.cooldown > 0 {
            return None;
        }
        self.cooldown = self.kind.shoot_cooldown();

        let center = self.center();
        let muzzle = match self.facing {
            Direction::Up => Vec2::new(center.x, self.pos.y),
            Direction::Down => Vec2::new(center.x, self.pos.y + self.size()),
            Direction::Left => Vec2::new(self.pos.x, center.y),
            Direction::Right => Vec2::new(self.pos.x + self.size(), center.y),
        };

        Some(Bullet {
            id: bullet_id,
            pos: muzzle,
            vel: self.facing.unit() * self.kind.bullet_speed(),
            radius: self.kind.bullet_radius(),
            owner: self.kind,
            active: true,
        })
    }
}

/// A bullet in flight, positioned by its center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Which side fired it; bullets only damage the other side
    pub owner: TankKind,
    pub active: bool,
}

impl Bullet {
    /// Square circumscribing the bullet circle, used against tank hulls
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x - self.radius,
            self.pos.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended; state is frozen for the final screen
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// 1-based; clearing a wave increments it
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Tank,
    pub enemies: Vec<Tank>,
    pub bullets: Vec<Bullet>,
    /// Static obstacles, fixed for the lifetime of the run
    pub walls: Vec<Rect>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh run. Call [`spawn_wave`](super::tick::spawn_wave) to
    /// populate the first wave of enemies.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Playing,
            score: 0,
            level: 1,
            time_ticks: 0,
            player: Tank::new(1, TankKind::Player, PLAYER_SPAWN),
            enemies: Vec::new(),
            bullets: Vec::new(),
            walls: arena_walls(),
            next_id: 2,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Remaining player health, surfaced by the shell as lives
    pub fn lives(&self) -> u8 {
        self.player.health
    }
}

/// The fixed arena layout: four border walls lining the edges plus the
/// interior obstacle course.
pub fn arena_walls() -> Vec<Rect> {
    let mut walls = vec![
        Rect::new(0.0, 0.0, ARENA_WIDTH, BORDER_THICKNESS),
        Rect::new(0.0, ARENA_HEIGHT - BORDER_THICKNESS, ARENA_WIDTH, BORDER_THICKNESS),
        Rect::new(0.0, 0.0, BORDER_THICKNESS, ARENA_HEIGHT),
        Rect::new(ARENA_WIDTH - BORDER_THICKNESS, 0.0, BORDER_THICKNESS, ARENA_HEIGHT),
    ];

    walls.extend([
        Rect::new(200.0, 150.0, 80.0, 20.0),
        Rect::new(500.0, 150.0, 80.0, 20.0),
        Rect::new(200.0, 400.0, 80.0, 20.0),
        Rect::new(500.0, 400.0, 80.0, 20.0),
        Rect::new(350.0, 250.0, 20.0, 100.0),
        Rect::new(150.0, 250.0, 100.0, 20.0),
        Rect::new(550.0, 250.0, 100.0, 20.0),
    ]);

    walls
}
