//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision;
use super::state::{Direction, GamePhase, GameState, Tank, TankKind};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement axis, components in [-1, 1] (joystick deflection or
    /// keyboard axes); zero means no movement this tick
    pub move_axis: Vec2,
    /// Fire the player's cannon (space/tap)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Skip to the next level (debug/testing)
    pub skip_level: bool,
}

/// Fixed enemy entry points in the upper half of the arena
const SPAWN_POINTS: [Vec2; 5] = [
    Vec2::new(100.0, 100.0),
    Vec2::new(700.0, 100.0),
    Vec2::new(100.0, 200.0),
    Vec2::new(700.0, 200.0),
    Vec2::new(400.0, 100.0),
];

/// Per-tick RNG stream: the run seed mixed with the tick counter. Replays
/// with the same seed and inputs are identical, and there is no RNG state
/// to serialize.
fn tick_rng(seed: u64, time_ticks: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed ^ time_ticks.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    // Debug: skip to the next level
    if input.skip_level {
        state.bullets.clear();
        state.enemies.clear();
        state.level += 1;
        spawn_wave(state);
        return;
    }

    state.time_ticks += 1;
    let mut rng = tick_rng(state.seed, state.time_ticks);

    // Cooldowns
    state.player.tick_cooldown();
    for enemy in &mut state.enemies {
        enemy.tick_cooldown();
    }

    // Player steering: facing follows the dominant axis, then the whole
    // step is attempted at once
    if let Some(facing) = Direction::from_axis(input.move_axis) {
        state.player.facing = facing;
        let delta = input.move_axis * PLAYER_SPEED * dt;
        state.player.pos = collision::resolve_tank_move(
            state.player.pos,
            state.player.size(),
            delta,
            &state.walls,
        );
    }

    // Player fire
    if input.fire && state.player.cooldown == 0 {
        let id = state.next_entity_id();
        if let Some(bullet) = state.player.shoot(id) {
            state.bullets.push(bullet);
        }
    }

    // Enemy AI: random wandering with random potshots
    for i in 0..state.enemies.len() {
        if rng.random_bool(ENEMY_TURN_CHANCE) {
            state.enemies[i].facing = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        }

        let delta = state.enemies[i].facing.unit() * ENEMY_SPEED * dt;
        let size = state.enemies[i].size();
        state.enemies[i].pos =
            collision::resolve_tank_move(state.enemies[i].pos, size, delta, &state.walls);

        if rng.random_bool(ENEMY_FIRE_CHANCE) && state.enemies[i].cooldown == 0 {
            let id = state.next_entity_id();
            if let Some(bullet) = state.enemies[i].shoot(id) {
                state.bullets.push(bullet);
            }
        }
    }

    // Advance bullets; a bullet dies on leaving the arena or touching a wall
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * dt;
        if collision::bullet_out_of_bounds(bullet.pos)
            || collision::bullet_hits_wall(bullet.pos, &state.walls)
        {
            bullet.active = false;
        }
    }
    state.bullets.retain(|b| b.active);

    // Bullet vs tank resolution; each bullet stops at its first victim
    for bullet in &mut state.bullets {
        match bullet.owner {
            TankKind::Player => {
                for enemy in &mut state.enemies {
                    if collision::bullet_hits_tank(bullet, enemy) {
                        bullet.active = false;
                        enemy.health = enemy.health.saturating_sub(1);
                        break;
                    }
                }
            }
            TankKind::Enemy => {
                if collision::bullet_hits_tank(bullet, &state.player) {
                    bullet.active = false;
                    state.player.health = state.player.health.saturating_sub(1);
                }
            }
        }
    }
    state.bullets.retain(|b| b.active);

    // Score destroyed enemies and drop them
    let before = state.enemies.len();
    state.enemies.retain(|enemy| enemy.health > 0);
    state.score += (before - state.enemies.len()) as u64 * KILL_SCORE;

    // Player destroyed: the run ends here, exactly once (the phase guard
    // above keeps later ticks out)
    if state.player.health == 0 {
        state.phase = GamePhase::GameOver;
        log::info!(
            "game over: level {}, score {}",
            state.level,
            state.score
        );
        return;
    }

    // Wave cleared: advance the level and bring in the next cohort
    if state.enemies.is_empty() {
        state.level += 1;
        spawn_wave(state);
    }
}

/// Spawn the current level's wave: `BASE_WAVE_SIZE + level` enemies, capped
/// by the available spawn points.
pub fn spawn_wave(state: &mut GameState) {
    let count = (BASE_WAVE_SIZE + state.level) as usize;
    for point in SPAWN_POINTS.iter().take(count) {
        let id = state.next_entity_id();
        state.enemies.push(Tank::new(id, TankKind::Enemy, *point));
    }
    log::info!("level {}: spawned {} enemies", state.level, state.enemies.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bullet;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        spawn_wave(&mut state);
        state
    }

    fn bullet_at(state: &mut GameState, pos: Vec2, owner: TankKind) -> u32 {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: owner.bullet_radius(),
            owner,
            active: true,
        });
        id
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = playing_state(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks = state.time_ticks;

        // Paused state does not advance
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_first_wave_size() {
        let state = playing_state(1);
        // Level 1: 3 + 1 enemies, five spawn points available
        assert_eq!(state.enemies.len(), 4);
    }

    #[test]
    fn test_wave_capped_by_spawn_points() {
        let mut state = GameState::new(1);
        state.level = 9;
        spawn_wave(&mut state);
        assert_eq!(state.enemies.len(), SPAWN_POINTS.len());
    }

    #[test]
    fn test_player_moves_and_faces() {
        let mut state = playing_state(1);
        let start = state.player.pos;
        let input = TickInput {
            move_axis: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player.facing, Direction::Right);
        assert!(state.player.pos.x > start.x);
        assert_eq!(state.player.pos.y, start.y);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = GameState::new(1);
        // Lone enemy far away so no AI bullets muddy the count
        let id = state.next_entity_id();
        state
            .enemies
            .push(Tank::new(id, TankKind::Enemy, Vec2::new(700.0, 100.0)));

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        let player_bullets = |s: &GameState| {
            s.bullets
                .iter()
                .filter(|b| b.owner == TankKind::Player)
                .count()
        };
        assert_eq!(player_bullets(&state), 1);

        // Cooldown still running: no second bullet
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(player_bullets(&state), 1);
    }

    #[test]
    fn test_bullet_dies_on_wall() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Tank::new(id, TankKind::Enemy, Vec2::new(700.0, 100.0)));

        // Dead center of the vertical obstacle at (350, 250)
        let bullet_id = bullet_at(&mut state, Vec2::new(360.0, 300.0), TankKind::Player);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.bullets.iter().all(|b| b.id != bullet_id));
    }

    #[test]
    fn test_bullet_dies_out_of_bounds() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Tank::new(id, TankKind::Enemy, Vec2::new(700.0, 100.0)));

        let mut escaping = state.player.shoot(99).unwrap();
        escaping.pos = Vec2::new(ARENA_WIDTH - 1.0, 300.0);
        escaping.vel = Vec2::new(ARENA_WIDTH, 0.0); // clears the arena in one tick
        state.bullets.push(escaping);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.bullets.iter().all(|b| b.id != 99));
    }

    #[test]
    fn test_kill_scores_and_advances_level() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        let enemy = Tank::new(id, TankKind::Enemy, Vec2::new(700.0, 100.0));
        let target = enemy.center();
        state.enemies.push(enemy);

        bullet_at(&mut state, target, TankKind::Player);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.score, KILL_SCORE);
        // Last enemy down: level advanced and the next wave arrived
        assert_eq!(state.level, 2);
        assert_eq!(state.enemies.len(), 5);
    }

    #[test]
    fn test_player_death_ends_game_once() {
        let mut state = playing_state(1);
        state.player.health = 1;

        let player_center = state.player.center();
        bullet_at(&mut state, player_center, TankKind::Enemy);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives(), 0);
        let score = state.score;
        let ticks = state.time_ticks;

        // Dead state is frozen: another overlapping bullet changes nothing
        let player_center = state.player.center();
        bullet_at(&mut state, player_center, TankKind::Enemy);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, score);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_skip_level() {
        let mut state = playing_state(1);
        let input = TickInput {
            skip_level: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.level, 2);
        assert_eq!(state.enemies.len(), 5);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_enemies_stay_legal() {
        let mut state = playing_state(0xBEEF);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        for enemy in &state.enemies {
            let bounds = enemy.bounds();
            assert!(crate::sim::collision::tank_in_bounds(&bounds));
            assert!(!crate::sim::collision::overlaps_any(&bounds, &state.walls));
        }
    }

    #[test]
    fn test_determinism() {
        // Two runs with the same seed and inputs are identical
        let mut a = playing_state(0xF00D);
        let mut b = playing_state(0xF00D);

        let input = TickInput {
            move_axis: Vec2::new(0.7, -0.7),
            fire: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.facing, eb.facing);
        }
        assert_eq!(a.bullets.len(), b.bullets.len());
    }
}
