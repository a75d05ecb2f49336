//! Collision detection for tanks, bullets, and walls
//!
//! Everything is brute-force AABB. Tanks move with whole-move rejection: a
//! step that would leave the arena or overlap a wall is discarded entirely,
//! there is no sliding or push-out.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Bullet, Tank};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Whether a tank hull lies fully inside the arena
pub fn tank_in_bounds(bounds: &Rect) -> bool {
    bounds.x >= 0.0
        && bounds.right() <= ARENA_WIDTH
        && bounds.y >= 0.0
        && bounds.bottom() <= ARENA_HEIGHT
}

/// Whether a hull overlaps any wall
pub fn overlaps_any(bounds: &Rect, walls: &[Rect]) -> bool {
    walls.iter().any(|wall| bounds.intersects(wall))
}

/// Attempt a tank move. Returns the stepped position when the moved hull
/// stays inside the arena and clear of every wall, the old position otherwise.
pub fn resolve_tank_move(pos: Vec2, size: f32, delta: Vec2, walls: &[Rect]) -> Vec2 {
    let stepped = pos + delta;
    let bounds = Rect::from_pos_size(stepped, size);

    if tank_in_bounds(&bounds) && !overlaps_any(&bounds, walls) {
        stepped
    } else {
        pos
    }
}

/// Bullets die when their center leaves the arena
pub fn bullet_out_of_bounds(pos: Vec2) -> bool {
    pos.x < 0.0 || pos.x > ARENA_WIDTH || pos.y < 0.0 || pos.y > ARENA_HEIGHT
}

/// Bullets die when their center touches a wall (boundary inclusive)
pub fn bullet_hits_wall(pos: Vec2, walls: &[Rect]) -> bool {
    walls.iter().any(|wall| wall.contains_point(pos))
}

/// Bullet vs hull: the bullet's circumscribing square against the tank AABB
pub fn bullet_hits_tank(bullet: &Bullet, tank: &Tank) -> bool {
    bullet.bounds().intersects(&tank.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYER_SIZE, PLAYER_SPAWN};
    use crate::sim::state::{Direction, TankKind, arena_walls};
    use proptest::prelude::*;

    #[test]
    fn test_move_rejected_at_arena_edge() {
        // No walls: only the bounds check applies
        let pos = Vec2::new(ARENA_WIDTH - PLAYER_SIZE, 300.0);
        let stepped = resolve_tank_move(pos, PLAYER_SIZE, Vec2::new(5.0, 0.0), &[]);
        assert_eq!(stepped, pos);

        let stepped = resolve_tank_move(pos, PLAYER_SIZE, Vec2::new(-5.0, 0.0), &[]);
        assert_eq!(stepped, pos + Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn test_move_rejected_into_wall() {
        let walls = [Rect::new(100.0, 100.0, 50.0, 50.0)];
        // Tank flush against the wall's left edge
        let pos = Vec2::new(100.0 - PLAYER_SIZE, 110.0);
        let stepped = resolve_tank_move(pos, PLAYER_SIZE, Vec2::new(1.0, 0.0), &walls);
        assert_eq!(stepped, pos);
        // Moving away is fine
        let stepped = resolve_tank_move(pos, PLAYER_SIZE, Vec2::new(-1.0, 0.0), &walls);
        assert_eq!(stepped, pos + Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_whole_move_rejection_no_sliding() {
        let walls = [Rect::new(100.0, 100.0, 50.0, 50.0)];
        let pos = Vec2::new(100.0 - PLAYER_SIZE, 110.0);
        // Diagonal step into the wall is rejected outright, including the
        // vertical component that would have been legal on its own
        let stepped = resolve_tank_move(pos, PLAYER_SIZE, Vec2::new(1.0, 1.0), &walls);
        assert_eq!(stepped, pos);
    }

    #[test]
    fn test_bullet_out_of_bounds() {
        assert!(!bullet_out_of_bounds(Vec2::new(400.0, 300.0)));
        assert!(bullet_out_of_bounds(Vec2::new(-0.1, 300.0)));
        assert!(bullet_out_of_bounds(Vec2::new(400.0, ARENA_HEIGHT + 0.1)));
        // The edge itself is still inside
        assert!(!bullet_out_of_bounds(Vec2::new(ARENA_WIDTH, 300.0)));
    }

    #[test]
    fn test_bullet_hits_wall_boundary() {
        let walls = [Rect::new(100.0, 100.0, 50.0, 50.0)];
        assert!(bullet_hits_wall(Vec2::new(125.0, 125.0), &walls));
        assert!(bullet_hits_wall(Vec2::new(100.0, 100.0), &walls));
        assert!(!bullet_hits_wall(Vec2::new(99.0, 100.0), &walls));
    }

    #[test]
    fn test_bullet_hits_tank() {
        let tank = Tank::new(1, TankKind::Enemy, Vec2::new(100.0, 100.0));
        let mut shooter = Tank::new(2, TankKind::Player, Vec2::new(100.0, 200.0));
        shooter.facing = Direction::Up;
        let mut bullet = shooter.shoot(3).unwrap();

        bullet.pos = Vec2::new(115.0, 135.0);
        assert!(bullet_hits_tank(&bullet, &tank));

        bullet.pos = Vec2::new(300.0, 300.0);
        assert!(!bullet_hits_tank(&bullet, &tank));
    }

    proptest! {
        /// A tank can never end up outside the arena or inside a wall, no
        /// matter what movement deltas are thrown at it.
        #[test]
        fn prop_movement_stays_legal(
            deltas in prop::collection::vec((-250.0f32..250.0, -250.0f32..250.0), 1..64)
        ) {
            let walls = arena_walls();
            let mut pos = PLAYER_SPAWN;
            for (dx, dy) in deltas {
                pos = resolve_tank_move(pos, PLAYER_SIZE, Vec2::new(dx, dy), &walls);
                let bounds = Rect::from_pos_size(pos, PLAYER_SIZE);
                prop_assert!(tank_in_bounds(&bounds));
                prop_assert!(!overlaps_any(&bounds, &walls));
            }
        }
    }
}
