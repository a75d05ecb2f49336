//! Immediate-mode scene pass over a 2D canvas context

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::{Bullet, GameState, Rect, Tank, TankKind};

const BACKGROUND: &str = "#e8f4f8";
const WALL_FILL: &str = "#8b4513";
const WALL_MORTAR: &str = "#654321";
const PLAYER_HULL: &str = "#ff69b4";
const PLAYER_DETAIL: &str = "#ffb3d9";
const ENEMY_HULL: &str = "#f44336";
const ENEMY_DETAIL: &str = "#555";
const BARREL: &str = "#333";
const PLAYER_BULLET: &str = "#ff0000";
const ENEMY_BULLET: &str = "#ff6b6b";

/// Draws the arena onto a fixed 800x600 canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Redraw the full scene
    pub fn render(&self, state: &GameState) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx
            .fill_rect(0.0, 0.0, ARENA_WIDTH as f64, ARENA_HEIGHT as f64);

        for wall in &state.walls {
            self.draw_wall(wall);
        }

        self.draw_tank(&state.player)?;
        for enemy in &state.enemies {
            self.draw_tank(enemy)?;
        }

        for bullet in &state.bullets {
            self.draw_bullet(bullet)?;
        }

        Ok(())
    }

    fn draw_wall(&self, wall: &Rect) {
        let (x, y, w, h) = (wall.x as f64, wall.y as f64, wall.w as f64, wall.h as f64);
        self.ctx.set_fill_style_str(WALL_FILL);
        self.ctx.fill_rect(x, y, w, h);

        // Brick seams every 20px
        self.ctx.set_stroke_style_str(WALL_MORTAR);
        self.ctx.set_line_width(2.0);
        let mut i = 0.0;
        while i < w {
            self.ctx.begin_path();
            self.ctx.move_to(x + i, y);
            self.ctx.line_to(x + i, y + h);
            self.ctx.stroke();
            i += 20.0;
        }
        let mut i = 0.0;
        while i < h {
            self.ctx.begin_path();
            self.ctx.move_to(x, y + i);
            self.ctx.line_to(x + w, y + i);
            self.ctx.stroke();
            i += 20.0;
        }
    }

    fn draw_tank(&self, tank: &Tank) -> Result<(), JsValue> {
        let size = tank.size() as f64;
        let center = tank.center();
        let (hull, detail, barrel_w, barrel_len) = match tank.kind {
            TankKind::Player => (PLAYER_HULL, PLAYER_DETAIL, 5.0, 18.0),
            TankKind::Enemy => (ENEMY_HULL, ENEMY_DETAIL, 3.0, 15.0),
        };

        self.ctx.save();
        self.ctx.translate(center.x as f64, center.y as f64)?;
        self.ctx.rotate(tank.facing.angle() as f64)?;

        self.ctx.set_fill_style_str(hull);
        self.ctx.fill_rect(-size / 2.0, -size / 2.0, size, size);

        self.ctx.set_fill_style_str(BARREL);
        self.ctx
            .fill_rect(-barrel_w / 2.0, -size / 2.0 - barrel_len, barrel_w, barrel_len);

        self.ctx.set_fill_style_str(detail);
        self.ctx
            .fill_rect(-size / 2.0 + 5.0, -size / 2.0 + 5.0, size - 10.0, size - 10.0);

        self.ctx.restore();
        Ok(())
    }

    fn draw_bullet(&self, bullet: &Bullet) -> Result<(), JsValue> {
        let color = match bullet.owner {
            TankKind::Player => PLAYER_BULLET,
            TankKind::Enemy => ENEMY_BULLET,
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.arc(
            bullet.pos.x as f64,
            bullet.pos.y as f64,
            bullet.radius as f64,
            0.0,
            TAU,
        )?;
        self.ctx.fill();
        Ok(())
    }
}
