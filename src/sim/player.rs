//! The player's car

use glam::Vec2;

use super::collision::Rect;
use crate::consts::*;

/// Raw per-frame key state for vertical movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
}

impl PlayerInput {
    /// Vertical displacement for one frame: down minus up, scaled by `speed`
    pub fn delta_y(&self, speed: f32) -> f32 {
        (self.down as i32 - self.up as i32) as f32 * speed
    }
}

/// The car. `x` is fixed; only `y` moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Lowest allowed `pos.y` is 0, highest is `max_y`
    max_y: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PLAYER_X, PLAYFIELD_HEIGHT / 2.0, PLAYFIELD_HEIGHT)
    }
}

impl Player {
    pub fn new(x: f32, y: f32, playfield_height: f32) -> Self {
        let size = Vec2::new(CAR_BODY_WIDTH, PLAYER_HEIGHT);
        let max_y = (playfield_height - size.y).max(0.0);
        Self {
            pos: Vec2::new(x, y.clamp(0.0, max_y)),
            size,
            max_y,
        }
    }

    /// Move vertically and clamp to the playfield
    pub fn move_by(&mut self, delta_y: f32) {
        self.pos.y = (self.pos.y + delta_y).clamp(0.0, self.max_y);
    }

    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Bounding box matching the drawn silhouette (roof + body)
    pub fn bounds(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.size,
        }
    }
}
