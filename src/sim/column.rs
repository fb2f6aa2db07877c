//! The scrolling column of three answer zones

use super::collision::Rect;
use crate::consts::*;

/// Three stacked zones sharing one x-position
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerColumn {
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Where the column reappears
    spawn_x: f32,
    zone_tops: [f32; ZONE_COUNT],
    zone_height: f32,
}

impl Default for AnswerColumn {
    fn default() -> Self {
        Self::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)
    }
}

impl AnswerColumn {
    /// Column parked at the right edge of a playfield
    pub fn new(playfield_width: f32, playfield_height: f32) -> Self {
        let zone_height = ((playfield_height - 2.0 * ZONE_GAP) / ZONE_COUNT as f32).floor();
        let zone_tops = std::array::from_fn(|i| i as f32 * (zone_height + ZONE_GAP) + ZONE_GAP);
        Self {
            x: playfield_width,
            width: COLUMN_WIDTH,
            spawn_x: playfield_width,
            zone_tops,
            zone_height,
        }
    }

    /// Fixed per-frame step to the left
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// True once the right edge has passed the left boundary
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn respawn(&mut self) {
        self.x = self.spawn_x;
    }

    pub fn spawn_x(&self) -> f32 {
        self.spawn_x
    }

    /// Zone rectangles, top to bottom
    pub fn zones(&self) -> [Rect; ZONE_COUNT] {
        self.zone_tops
            .map(|top| Rect::new(self.x, top, self.width, self.zone_height))
    }
}
