//! Scrolling lane-divider dashes

use glam::Vec2;

use super::collision::Rect;
use crate::consts::*;

/// Road background: a strip of dashes scrolling left and wrapping around
#[derive(Debug, Clone, PartialEq)]
pub struct Highway {
    pub width: f32,
    pub height: f32,
    /// Units per second
    pub speed: f32,
    /// Top-left corner of each dash
    pub dashes: Vec<Vec2>,
}

impl Highway {
    pub fn new(width: f32, height: f32, speed: f32) -> Self {
        let pitch = DASH_WIDTH + DASH_GAP;
        let count = (width / pitch) as usize + 2;
        let y = (height / 2.0 - DASH_HEIGHT / 2.0).floor();
        let dashes = (0..count)
            .map(|i| Vec2::new(i as f32 * pitch - DASH_WIDTH, y))
            .collect();
        Self {
            width,
            height,
            speed,
            dashes,
        }
    }

    /// Move every dash left by `speed * elapsed_ms / 1000`, wrapping any dash
    /// that has fully left the screen back to the right edge
    pub fn advance(&mut self, elapsed_ms: f32) {
        let dx = self.speed * elapsed_ms / 1000.0;
        for dash in &mut self.dashes {
            dash.x -= dx;
            if dash.x < -DASH_WIDTH {
                dash.x = self.width;
            }
        }
    }

    pub fn dash_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.dashes
            .iter()
            .map(|d| Rect::new(d.x, d.y, DASH_WIDTH, DASH_HEIGHT))
    }

    /// The two solid lines at a quarter and three quarters of the height
    pub fn edge_lines(&self) -> [Rect; 2] {
        let half = EDGE_LINE_THICKNESS / 2.0;
        [
            Rect::new(0.0, self.height / 4.0 - half, self.width, EDGE_LINE_THICKNESS),
            Rect::new(0.0, 3.0 * self.height / 4.0 - half, self.width, EDGE_LINE_THICKNESS),
        ]
    }
}

impl Default for Highway {
    fn default() -> Self {
        Self::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT, HIGHWAY_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_layout() {
        let highway = Highway::default();
        assert_eq!(highway.dashes.len(), 14);
        assert_eq!(highway.dashes[0], Vec2::new(-DASH_WIDTH, 295.0));
        assert_eq!(highway.dashes[1].x - highway.dashes[0].x, DASH_WIDTH + DASH_GAP);
    }

    #[test]
    fn test_advance_moves_left() {
        let mut highway = Highway::default();
        let before = highway.dashes[5].x;
        highway.advance(100.0);
        assert_eq!(highway.dashes[5].x, before - 30.0);
    }

    #[test]
    fn test_wraps_to_right_edge() {
        let mut highway = Highway::default();
        // First dash starts at -40; any movement pushes it past the left boundary
        highway.advance(10.0);
        assert_eq!(highway.dashes[0].x, PLAYFIELD_WIDTH);
        assert!(highway.dashes.iter().all(|d| d.x >= -DASH_WIDTH));
    }

    #[test]
    fn test_zero_elapsed_is_noop() {
        let mut highway = Highway::default();
        let before = highway.clone();
        highway.advance(0.0);
        assert_eq!(highway, before);
    }

    #[test]
    fn test_edge_lines() {
        let [top, bottom] = Highway::default().edge_lines();
        assert_eq!(top.center().y, 150.0);
        assert_eq!(bottom.center().y, 450.0);
        assert_eq!(top.size.x, PLAYFIELD_WIDTH);
    }
}
