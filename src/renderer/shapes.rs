//! Shape tessellation for 2D primitives
//!
//! Everything becomes a triangle list in playfield coordinates.
//! [`VertexCanvas`] collects a whole frame for the GPU pipeline.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use super::{Canvas, Color, TextLabel};
use crate::sim::Rect;

/// Segments used for circles
pub const CIRCLE_SEGMENTS: usize = 32;

/// Two triangles covering `rect`
pub fn rect(out: &mut Vec<Vertex>, rect: &Rect, color: Color) {
    let (min, max) = (rect.min, rect.max());
    let tl = Vertex::new(min.x, min.y, color);
    let tr = Vertex::new(max.x, min.y, color);
    let bl = Vertex::new(min.x, max.y, color);
    let br = Vertex::new(max.x, max.y, color);
    out.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
}

/// Triangle fan around `center`
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Color, segments: usize) {
    let segments = segments.max(3);
    let point = |i: usize| {
        let theta = i as f32 / segments as f32 * TAU;
        center + Vec2::new(theta.cos(), theta.sin()) * radius
    };
    for i in 0..segments {
        let (a, b) = (point(i), point(i + 1));
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

/// Fan-triangulate a convex polygon
pub fn convex_polygon(out: &mut Vec<Vertex>, points: &[Vec2], color: Color) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    for pair in rest.windows(2) {
        out.push(Vertex::new(first.x, first.y, color));
        out.push(Vertex::new(pair[0].x, pair[0].y, color));
        out.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
}

/// Canvas that records triangles and text for one frame
#[derive(Debug, Clone)]
pub struct VertexCanvas {
    pub clear_color: Color,
    pub vertices: Vec<Vertex>,
    /// Text is left to the host (DOM overlay in the browser)
    pub labels: Vec<TextLabel>,
}

impl Default for VertexCanvas {
    fn default() -> Self {
        Self {
            clear_color: colors::ROAD,
            vertices: Vec::with_capacity(1024),
            labels: Vec::new(),
        }
    }
}

impl VertexCanvas {
    /// Reset for a new frame, keeping allocations
    pub fn begin_frame(&mut self) {
        self.vertices.clear();
        self.labels.clear();
    }
}

impl Canvas for VertexCanvas {
    fn clear(&mut self, color: Color) {
        self.vertices.clear();
        self.labels.clear();
        self.clear_color = color;
    }

    fn fill_rect(&mut self, r: Rect, color: Color) {
        rect(&mut self.vertices, &r, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        circle(&mut self.vertices, center, radius, color, CIRCLE_SEGMENTS);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        convex_polygon(&mut self.vertices, points, color);
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.labels.push(TextLabel {
            pos,
            text: text.to_string(),
            color,
        });
    }
}
