//! Rendering module
//!
//! [`scene::draw_frame`] paints a [`GameState`](crate::sim::GameState) onto any
//! [`Canvas`]. Backends: [`shapes::VertexCanvas`] feeding the WebGPU
//! [`pipeline::RenderState`], and the terminal pixel buffer in `platform`.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::draw_frame;
pub use shapes::VertexCanvas;
pub use vertex::Vertex;

use glam::Vec2;

use crate::sim::Rect;

/// RGBA, 0..1 per channel
pub type Color = [f32; 4];

/// A piece of text placed in playfield coordinates (top-left anchor)
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub pos: Vec2,
    pub text: String,
    pub color: Color,
}

/// Drawing surface in playfield coordinates (origin top-left, y down)
pub trait Canvas {
    /// Discard everything and fill with `color`
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// `points` must describe a convex polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn text(&mut self, pos: Vec2, text: &str, color: Color);
}
