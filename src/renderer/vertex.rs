//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// 8-bit RGB to a linear-ish RGBA float color
pub const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Colors for game elements
pub mod colors {
    use super::rgb;

    pub const ROAD: [f32; 4] = rgb(50, 50, 50);
    pub const ROAD_MARKING: [f32; 4] = rgb(255, 255, 255);
    pub const CAR_BODY: [f32; 4] = rgb(220, 10, 60);
    pub const CAR_ROOF: [f32; 4] = rgb(178, 34, 34);
    pub const CAR_WINDOW: [f32; 4] = rgb(5, 206, 235);
    pub const TIRE: [f32; 4] = rgb(0, 0, 0);
    pub const HUBCAP: [f32; 4] = rgb(192, 192, 192);
    pub const ZONE: [f32; 4] = rgb(100, 200, 255);
    pub const ZONE_LABEL: [f32; 4] = rgb(0, 0, 0);
    pub const HUD_TEXT: [f32; 4] = rgb(255, 255, 255);
    pub const HINT_TEXT: [f32; 4] = rgb(200, 200, 200);
    pub const FEEDBACK_CORRECT: [f32; 4] = rgb(0, 255, 0);
    pub const FEEDBACK_WRONG: [f32; 4] = rgb(255, 0, 0);
    pub const OVERLAY: [f32; 4] = rgb(0, 0, 0);
    pub const PAUSE_TEXT: [f32; 4] = rgb(255, 255, 0);
    pub const GAME_OVER_TEXT: [f32; 4] = rgb(255, 0, 0);
}
