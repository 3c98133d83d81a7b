//! Vertex format shared by the scene builder and the pipeline

use bytemuck::{Pod, Zeroable};

/// 2D vertex in logical canvas units, with a straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

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
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Same color with its alpha scaled
pub fn fade(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.04, 0.03, 0.04, 1.0];
    pub const SKY_GLOW: [f32; 4] = [0.35, 0.22, 0.05, 1.0];
    pub const PLATFORM: [f32; 4] = [0.24, 0.24, 0.27, 1.0];
    pub const PLATFORM_EDGE: [f32; 4] = [0.45, 0.36, 0.2, 1.0];
    pub const MELEE: [f32; 4] = [0.94, 0.94, 0.9, 1.0];
    pub const RANGED: [f32; 4] = [1.0, 0.85, 0.45, 1.0];
    pub const BOSS: [f32; 4] = [0.92, 0.7, 0.03, 1.0];
    pub const CORPSE: [f32; 4] = [0.3, 0.3, 0.3, 0.6];
    pub const HIT_FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SWING: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const BAR_BACK: [f32; 4] = [0.1, 0.1, 0.1, 0.85];
    pub const BAR_ENEMY: [f32; 4] = [0.8, 0.1, 0.1, 1.0];
    pub const BAR_BOSS: [f32; 4] = [0.85, 0.55, 0.05, 1.0];
    pub const BAR_PLAYER: [f32; 4] = [0.7, 0.05, 0.05, 1.0];
}
