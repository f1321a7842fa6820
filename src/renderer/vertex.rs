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

/// Sprite colors
pub mod colors {
    use crate::sim::AsteroidVariant;

    pub const SHIP_HULL: [f32; 4] = [0.85, 0.85, 0.9, 1.0];
    pub const SHIP_COCKPIT: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
    pub const SHIP_ENGINE: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
    pub const BULLET: [f32; 4] = [1.0, 0.95, 0.3, 1.0];
    pub const PACKAGE: [f32; 4] = [0.55, 0.35, 0.15, 1.0];
    pub const PACKAGE_STRAP: [f32; 4] = [0.95, 0.8, 0.2, 1.0];

    /// Body color per asteroid variant
    pub fn asteroid(variant: AsteroidVariant) -> [f32; 4] {
        match variant {
            AsteroidVariant::Rocky => [0.45, 0.4, 0.35, 1.0],
            AsteroidVariant::Cratered => [0.35, 0.33, 0.32, 1.0],
            AsteroidVariant::Jagged => [0.5, 0.45, 0.4, 1.0],
            AsteroidVariant::Icy => [0.7, 0.85, 0.95, 1.0],
            AsteroidVariant::Metallic => [0.6, 0.62, 0.68, 1.0],
            AsteroidVariant::Dusty => [0.6, 0.5, 0.38, 1.0],
            AsteroidVariant::Cracked => [0.3, 0.28, 0.3, 1.0],
            AsteroidVariant::Molten => [0.75, 0.3, 0.12, 1.0],
            AsteroidVariant::Ringed => [0.5, 0.42, 0.55, 1.0],
        }
    }
}
