//! Material parameters uploaded alongside each primitive.

use calcscene_core::{BufferData, BufferUsage};
use glam::{Vec3, Vec4};

/// How a primitive is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Lit, per-vertex colored, double sided.
    Standard,
    /// Unlit single-color lines.
    LineBasic,
    /// Per-vertex colored point sprites.
    Points,
    /// Lit single-color solid (arrows, markers).
    Solid,
}

/// Uniform block shared by every material kind.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniforms {
    pub base_color: [f32; 4],
    pub point_size: f32,
    pub vertex_colors: u32,
    pub double_sided: u32,
    pub _padding: f32,
}

/// A material describing how a primitive's buffers are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub base_color: Vec4,
    pub point_size: f32,
    pub vertex_colors: bool,
    pub double_sided: bool,
}

impl Material {
    /// Lit surface colored by its vertex colors, visible from both sides.
    pub fn standard() -> Self {
        Self {
            kind: MaterialKind::Standard,
            base_color: Vec4::ONE,
            point_size: 0.0,
            vertex_colors: true,
            double_sided: true,
        }
    }

    pub fn line_basic(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::LineBasic,
            base_color: color.extend(1.0),
            point_size: 0.0,
            vertex_colors: false,
            double_sided: false,
        }
    }

    pub fn points(size: f32) -> Self {
        Self {
            kind: MaterialKind::Points,
            base_color: Vec4::ONE,
            point_size: size,
            vertex_colors: true,
            double_sided: false,
        }
    }

    pub fn solid(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::Solid,
            base_color: color.extend(1.0),
            point_size: 0.0,
            vertex_colors: false,
            double_sided: false,
        }
    }

    pub fn uniforms(&self) -> MaterialUniforms {
        MaterialUniforms {
            base_color: self.base_color.to_array(),
            point_size: self.point_size,
            vertex_colors: u32::from(self.vertex_colors),
            double_sided: u32::from(self.double_sided),
            _padding: 0.0,
        }
    }

    /// The material's uniform buffer.
    pub fn to_buffer(&self, label: &str) -> BufferData {
        BufferData::new(
            format!("{label} material"),
            BufferUsage::Uniform,
            bytemuck::bytes_of(&self.uniforms()).to_vec(),
        )
    }
}
