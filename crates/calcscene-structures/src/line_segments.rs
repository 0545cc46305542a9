//! Line segment primitive.

use std::any::Any;

use calcscene_core::{BufferData, PrimitiveKind, SceneObject};
use calcscene_render::{vertex_attribute, Material};
use glam::Vec3;

use crate::bounding_box_of;

/// Independent line segments stored as consecutive endpoint pairs.
pub struct LineSegments {
    name: String,
    positions: Vec<Vec3>,
    material: Material,
}

impl LineSegments {
    /// Creates segments from `(start, end)` pairs.
    pub fn new(name: impl Into<String>, segments: &[(Vec3, Vec3)], color: Vec3) -> Self {
        let positions = segments.iter().flat_map(|&(a, b)| [a, b]).collect();
        Self {
            name: name.into(),
            positions,
            material: Material::line_basic(color),
        }
    }

    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.positions.len() / 2
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl SceneObject for LineSegments {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::LineSegments
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        bounding_box_of(&self.positions)
    }

    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn buffers(&self) -> Vec<BufferData> {
        vec![
            vertex_attribute(&self.name, "positions", &self.positions),
            self.material.to_buffer(&self.name),
        ]
    }
}
