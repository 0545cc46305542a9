//! Point cloud primitive.

use std::any::Any;

use calcscene_core::{BufferData, PrimitiveKind, SceneObject};
use calcscene_render::{vertex_attribute, Material};
use glam::Vec3;

use crate::bounding_box_of;

/// A set of colored point sprites.
pub struct PointCloud {
    name: String,
    points: Vec<Vec3>,
    colors: Vec<Vec3>,
    material: Material,
}

impl PointCloud {
    /// Creates a new point cloud with one color per point.
    pub fn new(name: impl Into<String>, points: Vec<Vec3>, colors: Vec<Vec3>, point_size: f32) -> Self {
        debug_assert_eq!(points.len(), colors.len());
        Self {
            name: name.into(),
            points,
            colors,
            material: Material::points(point_size),
        }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the points.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[must_use]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Gets the point size.
    #[must_use]
    pub fn point_size(&self) -> f32 {
        self.material.point_size
    }
}

impl SceneObject for PointCloud {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Points
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        bounding_box_of(&self.points)
    }

    fn vertex_count(&self) -> usize {
        self.points.len()
    }

    fn buffers(&self) -> Vec<BufferData> {
        vec![
            vertex_attribute(&self.name, "positions", &self.points),
            vertex_attribute(&self.name, "colors", &self.colors),
            self.material.to_buffer(&self.name),
        ]
    }
}
