//! Indexed triangle mesh primitive.

pub mod geometry;

use std::any::Any;

use calcscene_core::{BufferData, PrimitiveKind, SceneObject};
use calcscene_render::{index_buffer, vertex_attribute, Material};
use glam::Vec3;

use crate::bounding_box_of;

/// A shaded triangle mesh with per-vertex normals and colors.
pub struct TriangleMesh {
    name: String,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    material: Material,
}

impl TriangleMesh {
    /// Creates a mesh, deriving normals from its topology.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        colors: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
        material: Material,
    ) -> Self {
        let normals = geometry::vertex_normals(&positions, &triangles);
        Self::with_normals(name, positions, normals, colors, triangles, material)
    }

    /// Creates a mesh with precomputed normals.
    pub fn with_normals(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        colors: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
        material: Material,
    ) -> Self {
        debug_assert_eq!(positions.len(), normals.len());
        debug_assert_eq!(positions.len(), colors.len());
        Self {
            name: name.into(),
            positions,
            normals,
            colors,
            triangles,
            material,
        }
    }

    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[must_use]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl SceneObject for TriangleMesh {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::TriangleMesh
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        bounding_box_of(&self.positions)
    }

    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn buffers(&self) -> Vec<BufferData> {
        let indices: Vec<u32> = self.triangles.iter().flatten().copied().collect();
        vec![
            vertex_attribute(&self.name, "positions", &self.positions),
            vertex_attribute(&self.name, "normals", &self.normals),
            vertex_attribute(&self.name, "colors", &self.colors),
            index_buffer(&self.name, &indices),
            self.material.to_buffer(&self.name),
        ]
    }
}
