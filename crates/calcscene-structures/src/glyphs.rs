//! Arrow and marker glyphs.
//!
//! Both glyphs carry their geometry in render space. An arrow is a shaft
//! segment plus a closed cone; a marker is an octahedron.

use std::any::Any;

use calcscene_core::{BufferData, PrimitiveKind, SceneObject};
use calcscene_render::{index_buffer, vertex_attribute, Material};
use glam::Vec3;

use crate::bounding_box_of;

const CONE_SEGMENTS: u32 = 8;

/// A directional arrow.
pub struct Arrow {
    name: String,
    origin: Vec3,
    direction: Vec3,
    length: f32,
    head_length: f32,
    head_width: f32,
    shaft: [Vec3; 2],
    head_positions: Vec<Vec3>,
    head_indices: Vec<u32>,
    material: Material,
}

impl Arrow {
    /// Creates an arrow from `origin` along `direction` (normalized here).
    ///
    /// `head_width` is the full width of the cone base. The head never
    /// exceeds the arrow's length.
    pub fn new(
        name: impl Into<String>,
        origin: Vec3,
        direction: Vec3,
        length: f32,
        head_length: f32,
        head_width: f32,
        color: Vec3,
    ) -> Self {
        let direction = direction.normalize_or(Vec3::Y);
        let head_length = head_length.min(length);
        let tip = origin + direction * length;
        let neck = origin + direction * (length - head_length);
        let (head_positions, head_indices) = cone(neck, tip, direction, head_width * 0.5);

        Self {
            name: name.into(),
            origin,
            direction,
            length,
            head_length,
            head_width,
            shaft: [origin, neck],
            head_positions,
            head_indices,
            material: Material::solid(color),
        }
    }

    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction in render space.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[must_use]
    pub fn head_length(&self) -> f32 {
        self.head_length
    }

    #[must_use]
    pub fn head_width(&self) -> f32 {
        self.head_width
    }

    #[must_use]
    pub fn tip(&self) -> Vec3 {
        self.origin + self.direction * self.length
    }

    #[must_use]
    pub fn color(&self) -> Vec3 {
        self.material.base_color.truncate()
    }
}

/// Cone from a base circle at `base` to `tip`: apex, base center, ring.
fn cone(base: Vec3, tip: Vec3, axis: Vec3, radius: f32) -> (Vec<Vec3>, Vec<u32>) {
    let (u, v) = axis.any_orthonormal_pair();
    let mut positions = vec![tip, base];
    for k in 0..CONE_SEGMENTS {
        let angle = std::f32::consts::TAU * k as f32 / CONE_SEGMENTS as f32;
        positions.push(base + (u * angle.cos() + v * angle.sin()) * radius);
    }

    let mut indices = Vec::with_capacity(CONE_SEGMENTS as usize * 6);
    for k in 0..CONE_SEGMENTS {
        let a = 2 + k;
        let b = 2 + (k + 1) % CONE_SEGMENTS;
        indices.extend_from_slice(&[0, a, b]);
        indices.extend_from_slice(&[1, b, a]);
    }
    (positions, indices)
}

impl SceneObject for Arrow {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Arrow
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let all: Vec<Vec3> = self
            .shaft
            .iter()
            .chain(self.head_positions.iter())
            .copied()
            .collect();
        bounding_box_of(&all)
    }

    fn vertex_count(&self) -> usize {
        self.shaft.len() + self.head_positions.len()
    }

    fn buffers(&self) -> Vec<BufferData> {
        vec![
            vertex_attribute(&self.name, "shaft", &self.shaft),
            vertex_attribute(&self.name, "head", &self.head_positions),
            index_buffer(&self.name, &self.head_indices),
            self.material.to_buffer(&self.name),
        ]
    }
}

/// A point marker, used for vector-field critical points.
pub struct Marker {
    name: String,
    center: Vec3,
    radius: f32,
    positions: Vec<Vec3>,
    material: Material,
}

/// Octahedron faces over vertices `+x, -x, +y, -y, +z, -z`.
const OCTAHEDRON: [u32; 24] = [
    0, 2, 4, 2, 1, 4, 1, 3, 4, 3, 0, 4, //
    2, 0, 5, 1, 2, 5, 3, 1, 5, 0, 3, 5,
];

impl Marker {
    pub fn new(name: impl Into<String>, center: Vec3, radius: f32, color: Vec3) -> Self {
        let positions = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z]
            .iter()
            .map(|d| center + *d * radius)
            .collect();
        Self {
            name: name.into(),
            center,
            radius,
            positions,
            material: Material::solid(color),
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl SceneObject for Marker {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Marker
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        Some((
            self.center - Vec3::splat(self.radius),
            self.center + Vec3::splat(self.radius),
        ))
    }

    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn buffers(&self) -> Vec<BufferData> {
        vec![
            vertex_attribute(&self.name, "positions", &self.positions),
            index_buffer(&self.name, &OCTAHEDRON),
            self.material.to_buffer(&self.name),
        ]
    }
}
