//! Renderable primitives and geometry builders for calcscene.
//!
//! # Primitives
//!
//! - [`TriangleMesh`] - shaded, vertex-colored triangles
//! - [`LineSegments`] - wireframes
//! - [`PointCloud`] - colored point sprites
//! - [`Arrow`] and [`Marker`] - vector-field glyphs
//!
//! # Builders
//!
//! The [`builders`] module turns validated payloads into primitives. Every
//! builder is a pure function of its input and the [`Options`](calcscene_core::Options).

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_arguments)]

pub mod builders;
pub mod glyphs;
pub mod line_segments;
pub mod point_cloud;
pub mod triangle_mesh;

pub use builders::{
    build_gradient_arrow, build_grid_points, build_grid_surface, build_grid_wireframe,
    build_implicit_mesh, build_implicit_points, build_vector_field, FieldGlyphs,
};
pub use glyphs::{Arrow, Marker};
pub use line_segments::LineSegments;
pub use point_cloud::PointCloud;
pub use triangle_mesh::TriangleMesh;

use glam::Vec3;

/// Axis-aligned bounds of the finite points in `points`.
pub(crate) fn bounding_box_of(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
    points
        .iter()
        .filter(|p| p.is_finite())
        .fold(None, |acc, &p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
}
