//! Isosurface meshes and implicit point clouds.

use calcscene_core::{axis, ImplicitMesh, ImplicitPointCloud, Options, ValueRange};
use calcscene_render::{ColorMap, Material};
use glam::Vec3;

use crate::triangle_mesh::geometry::{fan_triangulate, vertex_normals};
use crate::{PointCloud, TriangleMesh};

/// Builds an isosurface mesh.
///
/// Every face gets its own vertex records (`corner_count` in total), so
/// the output holds `faces.len() * k` vertices for `k`-gons. Normals are
/// averaged over the shared topology before the faces are split apart, so
/// shading stays smooth across face boundaries. Colors follow the
/// `elevation` palette over the normalized domain `z`.
pub fn build_implicit_mesh(mesh: &ImplicitMesh) -> TriangleMesh {
    let shared: Vec<Vec3> = mesh.vertices().iter().map(|&v| axis::point_to_render(v)).collect();
    let shared_triangles: Vec<[u32; 3]> = mesh
        .faces()
        .iter()
        .flat_map(|face| fan_triangulate(face))
        .collect();
    let shared_normals = vertex_normals(&shared, &shared_triangles);

    let elevation = ValueRange::of_finite(mesh.vertices().iter().map(|v| v[2]))
        .unwrap_or(ValueRange::new(0.0, 0.0));
    let color_map = ColorMap::elevation();

    let corners = mesh.corner_count();
    let mut positions = Vec::with_capacity(corners);
    let mut normals = Vec::with_capacity(corners);
    let mut colors = Vec::with_capacity(corners);
    let mut triangles = Vec::with_capacity(shared_triangles.len());

    for face in mesh.faces() {
        let base = positions.len() as u32;
        for &vi in face {
            let vi = vi as usize;
            positions.push(shared[vi]);
            normals.push(shared_normals[vi]);
            colors.push(color_map.sample(elevation.normalize_clamped(mesh.vertices()[vi][2])));
        }
        let local: Vec<u32> = (base..base + face.len() as u32).collect();
        triangles.extend(fan_triangulate(&local));
    }

    log::debug!(
        "implicit mesh: iso {} over [{}, {}], {} faces, {} vertex records",
        mesh.iso_value(),
        mesh.value_range().min,
        mesh.value_range().max,
        mesh.faces().len(),
        positions.len()
    );
    TriangleMesh::with_normals(
        "implicit surface",
        positions,
        normals,
        colors,
        triangles,
        Material::standard(),
    )
}

/// Builds a point cloud near an implicit surface.
///
/// Points are colored by their normalized value through the `spectrum`
/// palette when parallel values are available, otherwise by normalized
/// position, one channel per domain axis.
pub fn build_implicit_points(cloud: &ImplicitPointCloud, options: &Options) -> PointCloud {
    let points: Vec<Vec3> = cloud.vertices().iter().map(|&v| axis::point_to_render(v)).collect();

    if cloud.has_mismatched_values() {
        log::warn!("point values are not parallel to the vertices; coloring by position");
    }

    let by_value = cloud
        .color_values()
        .and_then(|values| ValueRange::of_finite(values.iter().copied()).map(|r| (values, r)));

    let colors = match by_value {
        Some((values, range)) => {
            let color_map = ColorMap::spectrum();
            values
                .iter()
                .map(|&v| color_map.sample(range.normalize_clamped(v)))
                .collect()
        }
        None => positional_colors(cloud.vertices()),
    };

    PointCloud::new("implicit points", points, colors, options.point_size)
}

fn positional_colors(vertices: &[[f64; 3]]) -> Vec<Vec3> {
    let range = |axis: usize| {
        ValueRange::of_finite(vertices.iter().map(|v| v[axis])).unwrap_or(ValueRange::new(0.0, 0.0))
    };
    let (rx, ry, rz) = (range(0), range(1), range(2));
    vertices
        .iter()
        .map(|v| {
            Vec3::new(
                rx.normalize_clamped(v[0]),
                ry.normalize_clamped(v[1]),
                rz.normalize_clamped(v[2]),
            )
        })
        .collect()
}
