//! Normal computation for triangle meshes.

use glam::Vec3;

/// Computes vertex normals as the area-weighted average of incident face
/// normals.
///
/// Faces with a non-finite or zero area contribute nothing; vertices
/// touched only by such faces get a zero normal.
pub fn vertex_normals(positions: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in triangles {
        let [a, b, c] = tri.map(|i| positions[i as usize]);
        // Unnormalized cross product: length is twice the face area.
        let weighted = (b - a).cross(c - a);
        if !weighted.is_finite() {
            continue;
        }
        for &vi in tri {
            normals[vi as usize] += weighted;
        }
    }

    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}

/// Fan-triangulates a polygon given by `corners`.
///
/// For corners `[v0, v1, v2, v3, ...]` this yields
/// `[v0, v1, v2], [v0, v2, v3], ...`.
pub fn fan_triangulate(corners: &[u32]) -> impl Iterator<Item = [u32; 3]> + '_ {
    let v0 = corners.first().copied().unwrap_or_default();
    corners
        .windows(2)
        .skip(1)
        .map(move |w| [v0, w[0], w[1]])
}
