//! Explicit grid surface, wireframe and points.

use calcscene_core::{axis, GridColoring, Options, ScalarGrid};
use calcscene_render::{ColorMap, Material};
use glam::Vec3;

use crate::{LineSegments, PointCloud, TriangleMesh};

/// Render-space position and color of one grid sample.
///
/// Undefined samples are placed at elevation 0 and take the low end of the
/// elevation color range.
struct GridSampler<'a> {
    grid: &'a ScalarGrid,
    coloring: GridColoring,
    color_map: ColorMap,
}

impl<'a> GridSampler<'a> {
    fn new(grid: &'a ScalarGrid, coloring: GridColoring) -> Self {
        Self {
            grid,
            coloring,
            color_map: ColorMap::spectrum(),
        }
    }

    fn elevation(&self, i: usize, j: usize) -> Option<f64> {
        let z = self.grid.z(i, j);
        z.is_finite().then_some(z)
    }

    fn position(&self, i: usize, j: usize) -> Vec3 {
        let z = self.elevation(i, j).unwrap_or(0.0);
        axis::to_render(self.grid.x()[j], self.grid.y()[i], z)
    }

    fn color(&self, i: usize, j: usize) -> Vec3 {
        let zt = self
            .elevation(i, j)
            .map_or(0.0, |z| self.grid.z_range().normalize_clamped(z));
        match self.coloring {
            GridColoring::AxisChannels => Vec3::new(
                self.grid.x_range().normalize_clamped(self.grid.x()[j]),
                self.grid.y_range().normalize_clamped(self.grid.y()[i]),
                zt,
            ),
            GridColoring::Elevation => self.color_map.sample(zt),
        }
    }

    /// Row-major sample positions and colors.
    fn vertices(&self) -> (Vec<Vec3>, Vec<Vec3>) {
        let n = self.grid.rows() * self.grid.cols();
        let mut positions = Vec::with_capacity(n);
        let mut colors = Vec::with_capacity(n);
        for i in 0..self.grid.rows() {
            for j in 0..self.grid.cols() {
                positions.push(self.position(i, j));
                colors.push(self.color(i, j));
            }
        }
        (positions, colors)
    }
}

/// Builds the shaded surface of a grid.
///
/// Vertices are row-major (`index = i * cols + j`). Each quad with corners
/// `a = (i, j)`, `b = (i, j+1)`, `c = (i+1, j)`, `d = (i+1, j+1)` is split
/// into triangles `[a, d, b]` and `[a, c, d]`, giving `2 (rows-1) (cols-1)`
/// triangles. After the axis remap this winding faces up (+y) for a
/// grid with increasing `x` and `y`. Normals are averaged from those
/// triangles.
pub fn build_grid_surface(grid: &ScalarGrid, options: &Options) -> TriangleMesh {
    let (positions, colors) = GridSampler::new(grid, options.grid_coloring).vertices();

    let rows = grid.rows();
    let cols = grid.cols();
    let mut triangles = Vec::with_capacity(2 * rows.saturating_sub(1) * cols.saturating_sub(1));
    for i in 0..rows.saturating_sub(1) {
        for j in 0..cols.saturating_sub(1) {
            let a = (i * cols + j) as u32;
            let b = a + 1;
            let c = ((i + 1) * cols + j) as u32;
            let d = c + 1;
            triangles.push([a, d, b]);
            triangles.push([a, c, d]);
        }
    }

    log::debug!(
        "grid surface: {rows}x{cols} samples, {} triangles",
        triangles.len()
    );
    TriangleMesh::new("grid surface", positions, colors, triangles, Material::standard())
}

/// Builds the wireframe of a grid: one segment between each pair of
/// horizontally or vertically adjacent samples.
pub fn build_grid_wireframe(grid: &ScalarGrid, options: &Options) -> LineSegments {
    let sampler = GridSampler::new(grid, options.grid_coloring);
    let rows = grid.rows();
    let cols = grid.cols();

    let mut segments = Vec::with_capacity(rows * cols.saturating_sub(1) + cols * rows.saturating_sub(1));
    for i in 0..rows {
        for j in 0..cols.saturating_sub(1) {
            segments.push((sampler.position(i, j), sampler.position(i, j + 1)));
        }
    }
    for j in 0..cols {
        for i in 0..rows.saturating_sub(1) {
            segments.push((sampler.position(i, j), sampler.position(i + 1, j)));
        }
    }

    LineSegments::new("grid wireframe", &segments, options.wireframe_color)
}

/// Builds one colored point per grid sample.
pub fn build_grid_points(grid: &ScalarGrid, options: &Options) -> PointCloud {
    let (positions, colors) = GridSampler::new(grid, options.grid_coloring).vertices();
    PointCloud::new("grid points", positions, colors, options.point_size)
}
