//! Validated numeric payloads.
//!
//! Every type here is constructed through a checking constructor, so the
//! geometry builders downstream never see a structurally broken input.
//! All coordinates are in domain space (`z` is elevation).

use crate::error::{CalcSceneError, Result};
use crate::range::ValueRange;

/// Samples of `z = f(x, y)` on a regular grid.
///
/// `z[i][j] = f(x[j], y[i])`, row-major with `rows = y.len()` and
/// `cols = x.len()`. Individual samples may be NaN or infinite to mark
/// points where the function is undefined.
#[derive(Debug, Clone)]
pub struct ScalarGrid {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<Vec<f64>>,
    x_range: ValueRange,
    y_range: ValueRange,
    z_range: ValueRange,
}

impl ScalarGrid {
    /// Validates and wraps grid samples.
    ///
    /// Fails with `InvalidShape` for empty axes, non-finite axis coordinates
    /// or a `z` array whose dimensions disagree with the axes, and with
    /// `NoValidSamples` when no entry of `z` is finite.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<Vec<f64>>) -> Result<Self> {
        if x.is_empty() || y.is_empty() {
            return Err(CalcSceneError::invalid_shape(format!(
                "grid needs at least one column and one row (got {} x {})",
                y.len(),
                x.len()
            )));
        }
        if z.len() != y.len() {
            return Err(CalcSceneError::invalid_shape(format!(
                "grid has {} rows of samples for {} y coordinates",
                z.len(),
                y.len()
            )));
        }
        if let Some((i, row)) = z.iter().enumerate().find(|(_, row)| row.len() != x.len()) {
            return Err(CalcSceneError::invalid_shape(format!(
                "grid row {i} has {} samples, expected {}",
                row.len(),
                x.len()
            )));
        }

        let x_range = axis_range("x", &x)?;
        let y_range = axis_range("y", &y)?;
        let z_range = ValueRange::of_finite(z.iter().flatten().copied()).ok_or_else(|| {
            CalcSceneError::no_valid_samples("the expression has no finite value on the grid")
        })?;

        Ok(Self {
            x,
            y,
            z,
            x_range,
            y_range,
            z_range,
        })
    }

    /// Number of rows (`y` samples).
    pub fn rows(&self) -> usize {
        self.y.len()
    }

    /// Number of columns (`x` samples).
    pub fn cols(&self) -> usize {
        self.x.len()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Sample at row `i`, column `j`.
    pub fn z(&self, i: usize, j: usize) -> f64 {
        self.z[i][j]
    }

    pub fn x_range(&self) -> ValueRange {
        self.x_range
    }

    pub fn y_range(&self) -> ValueRange {
        self.y_range
    }

    /// Range of the finite elevation samples.
    pub fn z_range(&self) -> ValueRange {
        self.z_range
    }

    /// Number of finite elevation samples.
    pub fn finite_count(&self) -> usize {
        self.z.iter().flatten().filter(|v| v.is_finite()).count()
    }
}

fn axis_range(name: &str, coords: &[f64]) -> Result<ValueRange> {
    if coords.iter().any(|c| !c.is_finite()) {
        return Err(CalcSceneError::invalid_shape(format!(
            "grid axis {name} contains a non-finite coordinate"
        )));
    }
    ValueRange::of_finite(coords.iter().copied())
        .ok_or_else(|| CalcSceneError::invalid_shape(format!("grid axis {name} is empty")))
}

/// A triangulated isosurface produced by the service.
#[derive(Debug, Clone)]
pub struct ImplicitMesh {
    vertices: Vec<[f64; 3]>,
    faces: Vec<Vec<u32>>,
    iso_value: f64,
    value_range: ValueRange,
}

impl ImplicitMesh {
    /// Validates vertices and faces.
    ///
    /// An empty vertex list means no isosurface crossed the sampled volume and
    /// is reported as `NoValidSamples`; every other violation is
    /// `InvalidShape`.
    pub fn new(
        vertices: Vec<[f64; 3]>,
        faces: Vec<Vec<u32>>,
        iso_value: f64,
        value_range: ValueRange,
    ) -> Result<Self> {
        if vertices.is_empty() {
            return Err(CalcSceneError::no_valid_samples(format!(
                "no isosurface found for iso value {iso_value}"
            )));
        }
        if faces.is_empty() {
            return Err(CalcSceneError::invalid_shape(format!(
                "mesh has {} vertices but no faces",
                vertices.len()
            )));
        }
        if vertices.iter().flatten().any(|c| !c.is_finite()) {
            return Err(CalcSceneError::invalid_shape(
                "mesh contains a non-finite vertex",
            ));
        }
        let n = vertices.len();
        for (f, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(CalcSceneError::invalid_shape(format!(
                    "face {f} has {} indices, at least 3 are required",
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&vi| vi as usize >= n) {
                return Err(CalcSceneError::invalid_shape(format!(
                    "face {f} references vertex {bad}, mesh has {n}"
                )));
            }
        }

        Ok(Self {
            vertices,
            faces,
            iso_value,
            value_range,
        })
    }

    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    pub fn iso_value(&self) -> f64 {
        self.iso_value
    }

    /// Range of the sampled scalar field; informational only.
    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    /// Total number of face corners.
    pub fn corner_count(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }
}

/// Unstructured points on or near an implicit surface.
#[derive(Debug, Clone)]
pub struct ImplicitPointCloud {
    vertices: Vec<[f64; 3]>,
    values: Option<Vec<f64>>,
}

impl ImplicitPointCloud {
    /// Validates the vertices.
    ///
    /// `values` is kept as given; [`color_values`](Self::color_values) only
    /// exposes it when its length matches the vertices.
    pub fn new(vertices: Vec<[f64; 3]>, values: Option<Vec<f64>>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(CalcSceneError::no_valid_samples(
                "no points found near the implicit surface",
            ));
        }
        if vertices.iter().flatten().any(|c| !c.is_finite()) {
            return Err(CalcSceneError::invalid_shape(
                "point cloud contains a non-finite vertex",
            ));
        }
        Ok(Self { vertices, values })
    }

    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    /// Per-vertex scalar values, when present and parallel to the vertices.
    pub fn color_values(&self) -> Option<&[f64]> {
        self.values
            .as_deref()
            .filter(|values| values.len() == self.vertices.len())
    }

    /// True when values were supplied but cannot be used.
    pub fn has_mismatched_values(&self) -> bool {
        self.values
            .as_ref()
            .is_some_and(|values| values.len() != self.vertices.len())
    }
}

/// One sample of a planar gradient field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorSample {
    /// Base position; 2D positions are lifted to `z = 0`.
    pub position: [f64; 3],
    /// Gradient direction; the third component is always zero.
    pub gradient: [f64; 3],
    pub magnitude: f64,
}

impl VectorSample {
    /// Builds a sample from wire components of arity 2 or 3.
    pub fn from_components(position: &[f64], gradient: &[f64], magnitude: f64) -> Result<Self> {
        let position = match *position {
            [x, y] => [x, y, 0.0],
            [x, y, z] => [x, y, z],
            _ => {
                return Err(CalcSceneError::invalid_shape(format!(
                    "vector position has {} components, expected 2 or 3",
                    position.len()
                )))
            }
        };
        let gradient = match *gradient {
            [gx, gy] | [gx, gy, _] => [gx, gy, 0.0],
            _ => {
                return Err(CalcSceneError::invalid_shape(format!(
                    "vector gradient has {} components, expected 2 or 3",
                    gradient.len()
                )))
            }
        };
        if magnitude < 0.0 {
            return Err(CalcSceneError::invalid_shape(format!(
                "vector magnitude {magnitude} is negative"
            )));
        }
        Ok(Self {
            position,
            gradient,
            magnitude,
        })
    }

    fn is_finite(&self) -> bool {
        self.magnitude.is_finite()
            && self.position.iter().all(|c| c.is_finite())
            && self.gradient.iter().all(|c| c.is_finite())
    }
}

/// A sampled gradient field.
#[derive(Debug, Clone)]
pub struct VectorField {
    samples: Vec<VectorSample>,
    magnitude_range: ValueRange,
}

impl VectorField {
    /// Keeps the finite samples.
    ///
    /// Fails with `NoValidSamples` when none survive.
    pub fn new(samples: Vec<VectorSample>) -> Result<Self> {
        let total = samples.len();
        let samples: Vec<VectorSample> = samples.into_iter().filter(VectorSample::is_finite).collect();
        if samples.len() < total {
            log::warn!(
                "dropped {} non-finite vector samples out of {total}",
                total - samples.len()
            );
        }
        let magnitude_range = ValueRange::of_finite(samples.iter().map(|s| s.magnitude))
            .ok_or_else(|| CalcSceneError::no_valid_samples("the vector field has no samples"))?;
        Ok(Self {
            samples,
            magnitude_range,
        })
    }

    pub fn samples(&self) -> &[VectorSample] {
        &self.samples
    }

    /// Observed `[min, max]` of the sample magnitudes.
    pub fn magnitude_range(&self) -> ValueRange {
        self.magnitude_range
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paraboloid() -> (Vec<f64>, Vec<f64>, Vec<Vec<f64>>) {
        (
            vec![-1.0, 0.0, 1.0],
            vec![-1.0, 0.0, 1.0],
            vec![
                vec![1.0, 0.0, 1.0],
                vec![0.0, 0.0, 0.0],
                vec![1.0, 0.0, 1.0],
            ],
        )
    }

    #[test]
    fn grid_accepts_paraboloid() {
        let (x, y, z) = paraboloid();
        let grid = ScalarGrid::new(x, y, z).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.z_range(), ValueRange::new(0.0, 1.0));
        assert_eq!(grid.finite_count(), 9);
    }

    #[test]
    fn grid_rejects_empty_axis() {
        let err = ScalarGrid::new(vec![], vec![0.0], vec![vec![]]).unwrap_err();
        assert!(matches!(err, CalcSceneError::InvalidShape(_)));
    }

    #[test]
    fn grid_rejects_ragged_rows() {
        let err = ScalarGrid::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![vec![0.0, 1.0], vec![0.0]])
            .unwrap_err();
        assert!(matches!(err, CalcSceneError::InvalidShape(_)));
    }

    #[test]
    fn grid_without_finite_values() {
        let err = ScalarGrid::new(
            vec![0.0, 1.0],
            vec![0.0],
            vec![vec![f64::NAN, f64::INFINITY]],
        )
        .unwrap_err();
        assert!(matches!(err, CalcSceneError::NoValidSamples(_)));
    }

    #[test]
    fn mesh_validation() {
        let verts = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let range = ValueRange::new(0.0, 1.0);
        assert!(ImplicitMesh::new(verts.clone(), vec![vec![0, 1, 2]], 0.0, range).is_ok());
        assert!(matches!(
            ImplicitMesh::new(verts.clone(), vec![vec![0, 1, 3]], 0.0, range),
            Err(CalcSceneError::InvalidShape(_))
        ));
        assert!(matches!(
            ImplicitMesh::new(verts.clone(), vec![vec![0, 1]], 0.0, range),
            Err(CalcSceneError::InvalidShape(_))
        ));
        assert!(matches!(
            ImplicitMesh::new(verts, vec![], 0.0, range),
            Err(CalcSceneError::InvalidShape(_))
        ));
        assert!(matches!(
            ImplicitMesh::new(vec![], vec![], 0.0, range),
            Err(CalcSceneError::NoValidSamples(_))
        ));
    }

    #[test]
    fn point_cloud_values_must_be_parallel() {
        let verts = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let cloud = ImplicitPointCloud::new(verts.clone(), Some(vec![1.0])).unwrap();
        assert!(cloud.color_values().is_none());
        assert!(cloud.has_mismatched_values());

        let cloud = ImplicitPointCloud::new(verts, Some(vec![1.0, 2.0])).unwrap();
        assert_eq!(cloud.color_values(), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn vector_sample_arity() {
        let s = VectorSample::from_components(&[1.0, 2.0], &[0.5, 0.5, 9.0], 0.7).unwrap();
        assert_eq!(s.position, [1.0, 2.0, 0.0]);
        assert_eq!(s.gradient, [0.5, 0.5, 0.0]);
        assert!(VectorSample::from_components(&[1.0], &[0.0, 0.0], 0.0).is_err());
        assert!(VectorSample::from_components(&[1.0, 2.0], &[0.0, 0.0], -1.0).is_err());
    }

    #[test]
    fn empty_field_has_no_valid_samples() {
        assert!(matches!(
            VectorField::new(vec![]),
            Err(CalcSceneError::NoValidSamples(_))
        ));
    }

    #[test]
    fn field_drops_non_finite_samples() {
        let good = VectorSample::from_components(&[0.0, 0.0], &[1.0, 0.0], 1.0).unwrap();
        let bad = VectorSample::from_components(&[f64::NAN, 0.0], &[1.0, 0.0], 1.0).unwrap();
        let field = VectorField::new(vec![good, bad]).unwrap();
        assert_eq!(field.len(), 1);
    }
}
