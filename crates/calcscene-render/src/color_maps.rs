//! Color map system.
//!
//! Three fixed piecewise-linear palettes are used throughout:
//!
//! | name | stops | endpoints |
//! |---|---|---|
//! | `spectrum` | blue, cyan, green, yellow, red (4 bands) | `t=0` blue `(0,0,1)`, `t=1` red `(1,0,0)` |
//! | `elevation` | violet, blue, teal, lime, amber (4 bands) | `t=0` `(0.35,0.1,0.6)`, `t=1` `(1,0.65,0.1)` |
//! | `magnitude` | blue, green, yellow, red (3 bands: low/mid/high) | `t=0` `(0.2,0.4,1)`, `t=1` `(1,0.2,0.1)` |

use glam::Vec3;

/// A color map for mapping scalar values to colors.
#[derive(Debug, Clone)]
pub struct ColorMap {
    /// Color map name.
    pub name: String,
    /// Color samples (evenly spaced from 0 to 1).
    pub colors: Vec<Vec3>,
}

impl ColorMap {
    /// Creates a new color map.
    pub fn new(name: impl Into<String>, colors: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Default palette for scalar values and positions.
    pub fn spectrum() -> Self {
        Self::new(
            "spectrum",
            vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
        )
    }

    /// Elevation banding for isosurfaces.
    pub fn elevation() -> Self {
        Self::new(
            "elevation",
            vec![
                Vec3::new(0.35, 0.1, 0.6),
                Vec3::new(0.1, 0.4, 0.9),
                Vec3::new(0.1, 0.75, 0.7),
                Vec3::new(0.6, 0.9, 0.2),
                Vec3::new(1.0, 0.65, 0.1),
            ],
        )
    }

    /// Low/mid/high gradient for vector magnitudes.
    pub fn magnitude() -> Self {
        Self::new(
            "magnitude",
            vec![
                Vec3::new(0.2, 0.4, 1.0),
                Vec3::new(0.2, 0.9, 0.3),
                Vec3::new(1.0, 0.85, 0.1),
                Vec3::new(1.0, 0.2, 0.1),
            ],
        )
    }

    /// Samples the color map at a given value (0 to 1).
    ///
    /// Out-of-range input is clamped and NaN samples the low end, so every
    /// call returns finite channels.
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        if self.colors.is_empty() {
            return Vec3::ZERO;
        }

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let n = self.colors.len() - 1;
        let idx = (t * n as f32).floor() as usize;
        let idx = idx.min(n - 1);
        let frac = t * n as f32 - idx as f32;

        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }

    /// Number of linear bands.
    pub fn bands(&self) -> usize {
        self.colors.len().saturating_sub(1)
    }
}
