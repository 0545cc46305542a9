//! Configuration options for calcscene.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Global configuration for geometry synthesis and scene updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Gradient magnitude below which a field sample is a critical point.
    pub critical_epsilon: f64,

    /// Shortest arrow drawn for a vector field sample.
    pub arrow_min_length: f32,

    /// Longest arrow drawn for a vector field sample.
    pub arrow_max_length: f32,

    /// Arrow head length as a fraction of the arrow length.
    pub arrow_head_ratio: f32,

    /// Arrow head radius as a fraction of the arrow length.
    pub arrow_head_width_ratio: f32,

    /// Radius of critical-point markers.
    pub marker_radius: f32,

    /// Color of critical-point markers.
    pub marker_color: Vec3,

    /// Point sprite size for point clouds.
    pub point_size: f32,

    /// Line color of grid wireframes.
    pub wireframe_color: Vec3,

    /// Color of the single gradient annotation arrow.
    pub annotation_color: Vec3,

    /// Length clamp of the annotation arrow.
    pub annotation_min_length: f32,
    pub annotation_max_length: f32,

    /// Which primitives an explicit grid produces.
    pub grid_style: GridStyle,

    /// How explicit grid vertices are colored.
    pub grid_coloring: GridColoring,

    /// Expression used when a request leaves it blank.
    pub default_expression: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            critical_epsilon: 0.01,
            arrow_min_length: 0.3,
            arrow_max_length: 1.0,
            arrow_head_ratio: 0.3,
            arrow_head_width_ratio: 0.15,
            marker_radius: 0.08,
            marker_color: Vec3::new(1.0, 0.0, 1.0),
            point_size: 0.05,
            wireframe_color: hex_color(0x003b_82f6),
            annotation_color: hex_color(0x00ff_0000),
            annotation_min_length: 0.5,
            annotation_max_length: 3.0,
            grid_style: GridStyle::default(),
            grid_coloring: GridColoring::default(),
            default_expression: "x^2+y^2".to_string(),
        }
    }
}

impl Options {
    /// Parses options from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Which primitives an explicit grid populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GridStyle {
    pub surface: bool,
    pub wireframe: bool,
    pub points: bool,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            surface: true,
            wireframe: false,
            points: false,
        }
    }
}

/// Vertex coloring convention for explicit grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GridColoring {
    /// Normalized x, y and elevation drive the red, green and blue channels.
    #[default]
    AxisChannels,
    /// Normalized elevation through the default color map.
    Elevation,
}

/// Converts a `0xRRGGBB` literal to a linear `[0, 1]` color.
pub fn hex_color(hex: u32) -> Vec3 {
    let r = (hex >> 16) & 0xff;
    let g = (hex >> 8) & 0xff;
    let b = hex & 0xff;
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}
