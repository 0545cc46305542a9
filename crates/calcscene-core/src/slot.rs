//! Semantic scene slots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An ownership unit of the scene registry.
///
/// Each slot holds at most one live generation of rendered resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneSlot {
    /// Shaded surface: explicit grid surface or implicit mesh.
    Surface,
    /// Grid wireframe.
    Wireframe,
    /// Point cloud: explicit grid samples or implicit points.
    Points,
    /// Arrows and critical-point markers of a gradient field.
    VectorField,
    /// The single gradient arrow drawn for a point query.
    AnnotationArrow,
}

impl SceneSlot {
    /// All slots in draw order.
    pub const ALL: [SceneSlot; 5] = [
        SceneSlot::Surface,
        SceneSlot::Wireframe,
        SceneSlot::Points,
        SceneSlot::VectorField,
        SceneSlot::AnnotationArrow,
    ];

    /// Stable index into per-slot tables.
    pub const fn index(self) -> usize {
        match self {
            SceneSlot::Surface => 0,
            SceneSlot::Wireframe => 1,
            SceneSlot::Points => 2,
            SceneSlot::VectorField => 3,
            SceneSlot::AnnotationArrow => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SceneSlot::Surface => "surface",
            SceneSlot::Wireframe => "wireframe",
            SceneSlot::Points => "points",
            SceneSlot::VectorField => "vectorField",
            SceneSlot::AnnotationArrow => "annotationArrow",
        }
    }
}

impl fmt::Display for SceneSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
