//! Geometry builders: validated payloads in, renderable primitives out.
//!
//! Builders never fail. Structural problems are rejected when the payload
//! types are constructed, and flat or degenerate functions still produce a
//! valid, if visually trivial, primitive.

mod grid;
mod implicit;
mod vector_field;

pub use grid::{build_grid_points, build_grid_surface, build_grid_wireframe};
pub use implicit::{build_implicit_mesh, build_implicit_points};
pub use vector_field::{build_gradient_arrow, build_vector_field, FieldGlyphs};
