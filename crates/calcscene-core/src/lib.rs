//! Core abstractions for calcscene.
//!
//! This crate provides the fundamental types shared by the other crates:
//! - Validated payload data ([`ScalarGrid`], [`ImplicitMesh`], [`ImplicitPointCloud`], [`VectorField`])
//! - The domain-to-render axis convention ([`axis`])
//! - [`SceneObject`] and [`RenderBackend`] seams between geometry and GPU resources
//! - The [`SceneRegistry`] owning what is currently on screen
//! - Configuration [`Options`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Payload coordinates arrive as f64 and are rendered as f32
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod axis;
pub mod data;
pub mod error;
pub mod group;
pub mod options;
pub mod range;
pub mod registry;
pub mod slot;
pub mod structure;

pub use data::{ImplicitMesh, ImplicitPointCloud, ScalarGrid, VectorField, VectorSample};
pub use error::{CalcSceneError, Result};
pub use group::ObjectGroup;
pub use options::{hex_color, GridColoring, GridStyle, Options};
pub use range::ValueRange;
pub use registry::SceneRegistry;
pub use slot::SceneSlot;
pub use structure::{
    BufferData, BufferUsage, PrimitiveKind, RenderBackend, ResourceHandle, ResourceStats,
    SceneObject,
};

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3, Vec4};
