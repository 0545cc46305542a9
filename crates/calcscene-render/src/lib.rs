//! Rendering backend for calcscene.
//!
//! This crate provides:
//! - Color maps used to encode scalar values ([`ColorMap`])
//! - Material uniform blocks ([`Material`])
//! - Buffer packing helpers and GPU allocation through wgpu ([`WgpuBackend`])
//! - A ledger-only backend for tests and headless runs ([`HeadlessBackend`])

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod backend;
pub mod buffer;
pub mod color_maps;
pub mod error;
pub mod headless;
pub mod materials;

pub use backend::WgpuBackend;
pub use buffer::{index_buffer, vertex_attribute};
pub use color_maps::ColorMap;
pub use error::{RenderError, RenderResult};
pub use headless::{Allocation, HeadlessBackend};
pub use materials::{Material, MaterialKind, MaterialUniforms};
