//! calcscene: keeps a 3D scene in sync with a remote calculus service.
//!
//! Each update sends a [`ComputeRequest`] to a [`ComputeService`], classifies
//! the JSON answer, builds primitives from it and swaps them into the
//! [`SceneRegistry`], releasing whatever they replace.
//!
//! # Example
//!
//! ```no_run
//! use calcscene::{ComputeRequest, ComputeService, Operation, Options, UpdateOrchestrator};
//!
//! struct Service;
//!
//! impl ComputeService for Service {
//!     async fn fetch(&self, _request: &ComputeRequest) -> calcscene::Result<serde_json::Value> {
//!         Ok(serde_json::json!({"x": [0.0, 1.0], "y": [0.0, 1.0], "z": [[0.0, 1.0], [1.0, 2.0]]}))
//!     }
//! }
//!
//! calcscene::init_logging();
//! let mut scene = UpdateOrchestrator::headless(Options::default());
//! let status = scene.run_blocking(&Service, ComputeRequest::new("x+y", Operation::Surface));
//! println!("{status}");
//! ```

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod classify;
pub mod orchestrator;
pub mod request;
pub mod service;
pub mod status;

pub use classify::{
    classify, detect_kind, Classified, IntegralKind, LagrangeSolution, ResponseKind, ScalarResult,
};
pub use orchestrator::{UpdateOrchestrator, UpdatePhase, UpdateTicket};
pub use request::{ComputeRequest, Operation, Variable};
pub use service::{decode_response, ComputeService};
pub use status::StatusDescriptor;

pub use calcscene_core::{
    CalcSceneError, GridColoring, GridStyle, Options, Result, SceneObject, SceneRegistry,
    SceneSlot,
};
pub use calcscene_render::{HeadlessBackend, WgpuBackend};

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3, Vec4};

/// Initializes `env_logger` from `RUST_LOG`. Calling it again is harmless.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
