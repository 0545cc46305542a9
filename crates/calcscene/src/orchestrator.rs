//! The update cycle: request, classify, build, register.
//!
//! [`UpdateOrchestrator::run`] drives one cycle end to end. Callers that keep
//! several requests in flight use [`begin`](UpdateOrchestrator::begin) and
//! [`complete`](UpdateOrchestrator::complete) directly; every ticket carries
//! a sequence number and a response older than the newest resolved one,
//! failed or not, is discarded without touching the scene.

use std::collections::BTreeMap;

use calcscene_core::{Options, Result, SceneObject, SceneRegistry, SceneSlot};
use calcscene_render::HeadlessBackend;
use calcscene_structures::{
    build_gradient_arrow, build_grid_points, build_grid_surface, build_grid_wireframe,
    build_implicit_mesh, build_implicit_points, build_vector_field,
};
use serde_json::Value;

use crate::classify::{classify, Classified, ScalarResult};
use crate::request::ComputeRequest;
use crate::service::ComputeService;
use crate::status::StatusDescriptor;

/// Where the most recent update cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePhase {
    #[default]
    Idle,
    Requesting,
    Classifying,
    Building,
    Registered,
    Failed,
    EmptyResult,
}

/// An update that has been started but not completed.
#[derive(Debug, Clone)]
pub struct UpdateTicket {
    sequence: u64,
    request: ComputeRequest,
}

impl UpdateTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The request as sent, with the default expression filled in.
    pub fn request(&self) -> &ComputeRequest {
        &self.request
    }
}

enum SlotWrite {
    Object(Box<dyn SceneObject>),
    Group(&'static str, Vec<Box<dyn SceneObject>>),
    Clear,
}

/// Built primitives waiting to be swapped in.
struct ScenePlan {
    writes: Vec<(SceneSlot, SlotWrite)>,
    summary: String,
}

/// Owns the scene and runs update cycles against it.
pub struct UpdateOrchestrator {
    registry: SceneRegistry,
    options: Options,
    next_sequence: u64,
    newest_resolved: Option<u64>,
    phase: UpdatePhase,
}

impl UpdateOrchestrator {
    pub fn new(registry: SceneRegistry, options: Options) -> Self {
        Self {
            registry,
            options,
            next_sequence: 0,
            newest_resolved: None,
            phase: UpdatePhase::Idle,
        }
    }

    /// An orchestrator whose scene lives on a [`HeadlessBackend`].
    pub fn headless(options: Options) -> Self {
        Self::new(SceneRegistry::new(Box::new(HeadlessBackend::new())), options)
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Options apply from the next completed update on.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    /// Empties every slot. Sequence tracking is kept, so late responses to
    /// earlier updates stay discarded.
    pub fn clear_scene(&mut self) {
        self.registry.clear_all();
        self.phase = UpdatePhase::Idle;
    }

    /// Starts an update and hands out its ticket.
    pub fn begin(&mut self, mut request: ComputeRequest) -> UpdateTicket {
        request.fill_default_expression(&self.options.default_expression);
        self.next_sequence += 1;
        self.phase = UpdatePhase::Requesting;
        log::debug!(
            "update #{}: {} of '{}'",
            self.next_sequence,
            request.operation(),
            request.expression()
        );
        UpdateTicket {
            sequence: self.next_sequence,
            request,
        }
    }

    /// Finishes an update with the service's answer.
    ///
    /// Failures leave the scene as it was but still count as resolved, so
    /// an older ticket completing afterwards is stale. A stale ticket is
    /// reported as [`StatusDescriptor::Superseded`] and changes nothing,
    /// phase included.
    pub fn complete(&mut self, ticket: &UpdateTicket, response: Result<Value>) -> StatusDescriptor {
        if self.is_stale(ticket.sequence) {
            log::warn!(
                "discarding response to update #{}, #{} has already resolved",
                ticket.sequence,
                self.newest_resolved.unwrap_or_default()
            );
            return StatusDescriptor::Superseded {
                sequence: ticket.sequence,
            };
        }
        self.newest_resolved = Some(ticket.sequence);

        match self.apply(ticket, response) {
            Ok(status) => {
                self.phase = UpdatePhase::Registered;
                log::info!("update #{} registered: {status}", ticket.sequence);
                status
            }
            Err(e) => {
                let status = StatusDescriptor::from_error(&e);
                self.phase = if matches!(status, StatusDescriptor::Empty { .. }) {
                    UpdatePhase::EmptyResult
                } else {
                    UpdatePhase::Failed
                };
                log::info!("update #{} ended without changes: {e}", ticket.sequence);
                status
            }
        }
    }

    /// True when an update newer than `sequence` has already resolved.
    pub fn is_stale(&self, sequence: u64) -> bool {
        self.newest_resolved.is_some_and(|n| sequence < n) || self.registry.is_stale(sequence)
    }

    /// Runs one full update cycle against `service`.
    pub async fn run<S: ComputeService>(
        &mut self,
        service: &S,
        request: ComputeRequest,
    ) -> StatusDescriptor {
        let ticket = self.begin(request);
        let response = service.fetch(ticket.request()).await;
        self.complete(&ticket, response)
    }

    /// [`run`](Self::run) on the current thread.
    pub fn run_blocking<S: ComputeService>(
        &mut self,
        service: &S,
        request: ComputeRequest,
    ) -> StatusDescriptor {
        pollster::block_on(self.run(service, request))
    }

    fn apply(&mut self, ticket: &UpdateTicket, response: Result<Value>) -> Result<StatusDescriptor> {
        let payload = response?;

        self.phase = UpdatePhase::Classifying;
        let classified = classify(&payload, ticket.request.operation())?;

        self.phase = UpdatePhase::Building;
        let plan = self.plan(&ticket.request, classified);

        self.registry.commit_sequence(ticket.sequence);
        let primitive_counts = self.register(plan.writes)?;
        Ok(StatusDescriptor::Success {
            summary: plan.summary,
            primitive_counts,
        })
    }

    fn plan(&self, request: &ComputeRequest, classified: Classified) -> ScenePlan {
        let options = &self.options;
        let expression = request.expression();
        let mut writes: Vec<(SceneSlot, SlotWrite)> = Vec::new();

        let summary = match classified {
            Classified::ExplicitGrid(grid) => {
                let style = options.grid_style;
                writes.push((
                    SceneSlot::Surface,
                    object_if(style.surface, || build_grid_surface(&grid, options)),
                ));
                writes.push((
                    SceneSlot::Wireframe,
                    object_if(style.wireframe, || build_grid_wireframe(&grid, options)),
                ));
                writes.push((
                    SceneSlot::Points,
                    object_if(style.points, || build_grid_points(&grid, options)),
                ));
                let total = grid.rows() * grid.cols();
                format!(
                    "z = {expression}: {}×{} samples, {} of {total} defined",
                    grid.rows(),
                    grid.cols(),
                    grid.finite_count()
                )
            }
            Classified::ImplicitMesh(mesh) => {
                writes.push((
                    SceneSlot::Surface,
                    SlotWrite::Object(Box::new(build_implicit_mesh(&mesh))),
                ));
                writes.push((SceneSlot::Wireframe, SlotWrite::Clear));
                writes.push((SceneSlot::Points, SlotWrite::Clear));
                let range = mesh.value_range();
                format!(
                    "{expression} = {}: {} faces; field range [{}, {}]",
                    mesh.iso_value(),
                    mesh.faces().len(),
                    range.min,
                    range.max
                )
            }
            Classified::ImplicitPoints(cloud) => {
                if cloud.has_mismatched_values() {
                    log::warn!("point values do not match the vertices, coloring by position");
                }
                writes.push((SceneSlot::Surface, SlotWrite::Clear));
                writes.push((SceneSlot::Wireframe, SlotWrite::Clear));
                writes.push((
                    SceneSlot::Points,
                    SlotWrite::Object(Box::new(build_implicit_points(&cloud, options))),
                ));
                format!(
                    "{expression} = 0: {} points near the surface",
                    cloud.vertices().len()
                )
            }
            Classified::VectorField(field) => {
                let glyphs = build_vector_field(&field, options);
                let summary = format!(
                    "∇({expression}): {} arrows, {} critical points",
                    glyphs.arrows.len(),
                    glyphs.markers.len()
                );
                writes.push((
                    SceneSlot::VectorField,
                    SlotWrite::Group("gradient field", glyphs.into_objects()),
                ));
                summary
            }
            Classified::Scalar(result) => {
                if let ScalarResult::Gradient { gx, gy, .. } = result {
                    let origin = ["x0", "y0", "z0"].map(|p| request.param_f64(p).unwrap_or(0.0));
                    if let Some(arrow) = build_gradient_arrow(origin, [gx, gy], options) {
                        writes.push((SceneSlot::AnnotationArrow, SlotWrite::Object(Box::new(arrow))));
                    }
                }
                result.to_string()
            }
        };

        if !writes.iter().any(|(slot, _)| *slot == SceneSlot::AnnotationArrow) {
            writes.push((SceneSlot::AnnotationArrow, SlotWrite::Clear));
        }

        ScenePlan { writes, summary }
    }

    fn register(
        &mut self,
        writes: Vec<(SceneSlot, SlotWrite)>,
    ) -> Result<BTreeMap<SceneSlot, usize>> {
        let mut counts = BTreeMap::new();
        for (slot, write) in writes {
            match write {
                SlotWrite::Clear => self.registry.clear(slot),
                SlotWrite::Object(object) => self.registry.replace(slot, Some(object))?,
                SlotWrite::Group(name, children) => {
                    self.registry.replace_group(slot, name, children)?;
                }
            }
            if let Some(object) = self.registry.get(slot) {
                counts.insert(slot, object.primitive_count());
            }
        }
        Ok(counts)
    }
}

fn object_if<T: SceneObject>(enabled: bool, build: impl FnOnce() -> T) -> SlotWrite {
    if enabled {
        SlotWrite::Object(Box::new(build()))
    } else {
        SlotWrite::Clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Operation;
    use calcscene_core::{CalcSceneError, GridStyle};
    use serde_json::json;

    fn paraboloid() -> Value {
        json!({
            "x": [-1.0, 0.0, 1.0],
            "y": [-1.0, 0.0, 1.0],
            "z": [[2.0, 1.0, 2.0], [1.0, 0.0, 1.0], [2.0, 1.0, 2.0]]
        })
    }

    fn update(
        scene: &mut UpdateOrchestrator,
        op: Operation,
        response: Result<Value>,
    ) -> StatusDescriptor {
        let ticket = scene.begin(ComputeRequest::new("x^2+y^2", op));
        scene.complete(&ticket, response)
    }

    #[test]
    fn blank_expression_uses_default() {
        let mut scene = UpdateOrchestrator::headless(Options::default());
        let ticket = scene.begin(ComputeRequest::new("", Operation::Surface));
        assert_eq!(ticket.request().expression(), "x^2+y^2");
        assert_eq!(ticket.sequence(), 1);
        assert_eq!(scene.phase(), UpdatePhase::Requesting);
    }

    #[test]
    fn grid_fills_surface_and_reports_counts() {
        let mut scene = UpdateOrchestrator::headless(Options::default());
        let status = update(&mut scene, Operation::Surface, Ok(paraboloid()));
        let StatusDescriptor::Success {
            summary,
            primitive_counts,
        } = status
        else {
            panic!("expected success, got {status:?}");
        };
        assert_eq!(summary, "z = x^2+y^2: 3×3 samples, 9 of 9 defined");
        assert_eq!(primitive_counts, BTreeMap::from([(SceneSlot::Surface, 1)]));
        assert_eq!(scene.phase(), UpdatePhase::Registered);
        assert_eq!(scene.registry().get(SceneSlot::Surface).unwrap().vertex_count(), 9);
    }

    #[test]
    fn grid_style_switch_clears_old_slots() {
        let mut options = Options::default();
        options.grid_style = GridStyle {
            surface: true,
            wireframe: true,
            points: true,
        };
        let mut scene = UpdateOrchestrator::headless(options);
        update(&mut scene, Operation::Surface, Ok(paraboloid()));
        assert_eq!(scene.registry().len(), 3);

        scene.set_options(Options::default());
        update(&mut scene, Operation::Surface, Ok(paraboloid()));
        assert!(scene.registry().is_occupied(SceneSlot::Surface));
        assert!(!scene.registry().is_occupied(SceneSlot::Wireframe));
        assert!(!scene.registry().is_occupied(SceneSlot::Points));
    }

    #[test]
    fn gradient_places_and_clears_annotation() {
        let mut scene = UpdateOrchestrator::headless(Options::default());
        let ticket = scene.begin(
            ComputeRequest::new("x^2+y^2", Operation::Gradient)
                .with_param("x0", 1)
                .with_param("y0", 1),
        );
        let status = scene.complete(
            &ticket,
            Ok(json!({"gradiente_numerico": {"x": 2.0, "y": 2.0}})),
        );
        assert!(status.is_success());
        assert!(scene.registry().is_occupied(SceneSlot::AnnotationArrow));

        update(&mut scene, Operation::Surface, Ok(paraboloid()));
        assert!(!scene.registry().is_occupied(SceneSlot::AnnotationArrow));
    }

    #[test]
    fn zero_gradient_has_no_arrow() {
        let mut scene = UpdateOrchestrator::headless(Options::default());
        let status = update(
            &mut scene,
            Operation::Gradient,
            Ok(json!({"gradiente_numerico": {"x": 0.0, "y": 0.0}})),
        );
        assert!(status.to_string().contains("possible extremum"));
        assert!(scene.registry().is_empty());
    }

    #[test]
    fn failures_set_phase_and_keep_scene() {
        let mut scene = UpdateOrchestrator::headless(Options::default());
        update(&mut scene, Operation::Surface, Ok(paraboloid()));
        let generation = scene.registry().generation(SceneSlot::Surface);

        let status = update(
            &mut scene,
            Operation::Surface,
            Err(CalcSceneError::Transport("connection refused".into())),
        );
        assert_eq!(status.kind(), "error");
        assert_eq!(scene.phase(), UpdatePhase::Failed);

        let status = update(&mut scene, Operation::GradientField, Ok(json!({"vectors": []})));
        assert_eq!(status.kind(), "empty");
        assert_eq!(scene.phase(), UpdatePhase::EmptyResult);

        assert_eq!(scene.registry().generation(SceneSlot::Surface), generation);
    }

    #[test]
    fn failed_newer_update_supersedes_older() {
        let mut scene = UpdateOrchestrator::headless(Options::default());
        let first = scene.begin(ComputeRequest::new("x^2+y^2", Operation::Surface));
        let second = scene.begin(ComputeRequest::new("x^^2", Operation::Surface));

        let status = scene.complete(
            &second,
            Err(CalcSceneError::Transport("connection reset".into())),
        );
        assert_eq!(status.kind(), "error");

        let status = scene.complete(&first, Ok(paraboloid()));
        assert_eq!(status, StatusDescriptor::Superseded { sequence: 1 });
        assert_eq!(scene.phase(), UpdatePhase::Failed);
        assert!(scene.registry().is_empty());
        assert!(scene.is_stale(1));
        assert!(!scene.is_stale(3));
    }

    #[test]
    fn empty_newer_update_supersedes_older() {
        let mut scene = UpdateOrchestrator::headless(Options::default());
        let first = scene.begin(ComputeRequest::new("x*y", Operation::GradientField));
        let second = scene.begin(ComputeRequest::new("x*y", Operation::GradientField));

        let status = scene.complete(&second, Ok(json!({"vectors": []})));
        assert_eq!(status.kind(), "empty");

        let status = scene.complete(
            &first,
            Ok(json!({"vectors": [
                {"position": [1.0, 0.0], "gradient": [1.0, 0.0], "magnitude": 1.0}
            ]})),
        );
        assert_eq!(status.kind(), "superseded");
        assert_eq!(scene.phase(), UpdatePhase::EmptyResult);
        assert!(!scene.registry().is_occupied(SceneSlot::VectorField));
    }

    #[test]
    fn vector_field_group_counts_children() {
        let mut scene = UpdateOrchestrator::headless(Options::default());
        let status = update(
            &mut scene,
            Operation::GradientField,
            Ok(json!({"vectors": [
                {"position": [0.0, 0.0], "gradient": [0.0, 0.0], "magnitude": 0.0},
                {"position": [1.0, 0.0], "gradient": [2.0, 0.0], "magnitude": 2.0},
                {"position": [0.0, 1.0], "gradient": [0.0, 2.0], "magnitude": 2.0}
            ]})),
        );
        let StatusDescriptor::Success {
            summary,
            primitive_counts,
        } = status
        else {
            panic!("expected success");
        };
        assert_eq!(summary, "∇(x^2+y^2): 2 arrows, 1 critical points");
        assert_eq!(primitive_counts[&SceneSlot::VectorField], 3);
    }
}
