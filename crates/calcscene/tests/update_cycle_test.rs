//! End-to-end update cycles against a scripted computation service.

use std::cell::RefCell;
use std::collections::VecDeque;

use calcscene::{
    CalcSceneError, ComputeRequest, ComputeService, Operation, Options, Result, SceneObject,
    SceneSlot, StatusDescriptor, UpdateOrchestrator, UpdatePhase,
};
use serde_json::{json, Value};

/// Answers requests from a queue and remembers what was asked.
#[derive(Default)]
struct ScriptedService {
    responses: RefCell<VecDeque<Result<Value>>>,
    requests: RefCell<Vec<ComputeRequest>>,
}

impl ScriptedService {
    fn answering(responses: impl IntoIterator<Item = Result<Value>>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            requests: RefCell::default(),
        }
    }
}

impl ComputeService for ScriptedService {
    async fn fetch(&self, request: &ComputeRequest) -> Result<Value> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(CalcSceneError::Transport("no scripted response".into())))
    }
}

fn paraboloid() -> Value {
    json!({
        "x": [-1.0, 0.0, 1.0],
        "y": [-1.0, 0.0, 1.0],
        "z": [[2.0, 1.0, 2.0], [1.0, 0.0, 1.0], [2.0, 1.0, 2.0]]
    })
}

fn sphere_mesh() -> Value {
    json!({
        "type": "implicit_mesh",
        "vertices": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, -1.0]],
        "faces": [[0, 1, 2], [1, 0, 3]],
        "iso_value": 1.0,
        "value_range": [0.0, 3.0]
    })
}

#[test]
fn paraboloid_surface() {
    calcscene::init_logging();
    let service = ScriptedService::answering([Ok(paraboloid())]);
    let mut scene = UpdateOrchestrator::headless(Options::default());

    let status = scene.run_blocking(&service, ComputeRequest::new("x^2+y^2", Operation::Surface));

    assert!(status.is_success(), "{status:?}");
    assert_eq!(scene.phase(), UpdatePhase::Registered);
    let surface = scene.registry().get(SceneSlot::Surface).unwrap();
    assert_eq!(surface.vertex_count(), 9);
    assert_eq!(scene.registry().len(), 1);

    // Elevation is the vertical render axis.
    let (min, max) = scene.registry().bounding_box().unwrap();
    assert_eq!(min.y, 0.0);
    assert_eq!(max.y, 2.0);

    let sent = service.requests.borrow();
    let pairs = sent[0].query_pairs();
    assert_eq!(pairs[0], ("expr".to_string(), "x^2+y^2".to_string()));
    assert_eq!(pairs[1], ("op".to_string(), "superficie".to_string()));
}

#[test]
fn service_error_leaves_scene_untouched() {
    let service = ScriptedService::answering([
        Ok(paraboloid()),
        Ok(json!({"error": "invalid expression: x^^2"})),
    ]);
    let mut scene = UpdateOrchestrator::headless(Options::default());
    scene.run_blocking(&service, ComputeRequest::new("x^2+y^2", Operation::Surface));
    let generation = scene.registry().generation(SceneSlot::Surface);
    let stats = scene.registry().backend().stats();

    let status = scene.run_blocking(&service, ComputeRequest::new("x^^2", Operation::Surface));

    assert_eq!(
        status,
        StatusDescriptor::Error {
            message: "invalid expression: x^^2".into()
        }
    );
    assert_eq!(scene.phase(), UpdatePhase::Failed);
    assert_eq!(scene.registry().generation(SceneSlot::Surface), generation);
    assert_eq!(scene.registry().backend().stats(), stats);
}

#[test]
fn transport_failure_is_reported() {
    let service = ScriptedService::answering([Err(CalcSceneError::Transport(
        "HTTP 500: Internal Server Error".into(),
    ))]);
    let mut scene = UpdateOrchestrator::headless(Options::default());

    let status = scene.run_blocking(&service, ComputeRequest::new("x", Operation::Surface));

    assert_eq!(status.kind(), "error");
    assert!(status.to_string().contains("HTTP 500"));
    assert!(scene.registry().is_empty());
}

#[test]
fn empty_vector_field_is_empty_status() {
    let service = ScriptedService::answering([Ok(json!({"type": "gradient_field", "vectors": []}))]);
    let mut scene = UpdateOrchestrator::headless(Options::default());

    let status = scene.run_blocking(
        &service,
        ComputeRequest::new("x*y", Operation::GradientField)
            .with_param("xmin", -2)
            .with_param("xmax", 2)
            .with_param("grid_size", 10),
    );

    assert_eq!(status.kind(), "empty");
    assert_eq!(scene.phase(), UpdatePhase::EmptyResult);
    assert!(scene.registry().is_empty());
}

#[test]
fn stale_response_is_discarded() {
    let mut scene = UpdateOrchestrator::headless(Options::default());
    let first = scene.begin(ComputeRequest::new("x^2+y^2", Operation::Surface));
    let second = scene.begin(ComputeRequest::new(
        "x^2+y^2+z^2-1",
        Operation::ImplicitSurface,
    ));

    let status = scene.complete(&second, Ok(sphere_mesh()));
    assert!(status.is_success());
    let generation = scene.registry().generation(SceneSlot::Surface);

    let status = scene.complete(&first, Ok(paraboloid()));
    assert_eq!(status, StatusDescriptor::Superseded { sequence: 1 });
    assert_eq!(scene.phase(), UpdatePhase::Registered);
    assert_eq!(scene.registry().committed_sequence(), Some(2));
    assert_eq!(scene.registry().generation(SceneSlot::Surface), generation);
    assert_eq!(
        scene.registry().get(SceneSlot::Surface).unwrap().name(),
        "implicit surface"
    );
}

#[test]
fn implicit_mesh_flattens_faces() {
    let service = ScriptedService::answering([Ok(sphere_mesh())]);
    let mut scene = UpdateOrchestrator::headless(Options::default());

    let status = scene.run_blocking(
        &service,
        ComputeRequest::new("x^2+y^2+z^2", Operation::ImplicitSurface).with_param("iso_value", 1),
    );

    let StatusDescriptor::Success { summary, .. } = status else {
        panic!("expected success");
    };
    assert_eq!(summary, "x^2+y^2+z^2 = 1: 2 faces; field range [0, 3]");
    assert_eq!(
        scene.registry().get(SceneSlot::Surface).unwrap().vertex_count(),
        6
    );
}

#[test]
fn implicit_points_replace_surface() {
    let service = ScriptedService::answering([
        Ok(paraboloid()),
        Ok(json!({"vertices": [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]], "values": [0.0, 1.0]})),
    ]);
    let mut scene = UpdateOrchestrator::headless(Options::default());
    scene.run_blocking(&service, ComputeRequest::new("x^2+y^2", Operation::Surface));

    let status = scene.run_blocking(
        &service,
        ComputeRequest::new("x*y*z", Operation::ImplicitSurface),
    );

    assert!(status.is_success());
    assert!(!scene.registry().is_occupied(SceneSlot::Surface));
    assert_eq!(
        scene.registry().get(SceneSlot::Points).unwrap().vertex_count(),
        2
    );
}

#[test]
fn scalar_results_clear_annotation() {
    let service = ScriptedService::answering([
        Ok(json!({"gradiente_numerico": {"x": 1.0, "y": 0.0}})),
        Ok(json!({"integral": "4/3"})),
    ]);
    let mut scene = UpdateOrchestrator::headless(Options::default());

    scene.run_blocking(
        &service,
        ComputeRequest::new("x^2+y^2", Operation::Gradient)
            .with_param("x0", 0.5)
            .with_param("y0", 0),
    );
    assert!(scene.registry().is_occupied(SceneSlot::AnnotationArrow));

    let status = scene.run_blocking(
        &service,
        ComputeRequest::new("x^2+y^2", Operation::DoubleIntegral),
    );
    assert_eq!(status.to_string(), "double integral over [-1,1]²: 4/3");
    assert!(scene.registry().is_empty());
}
