//! Response classification.
//!
//! A decoded payload is matched to one variant, either by its `type` tag or,
//! for untagged responses, by the requested operation. The variant's
//! required fields are then decoded and validated into the core payload
//! types, so every later stage works on data that is already known to be
//! well formed.

use std::fmt;

use calcscene_core::{
    CalcSceneError, ImplicitMesh, ImplicitPointCloud, Result, ScalarGrid, ValueRange, VectorField,
    VectorSample,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::request::{Operation, Variable};

/// The variant a response was matched to, before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    ExplicitGrid,
    ImplicitMesh,
    ImplicitPoints,
    VectorField,
    Scalar,
    Error,
}

/// A validated response.
#[derive(Debug, Clone)]
pub enum Classified {
    ExplicitGrid(ScalarGrid),
    ImplicitMesh(ImplicitMesh),
    ImplicitPoints(ImplicitPointCloud),
    VectorField(VectorField),
    Scalar(ScalarResult),
}

impl Classified {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Classified::ExplicitGrid(_) => ResponseKind::ExplicitGrid,
            Classified::ImplicitMesh(_) => ResponseKind::ImplicitMesh,
            Classified::ImplicitPoints(_) => ResponseKind::ImplicitPoints,
            Classified::VectorField(_) => ResponseKind::VectorField,
            Classified::Scalar(_) => ResponseKind::Scalar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegralKind {
    Double,
    Triple,
}

/// One constrained extremum `(x, y, λ)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagrangeSolution {
    pub x: String,
    pub y: String,
    pub lambda: String,
}

/// Non-geometric answers.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarResult {
    Derivative {
        variable: Variable,
        expression: String,
    },
    Integral {
        kind: IntegralKind,
        value: String,
    },
    Limit {
        value: String,
        iterated_xy: Option<String>,
        iterated_yx: Option<String>,
    },
    DomainRange {
        min: Option<f64>,
        max: Option<f64>,
        valid_ratio: f64,
    },
    Gradient {
        gx: f64,
        gy: f64,
        /// `(df/dx, df/dy)` when the service sent them.
        symbolic: Option<(String, String)>,
    },
    Lagrange(Vec<LagrangeSolution>),
    /// Unrecognized payload, shown as JSON.
    Raw(Value),
}

impl ScalarResult {
    /// True for a gradient of exactly zero.
    pub fn is_zero_gradient(&self) -> bool {
        matches!(self, ScalarResult::Gradient { gx, gy, .. } if *gx == 0.0 && *gy == 0.0)
    }
}

fn variable_name(variable: Variable) -> &'static str {
    match variable {
        Variable::X => "x",
        Variable::Y => "y",
        Variable::Z => "z",
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| v.to_string())
}

impl fmt::Display for ScalarResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarResult::Derivative {
                variable,
                expression,
            } => write!(f, "∂f/∂{} = {expression}", variable_name(*variable)),
            ScalarResult::Integral {
                kind: IntegralKind::Double,
                value,
            } => write!(f, "double integral over [-1,1]²: {value}"),
            ScalarResult::Integral {
                kind: IntegralKind::Triple,
                value,
            } => write!(f, "triple integral over [-1,1]³: {value}"),
            ScalarResult::Limit {
                value,
                iterated_xy,
                iterated_yx,
            } => {
                write!(f, "limit: {value}")?;
                if let (Some(xy), Some(yx)) = (iterated_xy, iterated_yx) {
                    write!(f, " (x→a then y→b: {xy}; y→b then x→a: {yx})")?;
                }
                Ok(())
            }
            ScalarResult::DomainRange {
                min,
                max,
                valid_ratio,
            } => write!(
                f,
                "estimated range: [{}, {}]; valid samples: {:.2}%",
                fmt_opt(*min),
                fmt_opt(*max),
                valid_ratio * 100.0
            ),
            ScalarResult::Gradient { gx, gy, symbolic } => {
                write!(f, "∇f = ({gx:.6}, {gy:.6})")?;
                if let Some((dx, dy)) = symbolic {
                    write!(f, " with df/dx = {dx}, df/dy = {dy}")?;
                }
                if self.is_zero_gradient() {
                    f.write_str("; zero gradient, possible extremum")?;
                }
                Ok(())
            }
            ScalarResult::Lagrange(solutions) => {
                f.write_str("solutions (x, y, λ):")?;
                for s in solutions {
                    write!(f, " ({}, {}, {})", s.x, s.y, s.lambda)?;
                }
                Ok(())
            }
            ScalarResult::Raw(value) => write!(f, "{value}"),
        }
    }
}

/// Matches a payload to a variant without decoding it.
pub fn detect_kind(payload: &Value, operation: &Operation) -> Result<ResponseKind> {
    let object = payload
        .as_object()
        .ok_or_else(|| CalcSceneError::invalid_shape("response is not a JSON object"))?;

    if object.get("error").is_some_and(is_truthy) {
        return Ok(ResponseKind::Error);
    }

    if let Some(tag) = object.get("type").and_then(Value::as_str) {
        if let Some(kind) = kind_from_tag(tag) {
            return Ok(kind);
        }
        log::warn!("unknown response type {tag:?}, dispatching on operation {operation}");
    }

    Ok(match operation {
        Operation::Surface => ResponseKind::ExplicitGrid,
        Operation::GradientField => ResponseKind::VectorField,
        Operation::ImplicitSurface if object.contains_key("faces") => ResponseKind::ImplicitMesh,
        Operation::ImplicitSurface => ResponseKind::ImplicitPoints,
        op if op.is_scalar() => ResponseKind::Scalar,
        _ => sniff(object),
    })
}

/// `error` counts only when set to something truthy: `null`, `false`, `0`
/// and `""` mean no error.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_from_tag(tag: &str) -> Option<ResponseKind> {
    Some(match tag {
        "explicit" | "explicit_grid" | "grid" | "surface" | "superficie" => {
            ResponseKind::ExplicitGrid
        }
        "implicit_mesh" | "mesh" | "isosurface" | "marching_cubes" => ResponseKind::ImplicitMesh,
        "implicit_points" | "implicit" | "points" | "point_cloud" => ResponseKind::ImplicitPoints,
        "gradient_field" | "vector_field" | "campo_gradiente" => ResponseKind::VectorField,
        "scalar" => ResponseKind::Scalar,
        _ => return None,
    })
}

fn sniff(object: &Map<String, Value>) -> ResponseKind {
    let has = |key: &str| object.contains_key(key);
    if has("vectors") {
        ResponseKind::VectorField
    } else if has("faces") {
        ResponseKind::ImplicitMesh
    } else if has("vertices") {
        ResponseKind::ImplicitPoints
    } else if has("x") && has("y") && has("z") {
        ResponseKind::ExplicitGrid
    } else {
        ResponseKind::Scalar
    }
}

/// Classifies and validates a payload.
///
/// An `error` field becomes [`CalcSceneError::Service`]; structural problems
/// are `InvalidShape` and payloads without usable data `NoValidSamples`.
pub fn classify(payload: &Value, operation: &Operation) -> Result<Classified> {
    match detect_kind(payload, operation)? {
        ResponseKind::Error => Err(CalcSceneError::Service(service_message(&payload["error"]))),
        ResponseKind::ExplicitGrid => decode_grid(payload).map(Classified::ExplicitGrid),
        ResponseKind::ImplicitMesh => decode_mesh(payload).map(Classified::ImplicitMesh),
        ResponseKind::ImplicitPoints => decode_points(payload).map(Classified::ImplicitPoints),
        ResponseKind::VectorField => decode_field(payload).map(Classified::VectorField),
        ResponseKind::Scalar => decode_scalar(payload, operation).map(Classified::Scalar),
    }
}

fn service_message(error: &Value) -> String {
    error
        .as_str()
        .map_or_else(|| error.to_string(), str::to_string)
}

fn shape_error(variant: &str, e: &serde_json::Error) -> CalcSceneError {
    CalcSceneError::invalid_shape(format!("{variant}: {e}"))
}

/// `null` stands for a sample where the function is undefined.
fn undefined_as_nan(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

#[derive(Deserialize)]
struct GridWire {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<Vec<Option<f64>>>,
}

fn decode_grid(payload: &Value) -> Result<ScalarGrid> {
    let wire = GridWire::deserialize(payload).map_err(|e| shape_error("explicit grid", &e))?;
    let z = wire.z.into_iter().map(undefined_as_nan).collect();
    ScalarGrid::new(wire.x, wire.y, z)
}

#[derive(Deserialize)]
struct MeshWire {
    vertices: Vec<[f64; 3]>,
    faces: Vec<Vec<u32>>,
    iso_value: f64,
    value_range: [Option<f64>; 2],
}

fn decode_mesh(payload: &Value) -> Result<ImplicitMesh> {
    let wire = MeshWire::deserialize(payload).map_err(|e| shape_error("implicit mesh", &e))?;
    let [min, max] = wire.value_range;
    let range = ValueRange::new(
        min.unwrap_or(wire.iso_value),
        max.unwrap_or(wire.iso_value),
    );
    ImplicitMesh::new(wire.vertices, wire.faces, wire.iso_value, range)
}

#[derive(Deserialize)]
struct PointsWire {
    vertices: Vec<[f64; 3]>,
    #[serde(default)]
    values: Option<Vec<Option<f64>>>,
}

fn decode_points(payload: &Value) -> Result<ImplicitPointCloud> {
    let wire = PointsWire::deserialize(payload).map_err(|e| shape_error("implicit points", &e))?;
    ImplicitPointCloud::new(wire.vertices, wire.values.map(undefined_as_nan))
}

#[derive(Deserialize)]
struct SampleWire {
    position: Vec<f64>,
    gradient: Vec<f64>,
    magnitude: f64,
}

#[derive(Deserialize)]
struct FieldWire {
    vectors: Vec<Option<SampleWire>>,
}

fn decode_field(payload: &Value) -> Result<VectorField> {
    let wire = FieldWire::deserialize(payload).map_err(|e| shape_error("vector field", &e))?;
    let samples = wire
        .vectors
        .into_iter()
        .flatten()
        .map(|s| VectorSample::from_components(&s.position, &s.gradient, s.magnitude))
        .collect::<Result<Vec<_>>>()?;
    VectorField::new(samples)
}

/// Renders a symbolic or numeric value as text.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn required_text(payload: &Value, key: &str, what: &str) -> Result<String> {
    payload
        .get(key)
        .and_then(display_value)
        .ok_or_else(|| CalcSceneError::no_valid_samples(format!("could not compute the {what}")))
}

fn decode_scalar(payload: &Value, operation: &Operation) -> Result<ScalarResult> {
    match operation {
        Operation::Derivative(variable) => Ok(ScalarResult::Derivative {
            variable: *variable,
            expression: required_text(payload, "derivada", "derivative")?,
        }),
        Operation::DoubleIntegral => Ok(ScalarResult::Integral {
            kind: IntegralKind::Double,
            value: required_text(payload, "integral", "double integral")?,
        }),
        Operation::TripleIntegral => Ok(ScalarResult::Integral {
            kind: IntegralKind::Triple,
            value: required_text(payload, "integral_triple", "triple integral")?,
        }),
        Operation::Limit => decode_limit(payload),
        Operation::DomainRange => decode_domain_range(payload),
        Operation::Gradient => decode_gradient(payload),
        Operation::Lagrange => decode_lagrange(payload),
        _ => Ok(sniff_scalar(payload)),
    }
}

/// Scalar decoding driven by which keys are present.
fn sniff_scalar(payload: &Value) -> ScalarResult {
    let has = |key: &str| payload.get(key).is_some();
    let decoded = if has("integral_triple") {
        decode_scalar(payload, &Operation::TripleIntegral)
    } else if has("integral") {
        decode_scalar(payload, &Operation::DoubleIntegral)
    } else if has("limite") {
        decode_limit(payload)
    } else if has("dominio_valido_ratio") {
        decode_domain_range(payload)
    } else if has("gradiente_numerico") {
        decode_gradient(payload)
    } else if has("lagrange_solutions") {
        decode_lagrange(payload)
    } else {
        return ScalarResult::Raw(payload.clone());
    };
    decoded.unwrap_or_else(|e| {
        log::warn!("falling back to raw display: {e}");
        ScalarResult::Raw(payload.clone())
    })
}

fn decode_limit(payload: &Value) -> Result<ScalarResult> {
    Ok(ScalarResult::Limit {
        value: required_text(payload, "limite", "limit")?,
        iterated_xy: payload.get("limite_iterativo_xy").and_then(display_value),
        iterated_yx: payload.get("limite_iterativo_yx").and_then(display_value),
    })
}

#[derive(Deserialize)]
struct DomainRangeWire {
    rango_min: Option<f64>,
    rango_max: Option<f64>,
    dominio_valido_ratio: f64,
}

fn decode_domain_range(payload: &Value) -> Result<ScalarResult> {
    let wire =
        DomainRangeWire::deserialize(payload).map_err(|e| shape_error("domain and range", &e))?;
    Ok(ScalarResult::DomainRange {
        min: wire.rango_min,
        max: wire.rango_max,
        valid_ratio: wire.dominio_valido_ratio,
    })
}

#[derive(Deserialize)]
struct GradientWire {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct SymbolicGradientWire {
    #[serde(rename = "df/dx")]
    dx: String,
    #[serde(rename = "df/dy")]
    dy: String,
}

fn decode_gradient(payload: &Value) -> Result<ScalarResult> {
    let numeric = payload
        .get("gradiente_numerico")
        .filter(|v| !v.is_null())
        .ok_or_else(|| CalcSceneError::no_valid_samples("could not compute the gradient"))?;
    let GradientWire { x, y } =
        GradientWire::deserialize(numeric).map_err(|e| shape_error("gradient", &e))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(CalcSceneError::no_valid_samples(
            "the gradient is undefined at this point",
        ));
    }
    let symbolic = payload
        .get("gradiente_simbolico")
        .and_then(|v| SymbolicGradientWire::deserialize(v).ok())
        .map(|s| (s.dx, s.dy));
    Ok(ScalarResult::Gradient {
        gx: x,
        gy: y,
        symbolic,
    })
}

fn decode_lagrange(payload: &Value) -> Result<ScalarResult> {
    let solutions = payload
        .get("lagrange_solutions")
        .and_then(Value::as_array)
        .ok_or_else(|| CalcSceneError::no_valid_samples("no Lagrange solutions were returned"))?;
    if solutions.is_empty() {
        return Err(CalcSceneError::no_valid_samples(
            "no real solutions satisfy the constraint",
        ));
    }
    solutions
        .iter()
        .map(lagrange_solution)
        .collect::<Result<Vec<_>>>()
        .map(ScalarResult::Lagrange)
}

/// Accepts `{"x", "y", "lam"}` objects and `[x, y, λ]` triples.
fn lagrange_solution(value: &Value) -> Result<LagrangeSolution> {
    let parts = match value {
        Value::Object(map) => ["x", "y", "lam"].map(|k| map.get(k).and_then(display_value)),
        Value::Array(items) if items.len() == 3 => {
            [0, 1, 2].map(|i| display_value(&items[i]))
        }
        _ => [None, None, None],
    };
    match parts {
        [Some(x), Some(y), Some(lambda)] => Ok(LagrangeSolution { x, y, lambda }),
        _ => Err(CalcSceneError::invalid_shape(format!(
            "malformed Lagrange solution {value}"
        ))),
    }
}
