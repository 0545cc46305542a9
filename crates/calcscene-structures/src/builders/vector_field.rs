//! Gradient-field glyphs and the single gradient annotation arrow.

use calcscene_core::{axis, Options, SceneObject, VectorField};
use calcscene_render::ColorMap;
use glam::Vec3;

use crate::{Arrow, Marker};

/// Arrows and critical-point markers built from one vector field.
pub struct FieldGlyphs {
    pub arrows: Vec<Arrow>,
    pub markers: Vec<Marker>,
}

impl FieldGlyphs {
    /// Total number of glyphs.
    pub fn len(&self) -> usize {
        self.arrows.len() + self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty() && self.markers.is_empty()
    }

    /// Flattens the glyphs into scene objects, arrows first.
    pub fn into_objects(self) -> Vec<Box<dyn SceneObject>> {
        let mut objects: Vec<Box<dyn SceneObject>> = Vec::with_capacity(self.len());
        objects.extend(self.arrows.into_iter().map(|a| Box::new(a) as Box<dyn SceneObject>));
        objects.extend(self.markers.into_iter().map(|m| Box::new(m) as Box<dyn SceneObject>));
        objects
    }
}

/// Builds one glyph per field sample.
///
/// A sample whose magnitude is below `critical_epsilon`, or whose gradient
/// has no direction, becomes a marker at its base position. Every other
/// sample becomes an arrow along its gradient, with length interpolated
/// between `arrow_min_length` and `arrow_max_length` and color taken from
/// the `magnitude` palette, both driven by the magnitude normalized over the
/// field's observed range (`0.5` when that range is degenerate).
pub fn build_vector_field(field: &VectorField, options: &Options) -> FieldGlyphs {
    let range = field.magnitude_range();
    let color_map = ColorMap::magnitude();
    let mut arrows = Vec::new();
    let mut markers = Vec::new();

    for (i, sample) in field.samples().iter().enumerate() {
        let base = axis::point_to_render(sample.position);
        let direction = axis::direction_to_render(sample.gradient);

        if sample.magnitude < options.critical_epsilon || direction.length_squared() == 0.0 {
            markers.push(Marker::new(
                format!("critical point {i}"),
                base,
                options.marker_radius,
                options.marker_color,
            ));
            continue;
        }

        let t = range.normalize_or_mid(sample.magnitude);
        let length = options.arrow_min_length + t * (options.arrow_max_length - options.arrow_min_length);
        arrows.push(Arrow::new(
            format!("gradient {i}"),
            base,
            direction,
            length,
            length * options.arrow_head_ratio,
            length * options.arrow_head_width_ratio,
            color_map.sample(t),
        ));
    }

    log::debug!(
        "vector field: {} arrows, {} critical points, magnitude [{}, {}]",
        arrows.len(),
        markers.len(),
        range.min,
        range.max
    );
    FieldGlyphs { arrows, markers }
}

/// Builds the arrow annotating a gradient evaluated at one point.
///
/// `origin` is in domain space and the arrow points along `(gx, gy, 0)`.
/// Length is `|g|` clamped to the annotation range, with a head half and a
/// width three tenths as long. Returns `None` for a zero (or non-finite)
/// gradient, which has no direction to draw.
pub fn build_gradient_arrow(origin: [f64; 3], gradient: [f64; 2], options: &Options) -> Option<Arrow> {
    let [gx, gy] = gradient;
    let norm = gx.hypot(gy);
    if norm == 0.0 || !norm.is_finite() || origin.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let length = (norm as f32).clamp(options.annotation_min_length, options.annotation_max_length);
    Some(Arrow::new(
        "gradient arrow",
        axis::point_to_render(origin),
        axis::direction_to_render([gx, gy, 0.0]),
        length,
        0.5 * length,
        0.3 * length,
        options.annotation_color,
    ))
}
