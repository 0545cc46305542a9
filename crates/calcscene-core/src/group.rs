//! Multi-primitive scene objects.

use std::any::Any;

use glam::Vec3;

use crate::structure::{BufferData, PrimitiveKind, SceneObject};

/// A named collection of primitives occupying one slot together.
///
/// The group itself uploads nothing; its resources are exactly the union of
/// its children's.
pub struct ObjectGroup {
    name: String,
    children: Vec<Box<dyn SceneObject>>,
}

impl ObjectGroup {
    pub fn new(name: impl Into<String>, children: Vec<Box<dyn SceneObject>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl SceneObject for ObjectGroup {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Group
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        self.children
            .iter()
            .filter_map(|c| c.bounding_box())
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }

    fn vertex_count(&self) -> usize {
        self.children.iter().map(|c| c.vertex_count()).sum()
    }

    fn buffers(&self) -> Vec<BufferData> {
        Vec::new()
    }

    fn children(&self) -> &[Box<dyn SceneObject>] {
        &self.children
    }

    fn primitive_count(&self) -> usize {
        self.children.iter().map(|c| c.primitive_count()).sum()
    }
}
