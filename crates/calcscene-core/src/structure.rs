//! Scene object and render backend seams.
//!
//! A [`SceneObject`] is a renderable primitive built from a payload: it knows
//! its CPU-side buffers but owns no GPU state. A [`RenderBackend`] turns
//! those buffers into GPU resources and releases them again. The scene
//! registry sits between the two and is the only place that pairs an object
//! with its resource handles.

use std::any::Any;
use std::fmt;

use glam::Vec3;

use crate::error::Result;

/// The kind of a renderable primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Indexed triangles with per-vertex normals and colors.
    TriangleMesh,
    /// Independent line segments.
    LineSegments,
    /// Point sprites.
    Points,
    /// Shaft plus conical head.
    Arrow,
    /// Small closed solid marking a location.
    Marker,
    /// Container of other primitives.
    Group,
}

/// Intended use of an uploaded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
    Uniform,
}

/// CPU-side contents of one GPU buffer.
#[derive(Clone)]
pub struct BufferData {
    pub label: String,
    pub usage: BufferUsage,
    pub contents: Vec<u8>,
}

impl BufferData {
    pub fn new(label: impl Into<String>, usage: BufferUsage, contents: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            usage,
            contents,
        }
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl fmt::Debug for BufferData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferData")
            .field("label", &self.label)
            .field("usage", &self.usage)
            .field("bytes", &self.contents.len())
            .finish()
    }
}

/// A renderable primitive.
pub trait SceneObject: Any {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Human-readable name, used for labels and logs.
    fn name(&self) -> &str;

    fn kind(&self) -> PrimitiveKind;

    /// Axis-aligned bounds in render space.
    ///
    /// Returns `None` if the object has no spatial extent.
    fn bounding_box(&self) -> Option<(Vec3, Vec3)>;

    /// Number of vertex records this object uploads.
    fn vertex_count(&self) -> usize;

    /// Buffers to upload for this object alone (children excluded).
    fn buffers(&self) -> Vec<BufferData>;

    /// Child primitives for containers.
    fn children(&self) -> &[Box<dyn SceneObject>] {
        &[]
    }

    /// Number of leaf primitives in this object.
    fn primitive_count(&self) -> usize {
        if self.children().is_empty() {
            1
        } else {
            self.children().iter().map(|c| c.primitive_count()).sum()
        }
    }
}

/// Opaque handle to one GPU allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(pub u64);

/// Allocation counters kept by every backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Buffers created since startup.
    pub created: u64,
    /// Buffers released since startup.
    pub released: u64,
    /// Bytes currently held by live buffers.
    pub live_bytes: u64,
}

impl ResourceStats {
    /// Buffers currently alive.
    pub fn live(&self) -> u64 {
        self.created - self.released
    }
}

/// Allocates and frees GPU resources for scene objects.
pub trait RenderBackend {
    /// Uploads one buffer and returns its handle.
    fn create_buffer(&mut self, data: &BufferData) -> Result<ResourceHandle>;

    /// Frees the resource behind `handle`. Unknown handles are ignored.
    fn release(&mut self, handle: ResourceHandle);

    fn stats(&self) -> ResourceStats;

    /// Returns true when `handle` is still allocated.
    fn is_live(&self, handle: ResourceHandle) -> bool;
}
