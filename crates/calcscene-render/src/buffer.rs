//! GPU buffer management.

use calcscene_core::{BufferData, BufferUsage};
use glam::Vec3;
use wgpu::util::DeviceExt;

/// Packs `Vec3`s into a tightly packed `f32` vertex buffer.
pub fn vec3_bytes(values: &[Vec3]) -> Vec<u8> {
    let flat: Vec<[f32; 3]> = values.iter().map(|v| v.to_array()).collect();
    bytemuck::cast_slice(&flat).to_vec()
}

/// Packs indices into a `u32` index buffer.
pub fn index_bytes(indices: &[u32]) -> Vec<u8> {
    bytemuck::cast_slice(indices).to_vec()
}

/// Builds a labelled vertex attribute buffer.
pub fn vertex_attribute(owner: &str, attribute: &str, values: &[Vec3]) -> BufferData {
    BufferData::new(
        format!("{owner} {attribute}"),
        BufferUsage::Vertex,
        vec3_bytes(values),
    )
}

/// Builds a labelled index buffer.
pub fn index_buffer(owner: &str, indices: &[u32]) -> BufferData {
    BufferData::new(format!("{owner} indices"), BufferUsage::Index, index_bytes(indices))
}

fn usages(usage: BufferUsage) -> wgpu::BufferUsages {
    match usage {
        BufferUsage::Vertex => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        BufferUsage::Index => wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        BufferUsage::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    }
}

/// Creates a device buffer from CPU-side contents.
///
/// Empty contents still produce a minimal, zeroed allocation so every handle
/// maps to a real buffer.
pub fn create_buffer(device: &wgpu::Device, data: &BufferData) -> wgpu::Buffer {
    const EMPTY: [u8; wgpu::COPY_BUFFER_ALIGNMENT as usize] = [0; wgpu::COPY_BUFFER_ALIGNMENT as usize];
    let contents = if data.contents.is_empty() {
        &EMPTY[..]
    } else {
        data.contents.as_slice()
    };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(data.label.as_str()),
        contents,
        usage: usages(data.usage),
    })
}
