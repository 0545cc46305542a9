//! wgpu-backed resource allocation.

use std::collections::HashMap;

use calcscene_core::{BufferData, RenderBackend, ResourceHandle, ResourceStats, Result};

use crate::buffer::create_buffer;
use crate::error::{RenderError, RenderResult};

/// Allocates scene buffers on a wgpu device.
///
/// Released buffers are destroyed immediately rather than left to drop, so
/// device memory is returned as soon as a slot is replaced.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffers: HashMap<ResourceHandle, wgpu::Buffer>,
    next_handle: u64,
    stats: ResourceStats,
}

impl WgpuBackend {
    /// Wraps an existing device and queue.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            next_handle: 0,
            stats: ResourceStats::default(),
        }
    }

    /// Creates a backend on a fresh device with no presentation surface.
    pub async fn new_headless() -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("calcscene device (headless)"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        log::info!("headless wgpu backend on '{}'", adapter.get_info().name);
        Ok(Self::new(device, queue))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// The device buffer behind `handle`, for draw calls.
    pub fn buffer(&self, handle: ResourceHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(&handle)
    }
}

impl RenderBackend for WgpuBackend {
    fn create_buffer(&mut self, data: &BufferData) -> Result<ResourceHandle> {
        let max = self.device.limits().max_buffer_size;
        if data.len() as u64 > max {
            return Err(RenderError::BufferCreationFailed(format!(
                "'{}' needs {} bytes, device limit is {max}",
                data.label,
                data.len()
            ))
            .into());
        }
        let buffer = create_buffer(&self.device, data);
        self.next_handle += 1;
        let handle = ResourceHandle(self.next_handle);
        self.stats.created += 1;
        self.stats.live_bytes += buffer.size();
        self.buffers.insert(handle, buffer);
        Ok(handle)
    }

    fn release(&mut self, handle: ResourceHandle) {
        if let Some(buffer) = self.buffers.remove(&handle) {
            self.stats.released += 1;
            self.stats.live_bytes -= buffer.size();
            buffer.destroy();
        }
    }

    fn stats(&self) -> ResourceStats {
        self.stats
    }

    fn is_live(&self, handle: ResourceHandle) -> bool {
        self.buffers.contains_key(&handle)
    }
}
