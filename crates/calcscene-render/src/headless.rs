//! Device-free resource allocation.
//!
//! [`HeadlessBackend`] keeps a ledger of every allocation instead of talking
//! to a GPU. It backs tests and runs on machines without an adapter, and
//! can enforce a byte budget to exercise allocation failures.

use std::collections::BTreeMap;

use calcscene_core::{BufferData, BufferUsage, RenderBackend, ResourceHandle, ResourceStats, Result};

use crate::error::RenderError;

/// One live allocation.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub label: String,
    pub usage: BufferUsage,
    pub bytes: u64,
}

/// A ledger-only render backend.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    live: BTreeMap<ResourceHandle, Allocation>,
    next_handle: u64,
    stats: ResourceStats,
    byte_budget: Option<u64>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses allocations that would push live bytes past `bytes`.
    #[must_use]
    pub fn with_byte_budget(mut self, bytes: u64) -> Self {
        self.byte_budget = Some(bytes);
        self
    }

    /// Live allocations in creation order.
    pub fn allocations(&self) -> impl Iterator<Item = (ResourceHandle, &Allocation)> {
        self.live.iter().map(|(h, a)| (*h, a))
    }

    pub fn allocation(&self, handle: ResourceHandle) -> Option<&Allocation> {
        self.live.get(&handle)
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_buffer(&mut self, data: &BufferData) -> Result<ResourceHandle> {
        let bytes = data.len() as u64;
        if let Some(budget) = self.byte_budget {
            let available = budget.saturating_sub(self.stats.live_bytes);
            if bytes > available {
                return Err(RenderError::OutOfMemory {
                    requested: bytes,
                    available,
                }
                .into());
            }
        }

        self.next_handle += 1;
        let handle = ResourceHandle(self.next_handle);
        self.live.insert(
            handle,
            Allocation {
                label: data.label.clone(),
                usage: data.usage,
                bytes,
            },
        );
        self.stats.created += 1;
        self.stats.live_bytes += bytes;
        Ok(handle)
    }

    fn release(&mut self, handle: ResourceHandle) {
        if let Some(allocation) = self.live.remove(&handle) {
            self.stats.released += 1;
            self.stats.live_bytes -= allocation.bytes;
        }
    }

    fn stats(&self) -> ResourceStats {
        self.stats
    }

    fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains_key(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcscene_core::CalcSceneError;

    fn data(bytes: usize) -> BufferData {
        BufferData::new("buf", BufferUsage::Vertex, vec![0; bytes])
    }

    #[test]
    fn ledger_tracks_bytes() {
        let mut backend = HeadlessBackend::new();
        let a = backend.create_buffer(&data(12)).unwrap();
        let b = backend.create_buffer(&data(8)).unwrap();
        assert_eq!(backend.stats().live_bytes, 20);
        backend.release(a);
        assert_eq!(backend.stats().live_bytes, 8);
        assert_eq!(backend.stats().live(), 1);
        assert_eq!(backend.allocation(b).unwrap().bytes, 8);
    }

    #[test]
    fn double_release_is_ignored() {
        let mut backend = HeadlessBackend::new();
        let a = backend.create_buffer(&data(4)).unwrap();
        backend.release(a);
        backend.release(a);
        assert_eq!(backend.stats().released, 1);
    }

    #[test]
    fn budget_is_enforced() {
        let mut backend = HeadlessBackend::new().with_byte_budget(16);
        backend.create_buffer(&data(12)).unwrap();
        let err = backend.create_buffer(&data(8)).unwrap_err();
        assert!(matches!(err, CalcSceneError::Render(_)));
        assert_eq!(backend.stats().created, 1);
    }
}
