//! Scene registry: the per-slot owner of live primitives.
//!
//! Every slot holds at most one generation of GPU resources. Replacing a
//! slot detaches its occupant and releases all of the occupant's resources
//! (children included) before the newcomer is uploaded, so a displaced
//! generation never outlives its replacement.

use glam::Vec3;

use crate::error::Result;
use crate::group::ObjectGroup;
use crate::slot::SceneSlot;
use crate::structure::{RenderBackend, ResourceHandle, SceneObject};

/// A slot's current occupant together with the resources it was given.
struct SlotEntry {
    object: Box<dyn SceneObject>,
    resources: Vec<ResourceHandle>,
    generation: u64,
}

/// Registry of the primitives currently on screen.
///
/// Mutated only by the update orchestrator; the redraw loop reads it through
/// [`iter`](Self::iter) and [`resources`](Self::resources).
pub struct SceneRegistry {
    backend: Box<dyn RenderBackend>,
    slots: [Option<SlotEntry>; SceneSlot::ALL.len()],
    next_generation: u64,
    released_generations: u64,
    committed_sequence: Option<u64>,
}

impl SceneRegistry {
    /// Creates an empty registry that allocates through `backend`.
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            slots: Default::default(),
            next_generation: 1,
            released_generations: 0,
            committed_sequence: None,
        }
    }

    /// Replaces the occupant of `slot`.
    ///
    /// The previous occupant is released first. With `None` the slot ends up
    /// empty. If uploading the newcomer fails, whatever part of it was
    /// allocated is released again and the slot stays empty.
    pub fn replace(&mut self, slot: SceneSlot, object: Option<Box<dyn SceneObject>>) -> Result<()> {
        self.release_slot(slot);

        let Some(object) = object else {
            return Ok(());
        };

        let mut resources = Vec::new();
        if let Err(e) = upload(self.backend.as_mut(), object.as_ref(), &mut resources) {
            for handle in resources {
                self.backend.release(handle);
            }
            log::warn!("failed to upload '{}' into slot {slot}: {e}", object.name());
            return Err(e);
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        log::debug!(
            "slot {slot} <- '{}' (generation {generation}, {} buffers, {} vertices)",
            object.name(),
            resources.len(),
            object.vertex_count()
        );
        self.slots[slot.index()] = Some(SlotEntry {
            object,
            resources,
            generation,
        });
        Ok(())
    }

    /// Replaces `slot` with a group of primitives that live and die together.
    pub fn replace_group(
        &mut self,
        slot: SceneSlot,
        name: impl Into<String>,
        children: Vec<Box<dyn SceneObject>>,
    ) -> Result<()> {
        self.replace(slot, Some(Box::new(ObjectGroup::new(name, children))))
    }

    /// Empties `slot`, releasing its resources.
    pub fn clear(&mut self, slot: SceneSlot) {
        self.release_slot(slot);
    }

    /// Empties every slot.
    pub fn clear_all(&mut self) {
        for slot in SceneSlot::ALL {
            self.release_slot(slot);
        }
    }

    fn release_slot(&mut self, slot: SceneSlot) {
        if let Some(entry) = self.slots[slot.index()].take() {
            for handle in &entry.resources {
                self.backend.release(*handle);
            }
            self.released_generations += 1;
            log::debug!(
                "slot {slot} released '{}' (generation {}, {} buffers)",
                entry.object.name(),
                entry.generation,
                entry.resources.len()
            );
        }
    }

    /// Current occupant of `slot`.
    pub fn get(&self, slot: SceneSlot) -> Option<&dyn SceneObject> {
        self.slots[slot.index()].as_ref().map(|e| e.object.as_ref())
    }

    pub fn is_occupied(&self, slot: SceneSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// Generation number of the current occupant of `slot`.
    pub fn generation(&self, slot: SceneSlot) -> Option<u64> {
        self.slots[slot.index()].as_ref().map(|e| e.generation)
    }

    /// GPU resources held by the current occupant of `slot`.
    pub fn resources(&self, slot: SceneSlot) -> &[ResourceHandle] {
        self.slots[slot.index()]
            .as_ref()
            .map_or(&[], |e| e.resources.as_slice())
    }

    /// Occupied slots in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (SceneSlot, &dyn SceneObject)> {
        SceneSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|o| (slot, o)))
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Generations released since creation.
    pub fn released_generations(&self) -> u64 {
        self.released_generations
    }

    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    /// Union of the render-space bounds of all live primitives.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        self.iter()
            .filter_map(|(_, o)| o.bounding_box())
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }

    /// Diagonal of [`bounding_box`](Self::bounding_box), or 1 for an empty scene.
    pub fn length_scale(&self) -> f32 {
        self.bounding_box()
            .map_or(1.0, |(min, max)| (max - min).length())
    }

    /// Returns true when a write tagged with `sequence` would overwrite a
    /// newer committed update.
    pub fn is_stale(&self, sequence: u64) -> bool {
        self.committed_sequence.is_some_and(|c| sequence < c)
    }

    /// Records `sequence` as the newest committed update.
    ///
    /// Returns false, without recording, when `sequence` is stale.
    pub fn commit_sequence(&mut self, sequence: u64) -> bool {
        if self.is_stale(sequence) {
            return false;
        }
        self.committed_sequence = Some(sequence);
        true
    }

    /// Sequence token of the newest committed update.
    pub fn committed_sequence(&self) -> Option<u64> {
        self.committed_sequence
    }
}

impl Drop for SceneRegistry {
    fn drop(&mut self) {
        self.clear_all();
    }
}

fn upload(
    backend: &mut dyn RenderBackend,
    object: &dyn SceneObject,
    resources: &mut Vec<ResourceHandle>,
) -> Result<()> {
    for buffer in object.buffers() {
        resources.push(backend.create_buffer(&buffer)?);
    }
    for child in object.children() {
        upload(backend, child.as_ref(), resources)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::error::CalcSceneError;
    use crate::structure::{BufferData, BufferUsage, PrimitiveKind, ResourceStats};

    #[derive(Default)]
    struct CountingBackend {
        next: u64,
        live: HashSet<ResourceHandle>,
        stats: ResourceStats,
        fail_after: Option<u64>,
    }

    impl RenderBackend for CountingBackend {
        fn create_buffer(&mut self, data: &BufferData) -> Result<ResourceHandle> {
            if self.fail_after.is_some_and(|n| self.stats.created >= n) {
                return Err(CalcSceneError::Render("out of memory".into()));
            }
            self.next += 1;
            let handle = ResourceHandle(self.next);
            self.live.insert(handle);
            self.stats.created += 1;
            self.stats.live_bytes += data.len() as u64;
            Ok(handle)
        }

        fn release(&mut self, handle: ResourceHandle) {
            if self.live.remove(&handle) {
                self.stats.released += 1;
            }
        }

        fn stats(&self) -> ResourceStats {
            self.stats
        }

        fn is_live(&self, handle: ResourceHandle) -> bool {
            self.live.contains(&handle)
        }
    }

    struct Blob {
        buffers: usize,
    }

    impl SceneObject for Blob {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn name(&self) -> &str {
            "blob"
        }
        fn kind(&self) -> PrimitiveKind {
            PrimitiveKind::Points
        }
        fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
            Some((Vec3::ZERO, Vec3::splat(self.buffers as f32)))
        }
        fn vertex_count(&self) -> usize {
            self.buffers
        }
        fn buffers(&self) -> Vec<BufferData> {
            (0..self.buffers)
                .map(|i| BufferData::new(format!("b{i}"), BufferUsage::Vertex, vec![0; 12]))
                .collect()
        }
    }

    fn blob(buffers: usize) -> Option<Box<dyn SceneObject>> {
        Some(Box::new(Blob { buffers }))
    }

    fn registry() -> SceneRegistry {
        SceneRegistry::new(Box::<CountingBackend>::default())
    }

    #[test]
    fn replace_releases_previous_generation() {
        let mut reg = registry();
        reg.replace(SceneSlot::Surface, blob(3)).unwrap();
        let first: Vec<_> = reg.resources(SceneSlot::Surface).to_vec();
        assert_eq!(first.len(), 3);

        reg.replace(SceneSlot::Surface, blob(2)).unwrap();
        assert!(first.iter().all(|h| !reg.backend().is_live(*h)));
        assert_eq!(reg.backend().stats().live(), 2);
        assert_eq!(reg.released_generations(), 1);
        assert_eq!(reg.generation(SceneSlot::Surface), Some(2));
    }

    #[test]
    fn group_releases_every_child() {
        let mut reg = registry();
        let children: Vec<Box<dyn SceneObject>> = vec![
            Box::new(Blob { buffers: 2 }),
            Box::new(Blob { buffers: 4 }),
        ];
        reg.replace_group(SceneSlot::VectorField, "field", children).unwrap();
        assert_eq!(reg.backend().stats().live(), 6);
        assert_eq!(reg.get(SceneSlot::VectorField).unwrap().primitive_count(), 2);

        reg.clear(SceneSlot::VectorField);
        assert_eq!(reg.backend().stats().live(), 0);
        assert!(!reg.is_occupied(SceneSlot::VectorField));
    }

    #[test]
    fn failed_upload_leaves_slot_empty_and_leaks_nothing() {
        let backend = CountingBackend {
            fail_after: Some(4),
            ..Default::default()
        };
        let mut reg = SceneRegistry::new(Box::new(backend));
        reg.replace(SceneSlot::Points, blob(2)).unwrap();
        assert!(reg.replace(SceneSlot::Points, blob(5)).is_err());
        assert!(!reg.is_occupied(SceneSlot::Points));
        assert_eq!(reg.backend().stats().live(), 0);
    }

    #[test]
    fn slots_are_independent() {
        let mut reg = registry();
        reg.replace(SceneSlot::Surface, blob(1)).unwrap();
        reg.replace(SceneSlot::Wireframe, blob(1)).unwrap();
        reg.clear(SceneSlot::Surface);
        assert!(reg.is_occupied(SceneSlot::Wireframe));
        assert_eq!(reg.len(), 1);
        let slots: Vec<_> = reg.iter().map(|(s, _)| s).collect();
        assert_eq!(slots, vec![SceneSlot::Wireframe]);
    }

    #[test]
    fn bounds_cover_all_slots() {
        let mut reg = registry();
        assert!(reg.bounding_box().is_none());
        assert_eq!(reg.length_scale(), 1.0);
        reg.replace(SceneSlot::Surface, blob(1)).unwrap();
        reg.replace(SceneSlot::Points, blob(2)).unwrap();
        assert_eq!(reg.bounding_box(), Some((Vec3::ZERO, Vec3::splat(2.0))));
    }

    #[test]
    fn stale_sequences_are_refused() {
        let mut reg = registry();
        assert!(!reg.is_stale(1));
        assert!(reg.commit_sequence(2));
        assert!(reg.is_stale(1));
        assert!(!reg.commit_sequence(1));
        assert_eq!(reg.committed_sequence(), Some(2));
        assert!(reg.commit_sequence(3));
    }

    proptest! {
        #[test]
        fn one_release_per_replacement_and_final_clear(
            sizes in proptest::collection::vec(1usize..6, 1..20),
        ) {
            let mut reg = registry();
            for (i, n) in sizes.iter().enumerate() {
                reg.replace(SceneSlot::Surface, blob(*n)).unwrap();
                prop_assert_eq!(reg.released_generations(), i as u64);
                prop_assert_eq!(reg.backend().stats().live(), *n as u64);
            }
            reg.clear(SceneSlot::Surface);
            prop_assert_eq!(reg.released_generations(), sizes.len() as u64);
            prop_assert_eq!(reg.backend().stats().live(), 0);
            let total: usize = sizes.iter().sum();
            prop_assert_eq!(reg.backend().stats().released, total as u64);
        }
    }
}
