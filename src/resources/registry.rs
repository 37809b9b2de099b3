//! Entity registry resource.
//!
//! [`EntityRegistry`] owns every entity of the simulation. It keeps two
//! lists:
//!
//! - `live` – entities that take part in the current frame, in insertion order
//! - `pending` – entities appended since the last frame boundary
//!
//! Appends always land on `pending`, whether they happen between frames or
//! while the live list is being updated, so iteration is never disturbed and
//! a new entity is first updated on the frame after its insertion. The
//! frame systems drive the rest:
//!
//! 1. [`EntityRegistry::sweep`] removes flagged entities before any update
//! 2. [`EntityRegistry::admit_pending`] moves pending entries to `live`
//! 3. [`EntityRegistry::update_all`] updates each live entity with a read-only
//!    view ([`Neighbors`]) of all the others

use bevy_ecs::prelude::Resource;

use crate::components::collider::Collider;
use crate::components::mesh::Mesh;
use crate::entities::playertank::PlayerTank;
use crate::entities::{EntityId, EntityKind, GameEntity, UpdateContext};
use crate::resources::camera::FollowCamera;

/// One registry slot.
pub struct RegistryEntry {
    pub id: EntityId,
    pub entity: Box<dyn GameEntity>,
}

impl RegistryEntry {
    pub fn new(id: EntityId, entity: Box<dyn GameEntity>) -> Self {
        Self { id, entity }
    }
}

/// The simulation's collection of entities.
#[derive(Resource, Default)]
pub struct EntityRegistry {
    live: Vec<RegistryEntry>,
    pending: Vec<RegistryEntry>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a loaded entity. It becomes live at the next frame boundary.
    pub fn insert(&mut self, entity: Box<dyn GameEntity>) -> EntityId {
        self.spawner().spawn(entity)
    }

    /// Append-only handle on the registry.
    pub fn spawner(&mut self) -> Spawner<'_> {
        Spawner {
            pending: &mut self.pending,
            next_id: &mut self.next_id,
        }
    }

    /// The live player tank together with append access, for firing.
    pub fn player_and_spawner(&mut self) -> Option<(&mut PlayerTank, Spawner<'_>)> {
        let Self {
            live,
            pending,
            next_id,
        } = self;
        let player = live.iter_mut().find_map(|e| e.entity.as_player_mut())?;
        Some((player, Spawner { pending, next_id }))
    }

    /// Take a loaded player tank off the pending list, with its position
    /// there. Used to route input that arrives before the first admission;
    /// hand it back with [`EntityRegistry::reattach_pending`].
    pub fn detach_pending_player(&mut self) -> Option<(usize, RegistryEntry)> {
        let index = self
            .pending
            .iter_mut()
            .position(|e| e.entity.as_player_mut().is_some())?;
        Some((index, self.pending.remove(index)))
    }

    /// Put a detached pending entry back at `index`. Entries spawned in the
    /// meantime stay behind it.
    pub fn reattach_pending(&mut self, index: usize, entry: RegistryEntry) {
        let index = index.min(self.pending.len());
        self.pending.insert(index, entry);
    }

    /// Remove every entity whose disposal flag is set, keeping the order of
    /// the survivors. The caller disposes the returned entries.
    pub fn sweep(&mut self) -> Vec<RegistryEntry> {
        if !self.live.iter().any(|e| e.entity.should_dispose()) {
            return Vec::new();
        }
        let (flagged, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.live)
            .into_iter()
            .partition(|e| e.entity.should_dispose());
        self.live = live;
        flagged
    }

    /// Move pending entries to the end of the live list and return them.
    pub fn admit_pending(&mut self) -> &[RegistryEntry] {
        let start = self.live.len();
        self.live.append(&mut self.pending);
        &self.live[start..]
    }

    /// Update every live entity once, in registry order, with the same delta.
    ///
    /// Each entity sees the others through [`Neighbors`]; entries before it
    /// have already been updated this frame.
    pub fn update_all(&mut self, delta: f32, camera: &mut FollowCamera) {
        for index in 0..self.live.len() {
            let (before, rest) = self.live.split_at_mut(index);
            let Some((current, after)) = rest.split_first_mut() else {
                break;
            };
            if current.entity.should_dispose() {
                continue;
            }
            let mut ctx = UpdateContext {
                delta,
                others: Neighbors::new(before, after),
                camera: &mut *camera,
            };
            current.entity.update(&mut ctx);
        }
    }

    /// Empty the registry. Returns the live entries, then the pending ones.
    pub fn drain(&mut self) -> (Vec<RegistryEntry>, Vec<RegistryEntry>) {
        (
            std::mem::take(&mut self.live),
            std::mem::take(&mut self.pending),
        )
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn live(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.live.iter()
    }

    pub fn pending(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.pending.iter()
    }

    /// Live or pending entity by id.
    pub fn get(&self, id: EntityId) -> Option<&dyn GameEntity> {
        self.live
            .iter()
            .chain(self.pending.iter())
            .find(|e| e.id == id)
            .map(|e| e.entity.as_ref() as &dyn GameEntity)
    }

    /// Number of live entities of the given kind.
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.live.iter().filter(|e| e.entity.kind() == kind).count()
    }

    /// Meshes of the live entities, for the presenter.
    pub fn meshes(&self) -> Vec<(EntityId, &Mesh)> {
        self.live.iter().map(|e| (e.id, e.entity.mesh())).collect()
    }
}

/// Append-only access to the registry's pending list.
pub struct Spawner<'a> {
    pending: &'a mut Vec<RegistryEntry>,
    next_id: &'a mut u64,
}

impl Spawner<'_> {
    pub fn spawn(&mut self, entity: Box<dyn GameEntity>) -> EntityId {
        let id = EntityId(*self.next_id);
        *self.next_id += 1;
        self.pending.push(RegistryEntry::new(id, entity));
        id
    }
}

/// Read-only view of every live entity except the one being updated.
#[derive(Clone, Copy)]
pub struct Neighbors<'a> {
    before: &'a [RegistryEntry],
    after: &'a [RegistryEntry],
}

impl<'a> Neighbors<'a> {
    pub fn new(before: &'a [RegistryEntry], after: &'a [RegistryEntry]) -> Self {
        Self { before, after }
    }

    pub fn empty() -> Self {
        Self::new(&[], &[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a dyn GameEntity> + use<'a> {
        let (before, after) = (self.before, self.after);
        before
            .iter()
            .chain(after.iter())
            .map(|entry| -> &'a dyn GameEntity { entry.entity.as_ref() })
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any neighbour accepted by `filter` has a collider that
    /// intersects `collider`. Neighbours without a collider are skipped.
    pub fn any_intersecting(
        &self,
        collider: &Collider,
        filter: impl Fn(&dyn GameEntity) -> bool,
    ) -> bool {
        self.iter().any(|other| {
            filter(other) && other.collider().is_some_and(|c| c.intersects(collider))
        })
    }
}
