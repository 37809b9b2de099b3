//! Simulation entities.
//!
//! Every live object in the arena (ground tiles, walls, the player tank,
//! bullets, muzzle effects) implements [`GameEntity`]. The trait is the one
//! lifecycle contract the simulation loop knows about:
//!
//! 1. the entity is constructed with a position and an [`EntityKind`]
//! 2. [`GameEntity::load`] runs once, asynchronously, and builds the mesh and
//!    collider; a missing resource fails the load with a
//!    [`LoadError`](crate::error::LoadError)
//! 3. [`GameEntity::update`] runs once per frame while the entity is live
//! 4. the entity raises its disposal flag; the next sweep removes it from the
//!    registry and calls [`GameEntity::dispose`] exactly once
//!
//! State shared by all variants lives in [`EntityCore`].
//!
//! Submodules:
//! - [`arena`] – builds the tiles and perimeter walls of the arena
//! - [`bullet`] – projectile moving along a fixed heading
//! - [`maptile`] – textured ground plane
//! - [`playertank`] – input-driven player unit
//! - [`shooteffect`] – short-lived muzzle particle burst
//! - [`wall`] – static box obstacle

pub mod arena;
pub mod bullet;
pub mod maptile;
pub mod playertank;
pub mod shooteffect;
pub mod wall;

use std::any::Any;
use std::fmt;

use glam::Vec3;

use crate::components::collider::Collider;
use crate::components::mesh::Mesh;
use crate::entities::playertank::PlayerTank;
use crate::error::LoadError;
use crate::resources::assetstore::{AssetSource, BoxFuture};
use crate::resources::camera::FollowCamera;
use crate::resources::registry::Neighbors;

/// Stable identifier handed out by the registry when an entity is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse type tag used by collision filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    #[default]
    General,
    Player,
    Bullet,
}

/// Removal request. Can be raised, never lowered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposalFlag(bool);

impl DisposalFlag {
    pub fn set(&mut self) {
        self.0 = true;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }
}

/// State every entity carries.
#[derive(Debug, Clone, Default)]
pub struct EntityCore {
    /// Root node; its transform is the entity's position and orientation.
    pub mesh: Mesh,
    /// `None` until load assigns one. Entities without a collider never collide.
    pub collider: Option<Collider>,
    kind: EntityKind,
    disposal: DisposalFlag,
}

impl EntityCore {
    pub fn new(position: Vec3, kind: EntityKind) -> Self {
        Self {
            mesh: Mesh::group().at(position),
            collider: None,
            kind,
            disposal: DisposalFlag::default(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn mark_for_disposal(&mut self) {
        self.disposal.set();
    }

    pub fn is_marked_for_disposal(&self) -> bool {
        self.disposal.is_set()
    }

    /// Move the mesh and the collider by the same delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.mesh.transform.position += delta;
        if let Some(collider) = &mut self.collider {
            collider.translate(delta);
        }
    }
}

/// Everything an entity may look at or touch during `update`.
pub struct UpdateContext<'a> {
    /// Scaled frame delta in seconds, shared by every entity this frame.
    pub delta: f32,
    /// Every other live entity, read-only.
    pub others: Neighbors<'a>,
    /// Camera target the player keeps centered on itself.
    pub camera: &'a mut FollowCamera,
}

/// Lifecycle contract shared by every simulation entity.
pub trait GameEntity: Send + Sync + 'static {
    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    /// Acquire resources and build the mesh and collider. Runs exactly once,
    /// before the entity is inserted in the registry.
    fn load<'a>(&'a mut self, assets: &'a dyn AssetSource) -> BoxFuture<'a, Result<(), LoadError>>;

    /// Advance the entity by one frame. Static entities keep the default no-op.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Release every graphics resource. Called once, after removal.
    fn dispose(&mut self) {
        self.core_mut().mesh.release_tree();
    }

    fn kind(&self) -> EntityKind {
        self.core().kind()
    }

    fn mesh(&self) -> &Mesh {
        &self.core().mesh
    }

    fn collider(&self) -> Option<&Collider> {
        self.core().collider.as_ref()
    }

    fn should_dispose(&self) -> bool {
        self.core().is_marked_for_disposal()
    }

    fn position(&self) -> Vec3 {
        self.core().mesh.position()
    }

    /// Player capability; only [`PlayerTank`] answers.
    fn as_player_mut(&mut self) -> Option<&mut PlayerTank> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}
