//! Projectile fired by the player tank.
//!
//! A bullet travels along the heading it was created with at a constant
//! speed. After each move it checks the other live entities; touching any
//! collider that does not belong to the player ends its life.
//!
//! There is no range or lifetime limit: a bullet that never hits anything
//! keeps flying, and keeps being updated, until the simulation ends.

use std::any::Any;

use glam::Vec3;

use crate::components::collider::Collider;
use crate::components::mesh::{Geometry, Material, Mesh};
use crate::entities::{EntityCore, EntityKind, GameEntity, UpdateContext};
use crate::error::LoadError;
use crate::resources::assetstore::{AssetSource, BoxFuture};

pub const DEFAULT_BULLET_SPEED: f32 = 9.0;
const BULLET_RADIUS: f32 = 0.085;
const BULLET_COLOR: u32 = 0x262626;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletState {
    Spawned,
    Traveling,
    /// Terminal: the disposal flag is set.
    Collided,
}

/// Unit vector for a heading; 0 rad points along -Y, angles grow toward +X.
pub fn heading_vector(angle: f32) -> Vec3 {
    Vec3::new(angle.sin(), -angle.cos(), 0.0)
}

#[derive(Debug)]
pub struct Bullet {
    core: EntityCore,
    angle: f32,
    speed: f32,
    state: BulletState,
}

impl Bullet {
    pub fn new(position: Vec3, angle: f32) -> Self {
        Self {
            core: EntityCore::new(position, EntityKind::Bullet),
            angle,
            speed: DEFAULT_BULLET_SPEED,
            state: BulletState::Spawned,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Heading in radians, fixed at creation.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn state(&self) -> BulletState {
        self.state
    }
}

impl GameEntity for Bullet {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn load<'a>(&'a mut self, _assets: &'a dyn AssetSource) -> BoxFuture<'a, Result<(), LoadError>> {
        Box::pin(async move {
            let position = self.core.mesh.position();
            self.core.mesh = Mesh::new(
                Geometry::Sphere {
                    radius: BULLET_RADIUS,
                },
                Material::phong(BULLET_COLOR),
            )
            .at(position);
            self.core.collider = self
                .core
                .mesh
                .world_bounds()
                .map(|bounds| Collider::from_sphere(bounds.bounding_sphere()));
            Ok(())
        })
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.state == BulletState::Collided {
            return;
        }

        let movement = heading_vector(self.angle) * self.speed * ctx.delta;
        self.core.translate(movement);
        self.state = BulletState::Traveling;

        let Some(collider) = self.core.collider else {
            return;
        };
        if ctx
            .others
            .any_intersecting(&collider, |other| other.kind() != EntityKind::Player)
        {
            self.state = BulletState::Collided;
            self.core.mark_for_disposal();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
