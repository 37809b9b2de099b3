//! Muzzle burst shown when the tank fires.
//!
//! The effect owns two particle groups under its root mesh:
//!
//! - fire: orange particles flying out along the firing angle (each with a
//!   small random deviation and its own speed), slowing down and shrinking
//!   as the effect ages
//! - smoke: translucent particles scattered around the origin that fade out
//!   while drifting along +Z
//!
//! A single countdown, starting at [`EFFECT_DURATION`], drives both the
//! lifetime and the fade. The effect is cosmetic: it has no collider.

use std::any::Any;
use std::f32::consts::PI;

use fastrand::Rng;
use glam::Vec3;

use crate::components::mesh::{Geometry, Material, Mesh};
use crate::entities::{EntityCore, EntityKind, GameEntity, UpdateContext};
use crate::error::LoadError;
use crate::resources::assetstore::{AssetSource, BoxFuture};

pub const EFFECT_DURATION: f32 = 1.0;
const PARTICLE_SIZE: f32 = 0.1;
const MIN_PARTICLES: u32 = 4;
/// Exclusive.
const MAX_PARTICLES: u32 = 9;
const MAX_ANGLE_DEVIATION: f32 = PI * 0.08;
const MAX_PARTICLE_SPEED: f32 = 1.75 * 3.0;
const FIRE_DECELERATION: f32 = 0.75;
const SMOKE_DRIFT_SPEED: f32 = 3.0;
const FIRE_COLOR: u32 = 0xff4500;
const SMOKE_COLOR: u32 = 0xfafafa;

const FIRE_GROUP: usize = 0;
const SMOKE_GROUP: usize = 1;

/// Flight parameters of one fire particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireParticle {
    pub angle: f32,
    pub speed: f32,
}

#[derive(Debug)]
pub struct ShootEffect {
    core: EntityCore,
    angle: f32,
    remaining: f32,
    /// Indexed like the fire group's children.
    fire: Vec<FireParticle>,
    rng: Rng,
}

fn random_sign(rng: &mut Rng) -> f32 {
    if rng.bool() { 1.0 } else { -1.0 }
}

impl ShootEffect {
    pub fn new(position: Vec3, angle: f32) -> Self {
        Self::with_rng(position, angle, Rng::new())
    }

    /// Effect whose particles come from a seeded generator.
    pub fn with_seed(position: Vec3, angle: f32, seed: u64) -> Self {
        Self::with_rng(position, angle, Rng::with_seed(seed))
    }

    fn with_rng(position: Vec3, angle: f32, rng: Rng) -> Self {
        Self {
            core: EntityCore::new(position, EntityKind::General),
            angle,
            remaining: EFFECT_DURATION,
            fire: Vec::new(),
            rng,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Seconds left before the effect asks to be disposed.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn fire_parameters(&self) -> &[FireParticle] {
        &self.fire
    }

    pub fn fire_particles(&self) -> &[Mesh] {
        self.group(FIRE_GROUP)
    }

    pub fn smoke_particles(&self) -> &[Mesh] {
        self.group(SMOKE_GROUP)
    }

    fn group(&self, index: usize) -> &[Mesh] {
        self.core
            .mesh
            .children
            .get(index)
            .map(|g| g.children.as_slice())
            .unwrap_or(&[])
    }

    fn build_particles(&mut self) {
        let geometry = Geometry::Dodecahedron {
            radius: PARTICLE_SIZE,
        };
        let fire_material = Material::phong(FIRE_COLOR);
        let smoke_material = Material::phong(SMOKE_COLOR).transparent();

        let mut fire_group = Mesh::group().named("fire");
        let mut smoke_group = Mesh::group().named("smoke");
        let total = self.rng.u32(MIN_PARTICLES..MAX_PARTICLES);

        for _ in 0..total {
            let deviation = MAX_ANGLE_DEVIATION * self.rng.f32() * random_sign(&mut self.rng);
            let speed = MAX_PARTICLE_SPEED * self.rng.f32();
            self.fire.push(FireParticle {
                angle: self.angle + deviation,
                speed,
            });
            fire_group.add(Mesh::new(geometry.clone(), fire_material.clone()));

            let jitter = Vec3::new(
                self.rng.f32() * PARTICLE_SIZE * random_sign(&mut self.rng),
                self.rng.f32() * PARTICLE_SIZE * random_sign(&mut self.rng),
                self.rng.f32() * PARTICLE_SIZE * random_sign(&mut self.rng),
            );
            smoke_group.add(Mesh::new(geometry.clone(), smoke_material.clone()).at(jitter));
        }

        self.core.mesh.children = vec![fire_group, smoke_group];
    }
}

impl GameEntity for ShootEffect {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn load<'a>(&'a mut self, _assets: &'a dyn AssetSource) -> BoxFuture<'a, Result<(), LoadError>> {
        Box::pin(async move {
            self.build_particles();
            Ok(())
        })
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let dt = ctx.delta;
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.core.mark_for_disposal();
            return;
        }
        let remaining = self.remaining;

        let mut groups = self.core.mesh.children.iter_mut();
        if let Some(fire_group) = groups.next() {
            for (particle, params) in fire_group.children.iter_mut().zip(&self.fire) {
                let step = params.speed * dt * remaining * FIRE_DECELERATION;
                particle.transform.position +=
                    Vec3::new(step * params.angle.sin(), -step * params.angle.cos(), 0.0);
                particle.transform.scale = Vec3::splat(remaining);
            }
        }
        if let Some(smoke_group) = groups.next() {
            for particle in &mut smoke_group.children {
                if let Some(material) = &mut particle.material {
                    material.opacity = remaining;
                }
                particle.transform.position.z += SMOKE_DRIFT_SPEED * dt;
            }
        }
    }

    fn dispose(&mut self) {
        let mut released = 0;
        for group in self.core.mesh.children.drain(..) {
            for mut particle in group.children {
                released += particle.release();
            }
        }
        self.fire.clear();
        log::trace!("shoot effect released {released} particle resources");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
