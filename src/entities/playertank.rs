//! Player-controlled tank.
//!
//! The tank keeps a [`KeyboardState`] fed by [`PlayerTank::apply_input`] and
//! turns it into motion on every update:
//!
//! - `up`/`down` drive along the current heading, `up` winning when both are held
//! - `left`/`right` rotate at π rad/s, `left` winning when both are held
//!
//! Translation uses the heading from *before* this frame's rotation, so a
//! turn only affects the direction of travel from the next frame on.
//!
//! A move is tested first: the collider is translated by the candidate
//! delta and checked against every other live entity except bullets. A
//! blocked move leaves position and collider untouched; the rotation is
//! applied either way. After an accepted move the follow camera is centered
//! over the tank.
//!
//! Releasing `Fire` produces one shot; [`PlayerTank::fire`] spawns the
//! bullet and its muzzle effect.

use std::any::Any;
use std::f32::consts::{PI, TAU};

use glam::Vec3;
use log::debug;

use crate::components::collider::Collider;
use crate::components::mesh::{Material, Mesh};
use crate::entities::bullet::{heading_vector, Bullet, DEFAULT_BULLET_SPEED};
use crate::entities::shooteffect::ShootEffect;
use crate::entities::{EntityCore, EntityId, EntityKind, GameEntity, UpdateContext};
use crate::error::LoadError;
use crate::events::input::{InputAction, InputEvent};
use crate::resources::assetstore::{AssetSource, BoxFuture};
use crate::resources::registry::Spawner;

const MODEL: &str = "tank";
const BODY_PART: &str = "Body";
const TURRET_PART: &str = "Turret";
const BODY_TEXTURE: &str = "tank-body";
const TURRET_TEXTURE: &str = "tank-turret";

/// Wrap an angle into `[0, 2π)`.
///
/// `rem_euclid` rounds tiny negative angles up to exactly `TAU`.
fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Which movement keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Movement and weapon constants of the tank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    /// Units per second.
    pub move_speed: f32,
    /// Factor applied to the enclosing sphere radius of the model.
    pub collider_shrink: f32,
    /// Distance from the tank centre at which bullets appear.
    pub muzzle_offset: f32,
    pub bullet_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            collider_shrink: 0.75,
            muzzle_offset: 0.3,
            bullet_speed: DEFAULT_BULLET_SPEED,
        }
    }
}

#[derive(Debug)]
pub struct PlayerTank {
    core: EntityCore,
    /// Radians in `[0, 2π)`.
    rotation: f32,
    keyboard: KeyboardState,
    tuning: PlayerTuning,
}

impl PlayerTank {
    pub fn new(position: Vec3) -> Self {
        Self {
            core: EntityCore::new(position, EntityKind::Player),
            rotation: 0.0,
            keyboard: KeyboardState::default(),
            tuning: PlayerTuning::default(),
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = normalize_angle(rotation);
        self.core.mesh.set_rotation_z(self.rotation);
        self
    }

    pub fn with_tuning(mut self, tuning: PlayerTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn keyboard(&self) -> KeyboardState {
        self.keyboard
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Record a press or release. Returns `true` when the event is a fire
    /// trigger, i.e. the release of [`InputAction::Fire`].
    pub fn apply_input(&mut self, event: InputEvent) -> bool {
        match event.action {
            InputAction::MoveLeft => self.keyboard.left = event.pressed,
            InputAction::MoveRight => self.keyboard.right = event.pressed,
            InputAction::MoveUp => self.keyboard.up = event.pressed,
            InputAction::MoveDown => self.keyboard.down = event.pressed,
            InputAction::Fire => return !event.pressed,
        }
        false
    }

    /// Where a bullet fired now would appear.
    pub fn muzzle_position(&self) -> Vec3 {
        self.position() + heading_vector(self.rotation) * self.tuning.muzzle_offset
    }

    /// Spawn a bullet at the muzzle along the current heading, followed by
    /// its muzzle effect. Both are loaded before they reach the spawner.
    pub async fn fire(
        &self,
        spawner: &mut Spawner<'_>,
        assets: &dyn AssetSource,
    ) -> Result<EntityId, LoadError> {
        let muzzle = self.muzzle_position();

        let mut bullet = Bullet::new(muzzle, self.rotation).with_speed(self.tuning.bullet_speed);
        bullet.load(assets).await?;
        let id = spawner.spawn(Box::new(bullet));

        let mut effect = ShootEffect::new(muzzle, self.rotation);
        effect.load(assets).await?;
        spawner.spawn(Box::new(effect));

        debug!("player fired bullet {id} at {muzzle} heading {:.3}", self.rotation);
        Ok(id)
    }

    /// Movement requested by the held keys for a frame of `delta` seconds,
    /// along `heading`.
    fn requested_translation(&self, heading: f32, delta: f32) -> Vec3 {
        let step = heading_vector(heading) * self.tuning.move_speed * delta;
        if self.keyboard.up {
            step
        } else if self.keyboard.down {
            -step
        } else {
            Vec3::ZERO
        }
    }

    fn requested_rotation(&self, delta: f32) -> f32 {
        if self.keyboard.left {
            PI * delta
        } else if self.keyboard.right {
            -PI * delta
        } else {
            0.0
        }
    }
}

impl GameEntity for PlayerTank {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn load<'a>(&'a mut self, assets: &'a dyn AssetSource) -> BoxFuture<'a, Result<(), LoadError>> {
        Box::pin(async move {
            let model = assets
                .model(MODEL)
                .ok_or_else(|| LoadError::MissingModel(MODEL.to_string()))?;
            let part = |name: &str| -> Result<Mesh, LoadError> {
                model
                    .part(name)
                    .cloned()
                    .ok_or_else(|| LoadError::MissingModelPart {
                        model: MODEL.to_string(),
                        part: name.to_string(),
                    })
            };
            let texture = |name: &str| {
                assets
                    .texture(name)
                    .ok_or_else(|| LoadError::MissingTexture(name.to_string()))
            };

            let mut body = part(BODY_PART)?;
            let mut turret = part(TURRET_PART)?;
            body.material = Some(Material::standard(texture(BODY_TEXTURE)?));
            turret.material = Some(Material::standard(texture(TURRET_TEXTURE)?));

            self.core.mesh.children = vec![body, turret];
            self.core.mesh.set_rotation_z(self.rotation);
            self.core.collider = self.core.mesh.world_bounds().map(|bounds| {
                Collider::from_sphere(bounds.bounding_sphere().shrunk(self.tuning.collider_shrink))
            });
            Ok(())
        })
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let translation = self.requested_translation(self.rotation, ctx.delta);
        self.rotation = normalize_angle(self.rotation + self.requested_rotation(ctx.delta));
        self.core.mesh.set_rotation_z(self.rotation);

        if translation == Vec3::ZERO {
            return;
        }
        if let Some(collider) = self.core.collider {
            let candidate = collider.translated(translation);
            let blocked = ctx
                .others
                .any_intersecting(&candidate, |other| other.kind() != EntityKind::Bullet);
            if blocked {
                return;
            }
        }
        self.core.translate(translation);
        ctx.camera.follow(self.position());
    }

    fn as_player_mut(&mut self) -> Option<&mut PlayerTank> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;
    use std::path::PathBuf;

    use super::*;
    use crate::components::collider::Aabb;
    use crate::components::mesh::{Geometry, Texture};
    use crate::entities::wall::Wall;
    use crate::resources::assetstore::{AssetStore, Model};
    use crate::resources::camera::FollowCamera;
    use crate::resources::registry::{EntityRegistry, Neighbors, RegistryEntry};

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn texture(name: &str) -> Texture {
        Texture {
            name: name.to_string(),
            path: PathBuf::from(format!("{name}.png")),
        }
    }

    fn part(name: &str, half: Vec3) -> Mesh {
        Mesh {
            name: name.to_string(),
            geometry: Some(Geometry::Imported {
                bounds: Aabb::new(-half, half),
            }),
            ..Mesh::group()
        }
    }

    fn tank_assets() -> AssetStore {
        let mut assets = AssetStore::in_memory();
        for name in [BODY_TEXTURE, TURRET_TEXTURE, "wall"] {
            assets.insert_texture(texture(name));
        }
        assets.insert_model(Model {
            name: MODEL.to_string(),
            parts: vec![
                part(BODY_PART, Vec3::new(0.3, 0.4, 0.15)),
                part(TURRET_PART, Vec3::new(0.15, 0.15, 0.1)),
            ],
        });
        assets
    }

    fn loaded(position: Vec3) -> PlayerTank {
        let assets = tank_assets();
        let mut tank = PlayerTank::new(position);
        pollster::block_on(tank.load(&assets)).unwrap();
        tank
    }

    fn step(tank: &mut PlayerTank, others: &[RegistryEntry], delta: f32) -> FollowCamera {
        let mut camera = FollowCamera::default();
        let mut ctx = UpdateContext {
            delta,
            others: Neighbors::new(others, &[]),
            camera: &mut camera,
        };
        tank.update(&mut ctx);
        camera
    }

    #[test]
    fn load_attaches_textured_parts_and_shrunk_collider() {
        let tank = loaded(Vec3::new(7.0, 7.0, 0.0));
        let body = tank.mesh().child(BODY_PART).unwrap();
        let material = body.material.as_ref().unwrap();
        assert_eq!(material.texture.as_ref().unwrap().name, BODY_TEXTURE);
        assert!(tank.mesh().child(TURRET_PART).is_some());

        let bounds = tank.mesh().world_bounds().unwrap();
        let sphere = tank.collider().unwrap().bounding_sphere();
        assert!(approx_eq(sphere.radius, bounds.bounding_sphere().radius * 0.75));
        assert!((sphere.center - Vec3::new(7.0, 7.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn missing_resources_fail_the_load() {
        let mut assets = AssetStore::in_memory();
        let mut tank = PlayerTank::new(Vec3::ZERO);
        let err = pollster::block_on(tank.load(&assets)).unwrap_err();
        assert!(matches!(err, LoadError::MissingModel(_)));

        assets.insert_model(Model {
            name: MODEL.to_string(),
            parts: vec![part(BODY_PART, Vec3::splat(0.2))],
        });
        let err = pollster::block_on(tank.load(&assets)).unwrap_err();
        assert!(matches!(err, LoadError::MissingModelPart { part, .. } if part == TURRET_PART));

        assets.insert_model(Model {
            name: MODEL.to_string(),
            parts: vec![part(BODY_PART, Vec3::splat(0.2)), part(TURRET_PART, Vec3::splat(0.1))],
        });
        let err = pollster::block_on(tank.load(&assets)).unwrap_err();
        assert!(matches!(err, LoadError::MissingTexture(name) if name == BODY_TEXTURE));
    }

    #[test]
    fn fire_triggers_on_release_only() {
        let mut tank = PlayerTank::new(Vec3::ZERO);
        assert!(!tank.apply_input(InputEvent::press(InputAction::Fire)));
        assert!(tank.apply_input(InputEvent::release(InputAction::Fire)));
        assert!(!tank.apply_input(InputEvent::press(InputAction::MoveUp)));
        assert!(tank.keyboard().up);
        tank.apply_input(InputEvent::release(InputAction::MoveUp));
        assert_eq!(tank.keyboard(), KeyboardState::default());
    }

    #[test]
    fn forward_motion_uses_pre_update_heading() {
        let mut tank = loaded(Vec3::ZERO);
        tank.apply_input(InputEvent::press(InputAction::MoveUp));
        tank.apply_input(InputEvent::press(InputAction::MoveLeft));

        let camera = step(&mut tank, &[], 0.5);
        // Heading 0 points along -Y; the quarter turn only shows up next frame.
        assert!((tank.position() - Vec3::new(0.0, -1.0, 0.0)).length() < EPSILON);
        assert!(approx_eq(tank.rotation(), FRAC_PI_2));
        assert!(approx_eq(camera.position.y, -1.0));
        assert!(approx_eq(camera.position.z, 15.0));

        step(&mut tank, &[], 0.5);
        assert!((tank.position() - Vec3::new(1.0, -1.0, 0.0)).length() < EPSILON);
        assert!(approx_eq(tank.rotation(), PI));
    }

    #[test]
    fn opposing_keys_resolve_to_up_and_left() {
        let mut tank = loaded(Vec3::ZERO);
        for action in [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
        ] {
            tank.apply_input(InputEvent::press(action));
        }
        step(&mut tank, &[], 0.1);
        assert!((tank.position() - Vec3::new(0.0, -0.2, 0.0)).length() < EPSILON);
        assert!(approx_eq(tank.rotation(), PI * 0.1));
    }

    #[test]
    fn tiny_negative_rotation_wraps_below_tau() {
        assert_eq!((-1e-9_f32).rem_euclid(TAU), TAU);
        assert_eq!(normalize_angle(-1e-9), 0.0);
        assert_eq!(PlayerTank::new(Vec3::ZERO).with_rotation(-1e-9).rotation(), 0.0);
        assert!(approx_eq(normalize_angle(-FRAC_PI_2), 1.5 * PI));
    }

    #[test]
    fn rotation_stays_normalized() {
        let mut tank = loaded(Vec3::ZERO);
        tank.apply_input(InputEvent::press(InputAction::MoveRight));
        step(&mut tank, &[], 0.5);
        assert!(approx_eq(tank.rotation(), 1.5 * PI));
        for _ in 0..8 {
            step(&mut tank, &[], 0.5);
            assert!((0.0..TAU).contains(&tank.rotation()));
        }
    }

    #[test]
    fn blocked_move_keeps_position_but_applies_rotation() {
        let assets = tank_assets();
        let mut wall = Wall::new(Vec3::new(0.0, -1.0, 0.0));
        pollster::block_on(wall.load(&assets)).unwrap();
        let others = vec![RegistryEntry::new(EntityId(1), Box::new(wall))];

        let mut tank = loaded(Vec3::ZERO);
        let collider_before = *tank.collider().unwrap();
        tank.apply_input(InputEvent::press(InputAction::MoveUp));
        tank.apply_input(InputEvent::press(InputAction::MoveLeft));
        let camera = step(&mut tank, &others, 0.1);

        assert_eq!(tank.position(), Vec3::ZERO);
        assert_eq!(*tank.collider().unwrap(), collider_before);
        assert!(approx_eq(tank.rotation(), PI * 0.1));
        assert_eq!(camera, FollowCamera::default());
    }

    #[test]
    fn bullets_never_block_the_tank() {
        let assets = tank_assets();
        let mut bullet = Bullet::new(Vec3::new(0.0, -0.3, 0.0), 0.0);
        pollster::block_on(bullet.load(&assets)).unwrap();
        let others = vec![RegistryEntry::new(EntityId(1), Box::new(bullet))];

        let mut tank = loaded(Vec3::ZERO);
        tank.apply_input(InputEvent::press(InputAction::MoveUp));
        step(&mut tank, &others, 0.1);
        assert!((tank.position() - Vec3::new(0.0, -0.2, 0.0)).length() < EPSILON);
    }

    #[test]
    fn fire_spawns_bullet_and_effect_at_muzzle() {
        let assets = tank_assets();
        let tank = loaded(Vec3::new(2.0, 2.0, 0.0)).with_rotation(FRAC_PI_2);
        let mut registry = EntityRegistry::new();

        let id = pollster::block_on(tank.fire(&mut registry.spawner(), &assets)).unwrap();
        assert_eq!(registry.pending_len(), 2);

        let bullet = registry
            .get(id)
            .and_then(|e| e.as_any().downcast_ref::<Bullet>())
            .unwrap();
        assert!(approx_eq(bullet.angle(), FRAC_PI_2));
        assert!((bullet.position() - Vec3::new(2.3, 2.0, 0.0)).length() < EPSILON);
        assert!(bullet.collider().is_some());

        let effect = registry
            .pending()
            .find_map(|e| e.entity.as_any().downcast_ref::<ShootEffect>())
            .unwrap();
        assert_eq!(effect.position(), bullet.position());
        assert!(!effect.fire_particles().is_empty());
    }
}
