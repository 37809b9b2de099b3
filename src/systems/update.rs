//! Per-frame entity update.
//!
//! Calls `update` on every live entity in registry order with the frame's
//! scaled delta. Each entity reads the others as they are at that moment:
//! entities earlier in the list have already moved this frame.

use bevy_ecs::prelude::*;

use crate::resources::camera::FollowCamera;
use crate::resources::registry::EntityRegistry;
use crate::resources::worldtime::WorldTime;

pub fn update_entities(
    mut registry: ResMut<EntityRegistry>,
    world_time: Res<WorldTime>,
    mut camera: ResMut<FollowCamera>,
) {
    let dt = world_time.delta; // delta is already scaled by time_scale
    registry.update_all(dt, &mut camera);
}
