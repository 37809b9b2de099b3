//! Time update systems.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` to the measured delta.
//! Every entity updated in the same frame sees the same scaled delta.
use bevy_ecs::prelude::*;

use crate::resources::frameclock::FrameClock;
use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The function
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
pub fn update_world_time(world_time: &mut WorldTime, dt: f32) {
    let scaled_dt = dt * world_time.time_scale;
    world_time.elapsed += scaled_dt;
    world_time.delta = scaled_dt;
    world_time.frame_count += 1;
}

/// Measure the frame delta with the [`FrameClock`] and publish it.
pub fn advance_frame_clock(mut clock: ResMut<FrameClock>, mut world_time: ResMut<WorldTime>) {
    let dt = clock.delta();
    update_world_time(&mut world_time, dt);
}
