//! Wall-clock source for frame deltas.
//!
//! The first measurement returns zero: the clock starts the first time it is
//! asked, not when it is created. A fixed delta, when set, replaces the wall
//! clock entirely (headless runs and tests).

use std::time::Instant;

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// Clock that reports `delta` seconds on every frame.
    pub fn fixed(delta: f32) -> Self {
        Self {
            last: None,
            fixed_delta: Some(delta.max(0.0)),
        }
    }

    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta.map(|d| d.max(0.0));
    }

    pub fn fixed_delta(&self) -> Option<f32> {
        self.fixed_delta
    }

    /// Seconds since the previous call.
    pub fn delta(&mut self) -> f32 {
        if let Some(fixed) = self.fixed_delta {
            return fixed;
        }
        let now = Instant::now();
        let elapsed = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        elapsed
    }
}
