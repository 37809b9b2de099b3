//! Shared perspective camera resource.
//!
//! The player tank keeps the camera centered above itself by writing the x/y
//! of its position here after each accepted move; the height is left alone.
//! The presenter reads it once per frame.

use bevy_ecs::prelude::Resource;
use glam::Vec3;

/// Camera the presenter renders the arena from.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(7.0, 7.0, 15.0),
            fov: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl FollowCamera {
    pub fn new(position: Vec3, fov: f32) -> Self {
        Self {
            position,
            fov,
            ..Self::default()
        }
    }

    /// Center the camera over `target`, keeping the current height.
    pub fn follow(&mut self, target: Vec3) {
        self.position.x = target.x;
        self.position.y = target.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_keeps_height() {
        let mut camera = FollowCamera::new(Vec3::new(0.0, 0.0, 15.0), 45.0);
        camera.follow(Vec3::new(3.0, -2.0, 1.0));
        assert_eq!(camera.position, Vec3::new(3.0, -2.0, 15.0));
    }
}
