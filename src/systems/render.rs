use bevy_ecs::prelude::*;

use crate::resources::camera::FollowCamera;
use crate::resources::presenter::PresenterSlot;
use crate::resources::registry::EntityRegistry;

/// Hand the live meshes and the camera to the presenter.
pub fn present_entities(
    registry: Res<EntityRegistry>,
    camera: Res<FollowCamera>,
    mut presenter: NonSendMut<PresenterSlot>,
) {
    let scene = registry.meshes();
    presenter.0.render(&scene, &camera);
}
