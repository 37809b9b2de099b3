//! Admission of entities spawned since the previous frame.
//!
//! Entities inserted between frames, or spawned while the live list was
//! being updated, wait on the registry's pending list. This system makes
//! them live, in insertion order, and attaches their meshes to the
//! presenter. They are updated for the first time later in this frame.

use bevy_ecs::prelude::*;

use crate::resources::presenter::PresenterSlot;
use crate::resources::registry::EntityRegistry;

pub fn admit_spawned_entities(
    mut registry: ResMut<EntityRegistry>,
    mut presenter: NonSendMut<PresenterSlot>,
) {
    for entry in registry.admit_pending() {
        presenter.0.add(entry.id, entry.entity.mesh());
    }
}
