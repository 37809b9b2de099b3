//! Disposal sweep.
//!
//! Runs first in the frame, before any entity is updated. Every live entity
//! whose disposal flag is set leaves the registry, is detached from the
//! presenter and then disposed, exactly once. Survivors keep their order.

use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::presenter::PresenterSlot;
use crate::resources::registry::EntityRegistry;

pub fn sweep_disposed_entities(
    mut registry: ResMut<EntityRegistry>,
    mut presenter: NonSendMut<PresenterSlot>,
) {
    let swept = registry.sweep();
    if swept.is_empty() {
        return;
    }
    debug!("sweeping {} disposed entities", swept.len());
    for mut entry in swept {
        presenter.0.remove(entry.id);
        entry.entity.dispose();
    }
}
