//! Static unit-cube obstacle on the arena perimeter.

use std::any::Any;

use glam::Vec3;

use crate::components::collider::Collider;
use crate::components::mesh::{Geometry, Material, Mesh};
use crate::entities::{EntityCore, EntityKind, GameEntity};
use crate::error::LoadError;
use crate::resources::assetstore::{AssetSource, BoxFuture};

const WALL_TEXTURE: &str = "wall";

#[derive(Debug)]
pub struct Wall {
    core: EntityCore,
}

impl Wall {
    pub fn new(position: Vec3) -> Self {
        Self {
            core: EntityCore::new(position, EntityKind::General),
        }
    }
}

impl GameEntity for Wall {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn load<'a>(&'a mut self, assets: &'a dyn AssetSource) -> BoxFuture<'a, Result<(), LoadError>> {
        Box::pin(async move {
            let texture = assets
                .texture(WALL_TEXTURE)
                .ok_or_else(|| LoadError::MissingTexture(WALL_TEXTURE.to_string()))?;
            let position = self.core.mesh.position();
            self.core.mesh = Mesh::new(
                Geometry::Box { size: Vec3::ONE },
                Material::standard(texture),
            )
            .named("wall")
            .at(position);
            self.core.collider = self.core.mesh.world_bounds().map(Collider::from_box);
            Ok(())
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
