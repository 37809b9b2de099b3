//! Ground tile. One unit square in the XY plane, with a randomly chosen
//! ground texture. Tiles have no collider and never update.

use std::any::Any;

use glam::Vec3;

use crate::components::mesh::{Geometry, Material, Mesh};
use crate::entities::{EntityCore, EntityKind, GameEntity};
use crate::error::LoadError;
use crate::resources::assetstore::{AssetSource, BoxFuture};

#[derive(Debug)]
pub struct MapTile {
    core: EntityCore,
}

impl MapTile {
    pub fn new(position: Vec3) -> Self {
        Self {
            core: EntityCore::new(position, EntityKind::General),
        }
    }
}

impl GameEntity for MapTile {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn load<'a>(&'a mut self, assets: &'a dyn AssetSource) -> BoxFuture<'a, Result<(), LoadError>> {
        Box::pin(async move {
            let texture = assets
                .random_ground_texture()
                .await
                .ok_or(LoadError::MissingGroundTexture)?;
            let position = self.core.mesh.position();
            self.core.mesh = Mesh::new(
                Geometry::Plane {
                    width: 1.0,
                    height: 1.0,
                },
                Material::standard(texture),
            )
            .named("tile")
            .at(position);
            Ok(())
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
