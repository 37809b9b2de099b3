//! Arena layout.
//!
//! A square arena of `size × size` ground tiles with walls along its border.
//! Tile `(i, j)` sits at world position `(i, j, 0)`; walls occupy the outer
//! ring of cells (the four corners plus every cell between them on each side).

use glam::Vec3;

use crate::entities::maptile::MapTile;
use crate::entities::wall::Wall;
use crate::entities::GameEntity;

pub const DEFAULT_ARENA_SIZE: u32 = 15;

/// Cells on the border of a `size × size` arena, corners first.
pub fn perimeter(size: u32) -> Vec<(u32, u32)> {
    if size == 0 {
        return Vec::new();
    }
    let edge = size - 1;
    if edge == 0 {
        return vec![(0, 0)];
    }
    let mut cells = vec![(0, 0), (edge, 0), (0, edge), (edge, edge)];
    for i in 1..edge {
        cells.push((i, 0));
        cells.push((i, edge));
        cells.push((0, i));
        cells.push((edge, i));
    }
    cells
}

/// Unloaded tiles followed by unloaded walls, in registry insertion order.
pub fn layout(size: u32) -> Vec<Box<dyn GameEntity>> {
    let mut entities: Vec<Box<dyn GameEntity>> = Vec::new();
    for i in 0..size {
        for j in 0..size {
            entities.push(Box::new(MapTile::new(Vec3::new(i as f32, j as f32, 0.0))));
        }
    }
    for (x, y) in perimeter(size) {
        entities.push(Box::new(Wall::new(Vec3::new(x as f32, y as f32, 0.0))));
    }
    entities
}
