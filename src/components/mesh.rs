//! Visual representation of an entity.
//!
//! A [`Mesh`] is a small scene-graph node: a [`Transform`], optional
//! [`Geometry`] and [`Material`], and child nodes. Entities own exactly one
//! root node; its transform is the entity's position and orientation.
//!
//! Geometry and materials stand in for GPU-side resources owned by the
//! presentation layer. [`Mesh::release_tree`] drops them and detaches the
//! children, which is what an entity's `dispose` step amounts to.

use std::path::PathBuf;

use glam::{Mat4, Quat, Vec3};

use crate::components::collider::Aabb;

/// Handle to a loaded texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub name: String,
    pub path: PathBuf,
}

/// Position, orientation and scale of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Shape data attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Box centered on the node origin.
    Box { size: Vec3 },
    /// Flat plane in the XY plane.
    Plane { width: f32, height: f32 },
    Sphere { radius: f32 },
    /// Low-poly particle shape.
    Dodecahedron { radius: f32 },
    /// Imported model geometry, known only by its local bounds.
    Imported { bounds: Aabb },
}

impl Geometry {
    /// Bounds in the node's local space.
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Geometry::Box { size } => Aabb::from_center_size(Vec3::ZERO, *size),
            Geometry::Plane { width, height } => {
                Aabb::from_center_size(Vec3::ZERO, Vec3::new(*width, *height, 0.0))
            }
            Geometry::Sphere { radius } | Geometry::Dodecahedron { radius } => {
                Aabb::from_center_size(Vec3::ZERO, Vec3::splat(radius * 2.0))
            }
            Geometry::Imported { bounds } => *bounds,
        }
    }
}

/// Lighting model used by a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    Standard,
    Phong,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shading: Shading,
    /// 0xRRGGBB
    pub color: u32,
    pub texture: Option<Texture>,
    pub transparent: bool,
    pub opacity: f32,
}

impl Material {
    /// Standard material mapped with `texture`.
    pub fn standard(texture: Texture) -> Self {
        Self {
            shading: Shading::Standard,
            color: 0xffffff,
            texture: Some(texture),
            transparent: false,
            opacity: 1.0,
        }
    }

    /// Untextured phong material.
    pub fn phong(color: u32) -> Self {
        Self {
            shading: Shading::Phong,
            color,
            texture: None,
            transparent: false,
            opacity: 1.0,
        }
    }

    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }
}

/// Scene-graph node owned by an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub name: String,
    pub transform: Transform,
    pub geometry: Option<Geometry>,
    pub material: Option<Material>,
    pub children: Vec<Mesh>,
}

impl Mesh {
    /// Empty node without geometry; used as an entity root or a group.
    pub fn group() -> Self {
        Self::default()
    }

    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry: Some(geometry),
            material: Some(material),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn add(&mut self, child: Mesh) {
        self.children.push(child);
    }

    pub fn child(&self, name: &str) -> Option<&Mesh> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Set the orientation to `angle` radians about +Z.
    pub fn set_rotation_z(&mut self, angle: f32) {
        self.transform.rotation = Quat::from_rotation_z(angle);
    }

    /// World-space box around every geometry in this subtree, or `None` when
    /// the subtree has no geometry at all.
    pub fn world_bounds(&self) -> Option<Aabb> {
        let mut acc = None;
        self.collect_bounds(Mat4::IDENTITY, &mut acc);
        acc
    }

    fn collect_bounds(&self, parent: Mat4, acc: &mut Option<Aabb>) {
        let world = parent * self.transform.matrix();
        if let Some(geometry) = &self.geometry {
            for corner in geometry.local_bounds().corners() {
                let p = world.transform_point3(corner);
                match acc {
                    Some(bounds) => bounds.expand_to(p),
                    None => *acc = Some(Aabb::new(p, p)),
                }
            }
        }
        for child in &self.children {
            child.collect_bounds(world, acc);
        }
    }

    /// Drop this node's geometry and material. Returns how many were held.
    pub fn release(&mut self) -> usize {
        usize::from(self.geometry.take().is_some()) + usize::from(self.material.take().is_some())
    }

    /// Release every resource in the subtree and detach all children.
    pub fn release_tree(&mut self) -> usize {
        let mut released = self.release();
        for mut child in self.children.drain(..) {
            released += child.release_tree();
        }
        released
    }

    /// Geometries and materials still held by this subtree.
    pub fn resource_count(&self) -> usize {
        usize::from(self.geometry.is_some())
            + usize::from(self.material.is_some())
            + self.children.iter().map(Mesh::resource_count).sum::<usize>()
    }
}
