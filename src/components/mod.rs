//! Data shared by every entity.
//!
//! Submodules overview:
//! - [`collider`] – bounding boxes and spheres used for collision tests
//! - [`mesh`] – scene-graph node with transform, geometry and material

pub mod collider;
pub mod mesh;
