//! Frame systems.
//!
//! This module groups the ECS systems the frame schedule runs, in order.
//!
//! Submodules overview
//! - [`sweep`] – remove and dispose entities flagged for disposal
//! - [`spawn`] – admit entities spawned since the previous frame
//! - [`time`] – measure the frame delta and update simulation time
//! - [`update`] – update every live entity
//! - [`render`] – hand the live meshes to the presenter

pub mod render;
pub mod spawn;
pub mod sweep;
pub mod time;
pub mod update;
