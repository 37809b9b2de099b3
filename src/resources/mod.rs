//! Resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: the entity registry, timing, the
//! camera, and the collaborators at the edge of the simulation. Each
//! submodule documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `assetstore` – textures and models handed to entities while they load
//! - `camera` – perspective camera the player keeps centered on itself
//! - `frameclock` – wall-clock or fixed source of frame deltas
//! - `gameconfig` – INI-backed settings
//! - `presenter` – boundary to the rendering layer (non-send)
//! - `registry` – owner of every live and pending entity
//! - `worldtime` – simulation time and delta
pub mod assetstore;
pub mod camera;
pub mod frameclock;
pub mod gameconfig;
pub mod presenter;
pub mod registry;
pub mod worldtime;
