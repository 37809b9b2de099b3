//! Arena simulation core library.
//!
//! This module exposes the simulation's entities, resources, systems, and
//! events for use by the headless runner, integration tests, and hosts that
//! bring their own renderer.

pub mod autopilot;
pub mod components;
pub mod entities;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
