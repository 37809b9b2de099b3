//! Event types delivered to the simulation from outside.
//!
//! Submodules:
//! - [`input`] – press/release notifications for gameplay actions
pub mod input;
