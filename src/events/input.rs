//! Input action events.
//!
//! This module defines [`InputEvent`], delivered to the simulation when a
//! gameplay-relevant action is pressed or released. The [`InputAction`] enum
//! lists all recognized actions. Physical keys are mapped to actions by the
//! host; the simulation never sees raw device input.

/// Enumeration of logical input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Rotate counter-clockwise (default: A / Left arrow).
    MoveLeft,
    /// Rotate clockwise (default: D / Right arrow).
    MoveRight,
    /// Drive forward along the heading (default: W / Up arrow).
    MoveUp,
    /// Drive backward (default: S / Down arrow).
    MoveDown,
    /// Shoot; triggers when the key is released (default: Space).
    Fire,
}

/// Event emitted when an input action is pressed or released.
///
/// The `action` field identifies which logical action occurred, and `pressed`
/// indicates whether it was a press (true) or release (false).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// The input action that triggered this event.
    pub action: InputAction,
    /// Whether the action was pressed (true) or released (false).
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(action: InputAction) -> Self {
        Self {
            action,
            pressed: true,
        }
    }

    pub fn release(action: InputAction) -> Self {
        Self {
            action,
            pressed: false,
        }
    }
}
