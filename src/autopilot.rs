//! Scripted input for headless runs.
//!
//! The autopilot holds one movement action at a time for a random number
//! of frames, then releases it and picks the next one (possibly none). It
//! also taps fire at a fixed frame interval. Every press is eventually
//! matched by a release, so the player's keyboard state stays consistent.

use fastrand::Rng;

use crate::events::input::{InputAction, InputEvent};

const MOVES: [InputAction; 4] = [
    InputAction::MoveUp,
    InputAction::MoveDown,
    InputAction::MoveLeft,
    InputAction::MoveRight,
];
const MIN_HOLD_FRAMES: u32 = 10;
const MAX_HOLD_FRAMES: u32 = 90;
pub const DEFAULT_FIRE_INTERVAL: u64 = 45;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Rng,
    held: Option<InputAction>,
    hold_frames_left: u32,
    fire_interval: u64,
    frame: u64,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rng::with_seed(seed),
            held: None,
            hold_frames_left: 0,
            fire_interval: DEFAULT_FIRE_INTERVAL,
            frame: 0,
        }
    }

    /// Fire every `frames` frames; 0 never fires.
    pub fn with_fire_interval(mut self, frames: u64) -> Self {
        self.fire_interval = frames;
        self
    }

    /// Input events for the next frame, in delivery order.
    pub fn next_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        self.frame += 1;

        if self.hold_frames_left == 0 {
            if let Some(action) = self.held.take() {
                events.push(InputEvent::release(action));
            }
            // One extra slot stands for "no movement".
            let choice = self.rng.usize(..=MOVES.len());
            self.held = MOVES.get(choice).copied();
            if let Some(action) = self.held {
                events.push(InputEvent::press(action));
            }
            self.hold_frames_left = self.rng.u32(MIN_HOLD_FRAMES..MAX_HOLD_FRAMES);
        }
        self.hold_frames_left -= 1;

        if self.fire_interval > 0 && self.frame % self.fire_interval == 0 {
            events.push(InputEvent::press(InputAction::Fire));
            events.push(InputEvent::release(InputAction::Fire));
        }
        events
    }

    /// Release whatever is still held.
    pub fn finish(&mut self) -> Option<InputEvent> {
        self.held.take().map(InputEvent::release)
    }
}
