//! Player intents delivered to the tick
//!
//! The browser glue turns mouse, touch and keyboard events into these; the
//! simulation never sees raw events.

use glam::Vec2;

/// What a selection points at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Answer button by index (number keys)
    Choice(usize),
    /// Canvas-local pixel position (click/tap)
    Point(Vec2),
}

/// A discrete player intent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Leave the start screen
    Start,
    /// Play again after game over
    Restart,
    Pause,
    Resume,
    /// Abandon a paused session and return to the start screen
    Reset,
    /// Held-key state for horizontal movement
    MoveLeft(bool),
    MoveRight(bool),
    Select(Target),
    /// Act at the player's position (dig)
    Fire,
}
