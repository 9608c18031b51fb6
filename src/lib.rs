//! Mini Arcade - a family of casual browser mini-games on one game loop
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session state machine, content generation, hit tests)
//! - `games`: Per-variant rules (math quiz, balloon pop, paint catch, treasure hunt)
//! - `renderer`: Pure state -> draw command translation, Canvas 2D playback
//! - `tuning`: Data-driven game balance
//! - `highscores` / `settings`: LocalStorage-backed player data (via `platform`)
//! - `audio`: Procedural Web Audio sound effects keyed off game events

pub mod audio;
pub mod games;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use games::{BalloonPop, MathQuiz, PaintCatch, TreasureHunt, Variant};
pub use highscores::BestScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the frontend loop (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default arena (canvas-local pixel space)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Number of answer choices on every challenge
    pub const CHOICE_COUNT: usize = 4;
    /// Capacity of the best-scores list
    pub const MAX_BEST_SCORES: usize = 5;
}
