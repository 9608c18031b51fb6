//! The per-variant rule set
//!
//! The session and tick are written once against `GameRules`; each mini-game
//! supplies its entity kinds, spawn table, rewards and challenge source.

use rand_pcg::Pcg32;

use super::challenge::{self, Challenge};
use super::entity::{EntityKind, Exit, Motion};
use super::spawn::KindTable;
use super::state::EffectKind;
use crate::games::Variant;
use crate::tuning::Tuning;

/// How the player acts on the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Only answer buttons are selectable
    Choices,
    /// Taps hit entities directly
    Tap,
    /// A moving bucket catches whatever it touches
    Catch,
    /// A moving digger opens the nearest entity on Fire (taps work too)
    Dig,
}

/// When challenges appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeMode {
    /// Always one on screen; a new one follows every answer
    Continuous,
    /// Only when an entity opens one; cleared after the answer
    OnTrigger,
    /// This variant has no challenges
    Never,
}

/// Effect of collecting an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Plain points
    Success,
    /// Costs a life (unless shielded) and breaks the streak
    Hazard,
    ExtraLife,
    Effect(EffectKind),
    BonusTime,
    /// Opens a challenge whose answer is worth `stake` times the usual points
    OpenChallenge { stake: u64 },
}

/// What collecting an entity is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    /// Base points, scaled by tier and effects
    pub points: u64,
    pub outcome: Outcome,
}

impl Reward {
    pub const fn new(points: u64, outcome: Outcome) -> Self {
        Self { points, outcome }
    }
}

/// What happens when an entity leaves without being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapePenalty {
    None,
    BreakStreak,
    LoseLife,
}

/// Entity kind for variants without entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoEntity {}

impl EntityKind for NoEntity {
    fn radius(self) -> f32 {
        match self {}
    }

    fn label(self) -> &'static str {
        match self {}
    }

    fn color(self) -> u32 {
        match self {}
    }
}

/// Capabilities a mini-game provides to the shared loop
pub trait GameRules {
    type Kind: EntityKind;

    fn variant(&self) -> Variant;

    fn tuning(&self) -> &Tuning;

    fn interaction(&self) -> Interaction;

    fn motion(&self) -> Motion {
        Motion::Static
    }

    fn challenge_mode(&self) -> ChallengeMode {
        ChallengeMode::Never
    }

    fn generate_challenge(&self, tier: u32, rng: &mut Pcg32) -> Challenge {
        challenge::arithmetic(tier, rng)
    }

    /// Spawn table (`None` disables spawning)
    fn kind_table(&self) -> Option<KindTable<Self::Kind>> {
        None
    }

    fn reward(&self, kind: Self::Kind) -> Reward;

    fn on_escape(&self, _kind: Self::Kind, _exit: Exit) -> EscapePenalty {
        EscapePenalty::None
    }

    /// Whether successes open a combo window whose expiry resets the streak
    fn uses_combo_window(&self) -> bool {
        false
    }

    /// Points for a correct answer
    fn answer_points(&self, tier: u32) -> u64 {
        self.tuning().base_points * tier as u64
    }
}
