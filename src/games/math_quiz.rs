//! Math Quiz: a continuous stream of arithmetic problems

use rand_pcg::Pcg32;

use super::Variant;
use crate::sim::challenge::{self, Challenge};
use crate::sim::rules::{ChallengeMode, GameRules, Interaction, NoEntity, Reward};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct MathQuiz {
    tuning: Tuning,
}

impl MathQuiz {
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Default for MathQuiz {
    fn default() -> Self {
        Self::with_tuning(Tuning::for_variant(Variant::MathQuiz))
    }
}

impl GameRules for MathQuiz {
    type Kind = NoEntity;

    fn variant(&self) -> Variant {
        Variant::MathQuiz
    }

    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn interaction(&self) -> Interaction {
        Interaction::Choices
    }

    fn challenge_mode(&self) -> ChallengeMode {
        ChallengeMode::Continuous
    }

    fn generate_challenge(&self, tier: u32, rng: &mut Pcg32) -> Challenge {
        challenge::arithmetic(tier, rng)
    }

    fn reward(&self, kind: NoEntity) -> Reward {
        match kind {}
    }
}
