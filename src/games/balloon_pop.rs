//! Balloon Pop: balloons rise from the bottom, tap to pop them

use super::Variant;
use crate::sim::entity::{EntityKind, Exit, Motion};
use crate::sim::rules::{EscapePenalty, GameRules, Interaction, Outcome, Reward};
use crate::sim::spawn::KindTable;
use crate::sim::state::EffectKind;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalloonKind {
    Normal,
    /// Costs a life when popped
    Bomb,
    Golden,
    /// Fast riser; popping it slows everything down
    Speed,
    Life,
}

pub const BALLOON_TABLE: KindTable<BalloonKind> = KindTable::new(&[
    (BalloonKind::Normal, 0.55),
    (BalloonKind::Bomb, 0.20),
    (BalloonKind::Golden, 0.10),
    (BalloonKind::Speed, 0.10),
    (BalloonKind::Life, 0.05),
]);

impl EntityKind for BalloonKind {
    fn radius(self) -> f32 {
        match self {
            BalloonKind::Normal | BalloonKind::Bomb => 30.0,
            BalloonKind::Golden => 26.0,
            BalloonKind::Speed => 22.0,
            BalloonKind::Life => 24.0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            BalloonKind::Normal => "Balloon",
            BalloonKind::Bomb => "Bomb",
            BalloonKind::Golden => "Golden",
            BalloonKind::Speed => "Speedy",
            BalloonKind::Life => "Heart",
        }
    }

    fn color(self) -> u32 {
        match self {
            BalloonKind::Normal => 0xe74c3c,
            BalloonKind::Bomb => 0x2c2c2c,
            BalloonKind::Golden => 0xf1c40f,
            BalloonKind::Speed => 0x3498db,
            BalloonKind::Life => 0xff69b4,
        }
    }

    fn speed_factor(self) -> f32 {
        match self {
            BalloonKind::Speed => 1.8,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BalloonPop {
    tuning: Tuning,
}

impl BalloonPop {
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Default for BalloonPop {
    fn default() -> Self {
        Self::with_tuning(Tuning::for_variant(Variant::BalloonPop))
    }
}

impl GameRules for BalloonPop {
    type Kind = BalloonKind;

    fn variant(&self) -> Variant {
        Variant::BalloonPop
    }

    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn interaction(&self) -> Interaction {
        Interaction::Tap
    }

    fn motion(&self) -> Motion {
        Motion::Rise
    }

    fn kind_table(&self) -> Option<KindTable<BalloonKind>> {
        Some(BALLOON_TABLE)
    }

    fn reward(&self, kind: BalloonKind) -> Reward {
        match kind {
            BalloonKind::Normal => Reward::new(10, Outcome::Success),
            BalloonKind::Bomb => Reward::new(0, Outcome::Hazard),
            BalloonKind::Golden => Reward::new(50, Outcome::Success),
            BalloonKind::Speed => Reward::new(20, Outcome::Effect(EffectKind::SlowMotion)),
            BalloonKind::Life => Reward::new(10, Outcome::ExtraLife),
        }
    }

    fn on_escape(&self, kind: BalloonKind, exit: Exit) -> EscapePenalty {
        match (kind, exit) {
            (BalloonKind::Normal, Exit::Top) => EscapePenalty::LoseLife,
            _ => EscapePenalty::None,
        }
    }

    fn uses_combo_window(&self) -> bool {
        true
    }
}
