//! Paint Catch: paint falls from the top, catch it with the bucket

use super::Variant;
use crate::sim::entity::{EntityKind, Exit, Motion};
use crate::sim::rules::{EscapePenalty, GameRules, Interaction, Outcome, Reward};
use crate::sim::spawn::KindTable;
use crate::sim::state::EffectKind;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintKind {
    Paint,
    /// Burns a life when caught
    Acid,
    /// Double points for a while
    Rainbow,
    /// Widens the bucket
    Wide,
    /// Shields the next acid drop
    Star,
}

pub const PAINT_TABLE: KindTable<PaintKind> = KindTable::new(&[
    (PaintKind::Paint, 0.60),
    (PaintKind::Acid, 0.20),
    (PaintKind::Rainbow, 0.08),
    (PaintKind::Wide, 0.07),
    (PaintKind::Star, 0.05),
]);

impl EntityKind for PaintKind {
    fn radius(self) -> f32 {
        match self {
            PaintKind::Paint | PaintKind::Acid => 16.0,
            PaintKind::Rainbow | PaintKind::Wide | PaintKind::Star => 14.0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            PaintKind::Paint => "Paint",
            PaintKind::Acid => "Acid",
            PaintKind::Rainbow => "Rainbow",
            PaintKind::Wide => "Wide bucket",
            PaintKind::Star => "Star",
        }
    }

    fn color(self) -> u32 {
        match self {
            PaintKind::Paint => 0x2e86de,
            PaintKind::Acid => 0x7bed3f,
            PaintKind::Rainbow => 0xc56cf0,
            PaintKind::Wide => 0xff9f43,
            PaintKind::Star => 0xfeca57,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaintCatch {
    tuning: Tuning,
}

impl PaintCatch {
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Default for PaintCatch {
    fn default() -> Self {
        Self::with_tuning(Tuning::for_variant(Variant::PaintCatch))
    }
}

impl GameRules for PaintCatch {
    type Kind = PaintKind;

    fn variant(&self) -> Variant {
        Variant::PaintCatch
    }

    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn interaction(&self) -> Interaction {
        Interaction::Catch
    }

    fn motion(&self) -> Motion {
        Motion::Fall
    }

    fn kind_table(&self) -> Option<KindTable<PaintKind>> {
        Some(PAINT_TABLE)
    }

    fn reward(&self, kind: PaintKind) -> Reward {
        match kind {
            PaintKind::Paint => Reward::new(10, Outcome::Success),
            PaintKind::Acid => Reward::new(0, Outcome::Hazard),
            PaintKind::Rainbow => Reward::new(20, Outcome::Effect(EffectKind::DoublePoints)),
            PaintKind::Wide => Reward::new(10, Outcome::Effect(EffectKind::WideBucket)),
            PaintKind::Star => Reward::new(10, Outcome::Effect(EffectKind::Shield)),
        }
    }

    fn on_escape(&self, kind: PaintKind, exit: Exit) -> EscapePenalty {
        match (kind, exit) {
            (PaintKind::Paint, Exit::Bottom) => EscapePenalty::BreakStreak,
            _ => EscapePenalty::None,
        }
    }
}
