//! The four mini-games
//!
//! Each module holds one `GameRules` implementation: its entity kinds, spawn
//! table, rewards and escape rules. Everything else is shared.

mod balloon_pop;
mod math_quiz;
mod paint_catch;
mod treasure_hunt;

use serde::{Deserialize, Serialize};

pub use balloon_pop::{BALLOON_TABLE, BalloonKind, BalloonPop};
pub use math_quiz::MathQuiz;
pub use paint_catch::{PAINT_TABLE, PaintCatch, PaintKind};
pub use treasure_hunt::{TREASURE_TABLE, TreasureHunt, TreasureKind};

/// Game variant selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    MathQuiz,
    BalloonPop,
    PaintCatch,
    TreasureHunt,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::MathQuiz,
        Variant::BalloonPop,
        Variant::PaintCatch,
        Variant::TreasureHunt,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Variant::MathQuiz => "Math Quiz",
            Variant::BalloonPop => "Balloon Pop",
            Variant::PaintCatch => "Paint Catch",
            Variant::TreasureHunt => "Treasure Hunt",
        }
    }

    /// URL/storage key form
    pub fn slug(self) -> &'static str {
        match self {
            Variant::MathQuiz => "math-quiz",
            Variant::BalloonPop => "balloon-pop",
            Variant::PaintCatch => "paint-catch",
            Variant::TreasureHunt => "treasure-hunt",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.slug() == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lookup() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_slug(variant.slug()), Some(variant));
        }
        assert_eq!(Variant::from_slug("pong"), None);
    }
}
