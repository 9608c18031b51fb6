//! Treasure Hunt: walk the digger over buried treasure and dig it up.
//! Chests only open for a correct quiz answer.

use rand_pcg::Pcg32;

use super::Variant;
use crate::sim::challenge::{self, Challenge};
use crate::sim::entity::{EntityKind, Motion};
use crate::sim::rules::{ChallengeMode, GameRules, Interaction, Outcome, Reward};
use crate::sim::spawn::KindTable;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreasureKind {
    Chest,
    Trap,
    /// Chest whose quiz pays triple
    GoldChest,
    Clock,
    Gem,
}

pub const TREASURE_TABLE: KindTable<TreasureKind> = KindTable::new(&[
    (TreasureKind::Chest, 0.45),
    (TreasureKind::Trap, 0.20),
    (TreasureKind::GoldChest, 0.10),
    (TreasureKind::Clock, 0.10),
    (TreasureKind::Gem, 0.15),
]);

impl EntityKind for TreasureKind {
    fn radius(self) -> f32 {
        match self {
            TreasureKind::Chest | TreasureKind::GoldChest => 28.0,
            TreasureKind::Trap => 24.0,
            TreasureKind::Clock | TreasureKind::Gem => 20.0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TreasureKind::Chest => "Chest",
            TreasureKind::Trap => "Trap",
            TreasureKind::GoldChest => "Gold chest",
            TreasureKind::Clock => "Clock",
            TreasureKind::Gem => "Gem",
        }
    }

    fn color(self) -> u32 {
        match self {
            TreasureKind::Chest => 0x8b5a2b,
            TreasureKind::Trap => 0x7f8c8d,
            TreasureKind::GoldChest => 0xffd700,
            TreasureKind::Clock => 0x74b9ff,
            TreasureKind::Gem => 0x1abc9c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreasureHunt {
    tuning: Tuning,
}

impl TreasureHunt {
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Default for TreasureHunt {
    fn default() -> Self {
        Self::with_tuning(Tuning::for_variant(Variant::TreasureHunt))
    }
}

impl GameRules for TreasureHunt {
    type Kind = TreasureKind;

    fn variant(&self) -> Variant {
        Variant::TreasureHunt
    }

    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn interaction(&self) -> Interaction {
        Interaction::Dig
    }

    fn motion(&self) -> Motion {
        Motion::Static
    }

    fn challenge_mode(&self) -> ChallengeMode {
        ChallengeMode::OnTrigger
    }

    fn generate_challenge(&self, tier: u32, rng: &mut Pcg32) -> Challenge {
        challenge::quiz(tier, rng)
    }

    fn kind_table(&self) -> Option<KindTable<TreasureKind>> {
        Some(TREASURE_TABLE)
    }

    fn reward(&self, kind: TreasureKind) -> Reward {
        match kind {
            TreasureKind::Chest => Reward::new(0, Outcome::OpenChallenge { stake: 1 }),
            TreasureKind::GoldChest => Reward::new(0, Outcome::OpenChallenge { stake: 3 }),
            TreasureKind::Trap => Reward::new(0, Outcome::Hazard),
            TreasureKind::Clock => Reward::new(5, Outcome::BonusTime),
            TreasureKind::Gem => Reward::new(40, Outcome::Success),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::{GamePhase, Intent, Session, Target, tick};

    fn started() -> Session<TreasureHunt> {
        let mut session = Session::new(TreasureHunt::default(), 77);
        tick(&mut session, &[Intent::Start], 0.0);
        session
    }

    #[test]
    fn test_opening_burst() {
        let session = started();
        assert_eq!(session.entities.len(), 5);
        assert!(session.challenge.is_none());
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_treasure_expires() {
        let mut session = started();
        let ids: Vec<_> = session.entities.iter().map(|e| e.id).collect();
        tick(&mut session, &[], 8.5);
        for id in ids {
            assert!(session.entities.get(id).is_none());
        }
    }

    #[test]
    fn test_gold_chest_pays_triple() {
        let mut session = started();
        session.entities.clear();
        let pos = Vec2::new(200.0, 400.0);
        session.entities.spawn(TreasureKind::GoldChest, pos, 0.0, Some(8.0));

        // Tapping a treasure digs it too
        tick(&mut session, &[Intent::Select(Target::Point(pos))], 0.0);
        assert!(session.awaiting_answer());
        assert_eq!(session.challenge_stake, 3);

        let index = session.challenge.as_ref().map(|c| c.correct_index()).unwrap_or(0);
        tick(&mut session, &[Intent::Select(Target::Choice(index))], 0.0);
        assert_eq!(session.score, 30);
    }

    #[test]
    fn test_clock_adds_time() {
        let mut session = started();
        session.entities.clear();
        let pos = Vec2::new(300.0, 400.0);
        session.entities.spawn(TreasureKind::Clock, pos, 0.0, Some(8.0));
        tick(&mut session, &[Intent::Select(Target::Point(pos))], 0.0);
        assert_eq!(session.time_remaining, 100.0);
        assert_eq!(session.score, 5);
    }

    #[test]
    fn test_dig_out_of_reach_does_nothing() {
        let mut session = started();
        session.entities.clear();
        session
            .entities
            .spawn(TreasureKind::Gem, Vec2::new(700.0, 400.0), 0.0, Some(8.0));
        tick(&mut session, &[Intent::Fire], 0.0);
        assert_eq!(session.entities.len(), 1);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_world_frozen_while_quiz_open() {
        let mut session = started();
        let x = session.player.map(|p| p.pos.x).unwrap_or_default();
        session.entities.clear();
        session
            .entities
            .spawn(TreasureKind::Chest, Vec2::new(x, 400.0), 0.0, Some(8.0));
        let other = session
            .entities
            .spawn(TreasureKind::Gem, Vec2::new(100.0, 400.0), 0.0, Some(1.0));
        tick(&mut session, &[Intent::Fire], 0.0);
        assert!(session.awaiting_answer());

        tick(&mut session, &[], 2.0);
        assert!(session.entities.get(other).is_some());
    }
}
