//! Data-driven game balance
//!
//! Every number a variant's rules consult lives here so a balance pass never
//! touches simulation code. Tunings deserialize from JSON with per-field
//! defaults, so a partial override file is valid.

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::games::Variant;

/// Balance parameters for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Arena size in canvas-local pixels
    pub arena_width: f32,
    pub arena_height: f32,

    /// Session length
    pub duration_secs: f32,
    /// Lives at session start (`None` = variant has no lives)
    pub starting_lives: Option<u8>,
    /// Upper bound for extra-life pickups
    pub max_lives: u8,

    /// Points per success before tier/effect multipliers
    pub base_points: u64,
    /// Ascending score thresholds; tier = 1 + number of thresholds reached
    pub tier_thresholds: Vec<u64>,
    /// How long answer feedback stays up before the next challenge
    pub feedback_delay_secs: f32,

    /// Seconds between spawns at tier 1
    pub spawn_interval_secs: f32,
    /// Interval divisor growth per tier (0.2 = 20% faster per tier)
    pub spawn_rate_per_tier: f32,
    /// Safety cap on spawns in a single tick after a long frame
    pub max_spawns_per_tick: u32,
    /// Entities spawned at once when a session starts
    pub opening_burst: usize,
    /// Live entity cap
    pub max_entities: usize,
    /// Entity speed range (pixels/s) at tier 1
    pub speed_min: f32,
    pub speed_max: f32,
    /// Speed multiplier growth per tier
    pub speed_per_tier: f32,
    /// Lifetime of static entities (`None` = live until they leave the arena)
    pub entity_ttl_secs: Option<f32>,

    /// Player (bucket/digger) movement and size
    pub player_speed: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Dig reach around the player's center
    pub dig_reach: f32,

    /// Window in which consecutive hits keep a combo alive
    pub combo_window_secs: f32,
    /// Duration of pickup effects (double points, slow motion, ...)
    pub effect_secs: f32,
    /// Seconds added by a bonus-time pickup
    pub bonus_time_secs: f32,
    /// Score deducted by a hazard (saturating)
    pub hazard_penalty: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            duration_secs: 60.0,
            starting_lives: None,
            max_lives: 5,
            base_points: 10,
            tier_thresholds: vec![50, 150, 300],
            feedback_delay_secs: 0.8,
            spawn_interval_secs: 1.0,
            spawn_rate_per_tier: 0.2,
            max_spawns_per_tick: 4,
            opening_burst: 0,
            max_entities: 48,
            speed_min: 80.0,
            speed_max: 140.0,
            speed_per_tier: 0.15,
            entity_ttl_secs: None,
            player_speed: 400.0,
            player_width: 110.0,
            player_height: 24.0,
            dig_reach: 48.0,
            combo_window_secs: 1.5,
            effect_secs: 5.0,
            bonus_time_secs: 10.0,
            hazard_penalty: 0,
        }
    }
}

impl Tuning {
    /// Shipping balance for a variant
    pub fn for_variant(variant: Variant) -> Self {
        let base = Self::default();
        match variant {
            Variant::MathQuiz => Self {
                tier_thresholds: vec![50, 150, 300],
                ..base
            },
            Variant::BalloonPop => Self {
                starting_lives: Some(3),
                tier_thresholds: vec![100, 300, 600],
                spawn_interval_secs: 0.8,
                speed_min: 80.0,
                speed_max: 140.0,
                hazard_penalty: 20,
                ..base
            },
            Variant::PaintCatch => Self {
                starting_lives: Some(3),
                tier_thresholds: vec![100, 300, 600],
                spawn_interval_secs: 1.0,
                speed_min: 120.0,
                speed_max: 180.0,
                player_speed: 420.0,
                player_width: 110.0,
                ..base
            },
            Variant::TreasureHunt => Self {
                duration_secs: 90.0,
                starting_lives: Some(3),
                tier_thresholds: vec![60, 180, 360],
                spawn_interval_secs: 3.0,
                spawn_rate_per_tier: 0.1,
                opening_burst: 5,
                max_entities: 10,
                speed_min: 0.0,
                speed_max: 0.0,
                speed_per_tier: 0.0,
                entity_ttl_secs: Some(8.0),
                player_speed: 260.0,
                player_width: 40.0,
                player_height: 48.0,
                ..base
            },
        }
    }

    /// Parse a (possibly partial) tuning override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Overlay the fields present in a JSON object onto this tuning.
    /// Fields the override omits keep their current value.
    pub fn merged_with(&self, json: &str) -> Result<Self, serde_json::Error> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(overrides) = parsed else {
            return Err(serde::de::Error::custom("tuning override must be a JSON object"));
        };
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut value {
            fields.extend(overrides);
        }
        serde_json::from_value(value)
    }

    /// Shipping balance with an optional JSON override applied on top.
    /// A malformed override is logged and ignored.
    pub fn for_variant_with_override(variant: Variant, json: Option<&str>) -> Self {
        let shipped = Self::for_variant(variant);
        let Some(json) = json else {
            return shipped;
        };
        match shipped.merged_with(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring malformed tuning for {}: {}", variant.name(), e);
                shipped
            }
        }
    }

    /// Difficulty tier implied by a score (1-based)
    pub fn tier_for_score(&self, score: u64) -> u32 {
        1 + self.tier_thresholds.iter().filter(|&&t| score >= t).count() as u32
    }

    /// Spawn interval at a tier (shrinks as tier rises)
    pub fn spawn_interval(&self, tier: u32) -> f32 {
        let steps = tier.saturating_sub(1) as f32;
        self.spawn_interval_secs / (1.0 + self.spawn_rate_per_tier * steps)
    }

    /// Entity speed multiplier at a tier
    pub fn speed_scale(&self, tier: u32) -> f32 {
        1.0 + self.speed_per_tier * tier.saturating_sub(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_for_score() {
        let tuning = Tuning::for_variant(Variant::MathQuiz);
        assert_eq!(tuning.tier_for_score(0), 1);
        assert_eq!(tuning.tier_for_score(49), 1);
        assert_eq!(tuning.tier_for_score(50), 2);
        assert_eq!(tuning.tier_for_score(299), 3);
        assert_eq!(tuning.tier_for_score(10_000), 4);
    }

    #[test]
    fn test_spawn_interval_shrinks_with_tier() {
        let tuning = Tuning::for_variant(Variant::BalloonPop);
        assert!((tuning.spawn_interval(1) - 0.8).abs() < 1e-6);
        assert!(tuning.spawn_interval(2) < tuning.spawn_interval(1));
        assert!(tuning.spawn_interval(4) < tuning.spawn_interval(3));
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "duration_secs": 30.0, "starting_lives": 1 }"#)
            .expect("valid json");
        assert_eq!(tuning.duration_secs, 30.0);
        assert_eq!(tuning.starting_lives, Some(1));
        assert_eq!(tuning.base_points, Tuning::default().base_points);
    }

    #[test]
    fn test_override_keeps_variant_balance() {
        let tuning =
            Tuning::for_variant_with_override(Variant::BalloonPop, Some(r#"{"duration_secs":30.0}"#));
        assert_eq!(tuning.duration_secs, 30.0);
        assert_eq!(tuning.starting_lives, Some(3));
        assert_eq!(tuning.tier_thresholds, vec![100, 300, 600]);
        assert_eq!(tuning.hazard_penalty, 20);
        assert!((tuning.spawn_interval_secs - 0.8).abs() < 1e-6);

        // An explicit null still clears an optional field
        let tuning =
            Tuning::for_variant_with_override(Variant::TreasureHunt, Some(r#"{"entity_ttl_secs":null}"#));
        assert_eq!(tuning.entity_ttl_secs, None);
        assert_eq!(tuning.opening_burst, 5);
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let tuning = Tuning::for_variant_with_override(Variant::PaintCatch, Some("{ nope"));
        assert_eq!(tuning, Tuning::for_variant(Variant::PaintCatch));
        let tuning = Tuning::for_variant_with_override(Variant::PaintCatch, Some("[1, 2]"));
        assert_eq!(tuning, Tuning::for_variant(Variant::PaintCatch));
        let tuning =
            Tuning::for_variant_with_override(Variant::PaintCatch, Some(r#"{"max_lives":"lots"}"#));
        assert_eq!(tuning, Tuning::for_variant(Variant::PaintCatch));
    }
}
