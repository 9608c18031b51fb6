//! Session state and the phase machine
//!
//! One authoritative copy of every counter lives here. The renderer and HUD
//! read it between ticks; only the tick mutates it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::challenge::Challenge;
use super::collision::Rect;
use super::entity::{EntityKind, EntityStore};
use super::rules::{ChallengeMode, GameRules, Interaction};
use super::spawn::{Spawner, spawn_position};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, waiting for a Start intent
    Waiting,
    /// Active gameplay
    Playing,
    /// Timers and motion frozen
    Paused,
    /// Run ended
    GameOver,
}

/// Time-boxed modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Consecutive hits keep the streak alive while this runs
    ComboWindow,
    DoublePoints,
    /// Entities move at half speed
    SlowMotion,
    /// Bucket is 50% wider
    WideBucket,
    /// Absorbs the next hazard
    Shield,
}

impl EffectKind {
    pub fn label(self) -> &'static str {
        match self {
            EffectKind::ComboWindow => "Combo",
            EffectKind::DoublePoints => "x2",
            EffectKind::SlowMotion => "Slow-mo",
            EffectKind::WideBucket => "Wide",
            EffectKind::Shield => "Shield",
        }
    }
}

/// A running modifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining: f32,
}

/// Result of the last answer, shown until `remaining` runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    pub chosen: usize,
    pub remaining: f32,
}

/// Bucket (Paint Catch) or digger (Treasure Hunt)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Player {
    pub fn rect(&self, width_scale: f32) -> Rect {
        Rect::from_center(self.pos, Vec2::new(self.size.x * width_scale, self.size.y))
    }

    /// -1, 0 or 1 from the held keys
    pub fn heading(&self) -> f32 {
        match (self.moving_left, self.moving_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Notifications for the frontend (audio, best scores), drained every frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Correct { points: u64 },
    Wrong,
    Collected { label: &'static str, points: u64 },
    Hazard { label: &'static str },
    Shielded,
    LifeLost,
    ExtraLife,
    EffectStarted(EffectKind),
    EffectEnded(EffectKind),
    BonusTime { seconds: f32 },
    ChallengeOpened,
    TierUp(u32),
    GameOver { score: u64 },
}

/// A complete mini-game session
#[derive(Debug, Clone)]
pub struct Session<R: GameRules> {
    pub rules: R,
    /// Seed of the current run
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub streak: u32,
    pub max_streak: u32,
    pub time_remaining: f32,
    /// Seconds of play in the current run
    pub elapsed: f32,
    pub tier: u32,
    pub lives: Option<u8>,
    pub challenge: Option<Challenge>,
    /// Multiplier on the current challenge's points
    pub challenge_stake: u64,
    pub feedback: Option<Feedback>,
    pub entities: EntityStore<R::Kind>,
    pub spawner: Spawner,
    pub player: Option<Player>,
    pub effects: Vec<ActiveEffect>,
    pub events: Vec<GameEvent>,
}

impl<R: GameRules> Session<R> {
    /// New session on the start screen
    pub fn new(rules: R, seed: u64) -> Self {
        let mut session = Self {
            rules,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Waiting,
            score: 0,
            streak: 0,
            max_streak: 0,
            time_remaining: 0.0,
            elapsed: 0.0,
            tier: 1,
            lives: None,
            challenge: None,
            challenge_stake: 1,
            feedback: None,
            entities: EntityStore::new(),
            spawner: Spawner::new(),
            player: None,
            effects: Vec::new(),
            events: Vec::new(),
        };
        session.reset_fields();
        session
    }

    pub fn arena(&self) -> Vec2 {
        let t = self.rules.tuning();
        Vec2::new(t.arena_width, t.arena_height)
    }

    /// Every per-run field back to its initial value. Pending spawn,
    /// feedback and effect timers live in these fields, so they are
    /// cancelled here too.
    fn reset_fields(&mut self) {
        let tuning = self.rules.tuning();
        self.score = 0;
        self.streak = 0;
        self.max_streak = 0;
        self.time_remaining = tuning.duration_secs;
        self.elapsed = 0.0;
        self.tier = 1;
        self.lives = tuning.starting_lives;
        self.challenge = None;
        self.challenge_stake = 1;
        self.feedback = None;
        self.entities.clear();
        self.spawner.reset();
        self.effects.clear();
        self.player = match self.rules.interaction() {
            Interaction::Catch | Interaction::Dig => {
                let size = Vec2::new(tuning.player_width, tuning.player_height);
                Some(Player {
                    pos: Vec2::new(
                        tuning.arena_width * 0.5,
                        tuning.arena_height - size.y * 0.5 - 12.0,
                    ),
                    size,
                    moving_left: false,
                    moving_right: false,
                })
            }
            Interaction::Choices | Interaction::Tap => None,
        };
    }

    /// Fresh run straight into Playing. Start and Restart share this path.
    pub(crate) fn begin(&mut self) {
        self.reset_fields();
        self.phase = GamePhase::Playing;

        for _ in 0..self.rules.tuning().opening_burst {
            self.spawn_entity();
        }
        if self.rules.challenge_mode() == ChallengeMode::Continuous {
            self.open_challenge(1);
        }

        self.events.push(GameEvent::Started);
        log::info!(
            "{} started (seed {})",
            self.rules.variant().name(),
            self.seed
        );
    }

    /// New seed drawn from the current run, then `begin`
    pub(crate) fn restart(&mut self) {
        self.seed = self.rng.random();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.begin();
    }

    /// Back to the start screen with a fresh run
    pub(crate) fn reset_to_waiting(&mut self) {
        self.reset_fields();
        self.phase = GamePhase::Waiting;
        log::info!("{} reset", self.rules.variant().name());
    }

    /// Transition to GameOver (once)
    pub(crate) fn end(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!(
            "{} over: score {} (best streak {}, tier {})",
            self.rules.variant().name(),
            self.score,
            self.max_streak,
            self.tier
        );
    }

    /// Replace the current challenge with a fresh one
    pub(crate) fn open_challenge(&mut self, stake: u64) {
        let challenge = self.rules.generate_challenge(self.tier, &mut self.rng);
        log::debug!("Challenge: {}", challenge.prompt);
        self.challenge = Some(challenge);
        self.challenge_stake = stake.max(1);
    }

    /// A challenge is on screen and accepting answers
    pub fn awaiting_answer(&self) -> bool {
        self.challenge.is_some() && self.feedback.is_none()
    }

    /// Spawn one entity from the variant's table, honoring the live cap
    pub(crate) fn spawn_entity(&mut self) {
        let Some(table) = self.rules.kind_table() else {
            return;
        };
        let tuning = self.rules.tuning();
        if self.entities.len() >= tuning.max_entities {
            return;
        }

        let kind = table.sample(&mut self.rng);
        let arena = Vec2::new(tuning.arena_width, tuning.arena_height);
        let pos = spawn_position(&mut self.rng, self.rules.motion(), kind.radius(), arena);
        let (lo, hi) = (
            tuning.speed_min.min(tuning.speed_max),
            tuning.speed_min.max(tuning.speed_max),
        );
        let speed =
            self.rng.random_range(lo..=hi) * tuning.speed_scale(self.tier) * kind.speed_factor();
        let ttl = tuning.entity_ttl_secs;

        let id = self.entities.spawn(kind, pos, speed, ttl);
        log::debug!("Spawned {:?} #{} at {:?}", kind, id, pos);
    }

    pub fn effect_active(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Start an effect, or extend it to `secs` if already running
    pub(crate) fn grant_effect(&mut self, kind: EffectKind, secs: f32) {
        if let Some(e) = self.effects.iter_mut().find(|e| e.kind == kind) {
            e.remaining = e.remaining.max(secs);
            return;
        }
        self.effects.push(ActiveEffect {
            kind,
            remaining: secs,
        });
        if kind != EffectKind::ComboWindow {
            self.events.push(GameEvent::EffectStarted(kind));
        }
    }

    /// Remove an effect early; true if it was running
    pub(crate) fn consume_effect(&mut self, kind: EffectKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    /// Points multiplier from running effects
    pub fn points_multiplier(&self) -> u64 {
        if self.effect_active(EffectKind::DoublePoints) {
            2
        } else {
            1
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);
    }

    pub(crate) fn break_streak(&mut self) {
        self.streak = 0;
    }

    pub(crate) fn lose_life(&mut self) {
        if let Some(lives) = self.lives.as_mut() {
            *lives = lives.saturating_sub(1);
            self.events.push(GameEvent::LifeLost);
        }
    }

    pub(crate) fn gain_life(&mut self) {
        let max = self.rules.tuning().max_lives;
        if let Some(lives) = self.lives.as_mut() {
            *lives = lives.saturating_add(1).min(max);
            self.events.push(GameEvent::ExtraLife);
        }
    }

    /// Take this frame's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
