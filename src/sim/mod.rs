//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one `Pcg32` per session)
//! - Stable iteration order (by entity ID)
//! - Every timer advances inside `tick`
//! - No rendering or platform dependencies

pub mod challenge;
pub mod collision;
pub mod entity;
pub mod input;
pub mod layout;
pub mod rules;
pub mod spawn;
pub mod state;
pub mod tick;

pub use challenge::{Challenge, Operator, Source};
pub use collision::Rect;
pub use entity::{Entity, EntityId, EntityKind, EntityStore, Exit, Motion};
pub use input::{Intent, Target};
pub use rules::{ChallengeMode, EscapePenalty, GameRules, Interaction, NoEntity, Outcome, Reward};
pub use spawn::{KindTable, Spawner};
pub use state::{ActiveEffect, EffectKind, Feedback, GameEvent, GamePhase, Player, Session};
pub use tick::tick;
