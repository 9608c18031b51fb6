//! Per-frame update step
//!
//! Core game loop shared by every variant. All timed behavior (spawning,
//! answer feedback, effects) advances here, so nothing mutates the session
//! between ticks.

use super::entity::{EntityId, EntityKind};
use super::input::{Intent, Target};
use super::layout;
use super::rules::{ChallengeMode, EscapePenalty, GameRules, Interaction, Outcome};
use super::state::{EffectKind, Feedback, GameEvent, GamePhase, Session};

/// Entity speed factor while slow motion runs
const SLOW_MOTION_SCALE: f32 = 0.5;
/// Bucket width factor while the wide-bucket effect runs
const WIDE_BUCKET_SCALE: f32 = 1.5;

/// Advance a session by `dt` seconds after applying this frame's intents
pub fn tick<R: GameRules>(session: &mut Session<R>, intents: &[Intent], dt: f32) {
    for &intent in intents {
        apply_phase_intent(session, intent);
    }

    if session.phase != GamePhase::Playing {
        return;
    }

    let dt = dt.max(0.0);
    session.elapsed += dt;
    session.time_remaining -= dt;
    if session.time_remaining <= 0.0 {
        session.time_remaining = 0.0;
        session.end();
        return;
    }

    for &intent in intents {
        match intent {
            Intent::MoveLeft(held) => {
                if let Some(player) = session.player.as_mut() {
                    player.moving_left = held;
                }
            }
            Intent::MoveRight(held) => {
                if let Some(player) = session.player.as_mut() {
                    player.moving_right = held;
                }
            }
            Intent::Select(target) => select(session, target),
            Intent::Fire => dig(session),
            _ => {}
        }
    }

    move_player(session, dt);
    update_feedback(session, dt);
    spawn_entities(session, dt);
    advance_entities(session, dt);
    if session.rules.interaction() == Interaction::Catch {
        catch_entities(session);
    }
    session.entities.cleanup();
    decay_effects(session, dt);
    update_tier(session);

    if session.lives == Some(0) {
        session.end();
    }
}

/// Phase transitions; anything invalid for the current phase is ignored
fn apply_phase_intent<R: GameRules>(session: &mut Session<R>, intent: Intent) {
    match (session.phase, intent) {
        (GamePhase::Waiting, Intent::Start) => session.begin(),
        (GamePhase::GameOver, Intent::Restart) => session.restart(),
        (GamePhase::Playing, Intent::Pause) => {
            session.phase = GamePhase::Paused;
            session.events.push(GameEvent::Paused);
        }
        (GamePhase::Paused, Intent::Resume) => {
            session.phase = GamePhase::Playing;
            session.events.push(GameEvent::Resumed);
        }
        (GamePhase::Paused, Intent::Reset) => session.reset_to_waiting(),
        _ => {}
    }
}

/// A select goes to the answer buttons while a challenge is up, otherwise to
/// entities under the point
fn select<R: GameRules>(session: &mut Session<R>, target: Target) {
    if session.challenge.is_some() {
        if !session.awaiting_answer() {
            return;
        }
        let index = match target {
            Target::Choice(i) => Some(i),
            Target::Point(p) => layout::choice_at(p, session.arena()),
        };
        if let Some(index) = index {
            answer(session, index);
        }
        return;
    }

    let Target::Point(point) = target else {
        return;
    };
    if !matches!(
        session.rules.interaction(),
        Interaction::Tap | Interaction::Dig
    ) {
        return;
    }
    for id in session.entities.hits(point) {
        collect(session, id);
    }
}

/// Dig at the player's position: opens the nearest entity within reach
fn dig<R: GameRules>(session: &mut Session<R>) {
    if session.rules.interaction() != Interaction::Dig || session.challenge.is_some() {
        return;
    }
    let Some(player) = session.player else {
        return;
    };
    let reach = session.rules.tuning().dig_reach;
    if let Some(id) = session.entities.nearest_in_column(player.pos.x, reach) {
        collect(session, id);
    }
}

fn answer<R: GameRules>(session: &mut Session<R>, index: usize) {
    let Some(challenge) = session.challenge.as_ref() else {
        return;
    };
    if index >= challenge.choices.len() {
        return;
    }

    let correct = challenge.is_correct(index);
    if correct {
        let points = session.rules.answer_points(session.tier)
            * session.challenge_stake
            * session.points_multiplier();
        session.score += points;
        session.record_success();
        session.events.push(GameEvent::Correct { points });
    } else {
        session.break_streak();
        session.events.push(GameEvent::Wrong);
    }

    session.feedback = Some(Feedback {
        correct,
        chosen: index,
        remaining: session.rules.tuning().feedback_delay_secs,
    });
}

/// Count down answer feedback, then move on to the next challenge
fn update_feedback<R: GameRules>(session: &mut Session<R>, dt: f32) {
    let Some(feedback) = session.feedback.as_mut() else {
        return;
    };
    feedback.remaining -= dt;
    if feedback.remaining > 0.0 {
        return;
    }

    session.feedback = None;
    match session.rules.challenge_mode() {
        ChallengeMode::Continuous => session.open_challenge(1),
        ChallengeMode::OnTrigger | ChallengeMode::Never => {
            session.challenge = None;
            session.challenge_stake = 1;
        }
    }
}

fn move_player<R: GameRules>(session: &mut Session<R>, dt: f32) {
    let tuning = session.rules.tuning();
    let (speed, arena_width) = (tuning.player_speed, tuning.arena_width);
    let width_scale = if session.effect_active(EffectKind::WideBucket) {
        WIDE_BUCKET_SCALE
    } else {
        1.0
    };
    let Some(player) = session.player.as_mut() else {
        return;
    };

    let half = (player.size.x * width_scale * 0.5).min(arena_width * 0.5);
    player.pos.x = (player.pos.x + player.heading() * speed * dt).clamp(half, arena_width - half);
}

fn spawn_entities<R: GameRules>(session: &mut Session<R>, dt: f32) {
    // Treasure sits still while its quiz is open
    if session.challenge.is_some() && session.rules.challenge_mode() == ChallengeMode::OnTrigger {
        return;
    }
    let tuning = session.rules.tuning();
    let interval = tuning.spawn_interval(session.tier);
    let max_per_tick = tuning.max_spawns_per_tick;
    let due = session.spawner.advance(dt, interval, max_per_tick);
    for _ in 0..due {
        session.spawn_entity();
    }
}

fn advance_entities<R: GameRules>(session: &mut Session<R>, dt: f32) {
    if session.challenge.is_some() && session.rules.challenge_mode() == ChallengeMode::OnTrigger {
        return;
    }
    let scale = if session.effect_active(EffectKind::SlowMotion) {
        SLOW_MOTION_SCALE
    } else {
        1.0
    };
    let motion = session.rules.motion();
    let arena_height = session.rules.tuning().arena_height;

    let removed = session.entities.advance(dt, motion, scale, arena_height);
    for r in removed {
        match session.rules.on_escape(r.kind, r.exit) {
            EscapePenalty::None => {}
            EscapePenalty::BreakStreak => session.break_streak(),
            EscapePenalty::LoseLife => {
                log::debug!("{} escaped", r.kind.label());
                session.break_streak();
                session.lose_life();
            }
        }
    }
}

fn catch_entities<R: GameRules>(session: &mut Session<R>) {
    let Some(player) = session.player else {
        return;
    };
    let width_scale = if session.effect_active(EffectKind::WideBucket) {
        WIDE_BUCKET_SCALE
    } else {
        1.0
    };
    let rect = player.rect(width_scale);
    for id in session.entities.overlapping(&rect) {
        collect(session, id);
    }
}

/// Apply an entity's reward and retire it
fn collect<R: GameRules>(session: &mut Session<R>, id: EntityId) {
    let Some(kind) = session.entities.kill(id) else {
        return;
    };
    let reward = session.rules.reward(kind);
    let tuning = session.rules.tuning();
    let (effect_secs, bonus_secs, penalty, combo_secs) = (
        tuning.effect_secs,
        tuning.bonus_time_secs,
        tuning.hazard_penalty,
        tuning.combo_window_secs,
    );

    let points = reward.points * session.tier as u64 * session.points_multiplier();
    match reward.outcome {
        Outcome::Hazard => {
            if session.consume_effect(EffectKind::Shield) {
                session.events.push(GameEvent::Shielded);
            } else {
                session.score = session.score.saturating_sub(penalty);
                session.break_streak();
                session.lose_life();
                session.events.push(GameEvent::Hazard {
                    label: kind.label(),
                });
            }
            return;
        }
        Outcome::OpenChallenge { stake } => {
            session.open_challenge(stake);
            session.events.push(GameEvent::ChallengeOpened);
            return;
        }
        Outcome::Success => {}
        Outcome::ExtraLife => session.gain_life(),
        Outcome::Effect(effect) => session.grant_effect(effect, effect_secs),
        Outcome::BonusTime => {
            session.time_remaining += bonus_secs;
            session.events.push(GameEvent::BonusTime {
                seconds: bonus_secs,
            });
        }
    }

    session.score += points;
    session.record_success();
    if session.rules.uses_combo_window() {
        session.grant_effect(EffectKind::ComboWindow, combo_secs);
    }
    session.events.push(GameEvent::Collected {
        label: kind.label(),
        points,
    });
}

/// Linear decay of time-boxed effects
fn decay_effects<R: GameRules>(session: &mut Session<R>, dt: f32) {
    for effect in session.effects.iter_mut() {
        effect.remaining -= dt;
    }
    let expired: Vec<EffectKind> = session
        .effects
        .iter()
        .filter(|e| e.remaining <= 0.0)
        .map(|e| e.kind)
        .collect();
    if expired.is_empty() {
        return;
    }
    session.effects.retain(|e| e.remaining > 0.0);

    for kind in expired {
        if kind == EffectKind::ComboWindow {
            session.break_streak();
        } else {
            session.events.push(GameEvent::EffectEnded(kind));
        }
    }
}

/// Tier follows score thresholds and never goes down
fn update_tier<R: GameRules>(session: &mut Session<R>) {
    let tier = session.rules.tuning().tier_for_score(session.score);
    if tier > session.tier {
        session.tier = tier;
        session.events.push(GameEvent::TierUp(tier));
        log::info!("Tier up: {} (score {})", tier, session.score);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::games::{BalloonKind, BalloonPop, MathQuiz, PaintCatch, PaintKind, TreasureHunt};
    use crate::tuning::Tuning;

    fn playing<R: GameRules>(rules: R) -> Session<R> {
        let mut session = Session::new(rules, 12345);
        tick(&mut session, &[Intent::Start], 0.0);
        assert_eq!(session.phase, GamePhase::Playing);
        session
    }

    /// Index of a wrong choice on the current challenge
    fn wrong_index<R: GameRules>(session: &Session<R>) -> usize {
        let correct = session.challenge.as_ref().map(|c| c.correct_index()).unwrap_or(0);
        (correct + 1) % 4
    }

    fn correct_index<R: GameRules>(session: &Session<R>) -> usize {
        session.challenge.as_ref().map(|c| c.correct_index()).unwrap_or(0)
    }

    #[test]
    fn test_waiting_ignores_everything_but_start() {
        let mut session = Session::new(MathQuiz::default(), 1);
        let noise = [
            Intent::Pause,
            Intent::Resume,
            Intent::Restart,
            Intent::Reset,
            Intent::MoveLeft(true),
            Intent::Select(Target::Choice(0)),
            Intent::Fire,
        ];
        tick(&mut session, &noise, 1.0);
        assert_eq!(session.phase, GamePhase::Waiting);
        assert_eq!(session.score, 0);
        assert_eq!(session.time_remaining, 60.0);

        tick(&mut session, &[Intent::Start], 0.0);
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(session.challenge.is_some());
    }

    #[test]
    fn test_timer_runs_out_after_sixty_seconds() {
        let mut session = playing(MathQuiz::default());
        for i in 0..60 {
            assert_eq!(session.phase, GamePhase::Playing, "tick {}", i);
            tick(&mut session, &[], 1.0);
        }
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.time_remaining, 0.0);

        let overs = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        // Further ticks do nothing
        tick(&mut session, &[], 1.0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_game_over_only_restart_changes_phase() {
        let mut session = playing(MathQuiz::default());
        let index = correct_index(&session);
        tick(&mut session, &[Intent::Select(Target::Choice(index))], 0.1);
        assert!(session.score > 0);
        tick(&mut session, &[], 100.0);
        assert_eq!(session.phase, GamePhase::GameOver);

        tick(
            &mut session,
            &[Intent::Start, Intent::Pause, Intent::Resume, Intent::Reset],
            0.1,
        );
        assert_eq!(session.phase, GamePhase::GameOver);

        session.tier = 3;
        tick(&mut session, &[Intent::Restart], 0.0);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.streak, 0);
        assert_eq!(session.max_streak, 0);
        assert_eq!(session.time_remaining, 60.0);
        assert_eq!(session.tier, 1);
        assert!(session.challenge.is_some());
    }

    #[test]
    fn test_correct_answer_scores_by_tier() {
        let mut session = playing(MathQuiz::default());
        let index = correct_index(&session);
        tick(&mut session, &[Intent::Select(Target::Choice(index))], 0.0);
        assert_eq!(session.score, 10);
        assert_eq!(session.streak, 1);
        assert!(session.feedback.is_some_and(|f| f.correct));
    }

    #[test]
    fn test_correct_then_wrong_keeps_peak() {
        let mut session = playing(MathQuiz::default());
        let delay = session.rules.tuning().feedback_delay_secs;

        for _ in 0..3 {
            let index = correct_index(&session);
            tick(&mut session, &[Intent::Select(Target::Choice(index))], 0.0);
            tick(&mut session, &[], delay + 0.01);
        }
        assert_eq!(session.streak, 3);
        assert_eq!(session.max_streak, 3);

        let index = wrong_index(&session);
        tick(&mut session, &[Intent::Select(Target::Choice(index))], 0.0);
        assert_eq!(session.streak, 0);
        assert_eq!(session.max_streak, 3);
    }

    #[test]
    fn test_feedback_delay_then_regenerates() {
        let mut session = playing(MathQuiz::default());
        let first = session.challenge.clone();
        let index = wrong_index(&session);
        tick(&mut session, &[Intent::Select(Target::Choice(index))], 0.0);

        // Answers during feedback are ignored
        let correct = correct_index(&session);
        tick(&mut session, &[Intent::Select(Target::Choice(correct))], 0.1);
        assert_eq!(session.score, 0);
        assert_eq!(session.challenge, first);

        tick(&mut session, &[], 1.0);
        assert!(session.feedback.is_none());
        assert!(session.challenge.is_some());
        assert!(session.awaiting_answer());
    }

    #[test]
    fn test_tap_selects_choice_button() {
        let mut session = playing(MathQuiz::default());
        let index = correct_index(&session);
        let point = layout::choice_rect(index, session.arena()).center();
        tick(&mut session, &[Intent::Select(Target::Point(point))], 0.0);
        assert_eq!(session.score, 10);

        // Out-of-range choice index is ignored
        let mut session = playing(MathQuiz::default());
        tick(&mut session, &[Intent::Select(Target::Choice(9))], 0.0);
        assert!(session.feedback.is_none());
    }

    #[test]
    fn test_tier_never_decreases() {
        let mut session = playing(BalloonPop::default());
        session.score = 310;
        tick(&mut session, &[], 0.01);
        assert_eq!(session.tier, 3);

        // A hazard penalty can lower the score; the tier stays
        let id = session
            .entities
            .spawn(BalloonKind::Bomb, Vec2::new(100.0, 300.0), 0.0, None);
        let pos = session.entities.get(id).map(|e| e.pos).unwrap_or_default();
        tick(&mut session, &[Intent::Select(Target::Point(pos))], 0.01);
        assert_eq!(session.score, 290);
        assert_eq!(session.tier, 3);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut session = playing(BalloonPop::default());
        tick(&mut session, &[], 2.0);
        let time = session.time_remaining;
        let positions: Vec<Vec2> = session.entities.iter().map(|e| e.pos).collect();

        tick(&mut session, &[Intent::Pause], 0.5);
        assert_eq!(session.phase, GamePhase::Paused);
        tick(
            &mut session,
            &[Intent::Select(Target::Point(Vec2::new(10.0, 10.0)))],
            5.0,
        );
        assert_eq!(session.time_remaining, time);
        let after: Vec<Vec2> = session.entities.iter().map(|e| e.pos).collect();
        assert_eq!(positions, after);

        tick(&mut session, &[Intent::Resume], 0.0);
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reset_from_pause_returns_to_waiting() {
        let mut session = playing(BalloonPop::default());
        tick(&mut session, &[], 3.0);
        tick(&mut session, &[Intent::Pause], 0.0);
        tick(&mut session, &[Intent::Reset], 0.0);
        assert_eq!(session.phase, GamePhase::Waiting);
        assert!(session.entities.is_empty());
        assert_eq!(session.lives, Some(3));
    }

    #[test]
    fn test_balloon_tap_pops_every_hit() {
        let mut session = playing(BalloonPop::default());
        let a = session
            .entities
            .spawn(BalloonKind::Normal, Vec2::new(200.0, 300.0), 0.0, None);
        let b = session
            .entities
            .spawn(BalloonKind::Golden, Vec2::new(210.0, 300.0), 0.0, None);

        tick(
            &mut session,
            &[Intent::Select(Target::Point(Vec2::new(205.0, 300.0)))],
            0.0,
        );
        assert!(session.entities.get(a).is_none());
        assert!(session.entities.get(b).is_none());
        assert_eq!(session.streak, 2);
        assert!(session.score > 0);
        assert!(session.effect_active(EffectKind::ComboWindow));
    }

    #[test]
    fn test_combo_window_expiry_breaks_streak() {
        let mut session = playing(BalloonPop::default());
        session
            .entities
            .spawn(BalloonKind::Normal, Vec2::new(200.0, 300.0), 0.0, None);
        tick(
            &mut session,
            &[Intent::Select(Target::Point(Vec2::new(200.0, 300.0)))],
            0.0,
        );
        assert_eq!(session.streak, 1);

        let window = session.rules.tuning().combo_window_secs;
        tick(&mut session, &[], window + 0.01);
        assert_eq!(session.streak, 0);
        assert_eq!(session.max_streak, 1);
    }

    #[test]
    fn test_escaped_balloon_costs_life() {
        let mut session = playing(BalloonPop::default());
        session
            .entities
            .spawn(BalloonKind::Normal, Vec2::new(200.0, -100.0), 10.0, None);
        tick(&mut session, &[], 0.01);
        assert_eq!(session.lives, Some(2));

        // Bombs float away harmlessly
        session
            .entities
            .spawn(BalloonKind::Bomb, Vec2::new(200.0, -100.0), 10.0, None);
        tick(&mut session, &[], 0.01);
        assert_eq!(session.lives, Some(2));
    }

    #[test]
    fn test_losing_all_lives_ends_game() {
        let mut session = playing(BalloonPop::default());
        for _ in 0..3 {
            let id = session
                .entities
                .spawn(BalloonKind::Bomb, Vec2::new(400.0, 300.0), 0.0, None);
            let pos = session.entities.get(id).map(|e| e.pos).unwrap_or_default();
            tick(&mut session, &[Intent::Select(Target::Point(pos))], 0.0);
        }
        assert_eq!(session.lives, Some(0));
        assert_eq!(session.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_shield_absorbs_hazard() {
        let mut session = playing(PaintCatch::default());
        session.grant_effect(EffectKind::Shield, 5.0);
        let player = session.player.map(|p| p.pos).unwrap_or_default();
        session.entities.spawn(PaintKind::Acid, player, 0.0, None);
        tick(&mut session, &[], 0.01);
        assert_eq!(session.lives, Some(3));
        assert!(!session.effect_active(EffectKind::Shield));
    }

    #[test]
    fn test_bucket_moves_and_clamps() {
        let mut session = playing(PaintCatch::default());
        let start = session.player.map(|p| p.pos.x).unwrap_or_default();

        tick(&mut session, &[Intent::MoveRight(true)], 0.1);
        let moved = session.player.map(|p| p.pos.x).unwrap_or_default();
        assert!((moved - (start + 42.0)).abs() < 0.01);

        // Held key keeps moving until released; clamps at the edge
        tick(&mut session, &[], 5.0);
        let width = session.rules.tuning().player_width;
        let x = session.player.map(|p| p.pos.x).unwrap_or_default();
        assert!((x - (800.0 - width / 2.0)).abs() < 0.01);

        tick(&mut session, &[Intent::MoveRight(false)], 0.1);
        let still = session.player.map(|p| p.pos.x).unwrap_or_default();
        assert_eq!(x, still);
    }

    #[test]
    fn test_bucket_catches_paint() {
        let mut session = playing(PaintCatch::default());
        let player = session.player.map(|p| p.pos).unwrap_or_default();
        session.entities.spawn(PaintKind::Paint, player, 0.0, None);
        tick(&mut session, &[], 0.01);
        assert_eq!(session.score, 10);
        assert_eq!(session.streak, 1);
    }

    #[test]
    fn test_missed_paint_breaks_streak() {
        let mut session = playing(PaintCatch::default());
        session.streak = 4;
        session
            .entities
            .spawn(PaintKind::Paint, Vec2::new(20.0, 700.0), 10.0, None);
        tick(&mut session, &[], 0.01);
        assert_eq!(session.streak, 0);
        assert_eq!(session.lives, Some(3));
    }

    #[test]
    fn test_treasure_dig_opens_quiz() {
        let mut session = playing(TreasureHunt::default());
        session.entities.clear();
        let x = session.player.map(|p| p.pos.x).unwrap_or_default();
        session.entities.spawn(
            crate::games::TreasureKind::Chest,
            Vec2::new(x, 400.0),
            0.0,
            Some(8.0),
        );

        tick(&mut session, &[Intent::Fire], 0.01);
        assert!(session.awaiting_answer());
        assert!(session.entities.is_empty());

        let index = correct_index(&session);
        tick(&mut session, &[Intent::Select(Target::Choice(index))], 0.01);
        assert_eq!(session.score, 10);

        // Quiz closes after feedback instead of chaining
        tick(&mut session, &[], 1.0);
        assert!(session.challenge.is_none());
    }

    #[test]
    fn test_custom_tuning_duration() {
        let tuning = Tuning {
            duration_secs: 5.0,
            ..Tuning::for_variant(crate::games::Variant::MathQuiz)
        };
        let mut session = playing(MathQuiz::with_tuning(tuning));
        tick(&mut session, &[], 4.9);
        assert_eq!(session.phase, GamePhase::Playing);
        tick(&mut session, &[], 0.2);
        assert_eq!(session.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(BalloonPop::default());
        let mut b = playing(BalloonPop::default());
        let inputs = [
            vec![],
            vec![Intent::Select(Target::Point(Vec2::new(300.0, 400.0)))],
            vec![],
            vec![Intent::Select(Target::Point(Vec2::new(500.0, 200.0)))],
        ];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input, 1.0 / 60.0);
                tick(&mut b, input, 1.0 / 60.0);
            }
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        let pa: Vec<Vec2> = a.entities.iter().map(|e| e.pos).collect();
        let pb: Vec<Vec2> = b.entities.iter().map(|e| e.pos).collect();
        assert_eq!(pa, pb);
    }
}
