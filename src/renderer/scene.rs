//! Session -> draw commands
//!
//! Pure: the same session always yields the same command list, and nothing
//! here mutates state.

use glam::Vec2;

use super::commands::{Align, Color, DrawCommand};
use crate::sim::layout;
use crate::sim::{EffectKind, EntityKind, GamePhase, GameRules, Interaction, Rect, Session};

const BACKGROUND: Color = Color::hex(0x1e2a38);
const GROUND: Color = Color::hex(0x6b4f2a);
const BUTTON: Color = Color::hex(0x34495e);
const BUTTON_CORRECT: Color = Color::hex(0x27ae60);
const BUTTON_WRONG: Color = Color::hex(0xc0392b);
const PLAYER: Color = Color::hex(0xecf0f1);
const HUD_TEXT: Color = Color::hex(0xf5f6fa);
const DIM: Color = Color::BLACK.with_alpha(0.6);

/// Presentation switches read from the player's settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneOptions {
    /// Outline answer feedback instead of flashing whole buttons, and leave
    /// the play field undimmed while a treasure quiz is open
    pub reduced_motion: bool,
}

/// Drawing commands for one frame with default options
pub fn scene<R: GameRules>(session: &Session<R>) -> Vec<DrawCommand> {
    scene_with(session, SceneOptions::default())
}

/// Drawing commands for one frame
pub fn scene_with<R: GameRules>(session: &Session<R>, options: SceneOptions) -> Vec<DrawCommand> {
    let arena = session.arena();
    let mut out = vec![DrawCommand::Clear(BACKGROUND)];

    if session.rules.interaction() == Interaction::Dig {
        out.push(DrawCommand::Rect {
            rect: Rect::new(Vec2::new(0.0, arena.y * 0.5), arena),
            fill: GROUND,
            stroke: None,
        });
    }

    for e in session.entities.alive() {
        out.push(DrawCommand::Circle {
            center: e.pos,
            radius: e.radius(),
            fill: Color::hex(e.kind.color()),
            stroke: Some((Color::WHITE.with_alpha(0.4), 2.0)),
        });
    }

    if let Some(player) = session.player {
        let width_scale = if session.effect_active(EffectKind::WideBucket) {
            1.5
        } else {
            1.0
        };
        let shielded = session.effect_active(EffectKind::Shield);
        out.push(DrawCommand::Rect {
            rect: player.rect(width_scale),
            fill: PLAYER,
            stroke: shielded.then_some((Color::hex(0xfeca57), 3.0)),
        });
    }

    if session.phase != GamePhase::Waiting {
        challenge(session, arena, options, &mut out);
        hud(session, arena, &mut out);
    }
    overlay(session, arena, &mut out);

    out
}

fn challenge<R: GameRules>(
    session: &Session<R>,
    arena: Vec2,
    options: SceneOptions,
    out: &mut Vec<DrawCommand>,
) {
    let Some(challenge) = session.challenge.as_ref() else {
        return;
    };

    // Treasure quizzes pop up over the play field
    if session.rules.interaction() != Interaction::Choices && !options.reduced_motion {
        out.push(DrawCommand::Rect {
            rect: Rect::new(Vec2::ZERO, arena),
            fill: DIM,
            stroke: None,
        });
    }

    out.push(DrawCommand::Text {
        pos: layout::prompt_anchor(arena),
        text: challenge.prompt.clone(),
        size: 40.0,
        color: HUD_TEXT,
        align: Align::Center,
    });

    for (i, choice) in challenge.choices.iter().enumerate() {
        let rect = layout::choice_rect(i, arena);
        let marker = match session.feedback {
            Some(_) if challenge.is_correct(i) => Some(BUTTON_CORRECT),
            Some(f) if f.chosen == i => Some(BUTTON_WRONG),
            _ => None,
        };
        let (fill, stroke) = match marker {
            Some(color) if options.reduced_motion => (BUTTON, (color, 4.0)),
            Some(color) => (color, (Color::WHITE.with_alpha(0.3), 2.0)),
            None => (BUTTON, (Color::WHITE.with_alpha(0.3), 2.0)),
        };
        out.push(DrawCommand::Rect {
            rect,
            fill,
            stroke: Some(stroke),
        });
        out.push(DrawCommand::Text {
            pos: rect.center(),
            text: choice.to_string(),
            size: 32.0,
            color: HUD_TEXT,
            align: Align::Center,
        });
    }
}

fn hud<R: GameRules>(session: &Session<R>, arena: Vec2, out: &mut Vec<DrawCommand>) {
    let text = |pos: Vec2, text: String, align: Align| DrawCommand::Text {
        pos,
        text,
        size: 20.0,
        color: HUD_TEXT,
        align,
    };

    out.push(text(
        Vec2::new(16.0, 28.0),
        format!("Score {}", session.score),
        Align::Left,
    ));
    out.push(text(
        Vec2::new(arena.x * 0.5, 28.0),
        format!("{:.0}s", session.time_remaining.ceil()),
        Align::Center,
    ));

    let mut right = format!("Tier {}", session.tier);
    if let Some(lives) = session.lives {
        right = format!("{}  Lives {}", right, lives);
    }
    out.push(text(Vec2::new(arena.x - 16.0, 28.0), right, Align::Right));

    if session.streak > 1 {
        out.push(text(
            Vec2::new(16.0, 54.0),
            format!("Streak x{}", session.streak),
            Align::Left,
        ));
    }

    let effects: Vec<&str> = session
        .effects
        .iter()
        .map(|e| e.kind.label())
        .collect();
    if !effects.is_empty() {
        out.push(text(
            Vec2::new(arena.x - 16.0, 54.0),
            effects.join(" "),
            Align::Right,
        ));
    }
}

fn overlay<R: GameRules>(session: &Session<R>, arena: Vec2, out: &mut Vec<DrawCommand>) {
    let (title, subtitle) = match session.phase {
        GamePhase::Playing => return,
        GamePhase::Waiting => (
            session.rules.variant().name().to_string(),
            "Press Space or tap to start".to_string(),
        ),
        GamePhase::Paused => ("Paused".to_string(), "Press P to resume".to_string()),
        GamePhase::GameOver => (
            format!("Game over: {}", session.score),
            format!("Best streak {}. Press Space or tap to play again", session.max_streak),
        ),
    };

    let center = arena * 0.5;
    out.push(DrawCommand::Rect {
        rect: Rect::new(Vec2::ZERO, arena),
        fill: DIM,
        stroke: None,
    });
    out.push(DrawCommand::Text {
        pos: center,
        text: title,
        size: 48.0,
        color: HUD_TEXT,
        align: Align::Center,
    });
    out.push(DrawCommand::Text {
        pos: center + Vec2::new(0.0, 48.0),
        text: subtitle,
        size: 20.0,
        color: HUD_TEXT,
        align: Align::Center,
    });
}
