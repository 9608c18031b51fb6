//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no external files needed. The
//! event-to-sound mapping is platform independent; playback is wasm only.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Session started
    Start,
    /// Right answer
    Correct,
    /// Wrong answer
    Wrong,
    /// Balloon popped / treasure dug up
    Pop,
    /// Paint caught
    Catch,
    /// Bomb, acid or trap
    Hazard,
    /// Shield soaked up a hazard
    Shielded,
    /// Effect, extra life or bonus time
    PowerUp,
    TierUp,
    GameOver,
    /// New best score
    HighScore,
}

impl SoundEffect {
    /// Sound for a session event (None for silent events)
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started => Some(SoundEffect::Start),
            GameEvent::Correct { .. } => Some(SoundEffect::Correct),
            GameEvent::Wrong => Some(SoundEffect::Wrong),
            GameEvent::Collected { .. } => Some(SoundEffect::Pop),
            GameEvent::Hazard { .. } => Some(SoundEffect::Hazard),
            GameEvent::Shielded => Some(SoundEffect::Shielded),
            GameEvent::ExtraLife
            | GameEvent::EffectStarted(_)
            | GameEvent::BonusTime { .. } => Some(SoundEffect::PowerUp),
            GameEvent::ChallengeOpened => Some(SoundEffect::Catch),
            GameEvent::TierUp(_) => Some(SoundEffect::TierUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::Paused
            | GameEvent::Resumed
            | GameEvent::LifeLost
            | GameEvent::EffectEnded(_) => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the games
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Master volume with mute already applied
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: Settings::default().effective_volume(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up volume and mute from the player's settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Start => self.sweep(ctx, vol * 0.3, 200.0, 600.0, 0.15),
                SoundEffect::Correct => {
                    self.arpeggio(ctx, vol * 0.25, &[660.0, 880.0], 0.07, OscillatorType::Sine)
                }
                SoundEffect::Wrong => self.sweep(ctx, vol * 0.3, 220.0, 110.0, 0.25),
                SoundEffect::Pop => self.pop(ctx, vol),
                SoundEffect::Catch => self.blip(ctx, vol * 0.3, 520.0, 0.08),
                SoundEffect::Hazard => self.hazard(ctx, vol),
                SoundEffect::Shielded => self.blip(ctx, vol * 0.25, 1200.0, 0.12),
                SoundEffect::PowerUp => self.arpeggio(
                    ctx,
                    vol * 0.25,
                    &[600.0, 800.0, 1000.0],
                    0.08,
                    OscillatorType::Sine,
                ),
                SoundEffect::TierUp => self.arpeggio(
                    ctx,
                    vol * 0.3,
                    &[400.0, 500.0, 600.0, 800.0],
                    0.1,
                    OscillatorType::Triangle,
                ),
                SoundEffect::GameOver => self.arpeggio(
                    ctx,
                    vol * 0.3,
                    &[400.0, 350.0, 300.0, 200.0],
                    0.2,
                    OscillatorType::Sine,
                ),
                SoundEffect::HighScore => self.arpeggio(
                    ctx,
                    vol * 0.25,
                    &[500.0, 600.0, 700.0, 800.0, 1000.0],
                    0.08,
                    OscillatorType::Triangle,
                ),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short sine ping
        fn blip(&self, ctx: &AudioContext, level: f32, freq: f32, len: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + len + 0.02).ok();
        }

        /// Pitch glide from `from` to `to`
        fn sweep(&self, ctx: &AudioContext, level: f32, from: f32, to: f32, len: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + len)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + len + 0.05).ok();
        }

        /// Notes played one after another
        fn arpeggio(
            &self,
            ctx: &AudioContext,
            level: f32,
            notes: &[f32],
            step: f64,
            osc_type: OscillatorType,
        ) {
            for (i, &freq) in notes.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(level, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + step * 2.0)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + step * 2.5).ok();
                }
            }
        }

        /// Balloon pop - bright snap with a low thump
        fn pop(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.04)
                    .ok();
                osc.frequency().set_value_at_time(1800.0, t).ok();
                osc.frequency().set_value_at_time(900.0, t + 0.02).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.06).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(60.0, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Hazard - low boom with a crack
        fn hazard(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.frequency().set_value_at_time(100.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }
    }
}
