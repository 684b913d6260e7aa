//! Sound effects
//!
//! The simulation never calls audio directly: `GameSession` maps events to
//! `SoundEffect`s and hands them to an `AudioSink`. In the browser the sink
//! synthesizes each effect with Web Audio oscillators, no external files.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player or structure shot
    LaserShot,
    /// Horizontal sweep
    HorizontalLaser,
    /// Asteroid, bug or nest destroyed
    Explosion,
    /// Bug reached the rocket
    Hit,
    /// Structure deployed
    Deploy,
    LevelUp,
    /// A nebula or nest appeared
    NebulaWarning,
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerFired => Some(SoundEffect::LaserShot),
            GameEvent::LaserFired => Some(SoundEffect::HorizontalLaser),
            GameEvent::Destroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::StructureDeployed { .. } => Some(SoundEffect::Deploy),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::HazardFormed { .. } => Some(SoundEffect::NebulaWarning),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::StructureFired { .. }
            | GameEvent::NestDamaged { .. }
            | GameEvent::ResourceCollected
            | GameEvent::EliteSpawned { .. }
            | GameEvent::HazardProduced { .. } => None,
        }
    }
}

/// Fire-and-forget audio output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    /// Gain applied to every effect (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);
    /// Called on user input. Browsers only unlock audio inside a gesture.
    fn resume(&mut self) {}
}

/// Silent sink for native runs
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("sfx {effect:?}");
    }

    fn set_volume(&mut self, _volume: f32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Web Audio synthesizer
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

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

        /// One oscillator sweeping `from` -> `to` Hz with an exponential decay
        #[allow(clippy::too_many_arguments)]
        fn sweep(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            peak: f32,
            length: f64,
            delay: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(peak, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            if (to - from).abs() > f32::EPSILON {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + length)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Rising arpeggio
        fn chime(&self, ctx: &AudioContext, notes: &[f32], step: f64, vol: f32) {
            for (i, freq) in notes.iter().enumerate() {
                self.sweep(
                    ctx,
                    OscillatorType::Triangle,
                    *freq,
                    *freq,
                    vol * 0.25,
                    0.25,
                    i as f64 * step,
                );
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            match effect {
                SoundEffect::LaserShot => {
                    self.sweep(ctx, OscillatorType::Square, 880.0, 220.0, vol * 0.15, 0.1, 0.0)
                }
                SoundEffect::HorizontalLaser => {
                    self.sweep(ctx, OscillatorType::Sawtooth, 200.0, 1600.0, vol * 0.3, 0.45, 0.0);
                    self.sweep(ctx, OscillatorType::Sine, 100.0, 60.0, vol * 0.3, 0.5, 0.0);
                }
                SoundEffect::Explosion => {
                    self.sweep(ctx, OscillatorType::Sawtooth, 100.0, 30.0, vol * 0.4, 0.3, 0.0);
                    self.sweep(ctx, OscillatorType::Square, 1500.0, 1500.0, vol * 0.12, 0.08, 0.0);
                }
                SoundEffect::Hit => {
                    self.sweep(ctx, OscillatorType::Square, 300.0, 80.0, vol * 0.45, 0.25, 0.0)
                }
                SoundEffect::Deploy => self.chime(ctx, &[523.0, 659.0, 784.0, 1047.0], 0.08, vol),
                SoundEffect::LevelUp => {
                    self.chime(ctx, &[400.0, 500.0, 600.0, 800.0, 1000.0], 0.1, vol)
                }
                SoundEffect::NebulaWarning => {
                    for i in 0..3 {
                        self.sweep(
                            ctx,
                            OscillatorType::Sine,
                            440.0,
                            220.0,
                            vol * 0.25,
                            0.2,
                            i as f64 * 0.25,
                        );
                    }
                }
                SoundEffect::GameOver => {
                    for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                        self.sweep(
                            ctx,
                            OscillatorType::Sine,
                            *freq,
                            *freq,
                            vol * 0.3,
                            0.3,
                            i as f64 * 0.2,
                        );
                    }
                }
            }
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn resume(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }
}
