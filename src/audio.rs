//! Audio cues
//!
//! The simulation only names cues. A [`CuePlayer`] turns them into sound;
//! on the web that is procedurally generated Web Audio, no sample files.

pub use crate::sim::Cue;

/// Fire-and-forget cue sink
pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

/// Drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl CuePlayer for SilentCues {
    fn play(&mut self, _cue: Cue) {}
}

/// Logs cues instead of playing them (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCues;

impl CuePlayer for LogCues {
    fn play(&mut self, cue: Cue) {
        log::info!("Playing cue: {}", cue.name());
    }
}

/// Records cues in order
impl CuePlayer for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioCues;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Cue, CuePlayer};
    use crate::settings::Settings;

    /// Synthesized cues through the Web Audio API
    pub struct WebAudioCues {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudioCues {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up volume/mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
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

        /// Single tone sweeping from `from` to `to` Hz over `len` seconds
        fn sweep(
            ctx: &AudioContext,
            vol: f32,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            start: f64,
            len: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };
            gain.gain().set_value_at_time(vol, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + len)
                .ok();
            osc.frequency().set_value_at_time(from, start).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, start + len)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + len + 0.02).ok();
        }

        /// Springy upward boing
        fn play_jump(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            Self::sweep(ctx, vol * 0.4, OscillatorType::Sine, 220.0, 660.0, t, 0.12);
        }

        /// Rising three-note arpeggio
        fn play_power_up(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [523.0, 659.0, 784.0].into_iter().enumerate() {
                let start = t + i as f64 * 0.06;
                Self::sweep(ctx, vol * 0.3, OscillatorType::Triangle, freq, freq * 1.01, start, 0.1);
            }
        }

        /// Low crunch
        fn play_hit(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            Self::sweep(ctx, vol * 0.35, OscillatorType::Sawtooth, 200.0, 50.0, t, 0.25);
            Self::sweep(ctx, vol * 0.5, OscillatorType::Sine, 90.0, 40.0, t, 0.2);
        }

        /// Short laser blip
        fn play_shoot(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            Self::sweep(ctx, vol * 0.15, OscillatorType::Square, 1200.0, 400.0, t, 0.06);
        }
    }

    impl CuePlayer for WebAudioCues {
        fn play(&mut self, cue: Cue) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::Jump => Self::play_jump(ctx, self.volume),
                Cue::PowerUp => Self::play_power_up(ctx, self.volume),
                Cue::Hit => Self::play_hit(ctx, self.volume),
                Cue::Shoot => Self::play_shoot(ctx, self.volume),
            }
        }
    }
}
