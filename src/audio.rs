//! Audio dispatch for simulation sound events
//!
//! Sounds are procedurally described as tone sequences; the host supplies a
//! [`SoundSink`] that actually synthesizes them. The manager applies volume,
//! mute and per-effect rate limits so rapid fire never floods the backend.

pub use crate::sim::SoundEffect;
use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

/// One oscillator note with a decaying gain envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_freq: f32,
    pub end_freq: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
    /// Seconds after the effect is triggered
    pub delay: f32,
    /// Peak gain before master/sfx volume
    pub gain: f32,
}

/// Backend that turns tones into sound; must not block
pub trait SoundSink {
    fn play_tone(&mut self, tone: &Tone, volume: f32);
}

/// Tone sequence for an effect
pub fn tones(effect: SoundEffect) -> &'static [Tone] {
    const SHOOT: [Tone; 1] = [Tone {
        start_freq: 900.0,
        end_freq: 400.0,
        waveform: Waveform::Sine,
        duration: 0.08,
        delay: 0.0,
        gain: 0.06,
    }];
    const EXPLOSION: [Tone; 1] = [Tone {
        start_freq: 100.0,
        end_freq: 100.0,
        waveform: Waveform::Sawtooth,
        duration: 0.15,
        delay: 0.0,
        gain: 0.15,
    }];
    // Rising two-note chime
    const POWERUP: [Tone; 2] = [
        Tone {
            start_freq: 600.0,
            end_freq: 600.0,
            waveform: Waveform::Sine,
            duration: 0.1,
            delay: 0.0,
            gain: 0.15,
        },
        Tone {
            start_freq: 1200.0,
            end_freq: 1200.0,
            waveform: Waveform::Sine,
            duration: 0.2,
            delay: 0.1,
            gain: 0.15,
        },
    ];

    match effect {
        SoundEffect::Shoot => &SHOOT,
        SoundEffect::Explosion => &EXPLOSION,
        SoundEffect::Powerup => &POWERUP,
    }
}

/// Minimum spacing between repeats of an effect (ms)
fn min_interval_ms(effect: SoundEffect) -> f64 {
    match effect {
        SoundEffect::Shoot => 60.0,
        SoundEffect::Explosion => 80.0,
        SoundEffect::Powerup => 0.0,
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    last_shoot_ms: Option<f64>,
    last_explosion_ms: Option<f64>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            last_shoot_ms: None,
            last_explosion_ms: None,
        }
    }

    /// Build from persisted settings
    pub fn from_settings(settings: &crate::Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect unless it is rate limited. Returns whether it played.
    pub fn play(&mut self, effect: SoundEffect, now_ms: f64, sink: &mut dyn SoundSink) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return false;
        }

        let last = match effect {
            SoundEffect::Shoot => Some(&mut self.last_shoot_ms),
            SoundEffect::Explosion => Some(&mut self.last_explosion_ms),
            SoundEffect::Powerup => None,
        };
        if let Some(last) = last {
            if let Some(prev) = *last {
                if now_ms - prev < min_interval_ms(effect) {
                    log::trace!("Suppressed {:?} ({:.0} ms since last)", effect, now_ms - prev);
                    return false;
                }
            }
            *last = Some(now_ms);
        }

        for tone in tones(effect) {
            sink.play_tone(tone, vol);
        }
        true
    }

    /// Route every sound event from a tick to the sink
    pub fn dispatch(&mut self, events: &[GameEvent], now_ms: f64, sink: &mut dyn SoundSink) {
        for event in events {
            if let GameEvent::Sound { effect } = event {
                self.play(*effect, now_ms, sink);
            }
        }
    }
}
