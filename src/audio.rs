//! Audio cue boundary
//!
//! The simulation never plays sound. It emits `GameEvent`s; this module maps
//! them to fire-and-forget cues and hands them to an `AudioSink`. A failing
//! sink (missing asset, autoplay blocked) is logged and otherwise ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound cues the host knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// Player jumped
    Jump,
    /// Run started: begin the background music loop
    GameStart,
    /// Player was hit: stop the music, play the death sting
    Collision,
    /// Lightning strike
    Thunder,
    /// Start the looping rain track
    RainStart,
    RainStop,
}

impl AudioCue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started => Some(AudioCue::GameStart),
            GameEvent::Jumped => Some(AudioCue::Jump),
            GameEvent::Collided { .. } => Some(AudioCue::Collision),
            GameEvent::Thunder { .. } => Some(AudioCue::Thunder),
            GameEvent::RainStarted => Some(AudioCue::RainStart),
            GameEvent::RainStopped => Some(AudioCue::RainStop),
            // Snow has no sound; scoring/reset are visual only
            GameEvent::Scored { .. }
            | GameEvent::SnowStarted
            | GameEvent::SnowStopped
            | GameEvent::GameOverShown
            | GameEvent::Reset => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Jump => "jump",
            AudioCue::GameStart => "game_start",
            AudioCue::Collision => "collision",
            AudioCue::Thunder => "thunder",
            AudioCue::RainStart => "rain_start",
            AudioCue::RainStop => "rain_stop",
        }
    }

    /// Looping tracks the host keeps playing until told otherwise
    pub fn is_loop_control(&self) -> bool {
        matches!(
            self,
            AudioCue::GameStart | AudioCue::RainStart | AudioCue::RainStop
        )
    }
}

/// A sink failed to play a cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioError {
    pub cue: AudioCue,
    pub reason: String,
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to play `{}`: {}", self.cue.as_str(), self.reason)
    }
}

impl std::error::Error for AudioError {}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, volume: f32) -> Result<(), AudioError>;
}

/// Volume controls applied before a cue reaches the sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioMix {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioMix {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl AudioMix {
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

/// Sink that only logs (native builds, headless runs)
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: usize,
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue, volume: f32) -> Result<(), AudioError> {
        self.played += 1;
        log::debug!("♪ {} (vol {:.2})", cue.as_str(), volume);
        Ok(())
    }
}

/// Send the cues for `events` to `sink`; returns how many cues failed
///
/// Muting drops one-shot cues but still forwards loop control so the host's
/// music/rain state never gets stuck on.
pub fn dispatch_cues(sink: &mut dyn AudioSink, mix: &AudioMix, events: &[GameEvent]) -> usize {
    let volume = mix.effective_volume();
    let mut failures = 0;
    for cue in events.iter().filter_map(AudioCue::for_event) {
        if volume <= 0.0 && !cue.is_loop_control() {
            continue;
        }
        if let Err(e) = sink.play(cue, volume) {
            log::warn!("{e}");
            failures += 1;
        }
    }
    failures
}
