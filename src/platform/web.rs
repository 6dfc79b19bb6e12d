//! Browser bindings
//!
//! The JS host owns the DOM, the `requestAnimationFrame` loop and the audio
//! elements. It forwards key/touch edges and frame timestamps here and draws
//! whatever `frame()` returns.

use std::sync::Once;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioCue, AudioError, AudioMix, AudioSink, dispatch_cues};
use crate::sim::{FrameInput, FrameSnapshot, GameEvent, GameSession, Viewport, tick};
use crate::tuning::Tuning;

use super::is_jump_key;

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }
    });
}

/// `performance.now()`, or 0 outside a window context
#[wasm_bindgen]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Forwards cues to a JS callback `(cue: string, volume: number) => void`
#[derive(Default)]
struct JsAudio {
    callback: Option<js_sys::Function>,
}

impl AudioSink for JsAudio {
    fn play(&mut self, cue: AudioCue, volume: f32) -> Result<(), AudioError> {
        let Some(callback) = &self.callback else {
            return Ok(());
        };
        callback
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(cue.as_str()),
                &JsValue::from_f64(volume as f64),
            )
            .map(|_| ())
            .map_err(|e| AudioError {
                cue,
                reason: format!("{e:?}"),
            })
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    snapshot: FrameSnapshot,
    events: &'a [GameEvent],
}

/// Game instance exported to JS
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    audio: JsAudio,
    mix: AudioMix,
    /// Events already voiced between frames, reported with the next frame
    pending: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game; `tuning_json` optionally overrides balance values
    #[wasm_bindgen(constructor)]
    pub fn new(
        seed: f64,
        width: f32,
        height: f32,
        tuning_json: Option<String>,
    ) -> Result<WebGame, JsValue> {
        init_logging();

        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Tuning::default(),
        };
        let seed = seed as u64;
        log::info!("Ghrong starting with seed {}", seed);

        Ok(WebGame {
            session: GameSession::new(seed, tuning, Viewport::new(width, height), now_ms()),
            audio: JsAudio::default(),
            mix: AudioMix::default(),
            pending: Vec::new(),
        })
    }

    pub fn set_audio_callback(&mut self, callback: js_sys::Function) {
        self.audio.callback = Some(callback);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.mix.muted = muted;
    }

    pub fn set_volume(&mut self, master: f32, sfx: f32) {
        self.mix.set_master_volume(master);
        self.mix.set_sfx_volume(sfx);
    }

    /// Returns true when the key was the jump key (host should preventDefault)
    pub fn key_down(&mut self, code: &str, now: f64) -> bool {
        if !is_jump_key(code) {
            return false;
        }
        self.session.press(now);
        self.flush_audio();
        true
    }

    pub fn key_up(&mut self, code: &str, now: f64) -> bool {
        if !is_jump_key(code) {
            return false;
        }
        self.session.release(now);
        true
    }

    /// Click or touch
    pub fn tap(&mut self, now: f64) {
        self.session.tap(now);
        self.flush_audio();
    }

    /// Run one display frame and return `{ snapshot, events }` as JSON
    pub fn frame(&mut self, now: f64, width: f32, height: f32) -> Result<String, JsValue> {
        tick(
            &mut self.session,
            &FrameInput {
                now_ms: now,
                viewport: Viewport::new(width, height),
            },
        );
        let fresh = self.session.drain_events();
        dispatch_cues(&mut self.audio, &self.mix, &fresh);
        let mut events = std::mem::take(&mut self.pending);
        events.extend(fresh);

        let output = FrameOutput {
            snapshot: self.session.snapshot(),
            events: &events,
        };
        serde_json::to_string(&output).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn reset(&mut self, now: f64) {
        self.session.reset(now);
        self.flush_audio();
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn display_score(&self) -> u32 {
        self.session.session().display_score
    }

    pub fn game_over_shown(&self) -> bool {
        self.session.game_over_shown()
    }

    /// Play cues produced outside `frame()` (input edges, reset)
    fn flush_audio(&mut self) {
        let events = self.session.drain_events();
        dispatch_cues(&mut self.audio, &self.mix, &events);
        self.pending.extend(events);
    }
}
