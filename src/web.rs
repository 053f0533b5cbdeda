//! Browser bindings
//!
//! The page owns the canvas, DOM screens and event listeners; it forwards
//! device events and `requestAnimationFrame` ticks here and draws the
//! returned frame.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudioCues;
use crate::input::Key;
use crate::render::{DrawList, RenderAdapter};
use crate::roster::RosterData;
use crate::session::{Collaborators, Session, SessionObserver};
use crate::settings::Settings;
use crate::sim::EndReason;

/// Module start hook: panic messages and logs go to the browser console
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Roster Jump starting...");
}

/// Keeps the latest frame serialized for the page to pick up
#[derive(Default)]
struct JsonFrame {
    json: String,
}

impl RenderAdapter for JsonFrame {
    fn draw(&mut self, frame: &DrawList) {
        match serde_json::to_string(frame) {
            Ok(json) => self.json = json,
            Err(err) => log::warn!("Failed to serialize frame: {}", err),
        }
    }
}

/// Score and end-of-session state polled by the page
#[derive(Default)]
struct PageState {
    score: u64,
    final_score: Option<u64>,
}

impl SessionObserver for PageState {
    fn score_changed(&mut self, score: u64) {
        self.score = score;
    }

    fn session_ended(&mut self, final_score: u64, reason: EndReason) {
        log::info!("Game over ({:?}), final score {}", reason, final_score);
        self.final_score = Some(final_score);
    }
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    cues: WebAudioCues,
    frame: JsonFrame,
    page: PageState,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game; `settings_json` may be empty
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> WebGame {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json_or_default(settings_json)
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            cues: WebAudioCues::new(&settings),
            session: Session::new(seed, settings),
            frame: JsonFrame::default(),
            page: PageState::default(),
            last_time: None,
        }
    }

    /// Start with a pasted roster (comma-separated cells, one row per line)
    pub fn start_with_roster(&mut self, csv: &str) {
        self.begin(RosterData::from_csv(csv));
    }

    pub fn start_with_demo(&mut self) {
        self.begin(RosterData::demo());
    }

    fn begin(&mut self, roster: RosterData) {
        self.cues.resume();
        self.page = PageState::default();
        self.last_time = None;
        let seed = js_sys::Date::now() as u64;
        self.session.start_session_with_seed(roster, seed);
    }

    pub fn apply_settings(&mut self, settings_json: &str) {
        let settings = Settings::from_json_or_default(settings_json);
        self.cues.apply_settings(&settings);
        self.session.set_settings(settings);
    }

    /// Animation frame callback. Returns false once the session is over.
    pub fn frame(&mut self, time_ms: f64) -> bool {
        let elapsed = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => crate::consts::FRAME_DT,
        };
        self.last_time = Some(time_ms);

        let mut collab = Collaborators {
            cues: &mut self.cues,
            observer: &mut self.page,
            renderer: &mut self.frame,
        };
        self.session.advance(elapsed, &mut collab)
    }

    /// Latest draw list as JSON
    pub fn draw_list_json(&self) -> String {
        self.frame.json.clone()
    }

    pub fn score(&self) -> u64 {
        self.page.score
    }

    /// Set once the session has ended
    pub fn final_score(&self) -> Option<u64> {
        self.page.final_score
    }

    // === Device events (logical canvas coordinates) ===

    pub fn pointer_moved(&mut self, x: f32) {
        self.session.input_mut().pointer_moved(x);
    }

    pub fn clicked(&mut self) {
        if self.session.is_running() {
            self.session.input_mut().clicked();
        }
    }

    pub fn touch_started(&mut self, x: f32) {
        self.session.input_mut().touch_started(x, js_sys::Date::now());
    }

    pub fn touch_moved(&mut self, x: f32) {
        self.session.input_mut().touch_moved(x);
    }

    pub fn touch_ended(&mut self) {
        self.session.input_mut().touch_ended(js_sys::Date::now());
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(key) = Key::from_dom(key) {
            self.session.input_mut().key_down(key);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(key) = Key::from_dom(key) {
            self.session.input_mut().key_up(key);
        }
    }
}
