//! Browser-facing game handle
//!
//! The page owns the canvas, keyboard listeners and the animation-frame
//! loop; it calls `frame` with the elapsed time and draws `scene_json`.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::driver::{FrameDriver, FrameStatus, Renderer};
use crate::highscores::HighScores;
use crate::record::{GameRecord, RecordSink};
use crate::scene::Scene;
use crate::sim::{GameEvent, Joystick, TickInput};

/// Keeps the latest scene and events as JSON for the page to pick up
#[derive(Default)]
struct JsonRenderer {
    scene: String,
    events: Vec<GameEvent>,
}

impl Renderer for JsonRenderer {
    fn draw(&mut self, scene: &Scene) {
        match scene.to_json() {
            Ok(json) => self.scene = json,
            Err(e) => log::error!("Failed to serialize scene: {e}"),
        }
    }

    fn events(&mut self, events: &[GameEvent]) {
        self.events.extend_from_slice(events);
    }
}

/// Records go to the leaderboard and wait for the page to collect them
struct PageSink {
    high_scores: HighScores,
    pending: Option<GameRecord>,
}

impl RecordSink for PageSink {
    fn submit(&mut self, record: &GameRecord) {
        self.high_scores.submit(record);
        self.pending = Some(record.clone());
    }
}

#[wasm_bindgen]
pub struct WebGame {
    driver: FrameDriver,
    input: TickInput,
    joystick: Joystick,
    renderer: JsonRenderer,
    sink: PageSink,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a run. A zero seed picks one from the clock.
    ///
    /// `config_json` overrides the rules and difficulty table; unusable
    /// JSON is logged and the defaults are used.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, user_id: Option<u64>, config_json: Option<String>) -> WebGame {
        super::init_logging();

        let seed = pick_seed(seed);
        log::info!("Math Shark starting with seed: {seed}");
        let config = GameConfig::from_json_or_default(config_json.as_deref());

        let mut game = WebGame {
            driver: FrameDriver::new(config, seed, user_id),
            input: TickInput::default(),
            joystick: Joystick::default(),
            renderer: JsonRenderer::default(),
            sink: PageSink {
                high_scores: HighScores::load(),
                pending: None,
            },
        };
        game.renderer.draw(&Scene::from_state(&game.driver.state));
        game
    }

    /// Held direction keys
    pub fn set_input(&mut self, up: bool, down: bool, left: bool, right: bool) {
        self.input.up = up;
        self.input.down = down;
        self.input.left = left;
        self.input.right = right;
    }

    /// Feed one serial line from the joystick (`X: 512 | Y: 512 | SW: LIBRE`).
    ///
    /// Returns false for lines that are not readings.
    pub fn joystick(&mut self, line: &str) -> bool {
        let Some((direction, pause)) = self.joystick.read(line) else {
            return false;
        };
        self.input.set_direction(direction);
        self.input.pause |= pause;
        true
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn exit(&mut self) {
        self.input.exit = true;
    }

    /// Start over at level 1 with the same config and player. A zero seed
    /// picks one from the clock.
    pub fn restart(&mut self, seed: u64) {
        self.driver.restart(pick_seed(seed));
        self.input = TickInput {
            autopilot: self.input.autopilot,
            ..Default::default()
        };
        self.renderer.events.clear();
        self.renderer.draw(&Scene::from_state(&self.driver.state));
    }

    /// Advance by `dt` seconds. Returns false once the run has finished.
    pub fn frame(&mut self, dt: f32) -> bool {
        let status = self
            .driver
            .frame(&self.input, dt, &mut self.renderer, &mut self.sink);

        // Clear one-shot inputs after handing them to the driver
        self.input.pause = false;
        self.input.exit = false;

        status != FrameStatus::Finished
    }

    pub fn is_paused(&self) -> bool {
        self.driver.status() == FrameStatus::Paused
    }

    pub fn scene_json(&self) -> String {
        self.renderer.scene.clone()
    }

    /// Events since the last call, as a JSON array
    pub fn take_events_json(&mut self) -> String {
        let events = std::mem::take(&mut self.renderer.events);
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// The finished run's record, once
    pub fn take_record_json(&mut self) -> Option<String> {
        let record = self.sink.pending.take()?;
        serde_json::to_string(&record).ok()
    }

    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(&self.sink.high_scores).unwrap_or_else(|_| "{}".to_string())
    }
}

fn pick_seed(seed: u64) -> u64 {
    if seed == 0 { super::clock_seed() } else { seed }
}
