//! Frame driver
//!
//! Turns variable host frame times into fixed 60 Hz simulation steps, runs
//! the one-second clock, draws once per host frame and hands the finished
//! run's record to a sink.

use crate::config::GameConfig;
use crate::consts::*;
use crate::record::RecordSink;
use crate::scene::Scene;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick, tick_clock};

/// Longest host frame accepted, in seconds
const MAX_FRAME_DT: f32 = 0.1;

/// Display collaborator
pub trait Renderer {
    fn draw(&mut self, scene: &Scene);

    /// One-shot notifications raised since the last draw
    fn events(&mut self, _events: &[GameEvent]) {}
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _scene: &Scene) {}
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Running,
    Paused,
    /// Stop scheduling frames
    Finished,
}

/// Owns the game state and drives it from host frames
#[derive(Debug)]
pub struct FrameDriver {
    pub state: GameState,
    /// Identity attached to the record
    pub user_id: Option<u64>,
    accumulator: f32,
    clock_accumulator: f32,
    /// One-shot commands waiting for the next simulation step
    pending_pause: bool,
    pending_exit: bool,
    record_submitted: bool,
}

impl FrameDriver {
    pub fn new(config: GameConfig, seed: u64, user_id: Option<u64>) -> Self {
        Self::with_state(GameState::new(config, seed), user_id)
    }

    pub fn with_state(state: GameState, user_id: Option<u64>) -> Self {
        Self {
            state,
            user_id,
            accumulator: 0.0,
            clock_accumulator: 0.0,
            pending_pause: false,
            pending_exit: false,
            record_submitted: false,
        }
    }

    /// Throw the current run away and start a new one with the same config.
    ///
    /// A finished run's record has already gone to the sink; an unfinished
    /// one produces none.
    pub fn restart(&mut self, seed: u64) {
        log::info!(
            "Restarting (seed {seed}) from level {}, score {}",
            self.state.level,
            self.state.score
        );
        let config = self.state.config.clone();
        *self = Self::with_state(GameState::new(config, seed), self.user_id);
    }

    pub fn status(&self) -> FrameStatus {
        match self.state.phase {
            GamePhase::Playing => FrameStatus::Running,
            GamePhase::Paused => FrameStatus::Paused,
            GamePhase::GameOver => FrameStatus::Finished,
        }
    }

    /// Advance by `real_dt` seconds of host time and draw once
    pub fn frame(
        &mut self,
        input: &TickInput,
        real_dt: f32,
        renderer: &mut impl Renderer,
        sink: &mut impl RecordSink,
    ) -> FrameStatus {
        let dt = real_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;
        self.pending_pause |= input.pause;
        self.pending_exit |= input.exit;

        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            let step_input = TickInput {
                pause: self.pending_pause,
                exit: self.pending_exit,
                ..input.held()
            };
            tick(&mut self.state, &step_input);
            self.accumulator -= FRAME_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending_pause = false;
            self.pending_exit = false;
        }

        if self.state.phase == GamePhase::Playing {
            self.clock_accumulator += dt;
            while self.clock_accumulator >= 1.0 && self.state.phase == GamePhase::Playing {
                self.clock_accumulator -= 1.0;
                tick_clock(&mut self.state);
            }
        }

        if !self.state.events.is_empty() {
            let events = std::mem::take(&mut self.state.events);
            renderer.events(&events);
        }
        renderer.draw(&Scene::from_state(&self.state));

        self.submit_record(sink);
        self.status()
    }

    fn submit_record(&mut self, sink: &mut impl RecordSink) {
        if self.record_submitted {
            return;
        }
        if let Some(record) = self.state.record.as_mut() {
            record.user_id = self.user_id;
            sink.submit(record);
            self.record_submitted = true;
        }
    }
}
