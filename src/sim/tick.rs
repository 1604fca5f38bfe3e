//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::enemy::{AiTuning, EnemyMode};
use super::kinematics::Direction;
use super::resolve::{fire_scheduled, resolve_collisions};
use super::state::{EndReason, GamePhase, GameState};
use crate::consts::*;

/// Enemies closer than this make the autopilot flee
const AUTOPILOT_FLEE_RANGE: f32 = 70.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pause toggle
    pub pause: bool,
    /// Leave the game without a record
    pub exit: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

impl TickInput {
    pub fn direction(&self) -> Direction {
        Direction {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
        }
    }

    /// Replace the held directions
    pub fn set_direction(&mut self, direction: Direction) {
        self.up = direction.up;
        self.down = direction.down;
        self.left = direction.left;
        self.right = direction.right;
    }

    /// Copy without the one-shot commands
    pub fn held(&self) -> Self {
        Self {
            pause: false,
            exit: false,
            ..*self
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at frame {}", state.frame);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed at frame {}", state.frame);
            }
            GamePhase::GameOver => {}
        }
    }

    if input.exit {
        state.end_game(EndReason::Exited);
        return;
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.frame += 1;

    fire_scheduled(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    let direction = if input.autopilot {
        autopilot(state)
    } else {
        input.direction()
    };
    state.player.step(direction, &state.maze);

    let tuning = AiTuning::from(&state.config);
    let player_pos = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.update(player_pos, &state.maze, &tuning, &mut state.rng);
    }

    state.board.update(&state.maze, state.frame, &mut state.rng);

    resolve_collisions(state);
}

/// Once-per-second countdown
pub fn tick_clock(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_remaining = state.time_remaining.saturating_sub(1);
    if state.time_remaining == 0 {
        state.end_game(EndReason::TimeUp);
    }
}

/// Demo steering: run from close chasers, otherwise head for the correct tile
pub fn autopilot(state: &GameState) -> Direction {
    let pos = state.player.pos;

    let threat = state
        .enemies
        .iter()
        .filter(|e| e.mode == EnemyMode::Chase)
        .map(|e| (e.pos, pos.distance(e.pos)))
        .filter(|(_, d)| *d < AUTOPILOT_FLEE_RANGE)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((enemy_pos, _)) = threat {
        return steer(pos, pos + (pos - enemy_pos));
    }

    if state.answer_selected {
        return Direction::default();
    }

    match state.board.correct_tile() {
        Some(tile) => steer(pos, tile.pos),
        None => Direction::default(),
    }
}

fn steer(from: Vec2, to: Vec2) -> Direction {
    let delta = to - from;
    let dead_zone = PLAYER_SPEED;
    Direction {
        up: delta.y < -dead_zone,
        down: delta.y > dead_zone,
        left: delta.x < -dead_zone,
        right: delta.x > dead_zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::DeferredAction;

    fn new_state(seed: u64) -> GameState {
        GameState::new(GameConfig::default(), seed)
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut state = new_state(12345);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_joystick_drives_input() {
        let mut state = new_state(12345);
        let mut stick = crate::sim::Joystick::default();
        let mut input = TickInput {
            left: true,
            ..Default::default()
        };

        let (direction, pause) = stick.read("X: 900 | Y: 512 | SW: PRESIONADO").unwrap();
        input.set_direction(direction);
        input.pause = pause;
        assert!(input.right && !input.left && !input.up && !input.down);

        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Paused);

        // Button still held: no second toggle
        let (_, pause) = stick.read("X: 900 | Y: 512 | SW: PRESIONADO").unwrap();
        input.pause = pause;
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let frame = state.frame;
        let pos = state.player.pos;

        // Held input while paused does nothing
        let moving = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &moving);
            tick_clock(&mut state);
        }
        assert_eq!(state.frame, frame);
        assert_eq!(state.player.pos, pos);
        assert_eq!(state.time_remaining, 90);

        // Unpause
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.frame, frame + 1);
    }

    #[test]
    fn test_exit_ends_without_record() {
        let mut state = new_state(1);
        let exit = TickInput {
            exit: true,
            ..Default::default()
        };
        tick(&mut state, &exit);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.end_reason, Some(EndReason::Exited));
        assert!(state.record.is_none());
    }

    #[test]
    fn test_scheduled_event_fires_on_its_frame() {
        let mut state = new_state(3);
        state.enemies.clear();
        state.answer_selected = true;
        state.schedule(5, DeferredAction::NextQuestion { after_correct: false });

        for _ in 0..4 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.answer_selected);
        assert_eq!(state.scheduled.len(), 1);

        tick(&mut state, &TickInput::default());
        assert!(state.scheduled.is_empty());
        assert_eq!(state.frame, 5);
    }

    #[test]
    fn test_clock_runs_out() {
        let mut state = new_state(8);
        state.time_remaining = 2;
        tick_clock(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        tick_clock(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.end_reason, Some(EndReason::TimeUp));
        let record = state.record.as_ref().unwrap();
        assert!(record.completed);

        // Clock is frozen once over
        tick_clock(&mut state);
        assert_eq!(state.time_remaining, 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state(99999);
        let mut state2 = new_state(99999);

        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                down: true,
                left: true,
                ..Default::default()
            },
            TickInput {
                autopilot: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[(i / 50) % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        let enemies1: Vec<_> = state1.enemies.iter().map(|e| e.pos).collect();
        let enemies2: Vec<_> = state2.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(enemies1, enemies2);
    }

    #[test]
    fn test_autopilot_steers_toward_correct_tile() {
        let mut state = new_state(21);
        state.enemies.clear();
        let target = state.board.correct_tile().unwrap().pos;
        state.player.pos = target + Vec2::new(100.0, 0.0);
        let dir = autopilot(&state);
        assert!(dir.left);
        assert!(!dir.right);
    }

    #[test]
    fn test_held_drops_one_shot_commands() {
        let input = TickInput {
            up: true,
            pause: true,
            exit: true,
            ..Default::default()
        };
        let held = input.held();
        assert!(held.up);
        assert!(!held.pause);
        assert!(!held.exit);
    }
}
