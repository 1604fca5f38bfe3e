//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` is one 60 Hz frame)
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod answers;
pub mod enemy;
pub mod joystick;
pub mod kinematics;
pub mod maze;
pub mod question;
pub mod resolve;
pub mod spawn;
pub mod state;
pub mod tick;

pub use answers::{AnswerBoard, AnswerTile, Highlight};
pub use enemy::{AiTuning, Enemy, EnemyMode};
pub use joystick::{Joystick, JoystickReading};
pub use kinematics::{Direction, Player};
pub use maze::{Cell, Maze, Wall};
pub use question::{Question, generate_question};
pub use state::{DeferredAction, EndReason, GameEvent, GamePhase, GameState, ScheduledEvent};
pub use tick::{TickInput, tick, tick_clock};
