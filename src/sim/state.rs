//! Game state and core simulation types
//!
//! The frame driver is the sole owner of a `GameState`; every update
//! function takes it by mutable reference.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::answers::AnswerBoard;
use super::enemy::{Enemy, spawn_enemies};
use super::kinematics::Player;
use super::maze::Maze;
use super::question::generate_question;
use super::spawn::{Avoid, safe_player_position};
use crate::config::GameConfig;
use crate::consts::FRAME_RATE;
use crate::record::GameRecord;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frame updates and the clock are frozen
    Paused,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    LivesExhausted,
    /// Player left the game; no record is produced
    Exited,
}

/// Work deferred to a later frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Replace the question after answer feedback
    NextQuestion { after_correct: bool },
    /// Bring enemies back after a lost life
    RespawnEnemies,
}

/// A deferred action and the frame it fires on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub fire_at_frame: u64,
    pub action: DeferredAction,
}

/// One-shot notifications for the display layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    QuestionReady { text: String },
    AnswerCorrect { value: i32, points: u32 },
    AnswerWrong { value: i32, correct: i32 },
    LifeLost { lives_left: u32 },
    LevelUp { level: u32 },
    GameOver { reason: EndReason },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: GameConfig,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,

    pub score: u32,
    pub lives: u32,
    /// 1-based, never decreases
    pub level: u32,
    pub time_remaining: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,

    /// Simulated frames while playing
    pub frame: u64,
    /// Latch: an answer was picked and its feedback window is open
    pub answer_selected: bool,
    /// Enemy contact is ignored before this frame
    pub invulnerable_until: u64,

    pub maze: Maze,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub board: AnswerBoard,

    /// Pending deferred actions in scheduling order
    pub scheduled: Vec<ScheduledEvent>,
    /// Events since the driver last drained them
    pub events: Vec<GameEvent>,
    /// Set once when the run ends (except on exit)
    pub record: Option<GameRecord>,
}

impl GameState {
    /// Start a run at level 1.
    ///
    /// An invalid config is replaced by the default one.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{e}; using default config");
                GameConfig::default()
            }
        };
        let mut rng = Pcg32::seed_from_u64(seed);

        let level = 1;
        let maze = Maze::for_level(level);
        let mut player = Player::default();
        // Enemies spawn away from the player's provisional spot, then the
        // player is placed away from them
        let enemies = spawn_enemies(&maze, level, &config, player.pos, &mut rng);
        let avoid = Avoid {
            tiles: Vec::new(),
            enemies: enemies.iter().map(|e| e.pos).collect(),
        };
        player.pos = safe_player_position(&maze, &avoid, player.collision_size(), &mut rng);

        let question = generate_question(config.difficulty(level), &mut rng);
        let board = AnswerBoard::generate(question, &maze, player.pos, 0, &mut rng);

        log::info!(
            "New game (seed {seed}): level {level}, {} enemies, '{}'",
            enemies.len(),
            board.question.text
        );

        let events = vec![GameEvent::QuestionReady {
            text: board.question.text.clone(),
        }];

        Self {
            seed,
            rng,
            phase: GamePhase::Playing,
            end_reason: None,
            score: 0,
            lives: config.initial_lives,
            level,
            time_remaining: config.time_limit_secs,
            correct_answers: 0,
            wrong_answers: 0,
            frame: 0,
            answer_selected: false,
            invulnerable_until: 0,
            maze,
            player,
            enemies,
            board,
            scheduled: Vec::new(),
            events,
            record: None,
            config,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.frame < self.invulnerable_until
    }

    /// Queue `action` to fire `delay` frames from now
    pub fn schedule(&mut self, delay: u64, action: DeferredAction) {
        self.scheduled.push(ScheduledEvent {
            fire_at_frame: self.frame + delay,
            action,
        });
    }

    /// Remove and return due events, keeping scheduling order
    pub fn take_due_events(&mut self) -> Vec<DeferredAction> {
        let frame = self.frame;
        let (due, pending): (Vec<_>, Vec<_>) = self
            .scheduled
            .drain(..)
            .partition(|e| e.fire_at_frame <= frame);
        self.scheduled = pending;
        due.into_iter().map(|e| e.action).collect()
    }

    /// Move the player somewhere safe from walls, tiles and enemies
    pub fn reposition_player(&mut self) {
        let avoid = Avoid {
            tiles: self.board.tiles.iter().map(|t| t.pos).collect(),
            enemies: self.enemies.iter().map(|e| e.pos).collect(),
        };
        let size = self.player.collision_size();
        self.player.pos = safe_player_position(&self.maze, &avoid, size, &mut self.rng);
    }

    pub fn respawn_enemies(&mut self) {
        self.enemies = spawn_enemies(
            &self.maze,
            self.level,
            &self.config,
            self.player.pos,
            &mut self.rng,
        );
    }

    /// Replace the question and its tiles, clearing the answer latch
    pub fn new_question(&mut self) {
        let question = generate_question(self.config.difficulty(self.level), &mut self.rng);
        self.board = AnswerBoard::generate(
            question,
            &self.maze,
            self.player.pos,
            self.frame,
            &mut self.rng,
        );
        self.answer_selected = false;
        log::debug!("Question: {}", self.board.question.text);
        self.events.push(GameEvent::QuestionReady {
            text: self.board.question.text.clone(),
        });
    }

    /// Advance a level: bonus time, new maze, fresh enemies
    pub fn level_up(&mut self) {
        self.level += 1;
        self.time_remaining += self.config.level_up_time_bonus_secs;
        self.maze = Maze::for_level(self.level);
        // Old enemies and tiles belong to the previous maze
        self.enemies.clear();
        self.board.tiles.clear();
        self.reposition_player();
        self.respawn_enemies();
        self.scheduled
            .retain(|e| e.action != DeferredAction::RespawnEnemies);

        log::info!(
            "Level {} ({}), {}s left",
            self.level,
            self.config.difficulty(self.level).name,
            self.time_remaining
        );
        self.events.push(GameEvent::LevelUp { level: self.level });
    }

    /// Stop the run. Every reason but `Exited` produces the one record.
    pub fn end_game(&mut self, reason: EndReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.scheduled.clear();

        if reason != EndReason::Exited {
            let record = GameRecord::from_state(self);
            log::info!(
                "Game over ({reason:?}): score {}, level {}, {}/{} correct",
                record.score,
                record.level_reached,
                record.correct_answers,
                record.total_questions
            );
            self.record = Some(record);
        } else {
            log::info!("Game exited at level {}", self.level);
        }
        self.events.push(GameEvent::GameOver { reason });
    }

    /// Whole seconds of simulated play
    pub fn elapsed_secs(&self) -> u32 {
        (self.frame / FRAME_RATE as u64) as u32
    }
}
