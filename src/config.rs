//! Game rules and difficulty table
//!
//! Loaded from JSON when available, otherwise the built-in defaults are used.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest `max_operand` a difficulty row may ask for
pub const MAX_OPERAND_LIMIT: i32 = 10_000;

/// Arithmetic operators a question can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "×",
            Operator::Div => "÷",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "×" | "*" | "x" => Some(Operator::Mul),
            "÷" | "/" => Some(Operator::Div),
            _ => None,
        }
    }
}

/// One row of the difficulty table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    /// Label shown next to the question
    pub name: String,
    /// Largest operand used when building questions
    pub max_operand: i32,
    /// Operators drawn from (uniformly)
    pub operators: Vec<Operator>,
    /// Bonus seconds advertised for this level
    pub time_bonus_secs: u32,
    /// Multiplier applied to the enemy base speed at spawn
    pub enemy_speed_multiplier: f32,
}

impl DifficultyLevel {
    fn new(
        name: &str,
        max_operand: i32,
        operators: &[Operator],
        time_bonus_secs: u32,
        enemy_speed_multiplier: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            max_operand,
            operators: operators.to_vec(),
            time_bonus_secs,
            enemy_speed_multiplier,
        }
    }
}

/// Game rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Run ===
    pub initial_lives: u32,
    pub time_limit_secs: u32,

    // === Scoring ===
    pub points_per_correct: u32,
    /// Extra points per level on a correct answer
    pub level_bonus_factor: u32,
    pub wrong_answer_penalty: u32,

    // === Progression ===
    /// Level up after this many cumulative correct answers
    pub level_up_every: u32,
    pub level_up_time_bonus_secs: u32,

    // === Feedback windows (frames) ===
    pub correct_feedback_frames: u64,
    pub wrong_feedback_frames: u64,
    pub respawn_grace_frames: u64,

    // === Enemy AI ===
    /// Patrolling enemies start chasing inside this distance
    pub detection_range: f32,
    /// Chasing enemies give up beyond this distance
    pub lose_range: f32,

    /// Indexed by level - 1
    pub difficulty: Vec<DifficultyLevel>,
}

impl Default for GameConfig {
    fn default() -> Self {
        use Operator::*;

        Self {
            initial_lives: 3,
            time_limit_secs: 90,

            points_per_correct: 100,
            level_bonus_factor: 10,
            wrong_answer_penalty: 25,

            level_up_every: 3,
            level_up_time_bonus_secs: 30,

            correct_feedback_frames: 90,
            wrong_feedback_frames: 120,
            respawn_grace_frames: 60,

            detection_range: 120.0,
            lose_range: 180.0,

            difficulty: vec![
                DifficultyLevel::new("Fácil", 10, &[Add, Sub], 60, 1.0),
                DifficultyLevel::new("Fácil+", 15, &[Add, Sub], 50, 1.2),
                DifficultyLevel::new("Intermedio", 20, &[Add, Sub, Mul], 45, 1.4),
                DifficultyLevel::new("Intermedio+", 25, &[Add, Sub, Mul], 40, 1.6),
                DifficultyLevel::new("Avanzado", 30, &[Add, Sub, Mul, Div], 35, 1.8),
                DifficultyLevel::new("Avanzado+", 40, &[Add, Sub, Mul, Div], 30, 2.0),
                DifficultyLevel::new("Experto", 50, &[Add, Sub, Mul, Div], 25, 2.2),
                DifficultyLevel::new("Experto+", 75, &[Add, Sub, Mul, Div], 20, 2.4),
                DifficultyLevel::new("Maestro", 100, &[Add, Sub, Mul, Div], 15, 2.6),
                DifficultyLevel::new("Extremo", 150, &[Add, Sub, Mul, Div], 10, 3.0),
            ],
        }
    }
}

impl GameConfig {
    /// Difficulty for a 1-based level, clamped to the table.
    ///
    /// Levels are unbounded but the table is finite, so anything past the
    /// last row plays like the last row.
    pub fn difficulty(&self, level: u32) -> &DifficultyLevel {
        let last = self.difficulty.len().saturating_sub(1);
        let index = (level.max(1) as usize - 1).min(last);
        &self.difficulty[index]
    }

    /// Check the rules the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty.is_empty() {
            return Err(ConfigError::Invalid("difficulty table is empty"));
        }
        if self.difficulty.iter().any(|d| d.operators.is_empty()) {
            return Err(ConfigError::Invalid("difficulty level without operators"));
        }
        if self.difficulty.iter().any(|d| d.max_operand < 1) {
            return Err(ConfigError::Invalid("max_operand must be at least 1"));
        }
        if self.difficulty.iter().any(|d| d.max_operand > MAX_OPERAND_LIMIT) {
            return Err(ConfigError::Invalid("max_operand must be at most 10000"));
        }
        if self.lose_range <= self.detection_range {
            return Err(ConfigError::Invalid("lose_range must exceed detection_range"));
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::Invalid("initial_lives must be positive"));
        }
        if self.level_up_every == 0 {
            return Err(ConfigError::Invalid("level_up_every must be positive"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Config handed over by a host page, if any; defaults on any error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }

    /// Load config from a JSON file, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }
}
