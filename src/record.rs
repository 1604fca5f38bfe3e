//! Completed-game records and where they go

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Summary of one finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Host-supplied identity, absent when anonymous
    pub user_id: Option<u64>,
    pub score: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub total_questions: u32,
    /// Simulated play time in whole seconds
    pub duration_seconds: u32,
    pub level_reached: u32,
    /// The player still had lives when the run ended
    pub completed: bool,
}

impl GameRecord {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            user_id: None,
            score: state.score,
            correct_answers: state.correct_answers,
            wrong_answers: state.wrong_answers,
            total_questions: state.correct_answers + state.wrong_answers,
            duration_seconds: state.elapsed_secs(),
            level_reached: state.level,
            completed: state.lives > 0,
        }
    }

    /// Rounded share of correct answers, 0 with no questions
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        ((self.correct_answers as f64 / self.total_questions as f64) * 100.0).round() as u32
    }
}

/// Receives each finished run exactly once
pub trait RecordSink {
    fn submit(&mut self, record: &GameRecord);
}

/// Keeps records in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<GameRecord>,
}

impl RecordSink for MemorySink {
    fn submit(&mut self, record: &GameRecord) {
        self.records.push(record.clone());
    }
}

/// Writes each record as one JSON line at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl RecordSink for LogSink {
    fn submit(&mut self, record: &GameRecord) {
        match serde_json::to_string(record) {
            Ok(json) => log::info!("{json}"),
            Err(e) => log::error!("Failed to serialize game record: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(correct: u32, wrong: u32) -> GameRecord {
        GameRecord {
            user_id: Some(7),
            score: correct * 110,
            correct_answers: correct,
            wrong_answers: wrong,
            total_questions: correct + wrong,
            duration_seconds: 90,
            level_reached: 1,
            completed: true,
        }
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(record(0, 0).accuracy_percent(), 0);
        assert_eq!(record(2, 1).accuracy_percent(), 67);
        assert_eq!(record(1, 1).accuracy_percent(), 50);
        assert_eq!(record(4, 0).accuracy_percent(), 100);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(record(1, 0)).unwrap();
        for key in [
            "user_id",
            "score",
            "correct_answers",
            "wrong_answers",
            "total_questions",
            "duration_seconds",
            "level_reached",
            "completed",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::default();
        sink.submit(&record(1, 2));
        sink.submit(&record(3, 0));
        assert_eq!(sink.records.len(), 2);
        assert_eq!(sink.records[1].correct_answers, 3);
    }
}
