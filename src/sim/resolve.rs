//! Collision and scoring
//!
//! Runs after every entity has moved. Enemy contact costs a life; touching a
//! tile while no answer is pending selects it.

use super::state::{DeferredAction, EndReason, GameEvent, GamePhase, GameState};

/// Check enemy and tile contact for the current frame
pub fn resolve_collisions(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if !state.is_invulnerable() {
        let player = &state.player;
        let hit = state
            .enemies
            .iter()
            .any(|e| player.pos.distance(e.pos) < (player.size + e.size) / 2.0);
        if hit {
            lose_life(state);
            if state.phase != GamePhase::Playing {
                return;
            }
        }
    }

    if !state.answer_selected {
        let size = state.player.size;
        if let Some(index) = state.board.touched_by(state.player.pos, size) {
            select_answer(state, index);
        }
    }
}

/// Take a life; the last one ends the game
pub fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    log::debug!("Life lost, {} left", state.lives);
    state.events.push(GameEvent::LifeLost {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        state.end_game(EndReason::LivesExhausted);
        return;
    }

    state.reposition_player();
    state.invulnerable_until = state.frame + state.config.respawn_grace_frames;
    state.schedule(
        state.config.respawn_grace_frames,
        DeferredAction::RespawnEnemies,
    );
}

/// Score the tile at `index` and schedule the next question
pub fn select_answer(state: &mut GameState, index: usize) {
    let Some(tile) = state.board.tiles.get(index) else {
        return;
    };
    let value = tile.value;
    let is_correct = tile.is_correct;

    state.answer_selected = true;
    state.board.reveal(index);

    if is_correct {
        let points =
            state.config.points_per_correct + state.level * state.config.level_bonus_factor;
        state.score += points;
        state.correct_answers += 1;
        log::debug!("Correct: {value} (+{points}, score {})", state.score);
        state.events.push(GameEvent::AnswerCorrect { value, points });

        state.reposition_player();
        state.schedule(
            state.config.correct_feedback_frames,
            DeferredAction::NextQuestion {
                after_correct: true,
            },
        );
    } else {
        let correct = state.board.question.correct_answer;
        state.score = state.score.saturating_sub(state.config.wrong_answer_penalty);
        state.wrong_answers += 1;
        log::debug!("Wrong: {value}, expected {correct} (score {})", state.score);
        state.events.push(GameEvent::AnswerWrong { value, correct });

        state.schedule(
            state.config.wrong_feedback_frames,
            DeferredAction::NextQuestion {
                after_correct: false,
            },
        );
    }
}

/// Run every deferred action due this frame
pub fn fire_scheduled(state: &mut GameState) {
    for action in state.take_due_events() {
        match action {
            DeferredAction::NextQuestion { after_correct } => {
                let every = state.config.level_up_every.max(1);
                if after_correct
                    && state.correct_answers > 0
                    && state.correct_answers % every == 0
                {
                    state.level_up();
                }
                state.new_question();
            }
            DeferredAction::RespawnEnemies => state.respawn_enemies(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::answers::Highlight;

    fn new_state() -> GameState {
        GameState::new(GameConfig::default(), 42)
    }

    fn index_of(state: &GameState, correct: bool) -> usize {
        state
            .board
            .tiles
            .iter()
            .position(|t| t.is_correct == correct)
            .unwrap()
    }

    #[test]
    fn test_correct_answer_scores_with_level_bonus() {
        let mut state = new_state();
        let index = index_of(&state, true);
        select_answer(&mut state, index);

        assert_eq!(state.score, 110);
        assert_eq!(state.correct_answers, 1);
        assert!(state.answer_selected);
        assert_eq!(state.board.tiles[index].highlighted, Highlight::Correct);
        assert_eq!(state.scheduled.len(), 1);
        assert_eq!(state.scheduled[0].fire_at_frame, 90);
    }

    #[test]
    fn test_wrong_answer_penalty_floors_at_zero() {
        let mut state = new_state();
        state.score = 10;
        let index = index_of(&state, false);
        let correct = index_of(&state, true);
        select_answer(&mut state, index);

        assert_eq!(state.score, 0);
        assert_eq!(state.wrong_answers, 1);
        assert_eq!(state.board.tiles[index].highlighted, Highlight::Wrong);
        assert_eq!(state.board.tiles[correct].highlighted, Highlight::Correct);
        assert_eq!(state.scheduled[0].fire_at_frame, 120);
    }

    #[test]
    fn test_latch_blocks_second_selection() {
        let mut state = new_state();
        state.enemies.clear();
        let tile_pos = state.board.tiles[0].pos;
        state.player.pos = tile_pos;
        resolve_collisions(&mut state);
        let score = state.score;
        let answered = state.correct_answers + state.wrong_answers;
        assert_eq!(answered, 1);

        // Still latched: touching any tile again changes nothing
        for i in 0..state.board.tiles.len() {
            state.player.pos = state.board.tiles[i].pos;
            resolve_collisions(&mut state);
        }
        assert_eq!(state.score, score);
        assert_eq!(state.correct_answers + state.wrong_answers, 1);
    }

    #[test]
    fn test_enemy_contact_loses_one_life() {
        let mut state = new_state();
        state.board.tiles.clear();
        let pos = state.player.pos;
        for enemy in &mut state.enemies {
            enemy.pos = pos;
        }
        resolve_collisions(&mut state);
        assert_eq!(state.lives, 2);
        assert!(state.is_invulnerable());
        assert!(!state.maze.collides(state.player.pos, state.player.collision_size()));
        assert!(state.scheduled.iter().any(|e| e.action == DeferredAction::RespawnEnemies));

        // Grace window: contact is ignored
        let pos = state.player.pos;
        for enemy in &mut state.enemies {
            enemy.pos = pos;
        }
        resolve_collisions(&mut state);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = new_state();
        state.lives = 1;
        lose_life(&mut state);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let record = state.record.as_ref().unwrap();
        assert!(!record.completed);

        // Nothing underflows once over
        lose_life(&mut state);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_third_correct_levels_up() {
        let mut state = new_state();
        let layout = state.maze.layout_index;
        state.correct_answers = 2;
        let index = index_of(&state, true);
        select_answer(&mut state, index);
        assert_eq!(state.correct_answers, 3);

        state.frame = state.scheduled[0].fire_at_frame;
        fire_scheduled(&mut state);

        assert_eq!(state.level, 2);
        assert_eq!(state.time_remaining, 120);
        assert_ne!(state.maze.layout_index, layout);
        assert_eq!(state.enemies.len(), 7);
        assert!(!state.answer_selected);
        assert!(state.events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_wrong_answer_never_levels_up() {
        let mut state = new_state();
        state.correct_answers = 3;
        let index = index_of(&state, false);
        select_answer(&mut state, index);
        state.frame = state.scheduled[0].fire_at_frame;
        fire_scheduled(&mut state);
        assert_eq!(state.level, 1);
        assert!(!state.answer_selected);
    }
}
