//! Property-based tests for the simulation invariants.
//!
//! Run with: cargo test --release prop_sim

#![allow(clippy::unwrap_used)]

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use math_shark::GameConfig;
use math_shark::consts::*;
use math_shark::sim::enemy::spawn_enemies;
use math_shark::sim::kinematics::wrap_and_clamp;
use math_shark::sim::maze::CellFilter;
use math_shark::sim::resolve::{lose_life, select_answer};
use math_shark::sim::{
    AiTuning, AnswerBoard, Direction, Enemy, EnemyMode, GamePhase, GameState, Maze, Player,
    generate_question,
};

fn direction(bits: u8) -> Direction {
    Direction {
        up: bits & 1 != 0,
        down: bits & 2 != 0,
        left: bits & 4 != 0,
        right: bits & 8 != 0,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every board has one correct tile carrying the answer, and no repeats.
    #[test]
    fn prop_board_has_one_correct_distinct_tiles(seed in any::<u64>(), level in 1u32..=12) {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let maze = Maze::for_level(level);
        let question = generate_question(config.difficulty(level), &mut rng);
        let correct = question.correct_answer;
        let board = AnswerBoard::generate(question, &maze, Vec2::new(400.0, 300.0), 0, &mut rng);

        prop_assert_eq!(board.tiles.len(), TILE_COUNT);
        let correct_tiles: Vec<_> = board.tiles.iter().filter(|t| t.is_correct).collect();
        prop_assert_eq!(correct_tiles.len(), 1);
        prop_assert_eq!(correct_tiles[0].value, correct);

        let mut values: Vec<i32> = board.tiles.iter().map(|t| t.value).collect();
        values.sort();
        values.dedup();
        prop_assert_eq!(values.len(), TILE_COUNT);
    }

    /// Player movement never ends inside a wall.
    #[test]
    fn prop_player_never_enters_walls(
        seed in any::<u64>(),
        level in 1u32..=3,
        inputs in prop::collection::vec(0u8..16, 1..400),
    ) {
        let maze = Maze::for_level(level);
        let open = maze.open_cells(&CellFilter::with_border(1));
        let start = open[(seed % open.len() as u64) as usize];
        let mut player = Player { pos: maze.cell_center(start), ..Default::default() };
        prop_assert!(!maze.collides(player.pos, player.collision_size()));

        for bits in inputs {
            player.step(direction(bits), &maze);
            prop_assert!(!maze.collides(player.pos, player.collision_size()), "{}", player.pos);
        }
    }

    /// Enemy movement never ends inside a wall.
    #[test]
    fn prop_enemies_never_enter_walls(seed in any::<u64>(), level in 1u32..=10) {
        let config = GameConfig::default();
        let tuning = AiTuning::from(&config);
        let mut rng = Pcg32::seed_from_u64(seed);
        let maze = Maze::for_level(level);
        let player = Vec2::new(
            rng_f32(&mut rng) * CANVAS_WIDTH,
            rng_f32(&mut rng) * CANVAS_HEIGHT,
        );
        let mut enemies = spawn_enemies(&maze, level, &config, player, &mut rng);

        for _ in 0..300 {
            for enemy in &mut enemies {
                enemy.update(player, &maze, &tuning, &mut rng);
                prop_assert!(!maze.collides(enemy.pos, enemy.collision_size()), "{}", enemy.pos);
            }
        }
    }

    /// Score follows the scoring rules and the penalty floors at zero.
    #[test]
    fn prop_score_never_underflows(seed in any::<u64>(), picks in prop::collection::vec(any::<bool>(), 1..30)) {
        let mut state = GameState::new(GameConfig::default(), seed);
        let mut expected: u32 = 0;

        for correct in picks {
            let index = state.board.tiles.iter().position(|t| t.is_correct == correct).unwrap();
            select_answer(&mut state, index);
            expected = if correct {
                expected + 110
            } else {
                expected.saturating_sub(25)
            };
            prop_assert_eq!(state.score, expected);

            // Next pick without waiting for the scheduled question
            state.answer_selected = false;
            state.scheduled.clear();
        }
    }

    /// Lives never wrap below zero and the last one ends the game.
    #[test]
    fn prop_lives_never_negative(seed in any::<u64>(), hits in 0u32..10) {
        let mut state = GameState::new(GameConfig::default(), seed);
        for _ in 0..hits {
            lose_life(&mut state);
        }
        prop_assert_eq!(state.lives, 3u32.saturating_sub(hits));
        prop_assert_eq!(state.phase == GamePhase::GameOver, hits >= 3);
        prop_assert_eq!(state.record.is_some(), hits >= 3);
    }

    /// Mode only changes past the threshold for the current mode.
    #[test]
    fn prop_hysteresis(seed in any::<u64>(), distance in 0.0f32..400.0) {
        let tuning = AiTuning { detection_range: 120.0, lose_range: 180.0 };
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut patrol = Enemy::new(Vec2::ZERO, 1.5, 0, &mut rng);
        patrol.update_mode(distance, &tuning, &mut rng);
        let expected = if distance < 120.0 { EnemyMode::Chase } else { EnemyMode::Patrol };
        prop_assert_eq!(patrol.mode, expected);

        let mut chase = Enemy::new(Vec2::ZERO, 1.5, 0, &mut rng);
        chase.mode = EnemyMode::Chase;
        chase.update_mode(distance, &tuning, &mut rng);
        let expected = if distance > 180.0 { EnemyMode::Patrol } else { EnemyMode::Chase };
        prop_assert_eq!(chase.mode, expected);
    }

    /// Leaving past either side edge reappears on the other.
    #[test]
    fn prop_horizontal_wrap(overshoot in 0.01f32..50.0, y in 100.0f32..500.0) {
        let margin = PLAYER_SIZE / 2.0;

        let right = wrap_and_clamp(Vec2::new(CANVAS_WIDTH + margin + overshoot, y), PLAYER_SIZE);
        prop_assert_eq!(right, Vec2::new(-margin, y));

        let left = wrap_and_clamp(Vec2::new(-margin - overshoot, y), PLAYER_SIZE);
        prop_assert_eq!(left, Vec2::new(CANVAS_WIDTH + margin, y));
    }
}

fn rng_f32(rng: &mut Pcg32) -> f32 {
    use rand::Rng;
    rng.random::<f32>()
}

#[test]
fn test_wrap_one_past_edge() {
    let margin = PLAYER_SIZE / 2.0;
    let pos = wrap_and_clamp(Vec2::new(CANVAS_WIDTH + margin + 1.0, 300.0), PLAYER_SIZE);
    assert_eq!(pos.x, -margin);
}
