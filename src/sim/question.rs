//! Arithmetic questions and wrong-answer generation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DifficultyLevel, MAX_OPERAND_LIMIT, Operator};

/// Draws before falling back to deterministic distractors
const MAX_DISTRACTOR_DRAWS: u32 = 1000;

/// A live question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// e.g. `7 × 8 = ?`
    pub text: String,
    pub left: i32,
    pub right: i32,
    pub operator: Operator,
    pub correct_answer: i32,
    pub difficulty_label: String,
}

/// Build a question for the given difficulty
pub fn generate_question(difficulty: &DifficultyLevel, rng: &mut impl Rng) -> Question {
    let max = difficulty.max_operand.clamp(1, MAX_OPERAND_LIMIT);
    let operator = if difficulty.operators.is_empty() {
        Operator::Add
    } else {
        difficulty.operators[rng.random_range(0..difficulty.operators.len())]
    };

    let (left, right, answer) = match operator {
        Operator::Add => {
            let a = rng.random_range(1..=max);
            let b = rng.random_range(1..=max);
            (a, b, a + b)
        }
        Operator::Sub => {
            // Minuend of at least 2 keeps the answer positive
            let a = (rng.random_range(0..max) + max / 2).max(2);
            let b = rng.random_range(1..a);
            (a, b, a - b)
        }
        Operator::Mul => {
            let limit = (max / 3).clamp(1, 15);
            let a = rng.random_range(1..=limit);
            let b = rng.random_range(1..=limit);
            (a, b, a * b)
        }
        Operator::Div => {
            let limit = (max / 2).clamp(1, 20);
            let quotient = rng.random_range(1..=limit);
            let divisor = rng.random_range(1..=12);
            (quotient * divisor, divisor, quotient)
        }
    };

    Question {
        text: format!("{left} {} {right} = ?", operator.symbol()),
        left,
        right,
        operator,
        correct_answer: answer,
        difficulty_label: difficulty.name.clone(),
    }
}

/// Plausible wrong answers: positive, distinct, never equal to `correct`.
///
/// Small answers draw from 1..=20; larger ones are perturbed by up to
/// `max(5, 30%)` of the correct value.
pub fn distractors(correct: i32, count: usize, rng: &mut impl Rng) -> Vec<i32> {
    let mut values: Vec<i32> = Vec::with_capacity(count);
    let mut draws = 0;

    while values.len() < count && draws < MAX_DISTRACTOR_DRAWS {
        draws += 1;
        let candidate = if correct <= 10 {
            rng.random_range(1..=20)
        } else {
            let variance = (correct * 3 / 10).max(5);
            correct + rng.random_range(-variance..variance)
        };
        if candidate > 0 && candidate != correct && !values.contains(&candidate) {
            values.push(candidate);
        }
    }

    // Guarantees termination for pathological inputs
    let mut next = correct.max(0) + 1;
    while values.len() < count {
        if !values.contains(&next) {
            values.push(next);
        }
        next += 1;
    }

    values
}
