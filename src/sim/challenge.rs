//! Challenge generation: arithmetic problems, trivia, and distractor choices
//!
//! Every challenge has exactly `CHOICE_COUNT` distinct, positive choices, one
//! of which is the answer. Subtraction and division derive their larger
//! operand from the smaller ones so answers are never negative or fractional.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::consts::CHOICE_COUNT;

/// Rejected random perturbations tolerated before switching to fixed offsets
pub const MAX_DISTRACTOR_ATTEMPTS: u32 = 50;

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    /// Build `(lhs, rhs, answer)` from two positive draws. For subtraction
    /// and division the draws are the right operand and the answer, and the
    /// left operand is derived from them.
    pub fn compose(self, x: i64, y: i64) -> (i64, i64, i64) {
        match self {
            Operator::Add => (x, y, x + y),
            Operator::Subtract => (x + y, x, y),
            Operator::Multiply => (x, y, x * y),
            Operator::Divide => (x * y, x, y),
        }
    }
}

/// Where a challenge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Arithmetic { lhs: i64, op: Operator, rhs: i64 },
    Trivia { index: usize },
}

/// The question currently awaiting an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub prompt: String,
    pub answer: i64,
    pub choices: [i64; CHOICE_COUNT],
    pub source: Source,
}

impl Challenge {
    /// Position of the answer among the choices
    pub fn correct_index(&self) -> usize {
        self.choices
            .iter()
            .position(|&c| c == self.answer)
            .unwrap_or_default()
    }

    pub fn is_correct(&self, index: usize) -> bool {
        self.choices.get(index) == Some(&self.answer)
    }
}

/// A trivia question with a whole-number answer
#[derive(Debug, Clone, Copy)]
pub struct Trivia {
    pub question: &'static str,
    pub answer: i64,
}

pub const TRIVIA: &[Trivia] = &[
    Trivia { question: "How many legs does a spider have?", answer: 8 },
    Trivia { question: "How many days are in a week?", answer: 7 },
    Trivia { question: "How many sides does a hexagon have?", answer: 6 },
    Trivia { question: "How many minutes are in an hour?", answer: 60 },
    Trivia { question: "How many continents are there?", answer: 7 },
    Trivia { question: "How many months have 31 days?", answer: 7 },
    Trivia { question: "How many hours are in a day?", answer: 24 },
    Trivia { question: "How many legs does an insect have?", answer: 6 },
    Trivia { question: "How many players does a soccer team field?", answer: 11 },
    Trivia { question: "How many colors are in a rainbow?", answer: 7 },
    Trivia { question: "How many planets orbit the Sun?", answer: 8 },
    Trivia { question: "How many strings does a standard guitar have?", answer: 6 },
    Trivia { question: "How many arms does an octopus have?", answer: 8 },
    Trivia { question: "How many keys are on a standard piano?", answer: 88 },
    Trivia { question: "How many weeks are in a year?", answer: 52 },
    Trivia { question: "How many degrees are in a right angle?", answer: 90 },
];

/// Operators unlocked at a tier
pub fn operators_for_tier(tier: u32) -> &'static [Operator] {
    match tier {
        0 | 1 => &[Operator::Add, Operator::Subtract],
        2 => &[Operator::Add, Operator::Subtract, Operator::Multiply],
        _ => &[
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
        ],
    }
}

/// Operand range for addition and subtraction
pub fn operand_range(tier: u32) -> RangeInclusive<i64> {
    let max = match tier {
        0 | 1 => 10,
        2 => 25,
        3 => 50,
        _ => 100,
    };
    1..=max
}

/// Factor range for multiplication and division
pub fn factor_range(tier: u32) -> RangeInclusive<i64> {
    1..=(4 + 2 * tier.max(1) as i64).min(12)
}

/// Half-width of the random perturbation used for distractors
pub fn distractor_spread(tier: u32) -> i64 {
    3 + 2 * tier.clamp(1, 6) as i64
}

/// Random arithmetic challenge for a tier
pub fn arithmetic<R: Rng>(tier: u32, rng: &mut R) -> Challenge {
    let op = operators_for_tier(tier)
        .choose(rng)
        .copied()
        .unwrap_or(Operator::Add);
    let range = match op {
        Operator::Add | Operator::Subtract => operand_range(tier),
        Operator::Multiply | Operator::Divide => factor_range(tier),
    };
    let x = rng.random_range(range.clone());
    let y = rng.random_range(range);
    let (lhs, rhs, answer) = op.compose(x, y);

    Challenge {
        prompt: format!("{} {} {} = ?", lhs, op.symbol(), rhs),
        answer,
        choices: choices_for(answer, tier, rng),
        source: Source::Arithmetic { lhs, op, rhs },
    }
}

/// Random trivia challenge
pub fn trivia<R: Rng>(tier: u32, rng: &mut R) -> Challenge {
    let index = rng.random_range(0..TRIVIA.len());
    let entry = TRIVIA[index];
    Challenge {
        prompt: entry.question.to_string(),
        answer: entry.answer,
        choices: choices_for(entry.answer, tier, rng),
        source: Source::Trivia { index },
    }
}

/// Even mix of arithmetic and trivia
pub fn quiz<R: Rng>(tier: u32, rng: &mut R) -> Challenge {
    if rng.random_bool(0.5) {
        arithmetic(tier, rng)
    } else {
        trivia(tier, rng)
    }
}

/// The answer plus distractors, shuffled.
///
/// Random perturbations are tried first; once `MAX_DISTRACTOR_ATTEMPTS` are
/// rejected the remaining slots are filled from +1, -1, +2, -2, ... which
/// always terminates because values above the answer are never rejected for
/// being non-positive.
pub fn choices_for<R: Rng>(answer: i64, tier: u32, rng: &mut R) -> [i64; CHOICE_COUNT] {
    let spread = distractor_spread(tier);
    let mut choices = Vec::with_capacity(CHOICE_COUNT);
    choices.push(answer);

    let mut attempts = 0;
    while choices.len() < CHOICE_COUNT && attempts < MAX_DISTRACTOR_ATTEMPTS {
        attempts += 1;
        let candidate = answer + rng.random_range(-spread..=spread);
        if candidate > 0 && !choices.contains(&candidate) {
            choices.push(candidate);
        }
    }

    let mut step = 1;
    while choices.len() < CHOICE_COUNT {
        for candidate in [answer + step, answer - step] {
            if choices.len() < CHOICE_COUNT && candidate > 0 && !choices.contains(&candidate) {
                choices.push(candidate);
            }
        }
        step += 1;
    }

    choices.shuffle(rng);
    let mut out = [0; CHOICE_COUNT];
    out.copy_from_slice(&choices);
    out
}
