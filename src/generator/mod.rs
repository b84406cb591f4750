pub mod arithmetic;

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::preset::Preset;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Typographic symbol shown to the player.
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '\u{2212}',
            Operation::Multiply => '\u{00D7}',
            Operation::Divide => '\u{00F7}',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemId(Uuid);

impl ProblemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProblemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p-{}", self.0.simple())
    }
}

/// A single arithmetic question. For division, `operand1` is the dividend
/// and `operand2` the divisor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub operation: Operation,
    pub operand1: i64,
    pub operand2: i64,
    pub correct_answer: i64,
}

impl Problem {
    pub fn new(operation: Operation, operand1: i64, operand2: i64, correct_answer: i64) -> Self {
        Self {
            id: ProblemId::new(),
            operation,
            operand1,
            operand2,
            correct_answer,
        }
    }

    pub fn display(&self) -> String {
        format!(
            "{} {} {} =",
            self.operand1,
            self.operation.symbol(),
            self.operand2
        )
    }
}

/// Pick an operation uniformly from the preset and generate a problem for it.
/// An empty operation list falls back to addition.
pub fn generate_for<R: Rng + ?Sized>(preset: &Preset, rng: &mut R) -> Problem {
    let operation = preset
        .operations
        .choose(rng)
        .copied()
        .unwrap_or(Operation::Add);
    arithmetic::generate(operation, &preset.ranges, rng)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn display_uses_unicode_symbols() {
        let p = Problem::new(Operation::Multiply, 17, 8, 136);
        assert_eq!(p.display(), "17 \u{00D7} 8 =");
        let p = Problem::new(Operation::Divide, 96, 4, 24);
        assert_eq!(p.display(), "96 \u{00F7} 4 =");
        let p = Problem::new(Operation::Subtract, 50, 8, 42);
        assert_eq!(p.display(), "50 \u{2212} 8 =");
    }

    #[test]
    fn problem_ids_are_unique() {
        let a = Problem::new(Operation::Add, 2, 2, 4);
        let b = Problem::new(Operation::Add, 2, 2, 4);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn generate_for_only_uses_preset_operations() {
        let mut preset = Preset::quick_drill();
        preset.operations = vec![Operation::Subtract, Operation::Divide];
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = generate_for(&preset, &mut rng);
            assert!(matches!(p.operation, Operation::Subtract | Operation::Divide));
        }
    }

    #[test]
    fn generate_for_empty_operations_falls_back_to_addition() {
        let mut preset = Preset::quick_drill();
        preset.operations.clear();
        let mut rng = SmallRng::seed_from_u64(1);
        let p = generate_for(&preset, &mut rng);
        assert_eq!(p.operation, Operation::Add);
    }

    #[test]
    fn all_operations_appear_over_many_draws() {
        let preset = Preset::quick_drill();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            seen.insert(generate_for(&preset, &mut rng).operation);
        }
        assert_eq!(seen.len(), 4);
    }
}
