use serde::{Deserialize, Serialize};

use crate::generator::Operation;

pub const TIMER_TICK_MS: u64 = 100;
pub const LOW_TIME_THRESHOLD: f64 = 0.25;
pub const CRITICAL_TIME_THRESHOLD: f64 = 0.10;

pub const COUNTDOWN_TICK_MS: u64 = 700;
pub const COUNTDOWN_GO_MS: u64 = 500;

pub const FEEDBACK_DISPLAY_MS: u64 = 600;

pub const HISTORY_LIMIT: usize = 20;

/// Inclusive bounds for the first factor of a multiplication problem.
pub const TIMES_TABLE_MIN: i64 = 2;
pub const TIMES_TABLE_MAX: i64 = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionBounds {
    pub max_dividend: i64,
    pub max_divisor: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRanges {
    pub integers: IntegerRange,
    pub division: DivisionBounds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub correct_points: i64,
    pub incorrect_points: i64,
    pub skipped_points: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benchmarks {
    pub passing: i64,
    pub good: i64,
    pub excellent: i64,
}

/// Configuration bundle for one kind of drill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub time_limit_ms: u64,
    pub operations: Vec<Operation>,
    pub ranges: NumberRanges,
    pub scoring: ScoringRules,
    pub benchmarks: Benchmarks,
}

impl Preset {
    /// Two minutes of the four basic operations on double-digit numbers, no penalties.
    pub fn quick_drill() -> Self {
        Self {
            id: "quick".to_string(),
            name: "Quick Drill".to_string(),
            description: "Two minutes of pure arithmetic. Only +, \u{2212}, \u{00D7}, \u{00F7} \
                          and double digit numbers. No penalties."
                .to_string(),
            time_limit_ms: 120_000,
            operations: Operation::ALL.to_vec(),
            ranges: NumberRanges {
                integers: IntegerRange { min: 2, max: 99 },
                division: DivisionBounds {
                    max_dividend: 144,
                    max_divisor: 12,
                },
            },
            scoring: ScoringRules {
                correct_points: 1,
                incorrect_points: 0,
                skipped_points: 0,
            },
            benchmarks: Benchmarks {
                passing: 40,
                good: 55,
                excellent: 70,
            },
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::quick_drill()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_drill_matches_published_rules() {
        let preset = Preset::quick_drill();
        assert_eq!(preset.time_limit_ms, 120_000);
        assert_eq!(preset.operations.len(), 4);
        assert_eq!(preset.ranges.integers, IntegerRange { min: 2, max: 99 });
        assert_eq!(preset.scoring.correct_points, 1);
        assert_eq!(preset.scoring.incorrect_points, 0);
        assert_eq!(preset.benchmarks.excellent, 70);
    }

    #[test]
    fn countdown_holds_are_whole_timer_ticks() {
        assert_eq!(COUNTDOWN_TICK_MS % TIMER_TICK_MS, 0);
        assert_eq!(COUNTDOWN_GO_MS % TIMER_TICK_MS, 0);
        assert_eq!(FEEDBACK_DISPLAY_MS % TIMER_TICK_MS, 0);
    }
}
