use serde::{Deserialize, Serialize};

use crate::preset::{Benchmarks, ScoringRules};
use crate::session::input::Verdict;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkLevel {
    BelowPassing,
    Passing,
    Good,
    Excellent,
}

impl BenchmarkLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            BenchmarkLevel::BelowPassing => "below_passing",
            BenchmarkLevel::Passing => "passing",
            BenchmarkLevel::Good => "good",
            BenchmarkLevel::Excellent => "excellent",
        }
    }

    pub fn display_text(self) -> &'static str {
        match self {
            BenchmarkLevel::Excellent => "Excellent!",
            BenchmarkLevel::Good => "Good",
            BenchmarkLevel::Passing => "Passing",
            BenchmarkLevel::BelowPassing => "Keep Practicing",
        }
    }
}

pub fn points_for(verdict: Verdict, rules: &ScoringRules) -> i64 {
    match verdict {
        Verdict::Correct => rules.correct_points,
        Verdict::Incorrect => rules.incorrect_points,
        Verdict::Skipped => rules.skipped_points,
    }
}

pub fn total_score(correct: u32, incorrect: u32, skipped: u32, rules: &ScoringRules) -> i64 {
    i64::from(correct) * rules.correct_points
        + i64::from(incorrect) * rules.incorrect_points
        + i64::from(skipped) * rules.skipped_points
}

/// Highest threshold first, inclusive lower bounds.
pub fn classify(score: i64, benchmarks: &Benchmarks) -> BenchmarkLevel {
    if score >= benchmarks.excellent {
        BenchmarkLevel::Excellent
    } else if score >= benchmarks.good {
        BenchmarkLevel::Good
    } else if score >= benchmarks.passing {
        BenchmarkLevel::Passing
    } else {
        BenchmarkLevel::BelowPassing
    }
}

/// Correct answers per minute, rounded to one decimal.
pub fn questions_per_minute(correct: u32, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    let qpm = f64::from(correct) / (elapsed_secs / 60.0);
    (qpm * 10.0).round() / 10.0
}

/// Skipped problems are left out of the denominator.
pub fn accuracy_percent(correct: u32, incorrect: u32) -> u32 {
    let answered = correct + incorrect;
    if answered == 0 {
        return 0;
    }
    (f64::from(correct) * 100.0 / f64::from(answered)).round() as u32
}
