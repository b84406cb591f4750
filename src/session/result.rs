use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::scoring::{self, BenchmarkLevel};
use crate::preset::Preset;
use crate::session::drill::DrillState;

/// Persisted summary of one completed drill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: DateTime<Utc>,
    pub score: i64,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub skipped_count: u32,
    pub qpm: f64,
    pub accuracy_percent: u32,
    pub benchmark_level: BenchmarkLevel,
}

impl SessionRecord {
    pub fn from_drill(
        drill: &DrillState,
        preset: &Preset,
        elapsed_ms: u64,
        date: DateTime<Utc>,
    ) -> Self {
        let elapsed_secs = elapsed_ms as f64 / 1000.0;
        Self {
            date,
            score: drill.score,
            correct_count: drill.correct_count,
            incorrect_count: drill.incorrect_count,
            skipped_count: drill.skipped_count,
            qpm: scoring::questions_per_minute(drill.correct_count, elapsed_secs),
            accuracy_percent: drill.accuracy(),
            benchmark_level: scoring::classify(drill.score, &preset.benchmarks),
        }
    }

    pub fn total_answered(&self) -> u32 {
        self.correct_count + self.incorrect_count + self.skipped_count
    }
}
