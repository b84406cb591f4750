use crate::engine::scoring;
use crate::generator::Problem;
use crate::preset::ScoringRules;
use crate::session::input::{AnswerResult, Verdict};

/// Mutable state of the drill in progress.
#[derive(Clone, Debug)]
pub struct DrillState {
    pub score: i64,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub skipped_count: u32,
    pub results: Vec<AnswerResult>,
    pub time_remaining_ms: u64,
    pub current_problem: Option<Problem>,
}

impl DrillState {
    pub fn new(total_time_ms: u64) -> Self {
        Self {
            score: 0,
            correct_count: 0,
            incorrect_count: 0,
            skipped_count: 0,
            results: Vec::new(),
            time_remaining_ms: total_time_ms,
            current_problem: None,
        }
    }

    pub fn record(&mut self, result: AnswerResult, rules: &ScoringRules) {
        match result.verdict {
            Verdict::Correct => self.correct_count += 1,
            Verdict::Incorrect => self.incorrect_count += 1,
            Verdict::Skipped => self.skipped_count += 1,
        }
        self.score += scoring::points_for(result.verdict, rules);
        self.results.push(result);
    }

    pub fn answered(&self) -> usize {
        self.results.len()
    }

    /// Share of each outcome among answered problems, for the progress bar.
    pub fn outcome_shares(&self) -> (f64, f64, f64) {
        let total = self.results.len().max(1) as f64;
        (
            f64::from(self.correct_count) / total,
            f64::from(self.incorrect_count) / total,
            f64::from(self.skipped_count) / total,
        )
    }

    pub fn accuracy(&self) -> u32 {
        scoring::accuracy_percent(self.correct_count, self.incorrect_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Operation;
    use crate::preset::Preset;

    fn problem() -> Problem {
        Problem::new(Operation::Add, 20, 22, 42)
    }

    #[test]
    fn new_drill_is_empty() {
        let drill = DrillState::new(120_000);
        assert_eq!(drill.score, 0);
        assert_eq!(drill.answered(), 0);
        assert_eq!(drill.time_remaining_ms, 120_000);
        assert_eq!(drill.outcome_shares(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn record_keeps_counts_and_score_consistent() {
        let rules = Preset::quick_drill().scoring;
        let mut drill = DrillState::new(120_000);
        let p = problem();
        drill.record(AnswerResult::submitted(&p, "42"), &rules);
        drill.record(AnswerResult::submitted(&p, "41"), &rules);
        drill.record(AnswerResult::submitted(&p, ""), &rules);
        drill.record(AnswerResult::skipped(&p), &rules);
        drill.record(AnswerResult::submitted(&p, "42.0"), &rules);

        assert_eq!(drill.correct_count, 2);
        assert_eq!(drill.incorrect_count, 1);
        assert_eq!(drill.skipped_count, 2);
        assert_eq!(drill.answered(), 5);
        assert_eq!(
            drill.score,
            scoring::total_score(
                drill.correct_count,
                drill.incorrect_count,
                drill.skipped_count,
                &rules
            )
        );
        assert_eq!(drill.accuracy(), 67);
    }

    #[test]
    fn penalties_flow_into_score() {
        let rules = ScoringRules {
            correct_points: 1,
            incorrect_points: -1,
            skipped_points: 0,
        };
        let mut drill = DrillState::new(1_000);
        let p = problem();
        drill.record(AnswerResult::submitted(&p, "0"), &rules);
        drill.record(AnswerResult::submitted(&p, "1"), &rules);
        assert_eq!(drill.score, -2);
    }
}
