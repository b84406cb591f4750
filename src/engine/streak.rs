use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
}

/// Returned by the mutating path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub is_new_record: bool,
}

/// Returned by the display path; never written back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub is_active: bool,
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

impl StreakState {
    /// Same day keeps the streak, the next day extends it, anything else
    /// (including a date in the past) restarts it at 1.
    pub fn record_completion(&mut self, today: NaiveDate) -> StreakUpdate {
        match self.last_activity_date {
            None => self.current_streak = 1,
            Some(last) => match days_between(last, today) {
                0 => {}
                1 => self.current_streak = self.current_streak.saturating_add(1),
                _ => self.current_streak = 1,
            },
        }

        let is_new_record = self.current_streak > self.longest_streak;
        if is_new_record {
            self.longest_streak = self.current_streak;
        }
        self.last_activity_date = Some(today);

        StreakUpdate {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            is_new_record,
        }
    }

    /// A gap of more than one day reads as 0, but the stored count is left
    /// as-is until the next completion resets it.
    pub fn display(&self, today: NaiveDate) -> StreakInfo {
        let Some(last) = self.last_activity_date else {
            return StreakInfo {
                current_streak: self.current_streak,
                longest_streak: self.longest_streak,
                is_active: false,
            };
        };
        let diff = days_between(last, today);
        StreakInfo {
            current_streak: if diff > 1 { 0 } else { self.current_streak },
            longest_streak: self.longest_streak,
            is_active: diff <= 1,
        }
    }
}
