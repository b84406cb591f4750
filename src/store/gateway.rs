use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::engine::streak::{StreakInfo, StreakState, StreakUpdate};
use crate::preset::HISTORY_LIMIT;
use crate::session::result::SessionRecord;
use crate::store::schema::{
    KEY_BEST_SCORE, KEY_CURRENT_STREAK, KEY_HISTORY, KEY_LAST_ACTIVITY_DATE, KEY_LAST_SCORE,
    KEY_LONGEST_STREAK, KEY_SOUND_ENABLED, KEY_THEME, KEY_TOTAL_DRILLS, ThemePreference,
};
use crate::store::{KeyValueStore, MemoryStore, StoreError};

/// Typed persistence operations over a [`KeyValueStore`].
pub struct Storage {
    backend: Box<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Values that no longer decode are treated as absent.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let value = match self.backend.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(None),
            Err(StoreError::Serialization(e)) => {
                tracing::warn!(key, error = %e, "ignoring unreadable stored value");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        match serde_json::from_value(value) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring stored value with unexpected shape");
                Ok(None)
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.backend.set(key, value)
    }

    pub fn theme(&self) -> Result<ThemePreference, StoreError> {
        Ok(self.load(KEY_THEME)?.unwrap_or_default())
    }

    pub fn set_theme(&mut self, theme: ThemePreference) -> Result<(), StoreError> {
        self.save(KEY_THEME, &theme)
    }

    pub fn sound_enabled(&self) -> Result<bool, StoreError> {
        Ok(self.load(KEY_SOUND_ENABLED)?.unwrap_or(true))
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.save(KEY_SOUND_ENABLED, &enabled)
    }

    pub fn best_score(&self) -> Result<i64, StoreError> {
        Ok(self.load(KEY_BEST_SCORE)?.unwrap_or(0))
    }

    /// Stores `score` only when it beats the current best. Returns whether it did.
    pub fn set_best_score(&mut self, score: i64) -> Result<bool, StoreError> {
        if score > self.best_score()? {
            self.save(KEY_BEST_SCORE, &score)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn last_score(&self) -> Result<Option<SessionRecord>, StoreError> {
        self.load(KEY_LAST_SCORE)
    }

    pub fn set_last_score(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        self.save(KEY_LAST_SCORE, record)
    }

    pub fn total_drills(&self) -> Result<u32, StoreError> {
        Ok(self.load(KEY_TOTAL_DRILLS)?.unwrap_or(0))
    }

    pub fn increment_total_drills(&mut self) -> Result<u32, StoreError> {
        let total = self.total_drills()?.saturating_add(1);
        self.save(KEY_TOTAL_DRILLS, &total)?;
        Ok(total)
    }

    /// Most recent first.
    pub fn history(&self) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self.load(KEY_HISTORY)?.unwrap_or_default())
    }

    pub fn add_to_history(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        let mut history = self.history()?;
        history.insert(0, record.clone());
        history.truncate(HISTORY_LIMIT);
        self.save(KEY_HISTORY, &history)
    }

    pub fn streak_state(&self) -> Result<StreakState, StoreError> {
        Ok(StreakState {
            current_streak: self.load(KEY_CURRENT_STREAK)?.unwrap_or(0),
            longest_streak: self.load(KEY_LONGEST_STREAK)?.unwrap_or(0),
            last_activity_date: self.load(KEY_LAST_ACTIVITY_DATE)?,
        })
    }

    /// Read-only: never writes the degraded count back.
    pub fn streak_info(&self, today: NaiveDate) -> Result<StreakInfo, StoreError> {
        Ok(self.streak_state()?.display(today))
    }

    pub fn update_streak(&mut self, today: NaiveDate) -> Result<StreakUpdate, StoreError> {
        let mut state = self.streak_state()?;
        let update = state.record_completion(today);
        if update.is_new_record {
            self.save(KEY_LONGEST_STREAK, &update.longest_streak)?;
        }
        self.save(KEY_CURRENT_STREAK, &update.current_streak)?;
        self.save(KEY_LAST_ACTIVITY_DATE, &today)?;
        Ok(update)
    }
}
