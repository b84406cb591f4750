use serde::{Deserialize, Serialize};

pub const KEY_THEME: &str = "mathdrill_theme";
pub const KEY_SOUND_ENABLED: &str = "mathdrill_sound_enabled";
pub const KEY_BEST_SCORE: &str = "mathdrill_best_score";
pub const KEY_LAST_SCORE: &str = "mathdrill_last_score";
pub const KEY_TOTAL_DRILLS: &str = "mathdrill_total_drills";
pub const KEY_HISTORY: &str = "mathdrill_history";
pub const KEY_CURRENT_STREAK: &str = "mathdrill_current_streak";
pub const KEY_LONGEST_STREAK: &str = "mathdrill_longest_streak";
pub const KEY_LAST_ACTIVITY_DATE: &str = "mathdrill_last_activity_date";

pub const ALL_KEYS: [&str; 9] = [
    KEY_THEME,
    KEY_SOUND_ENABLED,
    KEY_BEST_SCORE,
    KEY_LAST_SCORE,
    KEY_TOTAL_DRILLS,
    KEY_HISTORY,
    KEY_CURRENT_STREAK,
    KEY_LONGEST_STREAK,
    KEY_LAST_ACTIVITY_DATE,
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    /// light -> dark -> system -> light
    pub fn next(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
            ThemePreference::System => ThemePreference::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}
