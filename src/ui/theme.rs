use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::store::schema::ThemePreference;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub bar_empty: String,
    pub correct: String,
    pub incorrect: String,
    pub skipped: String,
    pub timer_normal: String,
    pub timer_low: String,
    pub timer_critical: String,
    pub badge: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("mathdrill")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => tracing::warn!(
                        path = %user_theme_path.display(),
                        error = %e,
                        "ignoring unreadable user theme"
                    ),
                }
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    /// `System` has no terminal signal to follow, so it renders dark.
    pub fn for_preference(preference: ThemePreference) -> Self {
        let name = match preference {
            ThemePreference::Light => "light",
            ThemePreference::Dark | ThemePreference::System => "dark",
        };
        Self::load(name).unwrap_or_default()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "dark".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1b1d24".to_string(),
            fg: "#e4e6eb".to_string(),
            muted: "#7d8290".to_string(),
            accent: "#6ea8fe".to_string(),
            accent_dim: "#34405a".to_string(),
            border: "#3a3f4b".to_string(),
            border_focused: "#6ea8fe".to_string(),
            bar_empty: "#2a2e38".to_string(),
            correct: "#4ade80".to_string(),
            incorrect: "#f87171".to_string(),
            skipped: "#a1a1aa".to_string(),
            timer_normal: "#6ea8fe".to_string(),
            timer_low: "#fbbf24".to_string(),
            timer_critical: "#f87171".to_string(),
            badge: "#facc15".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && hex.is_ascii()
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn correct(&self) -> Color { Self::parse_color(&self.correct) }
    pub fn incorrect(&self) -> Color { Self::parse_color(&self.incorrect) }
    pub fn skipped(&self) -> Color { Self::parse_color(&self.skipped) }
    pub fn timer_normal(&self) -> Color { Self::parse_color(&self.timer_normal) }
    pub fn timer_low(&self) -> Color { Self::parse_color(&self.timer_low) }
    pub fn timer_critical(&self) -> Color { Self::parse_color(&self.timer_critical) }
    pub fn badge(&self) -> Color { Self::parse_color(&self.badge) }
}
