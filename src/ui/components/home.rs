use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::preset::Preset;
use crate::session::controller::HomeStats;
use crate::store::schema::ThemePreference;
use crate::ui::theme::Theme;

pub struct HomeScreen<'a> {
    pub preset: &'a Preset,
    pub stats: &'a HomeStats,
    pub sound_enabled: bool,
    pub theme_preference: ThemePreference,
    pub theme: &'a Theme,
}

impl<'a> HomeScreen<'a> {
    pub fn new(
        preset: &'a Preset,
        stats: &'a HomeStats,
        sound_enabled: bool,
        theme_preference: ThemePreference,
        theme: &'a Theme,
    ) -> Self {
        Self {
            preset,
            stats,
            sound_enabled,
            theme_preference,
            theme,
        }
    }

    fn streak_text(&self) -> String {
        let streak = &self.stats.streak;
        match streak.current_streak {
            0 => format!("none yet (best {})", streak.longest_streak),
            1 => format!("1 day (best {})", streak.longest_streak),
            n => format!("{n} days (best {})", streak.longest_streak),
        }
    }
}

impl Widget for &HomeScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "mathdrill",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Timed mental arithmetic",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let preset_lines = vec![
            Line::from(Span::styled(
                format!("{} \u{00B7} {}s", self.preset.name, self.preset.time_limit_ms / 1000),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.preset.description.as_str(),
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(preset_lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[1], buf);

        let label = |text: &'static str| Span::styled(text, Style::default().fg(colors.muted()));
        let value = |text: String| {
            Span::styled(
                text,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )
        };
        let last = self
            .stats
            .last_score
            .as_ref()
            .map_or_else(|| "-".to_string(), |r| r.score.to_string());
        let stat_lines = vec![
            Line::from(vec![label("  Best score:   "), value(self.stats.best_score.to_string())]),
            Line::from(vec![label("  Last score:   "), value(last)]),
            Line::from(vec![label("  Streak:       "), value(self.streak_text())]),
            Line::from(vec![label("  Drills done:  "), value(self.stats.total_drills.to_string())]),
            Line::from(vec![
                label("  Sound: "),
                value(if self.sound_enabled { "on".into() } else { "off".into() }),
                label("   Theme: "),
                value(self.theme_preference.as_str().to_string()),
            ]),
        ];
        Paragraph::new(stat_lines).render(layout[2], buf);
    }
}
