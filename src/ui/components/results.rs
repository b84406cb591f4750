use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::controller::DrillOutcome;
use crate::ui::components::history_list::level_color;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct ResultsScreen<'a> {
    pub outcome: &'a DrillOutcome,
    pub theme: &'a Theme,
}

impl<'a> ResultsScreen<'a> {
    pub fn new(outcome: &'a DrillOutcome, theme: &'a Theme) -> Self {
        Self { outcome, theme }
    }
}

impl Widget for ResultsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let record = &self.outcome.record;

        let block = Block::bordered()
            .title(" Drill Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let mut title_spans = vec![
            Span::styled("Score ", Style::default().fg(colors.muted())),
            Span::styled(
                record.score.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if self.outcome.is_new_best {
            title_spans.push(Span::styled(
                "  \u{2605} New best!",
                Style::default().fg(colors.badge()).add_modifier(Modifier::BOLD),
            ));
        }
        Paragraph::new(Line::from(title_spans))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            record.benchmark_level.display_text(),
            Style::default()
                .fg(level_color(record.benchmark_level, colors))
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        let counts = Line::from(vec![
            Span::styled("  Correct ", Style::default().fg(colors.muted())),
            Span::styled(record.correct_count.to_string(), Style::default().fg(colors.correct())),
            Span::styled("   Incorrect ", Style::default().fg(colors.muted())),
            Span::styled(record.incorrect_count.to_string(), Style::default().fg(colors.incorrect())),
            Span::styled("   Skipped ", Style::default().fg(colors.muted())),
            Span::styled(record.skipped_count.to_string(), Style::default().fg(colors.skipped())),
        ]);
        Paragraph::new(counts).render(layout[2], buf);

        let rate = Line::from(vec![
            Span::styled("  Rate     ", Style::default().fg(colors.muted())),
            Span::styled(
                format!("{:.1} questions/min", record.qpm),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(rate).render(layout[3], buf);

        ProgressBar::new(
            "Accuracy",
            f64::from(record.accuracy_percent) / 100.0,
            self.theme,
        )
        .render(layout[4], buf);

        if let Some(streak) = self.outcome.streak {
            let mut spans = vec![
                Span::styled("  Streak   ", Style::default().fg(colors.muted())),
                Span::styled(
                    format!("{} day(s)", streak.current_streak),
                    Style::default().fg(colors.fg()),
                ),
            ];
            if streak.is_new_record && streak.current_streak > 1 {
                spans.push(Span::styled(
                    "  longest yet",
                    Style::default().fg(colors.badge()),
                ));
            }
            Paragraph::new(Line::from(spans)).render(layout[5], buf);
        }

        Paragraph::new(Line::from(vec![
            Span::styled("  [r/Enter] Retry  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Esc] Home", Style::default().fg(colors.accent())),
        ]))
        .render(layout[7], buf);
    }
}
