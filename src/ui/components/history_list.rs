use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::BenchmarkLevel;
use crate::session::result::SessionRecord;
use crate::ui::theme::{Theme, ThemeColors};

pub struct HistoryList<'a> {
    pub history: &'a [SessionRecord],
    pub theme: &'a Theme,
}

impl<'a> HistoryList<'a> {
    pub fn new(history: &'a [SessionRecord], theme: &'a Theme) -> Self {
        Self { history, theme }
    }
}

pub fn level_color(level: BenchmarkLevel, colors: &ThemeColors) -> ratatui::style::Color {
    match level {
        BenchmarkLevel::BelowPassing => colors.muted(),
        BenchmarkLevel::Passing => colors.fg(),
        BenchmarkLevel::Good => colors.accent(),
        BenchmarkLevel::Excellent => colors.correct(),
    }
}

pub fn history_row(record: &SessionRecord) -> String {
    format!(
        "{}  {:>4}  {:>3}\u{2713} {:>3}\u{2717} {:>3}\u{21B7}  {:>5.1} qpm  {:>3}%",
        record.date.format("%Y-%m-%d %H:%M"),
        record.score,
        record.correct_count,
        record.incorrect_count,
        record.skipped_count,
        record.qpm,
        record.accuracy_percent,
    )
}

impl Widget for HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Recent Drills ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.history.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No drills yet. Finish one to see it here.",
                Style::default().fg(colors.muted()),
            )))
            .render(inner, buf);
            return;
        }

        let header = Line::from(Span::styled(
            "  Date              Score   \u{2713}    \u{2717}    \u{21B7}      Rate   Acc",
            Style::default().fg(colors.muted()).add_modifier(Modifier::BOLD),
        ));
        let mut lines = vec![header];
        lines.extend(
            self.history
                .iter()
                .take(inner.height.saturating_sub(1) as usize)
                .map(|record| {
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(
                            history_row(record),
                            Style::default().fg(level_color(record.benchmark_level, colors)),
                        ),
                    ])
                }),
        );
        Paragraph::new(lines).render(inner, buf);
    }
}
