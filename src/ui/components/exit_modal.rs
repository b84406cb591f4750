use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Confirmation overlay; the drill clock keeps running behind it.
pub struct ExitModal<'a> {
    pub score: i64,
    pub answered: usize,
    pub theme: &'a Theme,
}

impl<'a> ExitModal<'a> {
    pub fn new(score: i64, answered: usize, theme: &'a Theme) -> Self {
        Self {
            score,
            answered,
            theme,
        }
    }
}

impl Widget for ExitModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" Leave drill? ")
            .border_style(Style::default().fg(colors.timer_low()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Progress from this drill will not be saved.",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score ", Style::default().fg(colors.muted())),
                Span::styled(
                    self.score.to_string(),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Answered ", Style::default().fg(colors.muted())),
                Span::styled(
                    self.answered.to_string(),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y] Leave  ", Style::default().fg(colors.incorrect())),
                Span::styled("[n/Esc] Keep going", Style::default().fg(colors.accent())),
            ]),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
