use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::session::countdown::{CountdownStep, SEQUENCE};
use crate::ui::theme::Theme;

pub struct CountdownView<'a> {
    pub step: CountdownStep,
    pub index: usize,
    pub theme: &'a Theme,
}

impl<'a> CountdownView<'a> {
    pub fn new(step: CountdownStep, index: usize, theme: &'a Theme) -> Self {
        Self { step, index, theme }
    }
}

/// One dot per step, filled up to and including the current one.
pub fn progress_dots(index: usize) -> String {
    (0..SEQUENCE.len())
        .map(|i| if i <= index { '\u{25CF}' } else { '\u{25CB}' })
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Widget for CountdownView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label_color = match self.step {
            CountdownStep::Go => colors.correct(),
            CountdownStep::Number(_) => colors.accent(),
        };

        let top_pad = area.height.saturating_sub(5) / 2;
        let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::from("")).collect();
        lines.push(Line::from(Span::styled(
            "Get ready",
            Style::default().fg(colors.muted()),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            self.step.label(),
            Style::default().fg(label_color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            progress_dots(self.index),
            Style::default().fg(colors.accent_dim()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(colors.bg()))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_track_position() {
        assert_eq!(progress_dots(0), "\u{25CF} \u{25CB} \u{25CB} \u{25CB}");
        assert_eq!(progress_dots(3), "\u{25CF} \u{25CF} \u{25CF} \u{25CF}");
    }
}
