use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::session::timer::{self, TimerLevel};
use crate::ui::theme::Theme;

pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub caption: String,
    pub fill: Color,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, theme: &'a Theme) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        Self {
            label: label.to_string(),
            ratio,
            caption: format!("{:.0}%", ratio * 100.0),
            fill: theme.colors.accent(),
            theme,
        }
    }

    /// Remaining drill time, colored by urgency.
    pub fn timer(remaining_ms: u64, fraction: f64, level: TimerLevel, theme: &'a Theme) -> Self {
        let colors = &theme.colors;
        let fill = match level {
            TimerLevel::Normal => colors.timer_normal(),
            TimerLevel::Low => colors.timer_low(),
            TimerLevel::Critical => colors.timer_critical(),
        };
        Self {
            caption: timer::format_clock(remaining_ms),
            fill,
            ..Self::new("Time", fraction, theme)
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64).round() as u16;

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(self.fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let caption_x = inner.x + (inner.width.saturating_sub(self.caption.len() as u16)) / 2;
        buf.set_string(caption_x, inner.y, &self.caption, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_clamped() {
        let theme = Theme::default();
        assert_eq!(ProgressBar::new("x", 1.7, &theme).ratio, 1.0);
        assert_eq!(ProgressBar::new("x", -0.2, &theme).caption, "0%");
    }

    #[test]
    fn timer_caption_and_color_follow_level() {
        let theme = Theme::default();
        let bar = ProgressBar::timer(9_100, 0.075, TimerLevel::Critical, &theme);
        assert_eq!(bar.caption, "0:10");
        assert_eq!(bar.fill, theme.colors.timer_critical());
    }

    #[test]
    fn renders_caption_inside_border() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::new("Accuracy", 0.5, &theme).render(area, &mut buf);
        let row: String = (0..20u16).map(|x| buf[(x, 1u16)].symbol().to_string()).collect();
        assert!(row.contains("50%"));
    }
}
