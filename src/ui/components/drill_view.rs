use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::controller::Feedback;
use crate::session::drill::DrillState;
use crate::session::input::Verdict;
use crate::session::timer::TimerLevel;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// Everything visible while a drill is running.
pub struct DrillView<'a> {
    pub drill: &'a DrillState,
    pub input: &'a str,
    pub feedback: Option<&'a Feedback>,
    pub time_fraction: f64,
    pub timer_level: TimerLevel,
    pub theme: &'a Theme,
}

impl<'a> DrillView<'a> {
    pub fn new(drill: &'a DrillState, input: &'a str, theme: &'a Theme) -> Self {
        Self {
            drill,
            input,
            feedback: None,
            time_fraction: 1.0,
            timer_level: TimerLevel::Normal,
            theme,
        }
    }

    pub fn feedback(mut self, feedback: Option<&'a Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn timer(mut self, fraction: f64, level: TimerLevel) -> Self {
        self.time_fraction = fraction;
        self.timer_level = level;
        self
    }
}

pub fn feedback_text(feedback: &Feedback) -> String {
    match feedback.verdict {
        Verdict::Correct => "\u{2713} Correct".to_string(),
        Verdict::Incorrect => format!("\u{2717} Answer: {}", feedback.correct_answer),
        Verdict::Skipped => "Skipped".to_string(),
    }
}

/// Cell boundaries of the correct, incorrect and skipped segments of the
/// outcome bar. Empty until something has been answered.
pub fn outcome_bar_ends(drill: &DrillState, width: u16) -> (u16, u16, u16) {
    if drill.answered() == 0 {
        return (0, 0, 0);
    }
    let (correct, incorrect, _) = drill.outcome_shares();
    let w = f64::from(width);
    let correct_end = (correct * w).round() as u16;
    let incorrect_end = ((correct + incorrect) * w).round() as u16;
    (correct_end.min(width), incorrect_end.min(width), width)
}

impl Widget for DrillView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        ProgressBar::timer(
            self.drill.time_remaining_ms,
            self.time_fraction,
            self.timer_level,
            self.theme,
        )
        .render(layout[0], buf);

        let counts = Line::from(vec![
            Span::styled("  Score ", Style::default().fg(colors.muted())),
            Span::styled(
                self.drill.score.to_string(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("    \u{2713} ", Style::default().fg(colors.correct())),
            Span::styled(self.drill.correct_count.to_string(), Style::default().fg(colors.fg())),
            Span::styled("  \u{2717} ", Style::default().fg(colors.incorrect())),
            Span::styled(self.drill.incorrect_count.to_string(), Style::default().fg(colors.fg())),
            Span::styled("  \u{21B7} ", Style::default().fg(colors.skipped())),
            Span::styled(self.drill.skipped_count.to_string(), Style::default().fg(colors.fg())),
        ]);
        Paragraph::new(counts).render(layout[1], buf);

        let bar = layout[2].inner(Margin::new(2, 0));
        let (correct_end, incorrect_end, skipped_end) = outcome_bar_ends(self.drill, bar.width);
        for offset in 0..bar.width {
            let color = if offset < correct_end {
                colors.correct()
            } else if offset < incorrect_end {
                colors.incorrect()
            } else if offset < skipped_end {
                colors.skipped()
            } else {
                colors.bar_empty()
            };
            buf[(bar.x + offset, bar.y)].set_bg(color);
        }

        let problem_text = self
            .drill
            .current_problem
            .as_ref()
            .map(|p| p.display())
            .unwrap_or_default();
        let top_pad = layout[3].height.saturating_sub(1) / 2;
        let mut problem_lines: Vec<Line> = (0..top_pad).map(|_| Line::from("")).collect();
        problem_lines.push(Line::from(Span::styled(
            problem_text,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )));
        Paragraph::new(problem_lines)
            .alignment(Alignment::Center)
            .render(layout[3], buf);

        let locked = self.feedback.is_some();
        let input_block = Block::bordered()
            .title(" Answer ")
            .border_style(Style::default().fg(if locked {
                colors.border()
            } else {
                colors.border_focused()
            }));
        let input_inner = input_block.inner(layout[4]);
        input_block.render(layout[4], buf);
        let cursor = if locked { "" } else { "\u{2588}" };
        Paragraph::new(Line::from(vec![
            Span::styled(self.input, Style::default().fg(colors.fg())),
            Span::styled(cursor, Style::default().fg(colors.accent())),
        ]))
        .alignment(Alignment::Center)
        .render(input_inner, buf);

        if let Some(feedback) = self.feedback {
            let color = match feedback.verdict {
                Verdict::Correct => colors.correct(),
                Verdict::Incorrect => colors.incorrect(),
                Verdict::Skipped => colors.skipped(),
            };
            Paragraph::new(Line::from(Span::styled(
                feedback_text(feedback),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(layout[5], buf);
        }
    }
}
