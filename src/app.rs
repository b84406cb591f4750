use std::time::Duration;

use crate::generator::ProblemId;
use crate::session::controller::{Screen, SessionController, SessionEvent};
use crate::store::schema::ThemePreference;
use crate::ui::theme::Theme;

const MAX_INPUT_LEN: usize = 12;

/// Terminal-side state wrapped around the session controller: the answer
/// being typed, the active palette and view toggles.
pub struct App {
    pub controller: SessionController,
    pub input: String,
    input_problem: Option<ProblemId>,
    pub theme: Theme,
    pub theme_preference: ThemePreference,
    pub history_expanded: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: SessionController) -> Self {
        let theme_preference = controller.storage().theme().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read theme preference");
            ThemePreference::default()
        });
        Self {
            controller,
            input: String::new(),
            input_problem: None,
            theme: Theme::for_preference(theme_preference),
            theme_preference,
            history_expanded: false,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let events = self.controller.advance(elapsed);
        self.sync_input();
        events
    }

    /// A new problem always starts with an empty answer line.
    fn sync_input(&mut self) {
        let current = self.controller.current_problem().map(|p| p.id);
        if current != self.input_problem {
            self.input.clear();
            self.input_problem = current;
        }
    }

    pub fn start_drill(&mut self) {
        if self.controller.start() {
            self.input.clear();
            self.input_problem = None;
        }
    }

    pub fn skip_countdown(&mut self) {
        self.controller.skip_countdown();
        self.sync_input();
    }

    pub fn type_char(&mut self, ch: char) {
        if !self.controller.input_enabled() || ch.is_control() {
            return;
        }
        if self.input.chars().count() < MAX_INPUT_LEN {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.controller.input_enabled() {
            self.input.pop();
        }
    }

    pub fn submit_input(&mut self) {
        if !self.controller.input_enabled() {
            return;
        }
        let raw = std::mem::take(&mut self.input);
        self.controller.submit(&raw);
        self.sync_input();
    }

    pub fn skip_problem(&mut self) {
        if self.controller.skip_problem().is_some() {
            self.sync_input();
        }
    }

    pub fn request_exit(&mut self) {
        self.controller.request_exit();
    }

    pub fn cancel_exit(&mut self) {
        self.controller.cancel_exit();
    }

    pub fn confirm_exit(&mut self) {
        if self.controller.confirm_exit() {
            self.sync_input();
        }
    }

    pub fn go_home(&mut self) {
        self.controller.go_home();
        self.sync_input();
    }

    pub fn toggle_sound(&mut self) {
        self.controller.toggle_sound();
    }

    pub fn toggle_history(&mut self) {
        self.history_expanded = !self.history_expanded;
    }

    pub fn cycle_theme(&mut self) {
        self.theme_preference = self.theme_preference.next();
        self.theme = Theme::for_preference(self.theme_preference);
        if let Err(e) = self
            .controller
            .storage_mut()
            .set_theme(self.theme_preference)
        {
            tracing::warn!(error = %e, "could not save theme preference");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;
    use crate::preset::Preset;
    use crate::sound::Muted;
    use crate::store::Storage;

    fn make_app() -> App {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap());
        let controller = SessionController::new(
            Preset::quick_drill(),
            Storage::in_memory(),
            Box::new(Muted),
            Box::new(clock),
        )
        .with_seed(3);
        App::new(controller)
    }

    fn into_drill(app: &mut App) {
        app.start_drill();
        app.skip_countdown();
        assert_eq!(app.screen(), Screen::Drill);
    }

    #[test]
    fn typing_is_ignored_outside_drill() {
        let mut app = make_app();
        app.type_char('4');
        assert!(app.input.is_empty());
    }

    #[test]
    fn submit_clears_input_and_records() {
        let mut app = make_app();
        into_drill(&mut app);
        let answer = app.controller.current_problem().unwrap().correct_answer;
        for ch in answer.to_string().chars() {
            app.type_char(ch);
        }
        app.submit_input();
        assert!(app.input.is_empty());
        assert_eq!(app.controller.drill().unwrap().correct_count, 1);

        // Locked during feedback
        app.type_char('9');
        assert!(app.input.is_empty());
        app.advance(Duration::from_millis(600));
        app.type_char('9');
        assert_eq!(app.input, "9");
    }

    #[test]
    fn input_is_capped_and_editable() {
        let mut app = make_app();
        into_drill(&mut app);
        for _ in 0..20 {
            app.type_char('1');
        }
        assert_eq!(app.input.len(), MAX_INPUT_LEN);
        app.backspace();
        assert_eq!(app.input.len(), MAX_INPUT_LEN - 1);
    }

    #[test]
    fn skip_clears_typed_text() {
        let mut app = make_app();
        into_drill(&mut app);
        app.type_char('7');
        app.skip_problem();
        assert!(app.input.is_empty());
        assert_eq!(app.controller.drill().unwrap().skipped_count, 1);
    }

    #[test]
    fn theme_cycle_persists() {
        let mut app = make_app();
        assert_eq!(app.theme_preference, ThemePreference::System);
        app.cycle_theme();
        assert_eq!(app.theme_preference, ThemePreference::Light);
        assert_eq!(
            app.controller.storage().theme().unwrap(),
            ThemePreference::Light
        );
    }

    #[test]
    fn exit_flow_returns_home() {
        let mut app = make_app();
        into_drill(&mut app);
        app.type_char('1');
        app.request_exit();
        app.type_char('2');
        assert_eq!(app.input, "1");
        app.confirm_exit();
        assert_eq!(app.screen(), Screen::Home);
        assert!(app.input.is_empty());
    }
}
