use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::clock::Clock;
use crate::engine::streak::{StreakInfo, StreakUpdate};
use crate::generator::{self, Problem};
use crate::preset::{FEEDBACK_DISPLAY_MS, Preset, TIMER_TICK_MS};
use crate::session::countdown::{Countdown, CountdownEvent, CountdownStep};
use crate::session::drill::DrillState;
use crate::session::input::{AnswerResult, Verdict};
use crate::session::result::SessionRecord;
use crate::session::timer::{DrillTimer, TimerEvent, TimerLevel};
use crate::sound::{SoundEvent, SoundSink};
use crate::store::{Storage, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    Countdown,
    Drill,
    Results,
}

/// Notable things that happened while time advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Countdown(CountdownStep),
    DrillStarted,
    NextProblem,
    TimeLow,
    TimeCritical,
    Finished,
}

/// Verdict shown while input is locked after a correct or incorrect answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub verdict: Verdict,
    pub correct_answer: i64,
    remaining_ms: u64,
}

impl Feedback {
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrillOutcome {
    pub record: SessionRecord,
    pub is_new_best: bool,
    pub streak: Option<StreakUpdate>,
}

/// Aggregates shown on the home screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HomeStats {
    pub best_score: i64,
    pub last_score: Option<SessionRecord>,
    pub streak: StreakInfo,
    pub total_drills: u32,
    pub history: Vec<SessionRecord>,
}

/// Owns the one active drill and walks it through
/// home -> countdown -> drill -> results.
pub struct SessionController {
    preset: Preset,
    storage: Storage,
    sounds: Box<dyn SoundSink>,
    clock: Box<dyn Clock>,
    rng: SmallRng,
    feedback_ms: u64,
    sound_enabled: bool,

    screen: Screen,
    exit_modal: bool,
    countdown: Option<Countdown>,
    timer: Option<DrillTimer>,
    drill: Option<DrillState>,
    feedback: Option<Feedback>,
    outcome: Option<DrillOutcome>,
    home: HomeStats,
    carry_ms: u64,
}

/// Log a failed persistence call and carry on without it.
fn persisted<T>(operation: &str, result: Result<T, StoreError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(operation, error = %e, "persistence call failed");
            None
        }
    }
}

impl SessionController {
    pub fn new(
        preset: Preset,
        storage: Storage,
        sounds: Box<dyn SoundSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let sound_enabled = persisted("load sound setting", storage.sound_enabled()).unwrap_or(true);
        let mut controller = Self {
            preset,
            storage,
            sounds,
            clock,
            rng: SmallRng::from_entropy(),
            feedback_ms: FEEDBACK_DISPLAY_MS,
            sound_enabled,
            screen: Screen::Home,
            exit_modal: false,
            countdown: None,
            timer: None,
            drill: None,
            feedback: None,
            outcome: None,
            home: HomeStats::default(),
            carry_ms: 0,
        };
        controller.refresh_home_stats();
        controller
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn with_feedback_ms(mut self, feedback_ms: u64) -> Self {
        self.feedback_ms = feedback_ms;
        self
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn exit_modal_open(&self) -> bool {
        self.exit_modal
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn drill(&self) -> Option<&DrillState> {
        self.drill.as_ref()
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.drill.as_ref()?.current_problem.as_ref()
    }

    pub fn timer(&self) -> Option<&DrillTimer> {
        self.timer.as_ref()
    }

    pub fn timer_level(&self) -> TimerLevel {
        self.timer.as_ref().map_or(TimerLevel::Normal, DrillTimer::level)
    }

    pub fn time_remaining_ms(&self) -> u64 {
        self.drill.as_ref().map_or(0, |d| d.time_remaining_ms)
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn outcome(&self) -> Option<&DrillOutcome> {
        self.outcome.as_ref()
    }

    pub fn home_stats(&self) -> &HomeStats {
        &self.home
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        persisted(
            "save sound setting",
            self.storage.set_sound_enabled(self.sound_enabled),
        );
        self.sound_enabled
    }

    /// Answers are accepted only in the drill, outside the exit modal and
    /// outside the feedback pause.
    pub fn input_enabled(&self) -> bool {
        self.screen == Screen::Drill
            && !self.exit_modal
            && self.feedback.is_none()
            && self.current_problem().is_some()
    }

    fn play(&mut self, event: SoundEvent) {
        if self.sound_enabled {
            self.sounds.play(event);
        }
    }

    pub fn refresh_home_stats(&mut self) {
        let today = self.clock.today();
        self.home = HomeStats {
            best_score: persisted("load best score", self.storage.best_score()).unwrap_or(0),
            last_score: persisted("load last score", self.storage.last_score()).flatten(),
            streak: persisted("load streak", self.storage.streak_info(today)).unwrap_or_default(),
            total_drills: persisted("load drill count", self.storage.total_drills()).unwrap_or(0),
            history: persisted("load history", self.storage.history()).unwrap_or_default(),
        };
    }

    /// Home or results -> countdown. Also serves as "retry".
    pub fn start(&mut self) -> bool {
        if !matches!(self.screen, Screen::Home | Screen::Results) {
            return false;
        }
        self.stop_timers();
        self.drill = None;
        self.outcome = None;
        self.carry_ms = 0;
        self.countdown = Some(Countdown::new());
        self.screen = Screen::Countdown;
        self.play(SoundEvent::CountdownTick);
        tracing::debug!("countdown started");
        true
    }

    pub fn skip_countdown(&mut self) -> bool {
        if self.screen != Screen::Countdown {
            return false;
        }
        if let Some(mut countdown) = self.countdown.take() {
            countdown.skip();
        }
        self.begin_drill();
        true
    }

    fn stop_timers(&mut self) {
        self.countdown = None;
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
        self.feedback = None;
    }

    fn begin_drill(&mut self) {
        self.stop_timers();
        self.outcome = None;
        let mut drill = DrillState::new(self.preset.time_limit_ms);
        drill.current_problem = Some(generator::generate_for(&self.preset, &mut self.rng));
        self.drill = Some(drill);
        self.timer = Some(DrillTimer::new(self.preset.time_limit_ms));
        self.exit_modal = false;
        self.screen = Screen::Drill;
        tracing::info!(preset = %self.preset.id, "drill started");
    }

    fn next_problem(&mut self) {
        if let Some(drill) = self.drill.as_mut() {
            drill.current_problem = Some(generator::generate_for(&self.preset, &mut self.rng));
        }
    }

    /// Validate and record typed input. `None` when input is locked.
    pub fn submit(&mut self, raw: &str) -> Option<AnswerResult> {
        if !self.input_enabled() {
            return None;
        }
        let result = AnswerResult::submitted(self.current_problem()?, raw);
        self.apply(result.clone());
        Some(result)
    }

    /// Explicit skip, independent of whatever is typed.
    pub fn skip_problem(&mut self) -> Option<AnswerResult> {
        if !self.input_enabled() {
            return None;
        }
        let result = AnswerResult::skipped(self.current_problem()?);
        self.apply(result.clone());
        Some(result)
    }

    fn apply(&mut self, result: AnswerResult) {
        let Some(drill) = self.drill.as_mut() else {
            return;
        };
        let verdict = result.verdict;
        let correct_answer = result.correct_answer;
        drill.record(result, &self.preset.scoring);

        match verdict {
            Verdict::Correct | Verdict::Incorrect => {
                self.play(if verdict == Verdict::Correct {
                    SoundEvent::Correct
                } else {
                    SoundEvent::Incorrect
                });
                if self.feedback_ms == 0 {
                    self.next_problem();
                } else {
                    self.feedback = Some(Feedback {
                        verdict,
                        correct_answer,
                        remaining_ms: self.feedback_ms,
                    });
                }
            }
            Verdict::Skipped => {
                self.play(SoundEvent::Skip);
                self.next_problem();
            }
        }
    }

    pub fn request_exit(&mut self) -> bool {
        if self.screen != Screen::Drill || self.exit_modal {
            return false;
        }
        self.exit_modal = true;
        true
    }

    /// Close the modal; the clock kept running underneath it.
    pub fn cancel_exit(&mut self) -> bool {
        if !self.exit_modal {
            return false;
        }
        self.exit_modal = false;
        true
    }

    /// Abandon the drill: nothing is persisted.
    pub fn confirm_exit(&mut self) -> bool {
        if self.screen != Screen::Drill || !self.exit_modal {
            return false;
        }
        self.stop_timers();
        if let Some(drill) = self.drill.take() {
            tracing::info!(answered = drill.answered(), score = drill.score, "drill abandoned");
        }
        self.exit_modal = false;
        self.screen = Screen::Home;
        self.refresh_home_stats();
        true
    }

    pub fn go_home(&mut self) -> bool {
        if self.screen != Screen::Results {
            return false;
        }
        self.drill = None;
        self.outcome = None;
        self.screen = Screen::Home;
        self.refresh_home_stats();
        true
    }

    /// Feed wall-clock time in; it is consumed in whole timer ticks and the
    /// remainder carried to the next call.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if matches!(self.screen, Screen::Home | Screen::Results) {
            self.carry_ms = 0;
            return events;
        }
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.carry_ms = self.carry_ms.saturating_add(elapsed_ms);
        while self.carry_ms >= TIMER_TICK_MS {
            self.carry_ms -= TIMER_TICK_MS;
            match self.screen {
                Screen::Countdown => self.tick_countdown(&mut events),
                Screen::Drill => self.tick_drill(&mut events),
                Screen::Home | Screen::Results => {
                    self.carry_ms = 0;
                    break;
                }
            }
        }
        events
    }

    fn tick_countdown(&mut self, events: &mut Vec<SessionEvent>) {
        let countdown_events = match self.countdown.as_mut() {
            Some(countdown) => countdown.tick(TIMER_TICK_MS),
            None => return,
        };
        for event in countdown_events {
            match event {
                CountdownEvent::Step(step) => {
                    self.play(match step {
                        CountdownStep::Number(_) => SoundEvent::CountdownTick,
                        CountdownStep::Go => SoundEvent::Go,
                    });
                    events.push(SessionEvent::Countdown(step));
                }
                CountdownEvent::Finished => {
                    self.begin_drill();
                    events.push(SessionEvent::DrillStarted);
                }
            }
        }
    }

    fn tick_drill(&mut self, events: &mut Vec<SessionEvent>) {
        let timer_events = match self.timer.as_mut() {
            Some(timer) => timer.tick(),
            None => return,
        };
        if let (Some(drill), Some(timer)) = (self.drill.as_mut(), self.timer.as_ref()) {
            drill.time_remaining_ms = timer.remaining_ms();
        }

        for event in timer_events {
            match event {
                TimerEvent::Low => {
                    self.play(SoundEvent::LowTime);
                    events.push(SessionEvent::TimeLow);
                }
                TimerEvent::Critical => events.push(SessionEvent::TimeCritical),
                TimerEvent::Expired => {
                    self.finish();
                    events.push(SessionEvent::Finished);
                    return;
                }
            }
        }

        let feedback_done = match self.feedback.as_mut() {
            Some(feedback) => {
                feedback.remaining_ms = feedback.remaining_ms.saturating_sub(TIMER_TICK_MS);
                feedback.remaining_ms == 0
            }
            None => false,
        };
        if feedback_done {
            self.feedback = None;
            self.next_problem();
            events.push(SessionEvent::NextProblem);
        }
    }

    /// Expiry: classify, persist each piece independently, show results.
    fn finish(&mut self) {
        let elapsed_ms = self
            .timer
            .take()
            .map_or(self.preset.time_limit_ms, |timer| timer.elapsed_ms());
        self.feedback = None;
        self.exit_modal = false;
        self.screen = Screen::Results;
        self.play(SoundEvent::Complete);

        let Some(drill) = self.drill.as_mut() else {
            return;
        };
        drill.time_remaining_ms = 0;
        let record = SessionRecord::from_drill(drill, &self.preset, elapsed_ms, self.clock.now());

        let is_new_best =
            persisted("save best score", self.storage.set_best_score(record.score)).unwrap_or(false);
        persisted("save last score", self.storage.set_last_score(&record));
        persisted("append history", self.storage.add_to_history(&record));
        persisted("count drill", self.storage.increment_total_drills());
        let streak = persisted("update streak", self.storage.update_streak(self.clock.today()));

        tracing::info!(
            score = record.score,
            correct = record.correct_count,
            incorrect = record.incorrect_count,
            skipped = record.skipped_count,
            qpm = record.qpm,
            level = record.benchmark_level.as_str(),
            new_best = is_new_best,
            "drill complete"
        );
        self.outcome = Some(DrillOutcome {
            record,
            is_new_best,
            streak,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    use super::*;
    use crate::clock::FixedClock;
    use crate::engine::scoring::{self, BenchmarkLevel};
    use crate::store::KeyValueStore;

    #[derive(Default)]
    struct SoundLog(Vec<SoundEvent>);

    impl SoundSink for SoundLog {
        fn play(&mut self, event: SoundEvent) {
            self.0.push(event);
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn set(&mut self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    struct Harness {
        controller: SessionController,
        sounds: Rc<RefCell<SoundLog>>,
        clock: Rc<FixedClock>,
    }

    fn harness_with(preset: Preset, storage: Storage) -> Harness {
        let sounds = Rc::new(RefCell::new(SoundLog::default()));
        let clock = Rc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap(),
        ));
        let controller =
            SessionController::new(preset, storage, Box::new(sounds.clone()), Box::new(clock.clone()))
                .with_seed(99);
        Harness {
            controller,
            sounds,
            clock,
        }
    }

    fn harness() -> Harness {
        harness_with(Preset::quick_drill(), Storage::in_memory())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn into_drill(c: &mut SessionController) {
        assert!(c.start());
        assert!(c.skip_countdown());
        assert_eq!(c.screen(), Screen::Drill);
    }

    fn answer_correctly(c: &mut SessionController) -> AnswerResult {
        let answer = c.current_problem().unwrap().correct_answer;
        c.submit(&answer.to_string()).unwrap()
    }

    fn run_out_clock(c: &mut SessionController) -> Vec<SessionEvent> {
        c.advance(ms(c.preset().time_limit_ms + 1_000))
    }

    #[test]
    fn starts_on_home_with_empty_stats() {
        let h = harness();
        assert_eq!(h.controller.screen(), Screen::Home);
        assert_eq!(h.controller.home_stats(), &HomeStats::default());
        assert!(!h.controller.input_enabled());
    }

    #[test]
    fn countdown_runs_into_drill() {
        let mut h = harness();
        h.controller.start();
        assert_eq!(h.controller.screen(), Screen::Countdown);

        let events = h.controller.advance(ms(2_500));
        assert_eq!(
            events,
            vec![
                SessionEvent::Countdown(CountdownStep::Number(2)),
                SessionEvent::Countdown(CountdownStep::Number(1)),
                SessionEvent::Countdown(CountdownStep::Go),
            ]
        );
        assert_eq!(h.controller.advance(ms(100)), vec![SessionEvent::DrillStarted]);
        assert_eq!(h.controller.screen(), Screen::Drill);
        assert!(h.controller.current_problem().is_some());
        assert_eq!(h.controller.time_remaining_ms(), 120_000);

        let sounds = &h.sounds.borrow().0;
        assert_eq!(
            sounds.as_slice(),
            &[
                SoundEvent::CountdownTick,
                SoundEvent::CountdownTick,
                SoundEvent::CountdownTick,
                SoundEvent::Go
            ]
        );
    }

    #[test]
    fn skip_countdown_starts_immediately() {
        let mut h = harness();
        h.controller.start();
        h.controller.advance(ms(800));
        assert!(h.controller.skip_countdown());
        assert_eq!(h.controller.screen(), Screen::Drill);
        assert!(h.controller.countdown().is_none());
        // The abandoned countdown must not fire into the drill
        let events = h.controller.advance(ms(3_000));
        assert!(!events.contains(&SessionEvent::DrillStarted));
    }

    #[test]
    fn correct_answer_locks_input_until_feedback_ends() {
        let mut h = harness();
        into_drill(&mut h.controller);
        let first = h.controller.current_problem().unwrap().id;

        let result = answer_correctly(&mut h.controller);
        assert_eq!(result.verdict, Verdict::Correct);
        assert!(!h.controller.input_enabled());
        assert_eq!(h.controller.feedback().unwrap().verdict, Verdict::Correct);
        assert_eq!(h.controller.submit("1"), None);
        assert_eq!(h.controller.skip_problem(), None);
        assert_eq!(h.controller.drill().unwrap().answered(), 1);

        h.controller.advance(ms(500));
        assert!(h.controller.feedback().is_some());
        let events = h.controller.advance(ms(100));
        assert!(events.contains(&SessionEvent::NextProblem));
        assert!(h.controller.input_enabled());
        assert_ne!(h.controller.current_problem().unwrap().id, first);
    }

    #[test]
    fn skip_advances_without_pause() {
        let mut h = harness();
        into_drill(&mut h.controller);
        let first = h.controller.current_problem().unwrap().id;

        let result = h.controller.submit("   ").unwrap();
        assert_eq!(result.verdict, Verdict::Skipped);
        assert_eq!(result.user_answer, None);
        assert!(h.controller.input_enabled());
        let second = h.controller.current_problem().unwrap().id;
        assert_ne!(second, first);

        let result = h.controller.skip_problem().unwrap();
        assert_eq!(result.problem_id, second);
        assert_eq!(h.controller.drill().unwrap().skipped_count, 2);
        assert!(h.sounds.borrow().0.ends_with(&[SoundEvent::Skip, SoundEvent::Skip]));
    }

    #[test]
    fn counters_and_score_stay_consistent() {
        let mut h = harness();
        into_drill(&mut h.controller);
        answer_correctly(&mut h.controller);
        h.controller.advance(ms(600));
        h.controller.submit("not a number").unwrap();
        h.controller.advance(ms(600));
        h.controller.skip_problem().unwrap();

        let drill = h.controller.drill().unwrap();
        let rules = &h.controller.preset().scoring;
        assert_eq!(
            drill.results.len() as u32,
            drill.correct_count + drill.incorrect_count + drill.skipped_count
        );
        assert_eq!(
            drill.score,
            scoring::total_score(drill.correct_count, drill.incorrect_count, drill.skipped_count, rules)
        );
        assert_eq!(drill.score, 1);
        assert_eq!(drill.results[1].verdict.is_correct(), Some(false));
        assert_eq!(drill.results[2].verdict.is_correct(), None);
    }

    #[test]
    fn exit_modal_cancel_resumes_with_clock_running() {
        let mut h = harness();
        into_drill(&mut h.controller);
        assert!(h.controller.request_exit());
        assert!(!h.controller.request_exit());
        assert!(!h.controller.input_enabled());
        assert_eq!(h.controller.submit("5"), None);

        h.controller.advance(ms(5_000));
        assert!(h.controller.cancel_exit());
        assert_eq!(h.controller.screen(), Screen::Drill);
        assert_eq!(h.controller.time_remaining_ms(), 115_000);
        assert!(h.controller.input_enabled());
    }

    #[test]
    fn confirm_exit_discards_drill_and_persists_nothing() {
        let mut h = harness();
        into_drill(&mut h.controller);
        answer_correctly(&mut h.controller);
        h.controller.request_exit();
        assert!(h.controller.confirm_exit());

        assert_eq!(h.controller.screen(), Screen::Home);
        assert!(h.controller.drill().is_none());
        assert!(h.controller.timer().is_none());
        assert!(h.controller.advance(ms(200_000)).is_empty());
        assert!(h.controller.outcome().is_none());

        let storage = h.controller.storage();
        assert!(storage.history().unwrap().is_empty());
        assert_eq!(storage.last_score().unwrap(), None);
        assert_eq!(storage.total_drills().unwrap(), 0);
        assert_eq!(storage.streak_state().unwrap().current_streak, 0);
    }

    #[test]
    fn confirm_exit_requires_open_modal() {
        let mut h = harness();
        into_drill(&mut h.controller);
        assert!(!h.controller.confirm_exit());
        assert_eq!(h.controller.screen(), Screen::Drill);
    }

    #[test]
    fn expiry_persists_and_shows_results() {
        let mut h = harness();
        into_drill(&mut h.controller);
        for _ in 0..3 {
            answer_correctly(&mut h.controller);
            h.controller.advance(ms(600));
        }
        let events = run_out_clock(&mut h.controller);
        assert_eq!(events.iter().filter(|e| **e == SessionEvent::TimeLow).count(), 1);
        assert_eq!(events.iter().filter(|e| **e == SessionEvent::TimeCritical).count(), 1);
        assert_eq!(events.last(), Some(&SessionEvent::Finished));
        assert_eq!(h.controller.screen(), Screen::Results);
        assert_eq!(h.controller.time_remaining_ms(), 0);

        let outcome = h.controller.outcome().unwrap();
        assert_eq!(outcome.record.score, 3);
        assert_eq!(outcome.record.qpm, 1.5);
        assert!(outcome.is_new_best);
        assert_eq!(outcome.streak.unwrap().current_streak, 1);

        let storage = h.controller.storage();
        assert_eq!(storage.best_score().unwrap(), 3);
        assert_eq!(storage.history().unwrap().len(), 1);
        assert_eq!(storage.total_drills().unwrap(), 1);
        assert_eq!(storage.last_score().unwrap().unwrap().score, 3);

        let sounds = &h.sounds.borrow().0;
        assert_eq!(sounds.iter().filter(|s| **s == SoundEvent::LowTime).count(), 1);
        assert_eq!(sounds.last(), Some(&SoundEvent::Complete));
    }

    #[test]
    fn no_ticks_after_expiry() {
        let mut h = harness();
        into_drill(&mut h.controller);
        run_out_clock(&mut h.controller);
        assert!(h.controller.advance(ms(10_000)).is_empty());
        assert!(!h.controller.input_enabled());
        assert_eq!(h.controller.submit("1"), None);
    }

    #[test]
    fn expiry_during_exit_modal_goes_to_results() {
        let mut h = harness();
        into_drill(&mut h.controller);
        h.controller.request_exit();
        run_out_clock(&mut h.controller);
        assert_eq!(h.controller.screen(), Screen::Results);
        assert!(!h.controller.exit_modal_open());
        assert!(!h.controller.confirm_exit());
    }

    #[test]
    fn expiry_cancels_pending_feedback() {
        let mut preset = Preset::quick_drill();
        preset.time_limit_ms = 300;
        let mut h = harness_with(preset, Storage::in_memory());
        into_drill(&mut h.controller);
        answer_correctly(&mut h.controller);
        h.controller.advance(ms(300));
        assert_eq!(h.controller.screen(), Screen::Results);
        assert!(h.controller.feedback().is_none());
    }

    #[test]
    fn retry_and_home_from_results() {
        let mut h = harness();
        into_drill(&mut h.controller);
        answer_correctly(&mut h.controller);
        run_out_clock(&mut h.controller);

        assert!(h.controller.start());
        assert_eq!(h.controller.screen(), Screen::Countdown);
        assert!(h.controller.outcome().is_none());
        h.controller.skip_countdown();
        assert_eq!(h.controller.drill().unwrap().answered(), 0);
        assert_eq!(h.controller.drill().unwrap().score, 0);
        run_out_clock(&mut h.controller);

        assert!(h.controller.go_home());
        let stats = h.controller.home_stats();
        assert_eq!(stats.best_score, 1);
        assert_eq!(stats.total_drills, 2);
        assert_eq!(stats.history.len(), 2);
        assert_eq!(stats.last_score.as_ref().unwrap().score, 0);
        assert!(stats.streak.is_active);
        assert_eq!(stats.streak.current_streak, 1);
    }

    #[test]
    fn transitions_outside_their_state_are_ignored() {
        let mut h = harness();
        assert!(!h.controller.skip_countdown());
        assert!(!h.controller.request_exit());
        assert!(!h.controller.go_home());
        h.controller.start();
        assert!(!h.controller.start());
        assert!(!h.controller.request_exit());
        assert_eq!(h.controller.submit("3"), None);
    }

    #[test]
    fn storage_failure_never_blocks_results() {
        let mut h = harness_with(Preset::quick_drill(), Storage::new(Box::new(BrokenStore)));
        assert!(h.controller.sound_enabled());
        into_drill(&mut h.controller);
        answer_correctly(&mut h.controller);
        h.controller.advance(ms(600));
        h.controller.submit("nope").unwrap();
        run_out_clock(&mut h.controller);

        assert_eq!(h.controller.screen(), Screen::Results);
        let outcome = h.controller.outcome().unwrap();
        assert_eq!(outcome.record.correct_count, 1);
        assert_eq!(outcome.record.incorrect_count, 1);
        assert_eq!(outcome.record.accuracy_percent, 50);
        assert!(!outcome.is_new_best);
        assert!(outcome.streak.is_none());

        assert!(h.controller.go_home());
        assert_eq!(h.controller.home_stats(), &HomeStats::default());
    }

    #[test]
    fn streak_follows_calendar_days() {
        let mut h = harness();
        let play_one = |h: &mut Harness| {
            h.controller.start();
            h.controller.skip_countdown();
            run_out_clock(&mut h.controller);
            let streak = h.controller.outcome().unwrap().streak.unwrap();
            h.controller.go_home();
            streak
        };
        assert_eq!(play_one(&mut h).current_streak, 1);
        assert_eq!(play_one(&mut h).current_streak, 1);
        h.clock.advance_days(1);
        assert_eq!(play_one(&mut h).current_streak, 2);
        h.clock.advance_days(3);
        assert_eq!(h.controller.home_stats().streak.current_streak, 2);
        h.controller.refresh_home_stats();
        assert_eq!(h.controller.home_stats().streak.current_streak, 0);
        assert_eq!(h.controller.storage().streak_state().unwrap().current_streak, 2);
        let update = play_one(&mut h);
        assert_eq!(update.current_streak, 1);
        assert_eq!(update.longest_streak, 2);
    }

    #[test]
    fn muted_sound_is_persisted_and_silences_cues() {
        let mut h = harness();
        assert!(!h.controller.toggle_sound());
        assert!(!h.controller.storage().sound_enabled().unwrap());
        into_drill(&mut h.controller);
        answer_correctly(&mut h.controller);
        assert!(h.sounds.borrow().0.is_empty());
    }

    #[test]
    fn zero_feedback_duration_advances_immediately() {
        let h = harness();
        let mut c = h.controller.with_feedback_ms(0);
        into_drill(&mut c);
        let first = c.current_problem().unwrap().id;
        answer_correctly(&mut c);
        assert!(c.input_enabled());
        assert_ne!(c.current_problem().unwrap().id, first);
    }

    #[test]
    fn below_passing_for_low_score() {
        let mut h = harness();
        into_drill(&mut h.controller);
        run_out_clock(&mut h.controller);
        let record = &h.controller.outcome().unwrap().record;
        assert_eq!(record.benchmark_level, BenchmarkLevel::BelowPassing);
        assert_eq!(record.qpm, 0.0);
        assert_eq!(record.accuracy_percent, 0);
    }
}
