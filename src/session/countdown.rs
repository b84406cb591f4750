use crate::preset::{COUNTDOWN_GO_MS, COUNTDOWN_TICK_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownStep {
    Number(u8),
    Go,
}

impl CountdownStep {
    pub fn hold_ms(self) -> u64 {
        match self {
            CountdownStep::Number(_) => COUNTDOWN_TICK_MS,
            CountdownStep::Go => COUNTDOWN_GO_MS,
        }
    }

    pub fn label(self) -> String {
        match self {
            CountdownStep::Number(n) => n.to_string(),
            CountdownStep::Go => "GO!".to_string(),
        }
    }
}

pub const SEQUENCE: [CountdownStep; 4] = [
    CountdownStep::Number(3),
    CountdownStep::Number(2),
    CountdownStep::Number(1),
    CountdownStep::Go,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownEvent {
    Step(CountdownStep),
    Finished,
}

/// Pre-drill 3-2-1-GO sequence advanced by elapsed-time ticks.
#[derive(Clone, Debug)]
pub struct Countdown {
    index: usize,
    held_ms: u64,
    finished: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            index: 0,
            held_ms: 0,
            finished: false,
        }
    }

    pub fn current(&self) -> Option<CountdownStep> {
        if self.finished {
            None
        } else {
            SEQUENCE.get(self.index).copied()
        }
    }

    /// Position in the sequence, for progress dots.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<CountdownEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }
        self.held_ms += elapsed_ms;
        while let Some(step) = self.current() {
            if self.held_ms < step.hold_ms() {
                break;
            }
            self.held_ms -= step.hold_ms();
            self.index += 1;
            match SEQUENCE.get(self.index) {
                Some(next) => events.push(CountdownEvent::Step(*next)),
                None => {
                    self.finished = true;
                    events.push(CountdownEvent::Finished);
                }
            }
        }
        events
    }

    /// Abandon any pending step and terminate immediately.
    pub fn skip(&mut self) -> Option<CountdownEvent> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.held_ms = 0;
        Some(CountdownEvent::Finished)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
