use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    CountdownTick,
    Go,
    Correct,
    Incorrect,
    Skip,
    LowTime,
    Complete,
}

impl SoundEvent {
    pub fn name(self) -> &'static str {
        match self {
            SoundEvent::CountdownTick => "countdown",
            SoundEvent::Go => "go",
            SoundEvent::Correct => "correct",
            SoundEvent::Incorrect => "incorrect",
            SoundEvent::Skip => "skip",
            SoundEvent::LowTime => "lowTime",
            SoundEvent::Complete => "complete",
        }
    }
}

/// Fire-and-forget audio output.
pub trait SoundSink {
    fn play(&mut self, event: SoundEvent);
}

pub struct Muted;

impl SoundSink for Muted {
    fn play(&mut self, _event: SoundEvent) {}
}

/// Rings the terminal bell for the cues that matter without looking:
/// the start signal, the low-time warning and the end of the drill.
pub struct TerminalBell;

impl SoundSink for TerminalBell {
    fn play(&mut self, event: SoundEvent) {
        if matches!(
            event,
            SoundEvent::Go | SoundEvent::LowTime | SoundEvent::Complete
        ) {
            let mut out = io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
        tracing::trace!(sound = event.name(), "play");
    }
}

impl<S: SoundSink + ?Sized> SoundSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn play(&mut self, event: SoundEvent) {
        self.borrow_mut().play(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_event_vocabulary() {
        assert_eq!(SoundEvent::LowTime.name(), "lowTime");
        assert_eq!(SoundEvent::CountdownTick.name(), "countdown");
        assert_eq!(SoundEvent::Complete.name(), "complete");
    }
}
