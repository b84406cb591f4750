use crate::preset::{CRITICAL_TIME_THRESHOLD, LOW_TIME_THRESHOLD, TIMER_TICK_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Low,
    Critical,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerLevel {
    Normal,
    Low,
    Critical,
}

/// Depleting drill clock. Threshold events are latched: each fires at most once.
#[derive(Clone, Debug)]
pub struct DrillTimer {
    total_ms: u64,
    remaining_ms: u64,
    tick_ms: u64,
    running: bool,
    low_fired: bool,
    critical_fired: bool,
}

impl DrillTimer {
    pub fn new(total_ms: u64) -> Self {
        Self::with_tick(total_ms, TIMER_TICK_MS)
    }

    pub fn with_tick(total_ms: u64, tick_ms: u64) -> Self {
        Self {
            total_ms,
            remaining_ms: total_ms,
            tick_ms: tick_ms.max(1),
            running: true,
            low_fired: false,
            critical_fired: false,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.total_ms - self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fraction_remaining(&self) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        self.remaining_ms as f64 / self.total_ms as f64
    }

    pub fn level(&self) -> TimerLevel {
        let fraction = self.fraction_remaining();
        if fraction <= CRITICAL_TIME_THRESHOLD {
            TimerLevel::Critical
        } else if fraction <= LOW_TIME_THRESHOLD {
            TimerLevel::Low
        } else {
            TimerLevel::Normal
        }
    }

    /// Advance one fixed tick. A stopped timer produces nothing.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(self.tick_ms);
        if self.remaining_ms == 0 {
            self.running = false;
            events.push(TimerEvent::Expired);
            return events;
        }

        let fraction = self.fraction_remaining();
        if fraction <= LOW_TIME_THRESHOLD && !self.low_fired {
            self.low_fired = true;
            events.push(TimerEvent::Low);
        }
        if fraction <= CRITICAL_TIME_THRESHOLD && !self.critical_fired {
            self.critical_fired = true;
            events.push(TimerEvent::Critical);
        }
        events
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

/// `m:ss` with seconds rounded up, so the clock reads 0:00 only at expiry.
pub fn format_clock(ms: u64) -> String {
    let seconds = ms.div_ceil(1000);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
