//! Timed mental-arithmetic drills: problem generation, scoring, streaks,
//! persistence and the session state machine, plus the ratatui front-end
//! the `mathdrill` binary drives.

pub mod app;
pub mod clock;
pub mod config;
pub mod engine;
pub mod event;
pub mod generator;
pub mod preset;
pub mod session;
pub mod sound;
pub mod store;
pub mod ui;
