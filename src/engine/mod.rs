pub mod scoring;
pub mod streak;

pub use scoring::BenchmarkLevel;
pub use streak::{StreakInfo, StreakState, StreakUpdate};
