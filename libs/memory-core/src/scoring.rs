//! Score formula and elapsed-time formatting.

/// Best possible score.
pub const MAX_SCORE: u32 = 1000;

/// Points lost per move.
pub const MOVE_PENALTY: u32 = 10;

/// Final score: 1000 minus 10 per move minus 1 per second, never below zero.
pub fn score(move_count: u32, elapsed_seconds: u64) -> u32 {
    let penalty = u64::from(move_count) * u64::from(MOVE_PENALTY) + elapsed_seconds;
    u64::from(MAX_SCORE).saturating_sub(penalty) as u32
}

/// Format seconds as `mm:ss`. Minutes keep growing past 99.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
