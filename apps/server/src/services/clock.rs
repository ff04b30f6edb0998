//! Wall-clock timestamps driven by tokio's monotonic clock.

use chrono::{DateTime, Duration, Utc};
use tokio::time::Instant;

/// Wall-clock anchor plus monotonic offset.
///
/// Elapsed time never jumps with system clock changes, and follows tokio's
/// paused clock in tests.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    wall: DateTime<Utc>,
    anchor: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            wall: Utc::now(),
            anchor: Instant::now(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        let offset = Duration::from_std(self.anchor.elapsed()).unwrap_or_else(|_| Duration::zero());
        self.wall + offset
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
