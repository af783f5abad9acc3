//! Run clock — owns the run timestamp and inter-race pacing.

use crate::types::Timestamp;
use chrono::{DateTime, Local, SecondsFormat};
use std::time::Duration;

/// Pause after each race so the source is not hammered.
pub const DEFAULT_RACE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct RunClock {
    pub started_at: DateTime<Local>,
    pub race_delay: Duration,
}

impl RunClock {
    pub fn new(race_delay: Duration) -> Self {
        Self { started_at: Local::now(), race_delay }
    }

    /// Fixed start time and no pacing. Used in tests.
    pub fn fixed(started_at: DateTime<Local>) -> Self {
        Self { started_at, race_delay: Duration::ZERO }
    }

    /// The single timestamp stamped on every output of this run.
    pub fn timestamp(&self) -> Timestamp {
        self.started_at.to_rfc3339_opts(SecondsFormat::Micros, false)
    }

    /// Sleep for the configured inter-race delay.
    pub fn pace(&self) {
        if !self.race_delay.is_zero() {
            log::debug!("Pacing for {} ms", self.race_delay.as_millis());
            std::thread::sleep(self.race_delay);
        }
    }
}

impl Default for RunClock {
    fn default() -> Self {
        Self::new(DEFAULT_RACE_DELAY)
    }
}
