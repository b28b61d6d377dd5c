//! Time and timestamp helpers.
//!
//! The scheduler never reads the system clock directly: every component
//! that needs "now" is handed a [`Clock`] at construction. The clock carries
//! a fixed offset captured once at session start (e.g. against a trusted
//! network time source) and is not re-synchronized mid-session.

use chrono::{DateTime, Duration, Utc};

/// UTC timestamp used for target instants, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, uncorrected.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Time remaining until `target`, or zero if it has passed.
#[must_use]
pub fn time_until(now: Timestamp, target: Timestamp) -> Duration {
    (target - now).max(Duration::zero())
}

/// Session clock: wall clock plus a fixed external correction.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: Duration,
}

impl Default for Clock {
    fn default() -> Self {
        Self::local()
    }
}

impl Clock {
    /// Clock with no correction — local device time.
    #[must_use]
    pub fn local() -> Self {
        Self {
            offset: Duration::zero(),
        }
    }

    /// Clock with an explicit fixed correction.
    #[must_use]
    pub fn with_offset(offset: Duration) -> Self {
        Self { offset }
    }

    /// Capture the offset between a trusted reference time and the device
    /// clock, held constant for the rest of the session.
    #[must_use]
    pub fn synchronized(reference: Timestamp) -> Self {
        Self {
            offset: reference - Utc::now(),
        }
    }

    /// The current corrected time.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        Utc::now() + self.offset
    }

    /// The fixed correction applied by this clock.
    #[must_use]
    pub fn offset(&self) -> Duration {
        self.offset
    }
}
