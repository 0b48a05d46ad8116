//! Clock port — where the engine gets its position in the day cycle.
//!
//! Split out as a port so evaluation can be pinned to an exact moment in
//! tests instead of depending on when the suite happens to run.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;

use lumen_domain::time::{TimeOfDay, Timestamp, local_time_of_day, now};

/// Supplies the current time to the engine.
pub trait Clock {
    /// Current position within the day cycle, in local time.
    fn time_of_day(&self) -> TimeOfDay;

    /// Current instant, for event timestamps.
    fn timestamp(&self) -> Timestamp;
}

impl<T: Clock + Send + Sync> Clock for Arc<T> {
    fn time_of_day(&self) -> TimeOfDay {
        (**self).time_of_day()
    }

    fn timestamp(&self) -> Timestamp {
        (**self).timestamp()
    }
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn time_of_day(&self) -> TimeOfDay {
        local_time_of_day(Local::now())
    }

    fn timestamp(&self) -> Timestamp {
        now()
    }
}

/// Settable clock for demos and tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<TimeOfDay>>,
}

impl ManualClock {
    #[must_use]
    pub fn starting_at(time: TimeOfDay) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Move the clock to a new position in the day.
    pub fn set(&self, time: TimeOfDay) {
        *self
            .time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = time;
    }
}

impl Clock for ManualClock {
    fn time_of_day(&self) -> TimeOfDay {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timestamp(&self) -> Timestamp {
        now()
    }
}
