use chrono::{DateTime, TimeZone, Utc};

/// Abstraction over "current time" to make behavior deterministic in tests.
///
/// The analytics functions themselves take an explicit reference instant;
/// the clock only supplies that instant at the outermost call sites (CLI,
/// daemon) so nothing below them ever reads the system clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Fixed clock at an exact UTC wall time, for test setup.
    pub fn at_utc(year: i32, month: u32, day: u32, hour: u32, min: u32) -> Self {
        Self::new(
            Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
                .single()
                .expect("valid timestamp"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
