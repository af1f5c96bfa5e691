//! Time-derived macros for device polling filters.

use chrono::{DateTime, Utc};

use super::MacroSource;
use crate::config::PollingConfig;
use fleetql_core::utils::canonical_name;

/// Current time in epoch milliseconds.
pub const NOW_TS: &str = "NOW_TS";

/// Instant before which a device that has not polled counts as overdue.
pub const OVERDUE_TS: &str = "OVERDUE_TS";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// `None` when `millis` is outside chrono's range.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Provides `NOW_TS` and `OVERDUE_TS`, read from the clock on every lookup.
#[derive(Debug, Clone)]
pub struct TimestampMacros<C = SystemClock> {
    polling: PollingConfig,
    clock: C,
}

impl TimestampMacros {
    pub fn new(polling: PollingConfig) -> Self {
        Self::with_clock(polling, SystemClock)
    }
}

impl<C: Clock> TimestampMacros<C> {
    pub fn with_clock(polling: PollingConfig, clock: C) -> Self {
        Self { polling, clock }
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    /// `now - (polling interval + overdue interval)`.
    pub fn overdue_millis(&self) -> i64 {
        self.now_millis()
            .saturating_sub(self.polling.polling_interval_ms)
            .saturating_sub(self.polling.overdue_interval_ms)
    }
}

impl<C: Clock> MacroSource for TimestampMacros<C> {
    fn lookup(&self, name: &str) -> Option<String> {
        match canonical_name(name).as_str() {
            NOW_TS => Some(self.now_millis().to_string()),
            OVERDUE_TS => Some(self.overdue_millis().to_string()),
            _ => None,
        }
    }
}
