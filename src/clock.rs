//! The source of "today" for validation and metrics.

use time::{Date, OffsetDateTime};
use time_tz::{Offset, TimeZone, Tz};

/// Provides the current calendar date.
pub trait Clock {
    /// Today's date in the user's local timezone.
    fn today(&self) -> Date;
}

/// The timezone name did not match any IANA timezone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid canonical timezone name")]
pub struct InvalidTimezone(pub String);

/// Reads the system clock and converts it to a named timezone.
#[derive(Clone, Copy)]
pub struct LocalClock {
    timezone: &'static Tz,
}

impl std::fmt::Debug for LocalClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalClock")
            .field("timezone", &self.timezone.name())
            .finish()
    }
}

impl LocalClock {
    /// Create a clock for a canonical timezone name such as "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [InvalidTimezone] if the name is not a known timezone.
    pub fn new(canonical_timezone: &str) -> Result<Self, InvalidTimezone> {
        time_tz::timezones::get_by_name(canonical_timezone)
            .map(|timezone| Self { timezone })
            .ok_or_else(|| InvalidTimezone(canonical_timezone.to_owned()))
    }
}

impl Clock for LocalClock {
    fn today(&self) -> Date {
        let now = OffsetDateTime::now_utc();
        let offset = self.timezone.get_offset_utc(&now).to_utc();

        now.to_offset(offset).date()
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
