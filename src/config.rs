//! Settings the `ledger` binary is started with.

use std::path::PathBuf;

use crate::{
    clock::{InvalidTimezone, LocalClock},
    error::MessageFormat,
};

/// The timezone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// The currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Where the ledger is stored and how dates and amounts are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// File path to the SQLite database.
    pub db_path: PathBuf,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Decides which calendar date counts as today.
    pub local_timezone: String,
    /// The symbol placed in front of amounts in messages.
    pub currency_symbol: String,
}

impl LedgerConfig {
    /// Create a config with the default timezone and currency symbol.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            local_timezone: DEFAULT_TIMEZONE.to_owned(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
        }
    }

    /// Set the local timezone.
    pub fn local_timezone(mut self, local_timezone: &str) -> Self {
        self.local_timezone = local_timezone.to_owned();
        self
    }

    /// Set the currency symbol.
    pub fn currency_symbol(mut self, currency_symbol: &str) -> Self {
        self.currency_symbol = currency_symbol.to_owned();
        self
    }

    /// A clock that reports today's date in the configured timezone.
    ///
    /// # Errors
    /// Returns [InvalidTimezone] if the timezone is not a canonical timezone name.
    pub fn clock(&self) -> Result<LocalClock, InvalidTimezone> {
        LocalClock::new(&self.local_timezone)
    }

    /// The message format for the configured currency symbol.
    pub fn message_format(&self) -> MessageFormat {
        MessageFormat::new(&self.currency_symbol)
    }
}
