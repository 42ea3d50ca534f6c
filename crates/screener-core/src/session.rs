//! Market session clock.
//!
//! Maps a wall-clock instant to OPEN or CLOSED. The trading window is a single
//! canonical `[open, close)` interval in UTC, applied Monday through Friday.
//! Exchange holidays are not modelled.

use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScreenerError;

/// Whether the market is trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionState {
    Open,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Open => write!(f, "OPEN"),
            SessionState::Closed => write!(f, "CLOSED"),
        }
    }
}

/// The canonical trading window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSession {
    open: NaiveTime,
    close: NaiveTime,
}

impl MarketSession {
    /// Create a session from UTC open (inclusive) and close (exclusive) times.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self, ScreenerError> {
        if open >= close {
            return Err(ScreenerError::Config(format!(
                "session open {} must be before close {}",
                open, close
            )));
        }
        Ok(Self { open, close })
    }

    /// Create a session from `HH:MM` strings.
    pub fn from_hhmm(open: &str, close: &str) -> Result<Self, ScreenerError> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s.trim(), "%H:%M")
                .map_err(|e| ScreenerError::Config(format!("invalid session time '{}': {}", s, e)))
        };
        Self::new(parse(open)?, parse(close)?)
    }

    /// Opening time (UTC).
    pub fn open(&self) -> NaiveTime {
        self.open
    }

    /// Closing time (UTC).
    pub fn close(&self) -> NaiveTime {
        self.close
    }

    /// Session state at an instant.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
            return SessionState::Closed;
        }
        // Sub-second precision is irrelevant to the window.
        let time = now.time().with_nanosecond(0).unwrap_or(now.time());
        if self.open <= time && time < self.close {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    /// Whether the session is open at an instant.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == SessionState::Open
    }
}

impl Default for MarketSession {
    /// 13:00 to 20:00 UTC.
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(13, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}
