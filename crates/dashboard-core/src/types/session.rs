//! Auto-trade session state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationFault;
use crate::format::format_countdown;

/// Unit of a requested session duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl DurationUnit {
    /// Number of seconds in one unit.
    pub fn as_secs(&self) -> u64 {
        match self {
            DurationUnit::Seconds => 1,
            DurationUnit::Minutes => 60,
            DurationUnit::Hours => 3600,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Seconds => "seconds",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DurationUnit {
    type Err = ValidationFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => Ok(DurationUnit::Seconds),
            "m" | "min" | "minute" | "minutes" => Ok(DurationUnit::Minutes),
            "h" | "hour" | "hours" => Ok(DurationUnit::Hours),
            _ => Err(ValidationFault::UnknownDurationUnit(s.to_string())),
        }
    }
}

/// Normalize a duration to seconds.
pub fn convert(duration: u64, unit: DurationUnit) -> u64 {
    duration.saturating_mul(unit.as_secs())
}

/// What the user asked for when starting a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub duration: u64,
    pub unit: DurationUnit,
    pub symbols: Vec<String>,
}

impl SessionRequest {
    pub fn new(duration: u64, unit: DurationUnit, symbols: Vec<String>) -> Self {
        Self {
            duration,
            unit,
            symbols,
        }
    }

    /// Check the request and return the normalized symbol list.
    ///
    /// Symbols are trimmed, upper-cased and de-duplicated in order.
    pub fn validate(&self) -> Result<Vec<String>, ValidationFault> {
        if self.duration == 0 {
            return Err(ValidationFault::NonPositiveDuration);
        }

        let mut symbols: Vec<String> = Vec::with_capacity(self.symbols.len());
        for raw in &self.symbols {
            let symbol = raw.trim().to_uppercase();
            if !symbol.is_empty() && !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }

        if symbols.is_empty() {
            return Err(ValidationFault::MissingSymbol);
        }
        Ok(symbols)
    }

    pub fn total_secs(&self) -> u64 {
        convert(self.duration, self.unit)
    }
}

/// Phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionPhase {
    /// No countdown, no active remote session
    #[default]
    Idle,
    /// Countdown active, remote session active
    Running,
    /// The countdown has reached zero; cleanup is in progress
    Expiring,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "IDLE"),
            SessionPhase::Running => write!(f, "RUNNING"),
            SessionPhase::Expiring => write!(f, "EXPIRING"),
        }
    }
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running with this many seconds left
    Counting(u64),
    /// The countdown hit zero and the session was reset
    Expired,
    /// No session was running
    Inactive,
}

/// One bounded-duration auto-trading run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoTradeSession {
    pub phase: SessionPhase,
    /// Assets included in the run
    pub symbols: Vec<String>,
    pub duration: u64,
    pub unit: DurationUnit,
    /// Seconds left; only `Some` while running
    pub remaining: Option<u64>,
}

impl AutoTradeSession {
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Enter `Running` with a fresh countdown.
    pub fn begin(&mut self, symbols: Vec<String>, duration: u64, unit: DurationUnit) {
        self.phase = SessionPhase::Running;
        self.symbols = symbols;
        self.duration = duration;
        self.unit = unit;
        self.remaining = Some(convert(duration, unit));
    }

    /// Decrement the countdown by one second.
    ///
    /// Never goes below zero. Reaching zero passes through `Expiring` and
    /// lands in `Idle` with the symbol selection cleared.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Inactive;
        }

        let left = self.remaining.unwrap_or(0).saturating_sub(1);
        if left > 0 {
            self.remaining = Some(left);
            return TickOutcome::Counting(left);
        }

        self.phase = SessionPhase::Expiring;
        self.remaining = Some(0);
        self.expire();
        TickOutcome::Expired
    }

    /// Manual stop: back to `Idle`, keeping the symbol selection.
    pub fn stop(&mut self) {
        self.phase = SessionPhase::Idle;
        self.remaining = None;
    }

    fn expire(&mut self) {
        self.phase = SessionPhase::Idle;
        self.remaining = None;
        self.symbols.clear();
    }

    /// Countdown as `HH:MM:SS`, if running.
    pub fn countdown(&self) -> Option<String> {
        self.remaining.map(format_countdown)
    }
}
