//! Core domain types for the Dosplan system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Clock times and day ranges (parsed once, at configuration load)
//! - Dosage stages forming a piecewise regimen table
//! - Doses and per-day plans produced by the generator
//! - Therapy settings and the generated therapy schedule

use crate::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Minutes in one calendar day
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ============================================================================
// Clock Time
// ============================================================================

/// Hour and minute of a day, written as `HH:MM`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build a clock time, rejecting out-of-range components
    pub fn new(hour: u8, minute: u8) -> crate::Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidClockTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    /// Clock time for a minute offset, wrapped into a single day
    pub fn from_minute_of_day(minutes: u32) -> Self {
        let m = minutes % MINUTES_PER_DAY;
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight, 0..=1439
    pub fn minute_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let invalid = || Error::InvalidClockTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Day Range
// ============================================================================

/// Inclusive range of course days a stage applies to
///
/// Written as `"1-3"`, `"7"` (single day) or `"21-"` (open-ended).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayRange {
    pub start: u32,
    pub end: u32,
}

impl DayRange {
    /// End value used for an open-ended range
    pub const OPEN_END: u32 = u32::MAX;

    pub fn new(start: u32, end: u32) -> crate::Result<Self> {
        if start < 1 || end < start {
            return Err(Error::InvalidDayRange(format!("{}-{}", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Range starting at `start` with no upper bound
    pub fn from_day(start: u32) -> crate::Result<Self> {
        Self::new(start, Self::OPEN_END)
    }

    pub fn contains(&self, day: u32) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn is_open_ended(&self) -> bool {
        self.end == Self::OPEN_END
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_open_ended() {
            write!(f, "{}-", self.start)
        } else if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for DayRange {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let invalid = || Error::InvalidDayRange(s.to_string());
        let parse_day = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

        let range = match s.trim().split_once('-') {
            Some((start, end)) if end.trim().is_empty() => Self::from_day(parse_day(start)?),
            Some((start, end)) => Self::new(parse_day(start)?, parse_day(end)?),
            None => {
                let day = parse_day(s)?;
                Self::new(day, day)
            }
        };
        range.map_err(|_| invalid())
    }
}

impl TryFrom<String> for DayRange {
    type Error = Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<DayRange> for String {
    fn from(value: DayRange) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Stages and Doses
// ============================================================================

/// One phase of the regimen: dosing rules for a range of days
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DosageStage {
    pub period: DayRange,
    /// Spacing between consecutive doses, in hours (fractions allowed)
    pub interval_hours: f64,
    pub max_doses_per_day: u32,
}

impl DosageStage {
    pub fn new(period: DayRange, interval_hours: f64, max_doses_per_day: u32) -> Self {
        Self {
            period,
            interval_hours,
            max_doses_per_day,
        }
    }
}

/// A single scheduled intake
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dose {
    pub id: Uuid,
    pub time: ClockTime,
    pub minute_of_day: u32,
}

impl Dose {
    /// Create a dose at `time` with a fresh identifier
    pub fn at(time: ClockTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            time,
            minute_of_day: time.minute_of_day(),
        }
    }
}

/// Plan for one calendar day of the course
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// 1-based day of the course
    pub day_number: u32,
    pub date: NaiveDate,
    pub doses: Vec<Dose>,
    /// Stage the doses were generated from
    pub stage: DosageStage,
}

// ============================================================================
// Settings and Schedule
// ============================================================================

/// Input to schedule generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TherapySettings {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub medication_name: String,
    pub total_days: i64,
    #[serde(default)]
    pub pills_in_package: Option<i64>,
    pub wake_time: ClockTime,
    pub sleep_time: ClockTime,
    pub dosage_stages: Vec<DosageStage>,
}

impl TherapySettings {
    /// Course length after applying the pill budget override
    ///
    /// A positive `pills_in_package` replaces `total_days` with the number
    /// of days that supply covers.
    pub fn effective_total_days(&self) -> i64 {
        match self.pills_in_package {
            Some(pills) if pills > 0 => {
                i64::from(crate::budget::estimate_days(pills, &self.dosage_stages))
            }
            _ => self.total_days,
        }
    }
}

/// A generated plan as handed to storage, editor and alarm collaborators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TherapySchedule {
    pub id: Uuid,
    pub is_active: bool,
    pub settings: TherapySettings,
    pub days: Vec<DaySchedule>,
}
