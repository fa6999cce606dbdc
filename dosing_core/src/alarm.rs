//! Alarm polling support.
//!
//! The core never pushes reminders. A notifier polls with the current date
//! and minute, and these helpers tell it which doses are due.

use crate::{ClockTime, TherapySchedule};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use uuid::Uuid;

/// A dose due at the polled minute
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DueDose {
    pub schedule_id: Uuid,
    pub medication_name: String,
    pub time: ClockTime,
}

/// Doses due on `date` at exactly `minute_of_day`
///
/// Inactive plans are skipped. Each active plan yields at most one entry,
/// even when several of its doses share the minute.
pub fn due_doses(schedules: &[TherapySchedule], date: NaiveDate, minute_of_day: u32) -> Vec<DueDose> {
    schedules
        .iter()
        .filter(|s| s.is_active)
        .filter_map(|schedule| {
            let day = schedule.days.iter().find(|d| d.date == date)?;
            let dose = day.doses.iter().find(|d| d.minute_of_day == minute_of_day)?;
            Some(DueDose {
                schedule_id: schedule.id,
                medication_name: schedule.settings.medication_name.clone(),
                time: dose.time,
            })
        })
        .collect()
}

/// De-duplicating poller around [`due_doses`]
///
/// Polling several times within one minute reports that minute's doses once.
#[derive(Clone, Debug, Default)]
pub struct AlarmClock {
    last_checked: Option<(NaiveDate, u32)>,
}

impl AlarmClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `now` against the plans, firing each minute at most once
    pub fn poll(&mut self, schedules: &[TherapySchedule], now: NaiveDateTime) -> Vec<DueDose> {
        let date = now.date();
        let minute = now.hour() * 60 + now.minute();

        if self.last_checked == Some((date, minute)) {
            return Vec::new();
        }
        self.last_checked = Some((date, minute));

        let due = due_doses(schedules, date, minute);
        for dose in &due {
            tracing::info!(
                "Dose due at {} for {}",
                dose.time,
                if dose.medication_name.is_empty() {
                    "unnamed medication"
                } else {
                    dose.medication_name.as_str()
                }
            );
        }
        due
    }
}
