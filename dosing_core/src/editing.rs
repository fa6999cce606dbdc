//! Edits applied to a plan after generation.
//!
//! The generator's output is never edited in place by the core; callers
//! clone a plan and use these helpers on their copy.

use crate::{ClockTime, DaySchedule, Dose, TherapySchedule};
use chrono::NaiveDate;
use uuid::Uuid;

impl DaySchedule {
    /// Add a dose at `time` and restore ascending order
    ///
    /// Doses at the same minute keep their relative order.
    pub fn add_dose(&mut self, time: ClockTime) -> Uuid {
        let dose = Dose::at(time);
        let id = dose.id;
        self.doses.push(dose);
        self.doses.sort_by_key(|d| d.minute_of_day);
        tracing::debug!("Day {}: added dose at {}", self.day_number, time);
        id
    }

    /// Remove the dose with `id`, returning whether it existed
    pub fn remove_dose(&mut self, id: Uuid) -> bool {
        let before = self.doses.len();
        self.doses.retain(|d| d.id != id);
        self.doses.len() != before
    }

    /// Move the dose with `id` to `time`, returning whether it existed
    ///
    /// The dose stays at its position; callers wanting sorted order re-sort.
    pub fn retime_dose(&mut self, id: Uuid, time: ClockTime) -> bool {
        match self.doses.iter_mut().find(|d| d.id == id) {
            Some(dose) => {
                dose.time = time;
                dose.minute_of_day = time.minute_of_day();
                true
            }
            None => false,
        }
    }
}

impl TherapySchedule {
    /// Flip whether the alarm layer watches this plan
    pub fn toggle_active(&mut self) {
        self.is_active = !self.is_active;
    }

    /// Percentage of course days dated on or before `today`
    pub fn progress_percent(&self, today: NaiveDate) -> u8 {
        if self.days.is_empty() {
            return 0;
        }

        let passed = self.days.iter().filter(|d| d.date <= today).count();
        let percent = (passed as f64 / self.days.len() as f64 * 100.0).round();
        percent.min(100.0) as u8
    }
}
