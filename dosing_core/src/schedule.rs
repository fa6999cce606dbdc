//! Schedule generation.
//!
//! Turns therapy settings into a day-by-day dose plan:
//! - Each day's stage comes from the stage table (last-stage fallback)
//! - The first dose lands on wake time, later ones step by the stage interval
//! - A day stops at the stage cap or at the first dose past the sleep boundary
//!
//! A sleep time at or before the wake time means the window runs past
//! midnight. Doses scheduled after midnight keep generation order, so such a
//! day lists e.g. `22:00, 02:00` rather than sorting by clock time.

use crate::{resolve_stage, ClockTime, DaySchedule, DosageStage, Dose, Error, Result};
use crate::{TherapySchedule, TherapySettings, MINUTES_PER_DAY};
use chrono::Days;
use uuid::Uuid;

/// Convert an interval in hours to whole minutes
///
/// Rounds half away from zero, so 2.5h is 150 minutes and 0.0125h (0.75
/// minutes) becomes 1 minute.
pub fn interval_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Generate the full dose plan for `settings.total_days` days
///
/// `pills_in_package` is not consulted here; see [`plan_therapy`].
///
/// # Errors
/// Returns [`Error::EmptyStageTable`] when there are no dosage stages.
/// Every other input yields a plan, including `total_days <= 0` (no days).
pub fn generate_schedule(settings: &TherapySettings) -> Result<Vec<DaySchedule>> {
    if settings.dosage_stages.is_empty() {
        return Err(Error::EmptyStageTable);
    }

    if settings.total_days <= 0 {
        tracing::debug!("Non-positive course length {}, no days", settings.total_days);
        return Ok(Vec::new());
    }

    let (wake, sleep) = awake_window(settings.wake_time, settings.sleep_time);
    let total_days = u32::try_from(settings.total_days).unwrap_or(u32::MAX);
    let mut days = Vec::with_capacity(total_days.min(1024) as usize);

    for day_number in 1..=total_days {
        let date = settings
            .start_date
            .checked_add_days(Days::new(u64::from(day_number - 1)))
            .ok_or_else(|| {
                Error::Other(format!(
                    "Day {} from {} is out of calendar range",
                    day_number, settings.start_date
                ))
            })?;

        let stage = resolve_stage(day_number, &settings.dosage_stages)
            .ok_or(Error::EmptyStageTable)?;
        let doses = doses_for_day(wake, sleep, stage);

        tracing::debug!(
            "Day {} ({}): stage {}, {} doses",
            day_number,
            date,
            stage.period,
            doses.len()
        );

        days.push(DaySchedule {
            day_number,
            date,
            doses,
            stage: stage.clone(),
        });
    }

    tracing::info!(
        "Generated {} day plan starting {}",
        days.len(),
        settings.start_date
    );

    Ok(days)
}

/// Generate a plan ready for collaborators
///
/// Applies the pill budget override to the course length, generates the
/// days, and wraps them in an active schedule with a fresh id.
pub fn plan_therapy(settings: &TherapySettings) -> Result<TherapySchedule> {
    let mut settings = settings.clone();
    let total_days = settings.effective_total_days();
    if total_days != settings.total_days {
        tracing::info!(
            "Pill budget of {:?} sets course length to {} days",
            settings.pills_in_package,
            total_days
        );
    }
    settings.total_days = total_days;

    let days = generate_schedule(&settings)?;

    Ok(TherapySchedule {
        id: Uuid::new_v4(),
        is_active: true,
        settings,
        days,
    })
}

/// Wake and sleep as minute offsets from the day's midnight
///
/// The sleep offset moves into the next day when it is not after wake.
fn awake_window(wake_time: ClockTime, sleep_time: ClockTime) -> (i64, i64) {
    let wake = i64::from(wake_time.minute_of_day());
    let mut sleep = i64::from(sleep_time.minute_of_day());
    if sleep <= wake {
        sleep += i64::from(MINUTES_PER_DAY);
    }
    (wake, sleep)
}

/// Forward scan from wake time with early termination at the sleep boundary
fn doses_for_day(wake: i64, sleep: i64, stage: &DosageStage) -> Vec<Dose> {
    let step = interval_minutes(stage.interval_hours);
    let mut doses = Vec::new();

    for i in 0..i64::from(stage.max_doses_per_day) {
        let offset = wake.saturating_add(i.saturating_mul(step));

        // The wake-time dose is always taken
        if i > 0 && offset > sleep {
            break;
        }

        let minute = offset.rem_euclid(i64::from(MINUTES_PER_DAY)) as u32;
        doses.push(Dose::at(ClockTime::from_minute_of_day(minute)));
    }

    doses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_dosage_stages, DayRange};
    use chrono::NaiveDate;

    fn stage(period: &str, interval_hours: f64, max_doses: u32) -> DosageStage {
        DosageStage::new(period.parse().unwrap(), interval_hours, max_doses)
    }

    fn settings(wake: &str, sleep: &str, total_days: i64, stages: Vec<DosageStage>) -> TherapySettings {
        TherapySettings {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
            medication_name: "TEST".into(),
            total_days,
            pills_in_package: None,
            wake_time: wake.parse().unwrap(),
            sleep_time: sleep.parse().unwrap(),
            dosage_stages: stages,
        }
    }

    fn times(day: &DaySchedule) -> Vec<String> {
        day.doses.iter().map(|d| d.time.to_string()).collect()
    }

    #[test]
    fn test_cap_limits_doses() {
        crate::logging::init_test();
        let s = settings("08:00", "22:00", 1, vec![stage("1-3", 2.0, 6)]);
        let days = generate_schedule(&s).unwrap();

        assert_eq!(days.len(), 1);
        assert_eq!(
            times(&days[0]),
            vec!["08:00", "10:00", "12:00", "14:00", "16:00", "18:00"]
        );
    }

    #[test]
    fn test_stops_past_sleep_boundary() {
        let s = settings("08:00", "17:00", 1, vec![stage("1-3", 2.0, 6)]);
        let days = generate_schedule(&s).unwrap();

        assert_eq!(
            times(&days[0]),
            vec!["08:00", "10:00", "12:00", "14:00", "16:00"]
        );
    }

    #[test]
    fn test_dose_on_sleep_boundary_is_kept() {
        let s = settings("08:00", "16:00", 1, vec![stage("1-", 4.0, 5)]);
        let days = generate_schedule(&s).unwrap();
        assert_eq!(times(&days[0]), vec!["08:00", "12:00", "16:00"]);
    }

    #[test]
    fn test_zero_interval_stacks_at_wake() {
        let s = settings("08:00", "22:00", 1, vec![stage("1-", 0.0, 3)]);
        let days = generate_schedule(&s).unwrap();
        assert_eq!(times(&days[0]), vec!["08:00", "08:00", "08:00"]);

        let ids: std::collections::HashSet<_> = days[0].doses.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_zero_cap_gives_empty_day() {
        let s = settings("08:00", "22:00", 2, vec![stage("1-", 2.0, 0)]);
        let days = generate_schedule(&s).unwrap();
        assert_eq!(days.len(), 2);
        assert!(days.iter().all(|d| d.doses.is_empty()));
    }

    #[test]
    fn test_cross_midnight_window() {
        let s = settings("22:00", "06:00", 1, vec![stage("1-", 4.0, 3)]);
        let days = generate_schedule(&s).unwrap();

        assert_eq!(times(&days[0]), vec!["22:00", "02:00", "06:00"]);
        let minutes: Vec<u32> = days[0].doses.iter().map(|d| d.minute_of_day).collect();
        assert_eq!(minutes, vec![1320, 120, 360]);
    }

    #[test]
    fn test_equal_wake_and_sleep_spans_full_day() {
        let s = settings("08:00", "08:00", 1, vec![stage("1-", 6.0, 10)]);
        let days = generate_schedule(&s).unwrap();
        assert_eq!(
            times(&days[0]),
            vec!["08:00", "14:00", "20:00", "02:00", "08:00"]
        );
    }

    #[test]
    fn test_first_dose_kept_when_window_is_tiny() {
        let s = settings("08:00", "08:01", 1, vec![stage("1-", 2.0, 4)]);
        let days = generate_schedule(&s).unwrap();
        assert_eq!(times(&days[0]), vec!["08:00"]);
    }

    #[test]
    fn test_fractional_interval() {
        let s = settings("08:00", "22:00", 1, vec![stage("1-", 2.5, 5)]);
        let days = generate_schedule(&s).unwrap();
        assert_eq!(
            times(&days[0]),
            vec!["08:00", "10:30", "13:00", "15:30", "18:00"]
        );
    }

    #[test]
    fn test_interval_minutes_rounding() {
        assert_eq!(interval_minutes(2.5), 150);
        assert_eq!(interval_minutes(0.0), 0);
        assert_eq!(interval_minutes(0.0125), 1);
        assert_eq!(interval_minutes(0.33), 20);
        assert_eq!(interval_minutes(1.0 / 3.0), 20);
    }

    #[test]
    fn test_non_positive_days_is_empty() {
        let stages = vec![stage("1-", 2.0, 6)];
        assert!(generate_schedule(&settings("08:00", "22:00", 0, stages.clone()))
            .unwrap()
            .is_empty());
        assert!(generate_schedule(&settings("08:00", "22:00", -4, stages))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_empty_stage_table_is_rejected() {
        let s = settings("08:00", "22:00", 3, vec![]);
        assert!(matches!(
            generate_schedule(&s),
            Err(Error::EmptyStageTable)
        ));
    }

    #[test]
    fn test_dates_advance_across_month_end() {
        let s = settings("08:00", "22:00", 3, default_dosage_stages().to_vec());
        let days = generate_schedule(&s).unwrap();

        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-30", "2024-01-31", "2024-02-01"]);
        let numbers: Vec<u32> = days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_default_course_properties() {
        let s = settings("07:30", "23:00", 30, default_dosage_stages().to_vec());
        let days = generate_schedule(&s).unwrap();
        assert_eq!(days.len(), 30);

        for day in &days {
            assert!(day.doses.len() <= day.stage.max_doses_per_day as usize);
            assert_eq!(day.doses[0].time.to_string(), "07:30");
            for pair in day.doses.windows(2) {
                assert!(pair[0].minute_of_day <= pair[1].minute_of_day);
            }
        }

        // days 26+ extend the last stage
        assert_eq!(days[29].stage.period, DayRange { start: 21, end: 25 });
        assert_eq!(times(&days[29]), vec!["07:30", "19:30"]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let s = settings("06:15", "01:00", 20, default_dosage_stages().to_vec());
        let a = generate_schedule(&s).unwrap();
        let b = generate_schedule(&s).unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.day_number, y.day_number);
            assert_eq!(x.date, y.date);
            assert_eq!(times(x), times(y));
        }
    }

    #[test]
    fn test_plan_therapy_applies_pill_budget() {
        let mut s = settings(
            "08:00",
            "22:00",
            25,
            vec![stage("1-3", 2.0, 2), stage("4-", 2.0, 1)],
        );
        s.pills_in_package = Some(5);

        let plan = plan_therapy(&s).unwrap();
        assert!(plan.is_active);
        assert_eq!(plan.settings.total_days, 3);
        assert_eq!(plan.days.len(), 3);
    }

    #[test]
    fn test_plan_therapy_without_pills_keeps_days() {
        let s = settings("08:00", "22:00", 4, default_dosage_stages().to_vec());
        let plan = plan_therapy(&s).unwrap();
        assert_eq!(plan.settings.total_days, 4);
        assert_eq!(plan.days.len(), 4);
    }
}
