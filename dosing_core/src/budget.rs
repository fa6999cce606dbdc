//! Pill budget estimation.
//!
//! Works out how many course days a fixed pill supply lasts by walking the
//! stage table day by day and taking each day's full dose cap.

use crate::{resolve_stage, DosageStage};

/// Safety cutoff for [`estimate_days`]
///
/// Reaching it means the stage table never consumes the supply (e.g. every
/// stage caps at zero doses), not that the supply lasts this long.
pub const MAX_ESTIMATED_DAYS: u32 = 1000;

/// Number of days `pill_count` pills cover under `stages`
///
/// Returns the first day on which cumulative consumption reaches or exceeds
/// the supply, 0 for a non-positive supply, and [`MAX_ESTIMATED_DAYS`] when
/// the table is degenerate (empty, or too few doses to ever use the supply).
pub fn estimate_days(pill_count: i64, stages: &[DosageStage]) -> u32 {
    if pill_count <= 0 {
        return 0;
    }

    let mut pills_used: i64 = 0;
    let mut day: u32 = 0;

    while pills_used < pill_count && day < MAX_ESTIMATED_DAYS {
        day += 1;
        if let Some(stage) = resolve_stage(day, stages) {
            pills_used += i64::from(stage.max_doses_per_day);
        }
    }

    if pills_used < pill_count {
        tracing::warn!(
            "Stage table consumed only {} of {} pills in {} days, stopping at cutoff",
            pills_used,
            pill_count,
            MAX_ESTIMATED_DAYS
        );
    } else {
        tracing::debug!("{} pills cover {} days", pill_count, day);
    }

    day
}
