//! Dosage stage tables.
//!
//! This module provides the built-in regimen and the lookup that maps a
//! course day onto the stage governing it.

use crate::types::*;
use once_cell::sync::Lazy;

/// Cached default stage table - built once and reused across all operations
static DEFAULT_STAGES: Lazy<Vec<DosageStage>> = Lazy::new(build_default_stages);

/// Get a reference to the cached default stage table
pub fn default_dosage_stages() -> &'static [DosageStage] {
    &DEFAULT_STAGES
}

fn build_default_stages() -> Vec<DosageStage> {
    // (start, end, interval hours, max doses per day)
    let rows: [(u32, u32, f64, u32); 5] = [
        (1, 3, 2.0, 6),
        (4, 12, 2.5, 5),
        (13, 16, 3.0, 4),
        (17, 20, 5.0, 3),
        (21, 25, 12.0, 2),
    ];

    rows.iter()
        .map(|&(start, end, interval_hours, max_doses_per_day)| DosageStage {
            period: DayRange { start, end },
            interval_hours,
            max_doses_per_day,
        })
        .collect()
}

/// Find the stage governing `day`
///
/// Stages are scanned in table order and the first whose period contains
/// `day` wins. A day no stage covers falls back to the last stage, so the
/// final regimen extends indefinitely. Returns `None` only for an empty table.
pub fn resolve_stage(day: u32, stages: &[DosageStage]) -> Option<&DosageStage> {
    stages
        .iter()
        .find(|stage| stage.period.contains(day))
        .or_else(|| stages.last())
}

/// Report problems that make a stage table unusable
///
/// Gaps and overlaps between periods are allowed and not reported.
pub fn validate_stages(stages: &[DosageStage]) -> Vec<String> {
    let mut errors = Vec::new();

    if stages.is_empty() {
        errors.push("Stage table is empty".to_string());
    }

    for (idx, stage) in stages.iter().enumerate() {
        if !stage.interval_hours.is_finite() || stage.interval_hours < 0.0 {
            errors.push(format!(
                "Stage {} ({}) has invalid interval {}",
                idx + 1,
                stage.period,
                stage.interval_hours
            ));
        }
    }

    errors
}
