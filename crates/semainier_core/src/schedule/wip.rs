//! Work-in-progress capacity accounting.
//!
//! # Responsibility
//! - Convert qualitative activity sizes into time units.
//! - Classify a week's committed units against the configured WIP limit.
//!
//! # Invariants
//! - The size-to-units table is fixed: S=1, M=3, L=6.
//! - Classification is three-way; "at limit" and "over limit" are distinct
//!   states, never collapsed into one boolean.
//! - Everything here is a read-only report over a caller-supplied snapshot.

use crate::model::activity::{Activity, DurationSize};
use serde::{Deserialize, Serialize};

/// Time units committed by one activity of the given size.
pub fn units(size: DurationSize) -> u32 {
    match size {
        DurationSize::Small => 1,
        DurationSize::Medium => 3,
        DurationSize::Large => 6,
    }
}

/// Minutes occupied by one activity of the given size, for a configured unit
/// length.
pub fn duration_minutes(size: DurationSize, unit_minutes: u32) -> u32 {
    units(size) * unit_minutes
}

/// Position of a committed total relative to the WIP limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipStatus {
    Under,
    Reached,
    Exceeded,
}

impl WipStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Under => "under",
            Self::Reached => "reached",
            Self::Exceeded => "exceeded",
        }
    }
}

/// Capacity report for one week's committed work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipReport {
    /// Total committed units over the evaluated snapshot.
    pub total_units: u32,
    /// Three-way classification against the limit.
    pub status: WipStatus,
    /// Utilization of the limit in percent, one decimal.
    pub percentage: f64,
}

/// Classifies `total_units` against `wip_limit`.
///
/// A zero limit cannot occur through validated settings; it is still handled
/// here by reporting zero utilization instead of dividing by zero.
pub fn evaluate_wip(total_units: u32, wip_limit: u32) -> WipReport {
    let status = if total_units > wip_limit {
        WipStatus::Exceeded
    } else if total_units == wip_limit {
        WipStatus::Reached
    } else {
        WipStatus::Under
    };

    let percentage = if wip_limit == 0 {
        0.0
    } else {
        round_one_decimal(f64::from(total_units) / f64::from(wip_limit) * 100.0)
    };

    WipReport {
        total_units,
        status,
        percentage,
    }
}

/// Sums the unit cost of an activity snapshot and classifies it.
pub fn wip_report(activities: &[Activity], wip_limit: u32) -> WipReport {
    let total_units = activities
        .iter()
        .map(|activity| units(activity.duration_size))
        .sum();
    evaluate_wip(total_units, wip_limit)
}

/// Aggregate statistics over an activity snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total_units: u32,
    pub activities_count: usize,
    pub small_count: usize,
    pub medium_count: usize,
    pub large_count: usize,
    pub completed_count: usize,
    /// Completed share in percent, one decimal; zero for an empty snapshot.
    pub completion_rate: f64,
}

/// Computes per-size and completion statistics for a snapshot.
pub fn activity_stats(activities: &[Activity]) -> ActivityStats {
    let mut stats = ActivityStats {
        total_units: 0,
        activities_count: activities.len(),
        small_count: 0,
        medium_count: 0,
        large_count: 0,
        completed_count: 0,
        completion_rate: 0.0,
    };

    for activity in activities {
        stats.total_units += units(activity.duration_size);
        match activity.duration_size {
            DurationSize::Small => stats.small_count += 1,
            DurationSize::Medium => stats.medium_count += 1,
            DurationSize::Large => stats.large_count += 1,
        }
        if activity.is_completed {
            stats.completed_count += 1;
        }
    }

    if stats.activities_count > 0 {
        stats.completion_rate = round_one_decimal(
            stats.completed_count as f64 / stats.activities_count as f64 * 100.0,
        );
    }

    stats
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{activity_stats, evaluate_wip, units, wip_report, WipStatus};
    use crate::model::activity::{Activity, DurationSize};
    use uuid::Uuid;

    fn activities_of(sizes: &[DurationSize]) -> Vec<Activity> {
        let list = Uuid::new_v4();
        sizes
            .iter()
            .map(|size| {
                let mut activity = Activity::new("task", list);
                activity.duration_size = *size;
                activity
            })
            .collect()
    }

    #[test]
    fn unit_table_is_monotonic() {
        assert_eq!(units(DurationSize::Small), 1);
        assert_eq!(units(DurationSize::Medium), 3);
        assert_eq!(units(DurationSize::Large), 6);
        assert!(units(DurationSize::Small) < units(DurationSize::Medium));
        assert!(units(DurationSize::Medium) < units(DurationSize::Large));
    }

    #[test]
    fn classification_is_exactly_three_way() {
        for total in 0..30 {
            let report = evaluate_wip(total, 10);
            let expected = match total.cmp(&10) {
                std::cmp::Ordering::Less => WipStatus::Under,
                std::cmp::Ordering::Equal => WipStatus::Reached,
                std::cmp::Ordering::Greater => WipStatus::Exceeded,
            };
            assert_eq!(report.status, expected, "total={total}");
        }
    }

    #[test]
    fn mixed_sizes_sum_and_classify() {
        use DurationSize::{Large as L, Medium as M, Small as S};
        let snapshot = activities_of(&[S, S, M, L]);
        let report = wip_report(&snapshot, 10);
        assert_eq!(report.total_units, 11);
        assert_eq!(report.status, WipStatus::Exceeded);
        assert_eq!(report.percentage, 110.0);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        let report = evaluate_wip(1, 3);
        assert_eq!(report.percentage, 33.3);
        let report = evaluate_wip(2, 3);
        assert_eq!(report.percentage, 66.7);
    }

    #[test]
    fn zero_limit_reports_zero_utilization() {
        let report = evaluate_wip(5, 0);
        assert_eq!(report.status, WipStatus::Exceeded);
        assert_eq!(report.percentage, 0.0);
    }

    #[test]
    fn stats_break_down_by_size_and_completion() {
        use DurationSize::{Large as L, Medium as M, Small as S};
        let mut snapshot = activities_of(&[S, S, M, L]);
        snapshot[0].set_completion(
            true,
            chrono::NaiveDate::from_ymd_opt(2025, 3, 12)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );

        let stats = activity_stats(&snapshot);
        assert_eq!(stats.total_units, 11);
        assert_eq!(stats.activities_count, 4);
        assert_eq!(stats.small_count, 2);
        assert_eq!(stats.medium_count, 1);
        assert_eq!(stats.large_count, 1);
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.completion_rate, 25.0);
    }

    #[test]
    fn empty_snapshot_has_zero_rate() {
        let stats = activity_stats(&[]);
        assert_eq!(stats.activities_count, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn report_serializes_with_wire_status_codes() {
        let report = evaluate_wip(10, 10);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "reached");
        assert_eq!(json["total_units"], 10);
    }
}
