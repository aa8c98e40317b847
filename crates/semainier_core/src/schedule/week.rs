//! Calendar week arithmetic.
//!
//! # Responsibility
//! - Compute the Monday-Sunday window bracketing any date.
//! - Clamp day-by-day timetable navigation into one calendar week.
//!
//! # Invariants
//! - Weeks start on Monday and span exactly seven days.
//! - `week_bounds` is total and idempotent: the Monday of a Monday's week is
//!   itself.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One calendar week, Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    /// Monday.
    #[serde(rename = "week_start")]
    pub start: NaiveDate,
    /// Sunday.
    #[serde(rename = "week_end")]
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Returns whether `date` falls inside this window, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Monday of the following week.
    pub fn next_start(&self) -> NaiveDate {
        self.start + chrono::Duration::days(7)
    }

    /// Monday of the preceding week.
    pub fn previous_start(&self) -> NaiveDate {
        self.start - chrono::Duration::days(7)
    }

    /// The seven dates of this window, Monday first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..7).map(|offset| self.start + chrono::Duration::days(offset))
    }
}

/// Computes the week window containing `reference`.
pub fn week_bounds(reference: NaiveDate) -> WeekWindow {
    let offset = i64::from(reference.weekday().num_days_from_monday());
    let start = reference - chrono::Duration::days(offset);
    WeekWindow {
        start,
        end: start + chrono::Duration::days(6),
    }
}

/// Position of a date relative to a caller-supplied "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Past,
    Today,
    Future,
}

/// Classifies `date` against `today`.
pub fn day_status(date: NaiveDate, today: NaiveDate) -> DayStatus {
    match date.cmp(&today) {
        std::cmp::Ordering::Less => DayStatus::Past,
        std::cmp::Ordering::Equal => DayStatus::Today,
        std::cmp::Ordering::Greater => DayStatus::Future,
    }
}

/// Timetable navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

impl NavDirection {
    /// Parses the route-level direction codes.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "prev" => Some(Self::Previous),
            "next" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Steps one day from `current` in `direction`, clamped into the week
/// containing `current`. Navigation never leaves the current calendar week.
pub fn navigate_day(current: NaiveDate, direction: NavDirection) -> NaiveDate {
    let target = match direction {
        NavDirection::Previous => current - chrono::Duration::days(1),
        NavDirection::Next => current + chrono::Duration::days(1),
    };
    let window = week_bounds(current);
    target.clamp(window.start, window.end)
}

#[cfg(test)]
mod tests {
    use super::{day_status, navigate_day, week_bounds, DayStatus, NavDirection};
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn wednesday_brackets_to_monday_and_sunday() {
        let window = week_bounds(date(2025, 3, 12));
        assert_eq!(window.start, date(2025, 3, 10));
        assert_eq!(window.end, date(2025, 3, 16));
    }

    #[test]
    fn bounds_are_idempotent() {
        for offset in 0..14 {
            let reference = date(2025, 3, 3) + chrono::Duration::days(offset);
            let window = week_bounds(reference);
            assert_eq!(week_bounds(window.start), window);
            assert_eq!(window.start.weekday(), Weekday::Mon);
            assert_eq!(window.end.weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn window_spans_six_days() {
        let window = week_bounds(date(2024, 12, 31));
        assert_eq!(window.end - window.start, chrono::Duration::days(6));
        assert!(window.contains(date(2024, 12, 31)));
        // Year boundary: the window crosses into 2025.
        assert_eq!(window.end, date(2025, 1, 5));
    }

    #[test]
    fn window_day_iteration_is_monday_first() {
        let window = week_bounds(date(2025, 3, 12));
        let days: Vec<_> = window.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], window.start);
        assert_eq!(days[6], window.end);
    }

    #[test]
    fn next_and_previous_starts_step_one_week() {
        let window = week_bounds(date(2025, 3, 12));
        assert_eq!(window.next_start(), date(2025, 3, 17));
        assert_eq!(window.previous_start(), date(2025, 3, 3));
    }

    #[test]
    fn day_status_compares_against_supplied_today() {
        let today = date(2025, 3, 12);
        assert_eq!(day_status(date(2025, 3, 11), today), DayStatus::Past);
        assert_eq!(day_status(today, today), DayStatus::Today);
        assert_eq!(day_status(date(2025, 3, 13), today), DayStatus::Future);
    }

    #[test]
    fn navigation_stays_inside_the_week() {
        let monday = date(2025, 3, 10);
        let sunday = date(2025, 3, 16);

        assert_eq!(navigate_day(monday, NavDirection::Previous), monday);
        assert_eq!(navigate_day(sunday, NavDirection::Next), sunday);
        assert_eq!(
            navigate_day(date(2025, 3, 12), NavDirection::Next),
            date(2025, 3, 13)
        );
        assert_eq!(
            navigate_day(date(2025, 3, 12), NavDirection::Previous),
            date(2025, 3, 11)
        );
    }

    #[test]
    fn direction_codes_parse() {
        assert_eq!(NavDirection::parse("prev"), Some(NavDirection::Previous));
        assert_eq!(NavDirection::parse("next"), Some(NavDirection::Next));
        assert_eq!(NavDirection::parse("sideways"), None);
    }
}
