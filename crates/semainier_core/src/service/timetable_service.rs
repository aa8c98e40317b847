//! Timetable use-case service.
//!
//! # Responsibility
//! - Assemble the day view: slot grid plus the day's place in its week.
//! - Step the displayed day without ever leaving the calendar week.

use crate::repo::settings_repo::{SettingsRepoResult, SettingsRepository};
use crate::schedule::grid::{day_end_time, generate_slots, SlotTime};
use crate::schedule::week::{day_status, navigate_day, week_bounds, DayStatus, NavDirection};
use chrono::NaiveDate;

/// One displayable timetable day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    pub status: DayStatus,
    /// Whether stepping back would leave the week.
    pub is_first_day: bool,
    /// Whether stepping forward would leave the week.
    pub is_last_day: bool,
    pub slots: Vec<SlotTime>,
    pub day_end: SlotTime,
}

/// Use-case service for the timetable column.
pub struct TimetableService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> TimetableService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds the day view for `date`, classified against `today`.
    pub fn day_view(&self, date: NaiveDate, today: NaiveDate) -> SettingsRepoResult<DayView> {
        let settings = self.repo.load_settings()?;
        let window = week_bounds(date);
        Ok(DayView {
            date,
            status: day_status(date, today),
            is_first_day: date <= window.start,
            is_last_day: date >= window.end,
            slots: generate_slots(
                &settings.day_start,
                settings.unit_minutes,
                settings.units_per_day,
            ),
            day_end: day_end_time(
                &settings.day_start,
                settings.unit_minutes,
                settings.units_per_day,
            ),
        })
    }

    /// Steps one day from `current`, clamped into `current`'s week, and
    /// builds the resulting view.
    pub fn navigate(
        &self,
        current: NaiveDate,
        direction: NavDirection,
        today: NaiveDate,
    ) -> SettingsRepoResult<DayView> {
        self.day_view(navigate_day(current, direction), today)
    }
}
