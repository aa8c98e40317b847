//! Settings use-case service.
//!
//! # Responsibility
//! - Serve and update the planner configuration.
//! - Expand the active configuration into the daily slot report.

use crate::model::settings::{suggested_units_per_day, Settings, SettingsInput};
use crate::repo::settings_repo::{SettingsRepoResult, SettingsRepository};
use crate::schedule::grid::{day_end_time, slot_labels};
use serde::{Deserialize, Serialize};

/// Daily grid expansion of the active settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotsReport {
    pub unit_minutes: u32,
    pub day_start: String,
    pub units_per_day: u32,
    /// End of the scheduled day, one unit past the last slot start.
    pub day_end: String,
    /// Ordered slot starts, `HH:MM`, `units_per_day` long.
    pub slots: Vec<String>,
}

/// Suggested day shape for a proposed unit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsSuggestion {
    pub unit_minutes: u32,
    pub suggested_units_per_day: u32,
    pub max_weekly_units: u32,
}

/// Use-case service wrapper for settings operations.
pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the active settings, seeding defaults on first use.
    pub fn get_settings(&self) -> SettingsRepoResult<Settings> {
        self.repo.load_settings()
    }

    /// Validates and applies a settings update, all-or-nothing.
    pub fn update_settings(&self, input: &SettingsInput) -> SettingsRepoResult<Settings> {
        self.repo.update_settings(input)
    }

    /// Expands the active settings into the daily slot sequence.
    pub fn time_slots_report(&self) -> SettingsRepoResult<TimeSlotsReport> {
        let settings = self.repo.load_settings()?;
        Ok(TimeSlotsReport {
            unit_minutes: settings.unit_minutes,
            day_start: settings.day_start.clone(),
            units_per_day: settings.units_per_day,
            day_end: day_end_time(
                &settings.day_start,
                settings.unit_minutes,
                settings.units_per_day,
            )
            .to_string(),
            slots: slot_labels(
                &settings.day_start,
                settings.unit_minutes,
                settings.units_per_day,
            ),
        })
    }

    /// Suggests a per-day unit count for a candidate unit length.
    ///
    /// Returns `None` when the unit length itself is out of the allowed
    /// 5-to-60, multiple-of-5 range.
    pub fn units_suggestion(&self, unit_minutes: u32) -> Option<UnitsSuggestion> {
        if !(5..=60).contains(&unit_minutes) || unit_minutes % 5 != 0 {
            return None;
        }
        let suggested = suggested_units_per_day(unit_minutes);
        Some(UnitsSuggestion {
            unit_minutes,
            suggested_units_per_day: suggested,
            max_weekly_units: suggested * 7,
        })
    }
}
