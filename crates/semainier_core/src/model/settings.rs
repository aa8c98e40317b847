//! Settings domain model and validator.
//!
//! # Responsibility
//! - Define the single process-wide configuration record.
//! - Validate candidate values against every business rule and report the
//!   full violation set, not just the first.
//!
//! # Invariants
//! - `unit_minutes` is in [5, 60] and a multiple of 5.
//! - `day_start` is a valid `HH:MM` with minutes on a 5-minute step.
//! - `units_per_day` is strictly positive.
//! - `wip_limit` is strictly positive and at most `units_per_day * 7`.
//! - A candidate that fails any rule never replaces the active value.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_UNIT_MINUTES: u32 = 30;
pub const DEFAULT_DAY_START: &str = "09:00";
pub const DEFAULT_UNITS_PER_DAY: u32 = 20;
pub const DEFAULT_WIP_LIMIT: u32 = 100;

/// Minutes of schedulable time assumed per day when suggesting a unit count.
const SUGGESTION_DAY_MINUTES: f64 = 600.0;

/// Validated, normalized planner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Length of one schedulable time unit, in minutes.
    pub unit_minutes: u32,
    /// First slot of the daily grid, normalized `HH:MM`.
    pub day_start: String,
    /// Number of slots generated per day.
    pub units_per_day: u32,
    /// Maximum committed units allowed across one week.
    pub wip_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit_minutes: DEFAULT_UNIT_MINUTES,
            day_start: DEFAULT_DAY_START.to_string(),
            units_per_day: DEFAULT_UNITS_PER_DAY,
            wip_limit: DEFAULT_WIP_LIMIT,
        }
    }
}

impl Settings {
    /// Parses the stored `day_start`, if it is still well-formed.
    ///
    /// Persisted values can rot (manual edits, partial restores); the grid
    /// generator recovers with its own default rather than failing here.
    pub fn day_start_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.day_start, "%H:%M").ok()
    }

    /// Maximum weekly units the configured day shape allows.
    pub fn max_weekly_units(&self) -> u32 {
        max_weekly_units(self.units_per_day)
    }
}

/// Form-shaped candidate values, untyped as they arrive from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsInput {
    pub unit_minutes: String,
    pub day_start: String,
    pub units_per_day: String,
    pub wip_limit: String,
}

impl SettingsInput {
    /// Builds an input from already-typed values, for programmatic updates.
    pub fn from_values(
        unit_minutes: u32,
        day_start: &str,
        units_per_day: u32,
        wip_limit: u32,
    ) -> Self {
        Self {
            unit_minutes: unit_minutes.to_string(),
            day_start: day_start.to_string(),
            units_per_day: units_per_day.to_string(),
            wip_limit: wip_limit.to_string(),
        }
    }
}

/// Field names used as keys of the validation error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SettingsField {
    UnitMinutes,
    DayStart,
    UnitsPerDay,
    WipLimit,
}

impl SettingsField {
    /// Canonical wire name, matching the serialized `Settings` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnitMinutes => "unit_minutes",
            Self::DayStart => "day_start",
            Self::UnitsPerDay => "units_per_day",
            Self::WipLimit => "wip_limit",
        }
    }
}

impl Display for SettingsField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full set of rule violations for one validation pass, one entry per field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsValidationErrors {
    entries: BTreeMap<SettingsField, String>,
}

impl SettingsValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn message(&self, field: SettingsField) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingsField, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Wire shape of the error map: canonical field name -> message.
    pub fn to_field_map(&self) -> BTreeMap<&'static str, String> {
        self.entries
            .iter()
            .map(|(field, message)| (field.as_str(), message.clone()))
            .collect()
    }

    fn insert(&mut self, field: SettingsField, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }
}

impl Display for SettingsValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.entries {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl Error for SettingsValidationErrors {}

/// Validates a candidate and converts it to a normalized [`Settings`] value.
///
/// Every rule is checked independently so the caller can render one combined
/// error list; validation never short-circuits on the first failure. The
/// `wip_limit` upper bound is checked against the best-available
/// `units_per_day` value even when that field has its own violation, so the
/// error message can name the derived maximum.
pub fn validate_settings(input: &SettingsInput) -> Result<Settings, SettingsValidationErrors> {
    let mut errors = SettingsValidationErrors::default();

    let unit_minutes = match input.unit_minutes.trim().parse::<i64>() {
        Ok(value) if !(5..=60).contains(&value) => {
            errors.insert(
                SettingsField::UnitMinutes,
                "time unit must be between 5 and 60 minutes",
            );
            None
        }
        Ok(value) if value % 5 != 0 => {
            errors.insert(
                SettingsField::UnitMinutes,
                "time unit must be a multiple of 5",
            );
            None
        }
        Ok(value) => Some(value as u32),
        Err(_) => {
            errors.insert(
                SettingsField::UnitMinutes,
                "time unit must be a whole number",
            );
            None
        }
    };

    let day_start = match NaiveTime::parse_from_str(input.day_start.trim(), "%H:%M") {
        Ok(time) if time.minute() % 5 != 0 => {
            errors.insert(
                SettingsField::DayStart,
                "day start minutes must be on a 5-minute step",
            );
            None
        }
        Ok(time) => Some(time),
        Err(_) => {
            errors.insert(
                SettingsField::DayStart,
                "day start must be a time in HH:MM format",
            );
            None
        }
    };

    // Parsed-but-invalid values still feed the wip_limit bound below.
    let units_per_day_raw = input.units_per_day.trim().parse::<i64>().ok();
    let units_per_day = match units_per_day_raw {
        Some(value) if value <= 0 => {
            errors.insert(
                SettingsField::UnitsPerDay,
                "units per day must be greater than 0",
            );
            None
        }
        Some(value) => Some(value as u32),
        None => {
            errors.insert(
                SettingsField::UnitsPerDay,
                "units per day must be a whole number",
            );
            None
        }
    };

    let wip_limit = match input.wip_limit.trim().parse::<i64>() {
        Ok(value) if value <= 0 => {
            errors.insert(SettingsField::WipLimit, "WIP limit must be greater than 0");
            None
        }
        Ok(value) => match units_per_day_raw {
            Some(per_day) if value > per_day.saturating_mul(7) => {
                let max = per_day.saturating_mul(7);
                errors.insert(
                    SettingsField::WipLimit,
                    format!("WIP limit cannot exceed {max} (units_per_day x 7)"),
                );
                None
            }
            _ => Some(value as u32),
        },
        Err(_) => {
            errors.insert(SettingsField::WipLimit, "WIP limit must be a whole number");
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let day_start = day_start.expect("validated above");
    Ok(Settings {
        unit_minutes: unit_minutes.expect("validated above"),
        day_start: day_start.format("%H:%M").to_string(),
        units_per_day: units_per_day.expect("validated above"),
        wip_limit: wip_limit.expect("validated above"),
    })
}

/// Suggests a per-day unit count assuming a ten-hour schedulable day.
pub fn suggested_units_per_day(unit_minutes: u32) -> u32 {
    (SUGGESTION_DAY_MINUTES / f64::from(unit_minutes)).round() as u32
}

/// Maximum weekly units for a given per-day unit count.
pub fn max_weekly_units(units_per_day: u32) -> u32 {
    units_per_day.saturating_mul(7)
}
