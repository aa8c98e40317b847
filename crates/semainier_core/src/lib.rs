//! Core domain logic for the semainier weekly planner.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{Activity, ActivityId, ActivityValidationError, DurationSize};
pub use model::container::{List, ListId, Sublist, SublistId};
pub use model::settings::{Settings, SettingsField, SettingsInput, SettingsValidationErrors};
pub use model::weekly_goal::{WeeklyGoal, WeeklyGoalValidationError};
pub use repo::activity_repo::{ActivityRepository, RepoError, RepoResult, SqliteActivityRepository};
pub use repo::settings_repo::{SettingsRepoError, SettingsRepository, SqliteSettingsRepository};
pub use schedule::grid::{day_end_time, generate_slots, SlotTime};
pub use schedule::week::{week_bounds, DayStatus, NavDirection, WeekWindow};
pub use schedule::wip::{evaluate_wip, units, WipReport, WipStatus};
pub use service::activity_service::ActivityService;
pub use service::settings_service::SettingsService;
pub use service::timetable_service::TimetableService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
