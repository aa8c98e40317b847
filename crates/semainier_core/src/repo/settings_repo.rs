//! Settings repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Serve the single process-wide Settings row, creating defaults on first
//!   read.
//! - Apply validate-then-write updates: the persisted row never holds an
//!   intermediate invalid state.
//!
//! # Invariants
//! - Exactly one row exists (`id = 1`, enforced by schema CHECK).
//! - A failed validation leaves the stored value untouched.

use crate::db::DbError;
use crate::model::settings::{validate_settings, Settings, SettingsInput, SettingsValidationErrors};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SettingsRepoResult<T> = Result<T, SettingsRepoError>;

/// Errors from settings persistence and update operations.
#[derive(Debug)]
pub enum SettingsRepoError {
    /// Candidate values violated one or more business rules; nothing was
    /// written. Carries the full field -> message map.
    Validation(SettingsValidationErrors),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for SettingsRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "invalid settings: {errors}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted settings data: {message}"),
        }
    }
}

impl Error for SettingsRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SettingsRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SettingsRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the settings singleton.
pub trait SettingsRepository {
    /// Loads the active settings, seeding defaults when none exist yet.
    fn load_settings(&self) -> SettingsRepoResult<Settings>;
    /// Validates a candidate and replaces the stored value atomically.
    ///
    /// All-or-nothing: on any rule violation the stored row is unchanged and
    /// the full error map is returned.
    fn update_settings(&self, input: &SettingsInput) -> SettingsRepoResult<Settings>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load_settings(&self) -> SettingsRepoResult<Settings> {
        let existing = self
            .conn
            .query_row(
                "SELECT unit_minutes, day_start, units_per_day, wip_limit
                 FROM settings
                 WHERE id = 1;",
                [],
                parse_settings_row,
            )
            .optional()?;

        if let Some(parsed) = existing {
            return parsed;
        }

        let defaults = Settings::default();
        self.conn.execute(
            "INSERT INTO settings (id, unit_minutes, day_start, units_per_day, wip_limit)
             VALUES (1, ?1, ?2, ?3, ?4);",
            params![
                defaults.unit_minutes,
                defaults.day_start.as_str(),
                defaults.units_per_day,
                defaults.wip_limit,
            ],
        )?;
        info!("event=settings_seeded module=repo status=ok");
        Ok(defaults)
    }

    fn update_settings(&self, input: &SettingsInput) -> SettingsRepoResult<Settings> {
        let settings = validate_settings(input).map_err(SettingsRepoError::Validation)?;

        self.conn.execute(
            "INSERT INTO settings (id, unit_minutes, day_start, units_per_day, wip_limit)
             VALUES (1, ?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                unit_minutes = excluded.unit_minutes,
                day_start = excluded.day_start,
                units_per_day = excluded.units_per_day,
                wip_limit = excluded.wip_limit,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                settings.unit_minutes,
                settings.day_start.as_str(),
                settings.units_per_day,
                settings.wip_limit,
            ],
        )?;
        info!(
            "event=settings_updated module=repo status=ok unit_minutes={} units_per_day={} wip_limit={}",
            settings.unit_minutes, settings.units_per_day, settings.wip_limit
        );

        Ok(settings)
    }
}

fn parse_settings_row(row: &Row<'_>) -> rusqlite::Result<SettingsRepoResult<Settings>> {
    let unit_minutes: i64 = row.get("unit_minutes")?;
    let units_per_day: i64 = row.get("units_per_day")?;
    let wip_limit: i64 = row.get("wip_limit")?;
    let day_start: String = row.get("day_start")?;

    Ok(convert_settings_row(
        unit_minutes,
        day_start,
        units_per_day,
        wip_limit,
    ))
}

/// Converts raw row values into the read model.
///
/// Numeric fields must be non-negative to form a `Settings` value; a
/// malformed `day_start` is NOT rejected here — the grid generator owns that
/// recovery so the display stays renderable.
fn convert_settings_row(
    unit_minutes: i64,
    day_start: String,
    units_per_day: i64,
    wip_limit: i64,
) -> SettingsRepoResult<Settings> {
    let as_u32 = |value: i64, column: &'static str| -> SettingsRepoResult<u32> {
        u32::try_from(value).map_err(|_| {
            SettingsRepoError::InvalidData(format!("invalid value `{value}` in settings.{column}"))
        })
    };

    Ok(Settings {
        unit_minutes: as_u32(unit_minutes, "unit_minutes")?,
        day_start,
        units_per_day: as_u32(units_per_day, "units_per_day")?,
        wip_limit: as_u32(wip_limit, "wip_limit")?,
    })
}
