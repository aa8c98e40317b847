//! Weekly goal repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist at most one goal per calendar week.
//!
//! # Invariants
//! - `week_start` is unique; upserting an existing week replaces the content
//!   and keeps the original row identity.
//! - Write paths validate goal content before SQL mutations.

use crate::db::DbError;
use crate::model::weekly_goal::{WeeklyGoal, WeeklyGoalValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type GoalRepoResult<T> = Result<T, GoalRepoError>;

/// Errors from weekly goal persistence operations.
#[derive(Debug)]
pub enum GoalRepoError {
    Validation(WeeklyGoalValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for GoalRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted weekly goal data: {message}")
            }
        }
    }
}

impl Error for GoalRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<WeeklyGoalValidationError> for GoalRepoError {
    fn from(value: WeeklyGoalValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for GoalRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for GoalRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for weekly goals.
pub trait GoalRepository {
    /// Inserts or replaces the goal for the record's week.
    fn upsert_goal(&self, goal: &WeeklyGoal) -> GoalRepoResult<WeeklyGoal>;
    /// Loads the goal whose week starts on `week_start`, if any.
    fn get_goal(&self, week_start: NaiveDate) -> GoalRepoResult<Option<WeeklyGoal>>;
    /// Lists all goals ordered by week.
    fn list_goals(&self) -> GoalRepoResult<Vec<WeeklyGoal>>;
}

/// SQLite-backed weekly goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn upsert_goal(&self, goal: &WeeklyGoal) -> GoalRepoResult<WeeklyGoal> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO weekly_goals (uuid, week_start, content)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(week_start) DO UPDATE SET
                content = excluded.content,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                goal.uuid.to_string(),
                goal.week_start.to_string(),
                goal.content.as_str(),
            ],
        )?;

        // Re-read: on conflict the stored row keeps its original uuid.
        let stored = self.get_goal(goal.week_start)?;
        stored.ok_or_else(|| {
            GoalRepoError::InvalidData(format!(
                "weekly goal for {} missing after upsert",
                goal.week_start
            ))
        })
    }

    fn get_goal(&self, week_start: NaiveDate) -> GoalRepoResult<Option<WeeklyGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, week_start, content
             FROM weekly_goals
             WHERE week_start = ?1;",
        )?;
        let mut rows = stmt.query([week_start.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_goal_row(row)?));
        }
        Ok(None)
    }

    fn list_goals(&self) -> GoalRepoResult<Vec<WeeklyGoal>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, week_start, content
             FROM weekly_goals
             ORDER BY week_start ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }
        Ok(goals)
    }
}

fn parse_goal_row(row: &Row<'_>) -> GoalRepoResult<WeeklyGoal> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        GoalRepoError::InvalidData(format!("invalid uuid `{uuid_text}` in weekly_goals.uuid"))
    })?;

    let week_text: String = row.get("week_start")?;
    let week_start = NaiveDate::parse_from_str(&week_text, "%Y-%m-%d").map_err(|_| {
        GoalRepoError::InvalidData(format!(
            "invalid date `{week_text}` in weekly_goals.week_start"
        ))
    })?;

    let goal = WeeklyGoal {
        uuid,
        week_start,
        content: row.get("content")?,
    };
    goal.validate()?;
    Ok(goal)
}
