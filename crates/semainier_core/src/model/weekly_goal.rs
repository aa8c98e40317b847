//! Weekly goal domain model.
//!
//! # Responsibility
//! - Hold the free-text goal attached to one calendar week.
//! - Normalize any reference date to that week's Monday.
//!
//! # Invariants
//! - `week_start` is always a Monday.
//! - At most one goal exists per week (`week_start` is unique in storage).
//! - `content` is at most 500 characters.

use crate::schedule::week::week_bounds;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a weekly goal.
pub type WeeklyGoalId = Uuid;

const MAX_CONTENT_CHARS: usize = 500;

/// Validation failures for weekly goal records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeeklyGoalValidationError {
    /// Content is empty or whitespace-only.
    EmptyContent,
    /// Content exceeds the storage limit.
    ContentTooLong { length: usize, max: usize },
}

impl Display for WeeklyGoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "weekly goal content cannot be empty"),
            Self::ContentTooLong { length, max } => {
                write!(f, "weekly goal has {length} characters, maximum is {max}")
            }
        }
    }
}

impl Error for WeeklyGoalValidationError {}

/// Free-text goal for one calendar week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    /// Stable global ID.
    pub uuid: WeeklyGoalId,
    /// Monday of the goal's week.
    pub week_start: NaiveDate,
    /// Goal text, at most 500 characters.
    pub content: String,
}

impl WeeklyGoal {
    /// Creates a goal for the week containing `reference`, normalizing the
    /// stored start to that week's Monday.
    pub fn new(reference: NaiveDate, content: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            week_start: week_bounds(reference).start,
            content: content.into(),
        }
    }

    /// Sunday of the goal's week.
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + chrono::Duration::days(6)
    }

    /// Checks the record against model invariants.
    pub fn validate(&self) -> Result<(), WeeklyGoalValidationError> {
        if self.content.trim().is_empty() {
            return Err(WeeklyGoalValidationError::EmptyContent);
        }
        let length = self.content.chars().count();
        if length > MAX_CONTENT_CHARS {
            return Err(WeeklyGoalValidationError::ContentTooLong {
                length,
                max: MAX_CONTENT_CHARS,
            });
        }
        Ok(())
    }
}
