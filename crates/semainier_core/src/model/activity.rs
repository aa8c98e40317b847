//! Activity domain model.
//!
//! # Responsibility
//! - Define the canonical activity record owned by a (list, sublist) container.
//! - Provide lifecycle helpers for completion and week-relative due dates.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another activity.
//! - `completed_at` is `Some` if and only if `is_completed` is true.
//! - The unscheduled sentinel (due 2099-12-31, start 23:59) round-trips
//!   exactly through persistence.
//! - `position >= 1` once the owning container has been reindexed; `0` marks
//!   a freshly inserted row awaiting reindex.

use crate::model::container::{ListId, SublistId};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an activity.
pub type ActivityId = Uuid;

const MAX_TITLE_CHARS: usize = 255;

/// Qualitative activity size, converted to time units by the WIP engine.
///
/// The set is closed: unknown codes are rejected at the deserialization and
/// storage boundaries, never inside unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationSize {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

/// Sentinel due date meaning "no commitment yet".
pub fn unscheduled_due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 12, 31).expect("sentinel date is a valid calendar date")
}

/// Sentinel start time paired with [`unscheduled_due_date`].
pub fn unscheduled_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).expect("sentinel time is a valid time of day")
}

/// Validation failures for activity records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Title exceeds the storage limit.
    TitleTooLong { length: usize, max: usize },
    /// `is_completed` and `completed_at` disagree.
    CompletionMismatch,
    /// Position is negative; only `0` (pre-reindex) and `1..` are allowed.
    NegativePosition(i64),
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "activity title cannot be empty"),
            Self::TitleTooLong { length, max } => {
                write!(f, "activity title has {length} characters, maximum is {max}")
            }
            Self::CompletionMismatch => write!(
                f,
                "completed_at must be set exactly when is_completed is true"
            ),
            Self::NegativePosition(position) => {
                write!(f, "activity position cannot be negative, got {position}")
            }
        }
    }
}

impl Error for ActivityValidationError {}

/// Canonical activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Stable global ID.
    pub uuid: ActivityId,
    /// User-facing title.
    pub title: String,
    /// Owning list.
    pub list_uuid: ListId,
    /// Optional sublist scope within the owning list.
    pub sublist_uuid: Option<SublistId>,
    /// Qualitative size driving WIP accounting.
    pub duration_size: DurationSize,
    /// Scheduling anchor; the far-future sentinel means "unscheduled".
    pub due_date: NaiveDate,
    /// Scheduling anchor paired with `due_date`.
    pub start_time: NaiveTime,
    /// Advisory flag; does not affect capacity accounting.
    pub is_priority: bool,
    /// Dense 1-based order within the (list, sublist) container.
    pub position: i64,
    /// Completion state.
    pub is_completed: bool,
    /// Completion timestamp, present exactly when `is_completed` is true.
    pub completed_at: Option<NaiveDateTime>,
}

impl Activity {
    /// Creates a new activity with planner defaults: small size, unscheduled
    /// sentinel schedule, neutral position awaiting reindex.
    pub fn new(title: impl Into<String>, list_uuid: ListId) -> Self {
        Self::with_id(Uuid::new_v4(), title, list_uuid)
    }

    /// Creates a new activity with a caller-provided stable ID.
    pub fn with_id(uuid: ActivityId, title: impl Into<String>, list_uuid: ListId) -> Self {
        Self {
            uuid,
            title: title.into(),
            list_uuid,
            sublist_uuid: None,
            duration_size: DurationSize::Small,
            due_date: unscheduled_due_date(),
            start_time: unscheduled_start_time(),
            is_priority: false,
            position: 0,
            is_completed: false,
            completed_at: None,
        }
    }

    /// Checks the record against model invariants.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.title.trim().is_empty() {
            return Err(ActivityValidationError::EmptyTitle);
        }
        let length = self.title.chars().count();
        if length > MAX_TITLE_CHARS {
            return Err(ActivityValidationError::TitleTooLong {
                length,
                max: MAX_TITLE_CHARS,
            });
        }
        if self.is_completed != self.completed_at.is_some() {
            return Err(ActivityValidationError::CompletionMismatch);
        }
        if self.position < 0 {
            return Err(ActivityValidationError::NegativePosition(self.position));
        }
        Ok(())
    }

    /// Returns whether this activity carries a real due date, as opposed to
    /// the unscheduled sentinel pair.
    pub fn is_scheduled(&self) -> bool {
        !(self.due_date == unscheduled_due_date() && self.start_time == unscheduled_start_time())
    }

    /// Sets the completion state, keeping `completed_at` consistent.
    ///
    /// `now` is supplied by the caller; the model has no ambient clock.
    pub fn set_completion(&mut self, status: bool, now: NaiveDateTime) {
        self.is_completed = status;
        self.completed_at = if status { Some(now) } else { None };
    }

    /// Sets the due date to the Sunday of the week containing `today`.
    pub fn set_due_current_week(&mut self, today: NaiveDate) {
        let days_until_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
        self.due_date = today + chrono::Duration::days(days_until_sunday);
    }

    /// Sets the due date to the Sunday of the week after the one containing
    /// `today`.
    pub fn set_due_next_week(&mut self, today: NaiveDate) {
        let days_until_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
        self.due_date = today + chrono::Duration::days(days_until_sunday + 7);
    }

    /// Builds a duplicate of this activity: same title, container, size and
    /// priority, but a fresh ID, the unscheduled sentinel schedule, cleared
    /// completion and a neutral position awaiting reindex.
    pub fn duplicate(&self) -> Self {
        let mut clone = Self::new(self.title.clone(), self.list_uuid);
        clone.sublist_uuid = self.sublist_uuid;
        clone.duration_size = self.duration_size;
        clone.is_priority = self.is_priority;
        clone
    }
}
