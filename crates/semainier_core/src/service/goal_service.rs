//! Weekly goal use-case service.
//!
//! # Responsibility
//! - Attach free-text goals to calendar weeks from any reference date.

use crate::model::weekly_goal::WeeklyGoal;
use crate::repo::goal_repo::{GoalRepoResult, GoalRepository};
use crate::schedule::week::week_bounds;
use chrono::NaiveDate;

/// Use-case service wrapper for weekly goals.
pub struct GoalService<R: GoalRepository> {
    repo: R,
}

impl<R: GoalRepository> GoalService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Sets the goal for the week containing `reference`, replacing any
    /// existing goal for that week.
    pub fn set_goal(
        &self,
        reference: NaiveDate,
        content: impl Into<String>,
    ) -> GoalRepoResult<WeeklyGoal> {
        let goal = WeeklyGoal::new(reference, content);
        self.repo.upsert_goal(&goal)
    }

    /// Loads the goal for the week containing `reference`, if any.
    pub fn goal_for_week(&self, reference: NaiveDate) -> GoalRepoResult<Option<WeeklyGoal>> {
        self.repo.get_goal(week_bounds(reference).start)
    }

    /// Lists every recorded goal in week order.
    pub fn list_goals(&self) -> GoalRepoResult<Vec<WeeklyGoal>> {
        self.repo.list_goals()
    }
}
