//! Activity use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD, duplication and completion entry points.
//! - Report weekly WIP capacity over the activity snapshot a week owns.
//!
//! # Invariants
//! - Structural mutations leave the touched container dense (delete excepted,
//!   per the ordering contract).
//! - `completed_at` is maintained exactly in step with `is_completed`.

use crate::model::activity::{Activity, ActivityId, DurationSize};
use crate::model::container::{ListId, SublistId};
use crate::repo::activity_repo::{ActivityRepository, RepoError, RepoResult};
use crate::schedule::week::WeekWindow;
use crate::schedule::wip::{activity_stats, wip_report, ActivityStats, WipReport};
use chrono::{NaiveDate, Utc};

/// Use-case service wrapper for activity operations.
pub struct ActivityService<R: ActivityRepository> {
    repo: R,
}

/// Optional attributes for activity creation beyond the planner defaults.
#[derive(Debug, Clone, Default)]
pub struct CreateActivityRequest {
    pub sublist_uuid: Option<SublistId>,
    pub duration_size: Option<DurationSize>,
    pub due_date: Option<NaiveDate>,
    pub is_priority: bool,
}

impl<R: ActivityRepository> ActivityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an activity with planner defaults (small size, unscheduled
    /// sentinel schedule) and reindexes its container.
    pub fn create_activity(
        &self,
        title: impl Into<String>,
        list_uuid: ListId,
        request: &CreateActivityRequest,
    ) -> RepoResult<Activity> {
        let mut activity = Activity::new(title, list_uuid);
        activity.sublist_uuid = request.sublist_uuid;
        if let Some(size) = request.duration_size {
            activity.duration_size = size;
        }
        if let Some(due_date) = request.due_date {
            activity.due_date = due_date;
        }
        activity.is_priority = request.is_priority;

        let id = self.repo.create_activity(&activity)?;
        self.require_activity(id)
    }

    /// Updates an existing activity in place.
    pub fn update_activity(&self, activity: &Activity) -> RepoResult<()> {
        self.repo.update_activity(activity)
    }

    /// Gets one activity by stable ID.
    pub fn get_activity(&self, id: ActivityId) -> RepoResult<Option<Activity>> {
        self.repo.get_activity(id)
    }

    /// Lists a container's activities in display order.
    pub fn list_container(
        &self,
        list_uuid: ListId,
        sublist_uuid: Option<SublistId>,
    ) -> RepoResult<Vec<Activity>> {
        self.repo.list_container(list_uuid, sublist_uuid)
    }

    /// Duplicates an activity into the same container.
    ///
    /// The clone lands at the container tail; the source keeps its slot.
    pub fn duplicate_activity(&self, id: ActivityId) -> RepoResult<Activity> {
        self.repo.duplicate_activity(id)
    }

    /// Deletes one activity. The container is left stale on purpose; the
    /// next structural mutation re-normalizes positions.
    pub fn delete_activity(&self, id: ActivityId) -> RepoResult<()> {
        self.repo.delete_activity(id)
    }

    /// Sets the completion flag, stamping or clearing `completed_at`.
    pub fn set_completion(&self, id: ActivityId, status: bool) -> RepoResult<Activity> {
        let mut activity = self.require_activity(id)?;
        activity.set_completion(status, Utc::now().naive_utc());
        self.repo.update_activity(&activity)?;
        Ok(activity)
    }

    /// Moves the due date to the Sunday of the week containing `today`.
    pub fn set_due_current_week(&self, id: ActivityId, today: NaiveDate) -> RepoResult<Activity> {
        let mut activity = self.require_activity(id)?;
        activity.set_due_current_week(today);
        self.repo.update_activity(&activity)?;
        Ok(activity)
    }

    /// Moves the due date to the Sunday of the week after `today`'s.
    pub fn set_due_next_week(&self, id: ActivityId, today: NaiveDate) -> RepoResult<Activity> {
        let mut activity = self.require_activity(id)?;
        activity.set_due_next_week(today);
        self.repo.update_activity(&activity)?;
        Ok(activity)
    }

    /// Classifies the week's committed units against the WIP limit.
    pub fn wip_report_for_week(
        &self,
        window: &WeekWindow,
        wip_limit: u32,
    ) -> RepoResult<WipReport> {
        let snapshot = self.repo.list_due_in_window(window)?;
        Ok(wip_report(&snapshot, wip_limit))
    }

    /// Aggregates size/completion statistics for the week's activities.
    pub fn stats_for_week(&self, window: &WeekWindow) -> RepoResult<ActivityStats> {
        let snapshot = self.repo.list_due_in_window(window)?;
        Ok(activity_stats(&snapshot))
    }

    fn require_activity(&self, id: ActivityId) -> RepoResult<Activity> {
        self.repo.get_activity(id)?.ok_or(RepoError::NotFound(id))
    }
}
