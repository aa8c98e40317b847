//! Activity repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and duplication APIs over canonical `activities` storage.
//! - Keep the container ordering dense: every structural insert ends with a
//!   reindex pass renumbering positions 1..N.
//!
//! # Invariants
//! - Write paths call `Activity::validate()` before SQL mutations.
//! - Insert + reindex run in one immediate transaction, serializing
//!   structural mutations per (list, sublist) container.
//! - Plain deletes do not reindex; a container may stay non-dense until the
//!   next structural mutation.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::activity::{Activity, ActivityId, ActivityValidationError, DurationSize};
use crate::model::container::{ListId, SublistId};
use crate::schedule::week::WeekWindow;
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ACTIVITY_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    list_uuid,
    sublist_uuid,
    duration,
    due_date,
    start_time,
    is_priority,
    position,
    is_completed,
    completed_at
FROM activities";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for activity persistence and ordering operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ActivityValidationError),
    Db(DbError),
    NotFound(ActivityId),
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "activity not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted activity data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "activity repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "activity repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActivityValidationError> for RepoError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for activity CRUD and ordering operations.
pub trait ActivityRepository {
    /// Persists a new activity and reindexes its container.
    fn create_activity(&self, activity: &Activity) -> RepoResult<ActivityId>;
    /// Updates an existing activity in place; does not reorder.
    fn update_activity(&self, activity: &Activity) -> RepoResult<()>;
    /// Loads one activity by stable ID.
    fn get_activity(&self, id: ActivityId) -> RepoResult<Option<Activity>>;
    /// Lists a container's activities ordered by position.
    fn list_container(
        &self,
        list_uuid: ListId,
        sublist_uuid: Option<SublistId>,
    ) -> RepoResult<Vec<Activity>>;
    /// Lists activities whose due date falls inside the window.
    fn list_due_in_window(&self, window: &WeekWindow) -> RepoResult<Vec<Activity>>;
    /// Clones an activity into the same container, appended then reindexed.
    fn duplicate_activity(&self, id: ActivityId) -> RepoResult<Activity>;
    /// Hard-deletes one activity without reindexing its container.
    fn delete_activity(&self, id: ActivityId) -> RepoResult<()>;
    /// Renumbers a container's positions to a dense 1..N sequence.
    fn reindex_container(
        &self,
        list_uuid: ListId,
        sublist_uuid: Option<SublistId>,
    ) -> RepoResult<()>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn create_activity(&self, activity: &Activity) -> RepoResult<ActivityId> {
        activity.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        insert_activity(&tx, activity)?;
        reindex_positions(&tx, activity.list_uuid, activity.sublist_uuid)?;
        tx.commit()?;

        Ok(activity.uuid)
    }

    fn update_activity(&self, activity: &Activity) -> RepoResult<()> {
        activity.validate()?;

        let changed = self.conn.execute(
            "UPDATE activities
             SET
                title = ?1,
                duration = ?2,
                due_date = ?3,
                start_time = ?4,
                is_priority = ?5,
                position = ?6,
                is_completed = ?7,
                completed_at = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?9;",
            params![
                activity.title.as_str(),
                duration_to_db(activity.duration_size),
                activity.due_date.to_string(),
                activity.start_time.format("%H:%M").to_string(),
                bool_to_int(activity.is_priority),
                activity.position,
                bool_to_int(activity.is_completed),
                activity
                    .completed_at
                    .map(|value| value.and_utc().timestamp_millis()),
                activity.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(activity.uuid));
        }

        Ok(())
    }

    fn get_activity(&self, id: ActivityId) -> RepoResult<Option<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_activity_row(row)?));
        }
        Ok(None)
    }

    fn list_container(
        &self,
        list_uuid: ListId,
        sublist_uuid: Option<SublistId>,
    ) -> RepoResult<Vec<Activity>> {
        let mut activities = Vec::new();
        if let Some(sublist_uuid) = sublist_uuid {
            let mut stmt = self.conn.prepare(&format!(
                "{ACTIVITY_SELECT_SQL}
                 WHERE list_uuid = ?1
                   AND sublist_uuid = ?2
                 ORDER BY position ASC, uuid ASC;"
            ))?;
            let mut rows = stmt.query(params![list_uuid.to_string(), sublist_uuid.to_string()])?;
            while let Some(row) = rows.next()? {
                activities.push(parse_activity_row(row)?);
            }
        } else {
            let mut stmt = self.conn.prepare(&format!(
                "{ACTIVITY_SELECT_SQL}
                 WHERE list_uuid = ?1
                   AND sublist_uuid IS NULL
                 ORDER BY position ASC, uuid ASC;"
            ))?;
            let mut rows = stmt.query([list_uuid.to_string()])?;
            while let Some(row) = rows.next()? {
                activities.push(parse_activity_row(row)?);
            }
        }
        Ok(activities)
    }

    fn list_due_in_window(&self, window: &WeekWindow) -> RepoResult<Vec<Activity>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ACTIVITY_SELECT_SQL}
             WHERE due_date >= ?1
               AND due_date <= ?2
             ORDER BY due_date ASC, position ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![window.start.to_string(), window.end.to_string()])?;
        let mut activities = Vec::new();
        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }
        Ok(activities)
    }

    fn duplicate_activity(&self, id: ActivityId) -> RepoResult<Activity> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let source = load_required_activity(&tx, id)?;
        let mut clone = source.duplicate();
        // Append-then-reindex: the clone enters past the current tail and the
        // reindex pass settles the final numbering.
        clone.position = next_position(&tx, clone.list_uuid, clone.sublist_uuid)?;
        insert_activity(&tx, &clone)?;
        reindex_positions(&tx, clone.list_uuid, clone.sublist_uuid)?;
        let created = load_required_activity(&tx, clone.uuid)?;

        tx.commit()?;
        Ok(created)
    }

    fn delete_activity(&self, id: ActivityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM activities WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn reindex_container(
        &self,
        list_uuid: ListId,
        sublist_uuid: Option<SublistId>,
    ) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        reindex_positions(&tx, list_uuid, sublist_uuid)?;
        tx.commit()?;
        Ok(())
    }
}

fn insert_activity(conn: &Connection, activity: &Activity) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO activities (
            uuid,
            title,
            list_uuid,
            sublist_uuid,
            duration,
            due_date,
            start_time,
            is_priority,
            position,
            is_completed,
            completed_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
        params![
            activity.uuid.to_string(),
            activity.title.as_str(),
            activity.list_uuid.to_string(),
            activity.sublist_uuid.map(|value| value.to_string()),
            duration_to_db(activity.duration_size),
            activity.due_date.to_string(),
            activity.start_time.format("%H:%M").to_string(),
            bool_to_int(activity.is_priority),
            activity.position,
            bool_to_int(activity.is_completed),
            activity
                .completed_at
                .map(|value| value.and_utc().timestamp_millis()),
        ],
    )?;
    Ok(())
}

/// Renumbers a container's activities to 1..N in their current order.
///
/// Rows are visited sorted by `(position, uuid)`, so stale gaps close while
/// relative order is preserved.
fn reindex_positions(
    conn: &Connection,
    list_uuid: ListId,
    sublist_uuid: Option<SublistId>,
) -> RepoResult<()> {
    let ids = list_container_ids(conn, list_uuid, sublist_uuid)?;
    for (index, id) in ids.iter().enumerate() {
        conn.execute(
            "UPDATE activities
             SET position = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), index as i64 + 1],
        )?;
    }
    debug!(
        "event=reindex_container module=repo status=ok list={} sublist={} count={}",
        list_uuid,
        sublist_uuid.map_or_else(|| "none".to_string(), |value| value.to_string()),
        ids.len()
    );
    Ok(())
}

fn list_container_ids(
    conn: &Connection,
    list_uuid: ListId,
    sublist_uuid: Option<SublistId>,
) -> RepoResult<Vec<ActivityId>> {
    let mut ids = Vec::new();
    if let Some(sublist_uuid) = sublist_uuid {
        let mut stmt = conn.prepare(
            "SELECT uuid
             FROM activities
             WHERE list_uuid = ?1
               AND sublist_uuid = ?2
             ORDER BY position ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query(params![list_uuid.to_string(), sublist_uuid.to_string()])?;
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "activities.uuid")?);
        }
    } else {
        let mut stmt = conn.prepare(
            "SELECT uuid
             FROM activities
             WHERE list_uuid = ?1
               AND sublist_uuid IS NULL
             ORDER BY position ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([list_uuid.to_string()])?;
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "activities.uuid")?);
        }
    }
    Ok(ids)
}

fn next_position(
    conn: &Connection,
    list_uuid: ListId,
    sublist_uuid: Option<SublistId>,
) -> RepoResult<i64> {
    let next = if let Some(sublist_uuid) = sublist_uuid {
        conn.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1
             FROM activities
             WHERE list_uuid = ?1
               AND sublist_uuid = ?2;",
            params![list_uuid.to_string(), sublist_uuid.to_string()],
            |row| row.get(0),
        )?
    } else {
        conn.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1
             FROM activities
             WHERE list_uuid = ?1
               AND sublist_uuid IS NULL;",
            [list_uuid.to_string()],
            |row| row.get(0),
        )?
    };
    Ok(next)
}

fn load_required_activity(conn: &Connection, id: ActivityId) -> RepoResult<Activity> {
    let mut stmt = conn.prepare(&format!("{ACTIVITY_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_activity_row(row);
    }
    Err(RepoError::NotFound(id))
}

fn parse_activity_row(row: &Row<'_>) -> RepoResult<Activity> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "activities.uuid")?;

    let list_text: String = row.get("list_uuid")?;
    let list_uuid = parse_uuid(&list_text, "activities.list_uuid")?;

    let sublist_uuid = row
        .get::<_, Option<String>>("sublist_uuid")?
        .map(|value| parse_uuid(&value, "activities.sublist_uuid"))
        .transpose()?;

    let duration_text: String = row.get("duration")?;
    let duration_size = parse_duration(&duration_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid duration `{duration_text}` in activities.duration"
        ))
    })?;

    let due_text: String = row.get("due_date")?;
    let due_date = chrono::NaiveDate::parse_from_str(&due_text, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{due_text}` in activities.due_date"))
    })?;

    let start_text: String = row.get("start_time")?;
    let start_time = chrono::NaiveTime::parse_from_str(&start_text, "%H:%M").map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid time `{start_text}` in activities.start_time"
        ))
    })?;

    let completed_at = match row.get::<_, Option<i64>>("completed_at")? {
        Some(millis) => Some(
            chrono::DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid timestamp `{millis}` in activities.completed_at"
                    ))
                })?
                .naive_utc(),
        ),
        None => None,
    };

    let activity = Activity {
        uuid,
        title: row.get("title")?,
        list_uuid,
        sublist_uuid,
        duration_size,
        due_date,
        start_time,
        is_priority: int_to_bool(row.get("is_priority")?, "activities.is_priority")?,
        position: row.get("position")?,
        is_completed: int_to_bool(row.get("is_completed")?, "activities.is_completed")?,
        completed_at,
    };
    activity.validate()?;
    Ok(activity)
}

fn duration_to_db(size: DurationSize) -> &'static str {
    match size {
        DurationSize::Small => "S",
        DurationSize::Medium => "M",
        DurationSize::Large => "L",
    }
}

fn parse_duration(value: &str) -> Option<DurationSize> {
    match value {
        "S" => Some(DurationSize::Small),
        "M" => Some(DurationSize::Medium),
        "L" => Some(DurationSize::Large),
        _ => None,
    }
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["activities", "lists", "sublists"] {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
