use chrono::NaiveDate;
use semainier_core::db::open_db_in_memory;
use semainier_core::model::weekly_goal::WeeklyGoalValidationError;
use semainier_core::repo::goal_repo::{GoalRepoError, GoalRepository, SqliteGoalRepository};
use semainier_core::service::goal_service::GoalService;
use semainier_core::WeeklyGoal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn goal_is_stored_under_the_weeks_monday() {
    let conn = open_db_in_memory().unwrap();
    let service = GoalService::new(SqliteGoalRepository::new(&conn));

    // Any weekday reference normalizes to the same week entry.
    let saved = service.set_goal(date(2025, 3, 12), "ship the beta").unwrap();
    assert_eq!(saved.week_start, date(2025, 3, 10));
    assert_eq!(saved.week_end(), date(2025, 3, 16));

    let loaded = service.goal_for_week(date(2025, 3, 16)).unwrap().unwrap();
    assert_eq!(loaded.uuid, saved.uuid);
    assert_eq!(loaded.content, "ship the beta");
}

#[test]
fn one_goal_per_week_latest_content_wins() {
    let conn = open_db_in_memory().unwrap();
    let service = GoalService::new(SqliteGoalRepository::new(&conn));

    let first = service.set_goal(date(2025, 3, 10), "draft plan").unwrap();
    let second = service.set_goal(date(2025, 3, 14), "final plan").unwrap();

    // Same week: the row identity survives, the content is replaced.
    assert_eq!(second.uuid, first.uuid);
    assert_eq!(second.content, "final plan");
    assert_eq!(service.list_goals().unwrap().len(), 1);
}

#[test]
fn separate_weeks_keep_separate_goals() {
    let conn = open_db_in_memory().unwrap();
    let service = GoalService::new(SqliteGoalRepository::new(&conn));

    service.set_goal(date(2025, 3, 10), "week one").unwrap();
    service.set_goal(date(2025, 3, 17), "week two").unwrap();

    let goals = service.list_goals().unwrap();
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0].week_start, date(2025, 3, 10));
    assert_eq!(goals[1].week_start, date(2025, 3, 17));
}

#[test]
fn oversized_content_is_rejected_without_a_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::new(&conn);

    let goal = WeeklyGoal::new(date(2025, 3, 12), "x".repeat(501));
    let err = repo.upsert_goal(&goal).unwrap_err();
    assert!(matches!(
        err,
        GoalRepoError::Validation(WeeklyGoalValidationError::ContentTooLong { .. })
    ));
    assert!(repo.get_goal(date(2025, 3, 10)).unwrap().is_none());
}
