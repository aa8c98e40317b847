use semainier_core::db::open_db_in_memory;
use semainier_core::model::settings::{SettingsField, SettingsInput};
use semainier_core::service::settings_service::SettingsService;
use semainier_core::{Settings, SettingsRepoError, SettingsRepository, SqliteSettingsRepository};

#[test]
fn first_load_seeds_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);

    let settings = repo.load_settings().unwrap();
    assert_eq!(settings, Settings::default());

    // The singleton row now exists; a second load reads it back unchanged.
    let again = repo.load_settings().unwrap();
    assert_eq!(again, settings);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM settings;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn valid_update_replaces_the_stored_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);

    let updated = repo
        .update_settings(&SettingsInput::from_values(15, "8:30", 12, 40))
        .unwrap();
    assert_eq!(updated.unit_minutes, 15);
    assert_eq!(updated.day_start, "08:30", "day start is normalized");
    assert_eq!(updated.units_per_day, 12);
    assert_eq!(updated.wip_limit, 40);

    assert_eq!(repo.load_settings().unwrap(), updated);
}

#[test]
fn invalid_update_is_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);
    let before = repo.load_settings().unwrap();

    // units_per_day=20 bounds wip_limit at 140; 150 must fail and the error
    // message must name the derived maximum.
    let err = repo
        .update_settings(&SettingsInput::from_values(30, "09:00", 20, 150))
        .unwrap_err();
    match err {
        SettingsRepoError::Validation(errors) => {
            let message = errors.message(SettingsField::WipLimit).unwrap();
            assert!(message.contains("140"), "got: {message}");
        }
        other => panic!("expected validation error, got {other}"),
    }

    assert_eq!(repo.load_settings().unwrap(), before, "row is untouched");
}

#[test]
fn multiple_violations_are_reported_together() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);

    let err = repo
        .update_settings(&SettingsInput {
            unit_minutes: "7".to_string(),
            day_start: "09:03".to_string(),
            units_per_day: "0".to_string(),
            wip_limit: "-1".to_string(),
        })
        .unwrap_err();

    match err {
        SettingsRepoError::Validation(errors) => {
            assert_eq!(errors.len(), 4);
            assert!(errors.message(SettingsField::UnitMinutes).is_some());
            assert!(errors.message(SettingsField::DayStart).is_some());
            assert!(errors.message(SettingsField::UnitsPerDay).is_some());
            assert!(errors.message(SettingsField::WipLimit).is_some());
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn time_slots_report_expands_active_settings() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);
    repo.update_settings(&SettingsInput::from_values(30, "09:00", 4, 20))
        .unwrap();

    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));
    let report = service.time_slots_report().unwrap();
    assert_eq!(report.slots, ["09:00", "09:30", "10:00", "10:30"]);
    assert_eq!(report.day_end, "11:00");
    assert_eq!(report.units_per_day, 4);
}

#[test]
fn corrupted_day_start_still_yields_a_renderable_grid() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::new(&conn);
    repo.load_settings().unwrap();

    // Simulate a rotten stored value written outside the validator.
    conn.execute("UPDATE settings SET day_start = 'garbage' WHERE id = 1;", [])
        .unwrap();

    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));
    let report = service.time_slots_report().unwrap();
    assert_eq!(report.slots.first().map(String::as_str), Some("09:00"));
}

#[test]
fn units_suggestion_assumes_a_ten_hour_day() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::new(&conn));

    let suggestion = service.units_suggestion(30).unwrap();
    assert_eq!(suggestion.suggested_units_per_day, 20);
    assert_eq!(suggestion.max_weekly_units, 140);

    assert!(service.units_suggestion(7).is_none());
    assert!(service.units_suggestion(90).is_none());
}
