use chrono::NaiveDate;
use rusqlite::Connection;
use ticklist_core::db::migrations::latest_version;
use ticklist_core::db::open_db_in_memory;
use ticklist_core::{
    NewTask, RepoError, SqliteTaskRepository, TaskListQuery, TaskPatch, TaskRepository,
};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "Buy milk".to_string(),
            description: Some("two liters".to_string()),
            due_date: Some(date(2025, 6, 2)),
        })
        .unwrap();

    let loaded = repo.get_task(id, false).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, "Buy milk");
    assert_eq!(loaded.description, "two liters");
    assert_eq!(loaded.due_date, Some(date(2025, 6, 2)));
    assert!(!loaded.is_completed);
    assert!(loaded.deleted_at.is_none());
}

#[test]
fn create_defaults_description_to_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "Call mom".to_string(),
            ..NewTask::default()
        })
        .unwrap();

    let loaded = repo.get_task(id, false).unwrap().unwrap();
    assert_eq!(loaded.description, "");
    assert_eq!(loaded.due_date, None);
}

#[test]
fn create_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo
        .create_task(&NewTask {
            title: "   ".to_string(),
            ..NewTask::default()
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let all = repo.list_tasks(&TaskListQuery {
        include_deleted: true,
    });
    assert!(all.unwrap().is_empty());
}

#[test]
fn update_patches_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "Draft report".to_string(),
            description: Some("quarterly numbers".to_string()),
            due_date: Some(date(2025, 6, 2)),
        })
        .unwrap();

    repo.update_task(
        id,
        &TaskPatch {
            is_completed: Some(true),
            ..TaskPatch::default()
        },
    )
    .unwrap();

    let loaded = repo.get_task(id, false).unwrap().unwrap();
    assert!(loaded.is_completed);
    assert_eq!(loaded.title, "Draft report");
    assert_eq!(loaded.description, "quarterly numbers");
    assert_eq!(loaded.due_date, Some(date(2025, 6, 2)));
}

#[test]
fn update_distinguishes_clearing_from_omitting_due_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "Water plants".to_string(),
            due_date: Some(date(2025, 6, 2)),
            ..NewTask::default()
        })
        .unwrap();

    // Patch without the field leaves the stored date alone.
    repo.update_task(
        id,
        &TaskPatch {
            title: Some("Water the plants".to_string()),
            ..TaskPatch::default()
        },
    )
    .unwrap();
    let kept = repo.get_task(id, false).unwrap().unwrap();
    assert_eq!(kept.due_date, Some(date(2025, 6, 2)));

    // Explicit null clears it.
    repo.update_task(
        id,
        &TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        },
    )
    .unwrap();
    let cleared = repo.get_task(id, false).unwrap().unwrap();
    assert_eq!(cleared.due_date, None);

    // A date value sets it again.
    repo.update_task(
        id,
        &TaskPatch {
            due_date: Some(Some(date(2025, 7, 1))),
            ..TaskPatch::default()
        },
    )
    .unwrap();
    let set = repo.get_task(id, false).unwrap().unwrap();
    assert_eq!(set.due_date, Some(date(2025, 7, 1)));
}

#[test]
fn empty_patch_changes_nothing_for_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "Stretch".to_string(),
            ..NewTask::default()
        })
        .unwrap();
    let before = repo.get_task(id, false).unwrap().unwrap();

    repo.update_task(id, &TaskPatch::default()).unwrap();

    let after = repo.get_task(id, false).unwrap().unwrap();
    assert_eq!(before, after);
}

#[test]
fn empty_patch_still_reports_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo.update_task(4242, &TaskPatch::default()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(4242)));
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo
        .update_task(
            99,
            &TaskPatch {
                title: Some("ghost".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(99)));
}

#[test]
fn update_rejects_blank_patched_title_without_mutating() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "Keep me".to_string(),
            ..NewTask::default()
        })
        .unwrap();

    let err = repo
        .update_task(
            id,
            &TaskPatch {
                title: Some("  ".to_string()),
                is_completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let loaded = repo.get_task(id, false).unwrap().unwrap();
    assert_eq!(loaded.title, "Keep me");
    assert!(!loaded.is_completed);
}

#[test]
fn update_reaches_soft_deleted_rows_without_resurrecting() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "Old errand".to_string(),
            ..NewTask::default()
        })
        .unwrap();
    repo.soft_delete_task(id).unwrap();

    repo.update_task(
        id,
        &TaskPatch {
            title: Some("Old errand, renamed".to_string()),
            ..TaskPatch::default()
        },
    )
    .unwrap();

    assert!(repo.get_task(id, false).unwrap().is_none());
    let tombstoned = repo.get_task(id, true).unwrap().unwrap();
    assert_eq!(tombstoned.title, "Old errand, renamed");
    assert!(tombstoned.deleted_at.is_some());
}

#[test]
fn list_excludes_deleted_by_default_and_can_include_them() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let keep = repo
        .create_task(&NewTask {
            title: "active".to_string(),
            ..NewTask::default()
        })
        .unwrap();
    let gone = repo
        .create_task(&NewTask {
            title: "deleted later".to_string(),
            ..NewTask::default()
        })
        .unwrap();
    repo.soft_delete_task(gone).unwrap();

    let visible = repo.list_tasks(&TaskListQuery::default()).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, keep);

    let all = repo
        .list_tasks(&TaskListQuery {
            include_deleted: true,
        })
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn list_orders_by_creation_time_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let first = repo
        .create_task(&NewTask {
            title: "first".to_string(),
            ..NewTask::default()
        })
        .unwrap();
    let second = repo
        .create_task(&NewTask {
            title: "second".to_string(),
            ..NewTask::default()
        })
        .unwrap();
    let third = repo
        .create_task(&NewTask {
            title: "third".to_string(),
            ..NewTask::default()
        })
        .unwrap();

    // Force identical creation timestamps so the id tie-break is what
    // keeps the order deterministic.
    conn.execute("UPDATE tasks SET created_at = 1000000;", [])
        .unwrap();

    let listed = repo.list_tasks(&TaskListQuery::default()).unwrap();
    let ids: Vec<_> = listed.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![third, second, first]);
}

#[test]
fn soft_delete_is_idempotent_and_keeps_first_tombstone() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "weekly sync".to_string(),
            ..NewTask::default()
        })
        .unwrap();

    repo.soft_delete_task(id).unwrap();
    // Rewind the tombstone so a rewrite would be observable.
    conn.execute(
        "UPDATE tasks SET deleted_at = 1111111111000 WHERE id = ?1;",
        rusqlite::params![id],
    )
    .unwrap();

    repo.soft_delete_task(id).unwrap();

    assert!(repo.get_task(id, false).unwrap().is_none());
    let deleted = repo.get_task(id, true).unwrap().unwrap();
    assert_eq!(
        deleted.deleted_at.map(|at| at.timestamp_millis()),
        Some(1111111111000)
    );
}

#[test]
fn soft_delete_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo.soft_delete_task(7).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(7)));
}

#[test]
fn read_rejects_invalid_persisted_due_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&NewTask {
            title: "corrupted".to_string(),
            ..NewTask::default()
        })
        .unwrap();
    conn.execute(
        "UPDATE tasks SET due_date = 'not-a-date' WHERE id = ?1;",
        rusqlite::params![id],
    )
    .unwrap();

    let err = repo.get_task(id, false).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tasks_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("tasks"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_tasks_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "tasks",
            column: "is_completed"
        })
    ));
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
