#![cfg(feature = "sqlite")]

use chrono::{NaiveDate, Weekday};
use curriculum_planner::{
    CurriculumRequest, CurriculumStatusStore, LessonRecord, LessonStatus, LessonUpdate, Pacing,
    Planner, PlannerConfig, SqliteStatusStore, StatusStore, StoreBackend, TeachingWeek,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sqlite_store_round_trip() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteStatusStore::new(file.path()).unwrap();

    let mut completed = LessonRecord::new(d(2025, 1, 6), "Genetics");
    completed.status = LessonStatus::Completed;
    completed.notes = "Went long".into();
    let mut status = CurriculumStatusStore::new();
    status.set_lessons(
        "Biology - Grade 10".into(),
        vec![completed, LessonRecord::new(d(2025, 1, 8), "Evolution")],
    );
    status.set_lessons(
        "Algebra I - Grade 9".into(),
        vec![LessonRecord::new(d(2025, 1, 7), "Linear Equations")],
    );

    store.save_store(&status).expect("save store");
    let loaded = store
        .load_store()
        .expect("load store")
        .expect("store exists");

    assert_eq!(loaded, status);
}

#[test]
fn fresh_database_has_no_store() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteStatusStore::new(file.path()).unwrap();
    assert!(store.load_store().unwrap().is_none());
}

#[test]
fn saving_an_empty_store_is_distinct_from_never_saving() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteStatusStore::new(file.path()).unwrap();
    store.save_store(&CurriculumStatusStore::new()).unwrap();
    let loaded = store.load_store().unwrap();
    assert_eq!(loaded, Some(CurriculumStatusStore::new()));
}

#[test]
fn later_saves_replace_earlier_ones() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteStatusStore::new(file.path()).unwrap();

    let mut first = CurriculumStatusStore::new();
    first.set_lessons(
        "Chemistry - Grade 11".into(),
        vec![LessonRecord::new(d(2025, 1, 6), "Atomic Structure")],
    );
    store.save_store(&first).unwrap();

    let mut second = CurriculumStatusStore::new();
    second.set_lessons(
        "Physics - Grade 11".into(),
        vec![LessonRecord::new(d(2025, 1, 6), "Kinematics")],
    );
    store.save_store(&second).unwrap();

    let loaded = store.load_store().unwrap().unwrap();
    assert_eq!(loaded, second);
    assert!(loaded.lessons("Chemistry - Grade 11").is_none());
}

#[test]
fn planner_on_sqlite_backend_survives_reopen() {
    let file = NamedTempFile::new().unwrap();
    let config = PlannerConfig {
        store_path: file.path().to_path_buf(),
        store_backend: StoreBackend::Sqlite,
        ..PlannerConfig::default()
    };
    let request = CurriculumRequest {
        subject: "World History".into(),
        grade: "Grade 9".into(),
        pacing: Pacing::Fast,
        week: TeachingWeek::new([Weekday::Tue, Weekday::Thu]),
        ..CurriculumRequest::default()
    };
    let dates: Vec<NaiveDate> = (1..=14).map(|day| d(2025, 1, day)).collect();

    {
        let mut planner = Planner::from_config(&config).unwrap();
        planner.build(&request, &dates).unwrap();
        planner
            .update_lesson("World History - Grade 9", 1, &LessonUpdate::status(LessonStatus::Missed))
            .unwrap();
    }

    let planner = Planner::from_config(&config).unwrap();
    let lessons = planner.lessons("World History - Grade 9").unwrap();
    // Thursdays 2, 9 and Tuesdays 7, 14
    assert_eq!(lessons.len(), 4);
    assert_eq!(lessons[0].date, d(2025, 1, 2));
    assert_eq!(lessons[1].status, LessonStatus::Missed);
}

#[test]
fn class_without_lessons_survives_reload() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteStatusStore::new(file.path()).unwrap();

    let mut status = CurriculumStatusStore::new();
    status.set_lessons("Biology - Grade 10".into(), Vec::new());
    status.set_lessons(
        "English - Grade 8".into(),
        vec![LessonRecord::new(d(2025, 1, 9), "Poetry and Figurative Language")],
    );
    store.save_store(&status).unwrap();

    let loaded = store.load_store().unwrap().unwrap();
    assert_eq!(loaded, status);
    assert_eq!(loaded.lessons("Biology - Grade 10"), Some(&[][..]));
}

#[test]
fn empty_plan_on_sqlite_backend_is_still_listed_after_reopen() {
    let file = NamedTempFile::new().unwrap();
    let config = PlannerConfig {
        store_path: file.path().to_path_buf(),
        store_backend: StoreBackend::Sqlite,
        ..PlannerConfig::default()
    };
    let request = CurriculumRequest {
        subject: "Biology".into(),
        grade: "Grade 10".into(),
        week: TeachingWeek::new([Weekday::Sat]),
        ..CurriculumRequest::default()
    };
    // Monday 6 through Friday 10
    let dates: Vec<NaiveDate> = (6..=10).map(|day| d(2025, 1, day)).collect();

    {
        let mut planner = Planner::from_config(&config).unwrap();
        assert!(planner.build(&request, &dates).unwrap().is_empty());
    }

    let planner = Planner::from_config(&config).unwrap();
    assert!(planner.lessons("Biology - Grade 10").unwrap().is_empty());
    assert_eq!(planner.summary("Biology - Grade 10").unwrap().total, 0);
}
