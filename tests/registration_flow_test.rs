use std::sync::Arc;

use sqlx::SqlitePool;

use registrar::models::{Course, Student, TimeSlot, Weekday};
use registrar::registry::{Registry, SqliteRegistry};
use registrar::services::RegistrationService;

async fn setup_db() -> SqlitePool {
    let db = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::query(
        r#"
        CREATE TABLE courses (
            id TEXT PRIMARY KEY,
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            credit_hours INTEGER NOT NULL,
            available_seats INTEGER NOT NULL,
            prerequisites TEXT NOT NULL DEFAULT '[]',
            schedule TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(&db)
    .await
    .expect("Failed to create courses table");

    sqlx::query(
        r#"
        CREATE TABLE students (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            completed_courses TEXT NOT NULL DEFAULT '[]',
            current_courses TEXT NOT NULL DEFAULT '[]',
            max_credit_hours INTEGER NOT NULL
        )
        "#,
    )
    .execute(&db)
    .await
    .expect("Failed to create students table");

    db
}

fn course(id: &str, code: &str, credit_hours: i32, available_seats: i32) -> Course {
    Course {
        id: id.to_string(),
        code: code.to_string(),
        name: format!("Course {code}"),
        credit_hours,
        available_seats,
        prerequisites: vec![],
        schedule: vec![],
    }
}

fn student(id: &str, max_credit_hours: i32) -> Student {
    Student {
        id: id.to_string(),
        name: "Test Student".to_string(),
        completed_courses: vec![],
        current_courses: vec![],
        max_credit_hours,
    }
}

async fn service_with(
    courses: Vec<Course>,
    students: Vec<Student>,
) -> (RegistrationService, Arc<SqliteRegistry>) {
    let registry = Arc::new(SqliteRegistry::new(setup_db().await));
    for c in &courses {
        registry.save_course(c).await.expect("Failed to seed course");
    }
    for s in &students {
        registry.save_student(s).await.expect("Failed to seed student");
    }
    (RegistrationService::new(registry.clone()), registry)
}

#[tokio::test]
async fn registration_persists_through_the_store() {
    let (service, registry) =
        service_with(vec![course("c-1", "DB101", 4, 10)], vec![student("s-1", 18)]).await;

    let result = service.register_for_course("s-1", "c-1").await.expect("register failed");
    assert!(result.success, "{}", result.message);

    // Re-read through the registry, not the service, to confirm write-back.
    let stored_student = registry
        .get_student("s-1")
        .await
        .expect("fetch failed")
        .expect("student missing");
    assert_eq!(stored_student.current_courses, vec!["c-1".to_string()]);

    let stored_course = registry
        .get_course("c-1")
        .await
        .expect("fetch failed")
        .expect("course missing");
    assert_eq!(stored_course.available_seats, 9);
}

#[tokio::test]
async fn register_then_drop_round_trips_exactly() {
    let (service, registry) =
        service_with(vec![course("c-1", "DB101", 4, 10)], vec![student("s-1", 18)]).await;

    assert!(service.register_for_course("s-1", "c-1").await.unwrap().success);
    let dropped = service.drop_course("s-1", "c-1").await.unwrap();
    assert!(dropped.success);
    assert_eq!(dropped.message, "Successfully dropped DB101");

    let stored_student = registry.get_student("s-1").await.unwrap().unwrap();
    assert!(stored_student.current_courses.is_empty());
    let stored_course = registry.get_course("c-1").await.unwrap().unwrap();
    assert_eq!(stored_course.available_seats, 10);
}

#[tokio::test]
async fn seat_depletion_is_visible_across_students() {
    let (service, _registry) = service_with(
        vec![course("c-1", "DB101", 1, 1)],
        vec![student("s-1", 1), student("s-2", 1)],
    )
    .await;

    assert!(service.register_for_course("s-1", "c-1").await.unwrap().success);

    let second = service.register_for_course("s-2", "c-1").await.unwrap();
    assert!(!second.success);
    assert_eq!(second.message, "No available seats for course DB101");
}

#[tokio::test]
async fn prerequisites_and_schedules_survive_json_storage() {
    let mut advanced = course("c-2", "DB201", 4, 10);
    advanced.prerequisites = vec!["c-1".to_string()];
    advanced.schedule = vec![TimeSlot {
        day: Weekday::Monday,
        start_time: "10:00".to_string(),
        end_time: "11:30".to_string(),
        location: "Hall A".to_string(),
    }];

    let mut clashing = course("c-3", "ALG101", 4, 10);
    clashing.schedule = vec![TimeSlot {
        day: Weekday::Monday,
        start_time: "11:00".to_string(),
        end_time: "12:00".to_string(),
        location: "Hall B".to_string(),
    }];

    let mut s = student("s-1", 18);
    s.completed_courses = vec!["c-1".to_string()];

    let (service, _registry) = service_with(
        vec![course("c-1", "DB101", 4, 10), advanced, clashing],
        vec![s],
    )
    .await;

    assert!(service.register_for_course("s-1", "c-2").await.unwrap().success);

    let conflict = service.register_for_course("s-1", "c-3").await.unwrap();
    assert!(!conflict.success);
    assert_eq!(conflict.message, "Schedule conflict detected with course ALG101");
}

#[tokio::test]
async fn missing_prerequisite_resolves_code_from_the_store() {
    let mut advanced = course("c-2", "DB201", 4, 10);
    advanced.prerequisites = vec!["c-1".to_string()];

    let (service, _registry) = service_with(
        vec![course("c-1", "DB101", 4, 10), advanced],
        vec![student("s-1", 18)],
    )
    .await;

    let result = service.register_for_course("s-1", "c-2").await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "Missing prerequisites: DB101");
}

#[tokio::test]
async fn eligible_courses_scan_the_whole_store() {
    let mut gated = course("c-2", "DB201", 4, 10);
    gated.prerequisites = vec!["c-1".to_string()];
    let full = course("c-3", "ALG101", 4, 0);

    let (service, _registry) = service_with(
        vec![course("c-1", "DB101", 4, 10), gated, full],
        vec![student("s-1", 18)],
    )
    .await;

    let codes: Vec<String> = service
        .get_eligible_courses("s-1")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.code)
        .collect();
    assert_eq!(codes, vec!["DB101".to_string()]);

    // Unknown students get an empty list, never an error.
    assert!(service.get_eligible_courses("ghost").await.unwrap().is_empty());
}
