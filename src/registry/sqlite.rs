use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::error::AppError;
use crate::models::{Course, Student, TimeSlot};

use super::Registry;

/// Registry backed by sqlite. List-valued fields (prerequisites, schedule,
/// course id lists) are stored as JSON text columns.
pub struct SqliteRegistry {
    db: SqlitePool,
}

impl SqliteRegistry {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct CourseRow {
    id: String,
    code: String,
    name: String,
    credit_hours: i32,
    available_seats: i32,
    prerequisites: String,
    schedule: String,
}

impl CourseRow {
    fn into_course(self) -> Result<Course, AppError> {
        let prerequisites: Vec<String> = decode_column(&self.id, "prerequisites", &self.prerequisites)?;
        let schedule: Vec<TimeSlot> = decode_column(&self.id, "schedule", &self.schedule)?;
        Ok(Course {
            id: self.id,
            code: self.code,
            name: self.name,
            credit_hours: self.credit_hours,
            available_seats: self.available_seats,
            prerequisites,
            schedule,
        })
    }
}

#[derive(FromRow)]
struct StudentRow {
    id: String,
    name: String,
    completed_courses: String,
    current_courses: String,
    max_credit_hours: i32,
}

impl StudentRow {
    fn into_student(self) -> Result<Student, AppError> {
        let completed_courses = decode_column(&self.id, "completed_courses", &self.completed_courses)?;
        let current_courses = decode_column(&self.id, "current_courses", &self.current_courses)?;
        Ok(Student {
            id: self.id,
            name: self.name,
            completed_courses,
            current_courses,
            max_credit_hours: self.max_credit_hours,
        })
    }
}

fn decode_column<T: serde::de::DeserializeOwned>(
    id: &str,
    column: &str,
    raw: &str,
) -> Result<T, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::InvalidData(format!("Corrupt {column} column for {id}: {e}")))
}

fn encode_column<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::InvalidData(format!("Failed to encode column: {e}")))
}

const COURSE_COLUMNS: &str =
    "id, code, name, credit_hours, available_seats, prerequisites, schedule";
const STUDENT_COLUMNS: &str =
    "id, name, completed_courses, current_courses, max_credit_hours";

#[async_trait]
impl Registry for SqliteRegistry {
    async fn get_student(&self, id: &str) -> Result<Option<Student>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(StudentRow::into_student).transpose()
    }

    async fn get_course(&self, id: &str) -> Result<Option<Course>, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(CourseRow::into_course).transpose()
    }

    async fn all_courses(&self) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY rowid"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }

    async fn save_student(&self, student: &Student) -> Result<(), AppError> {
        let completed = encode_column(&student.completed_courses)?;
        let current = encode_column(&student.current_courses)?;

        sqlx::query(
            "INSERT INTO students (id, name, completed_courses, current_courses, max_credit_hours) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                name = excluded.name, \
                completed_courses = excluded.completed_courses, \
                current_courses = excluded.current_courses, \
                max_credit_hours = excluded.max_credit_hours",
        )
        .bind(&student.id)
        .bind(&student.name)
        .bind(&completed)
        .bind(&current)
        .bind(student.max_credit_hours)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn save_course(&self, course: &Course) -> Result<(), AppError> {
        let prerequisites = encode_column(&course.prerequisites)?;
        let schedule = encode_column(&course.schedule)?;

        sqlx::query(
            "INSERT INTO courses (id, code, name, credit_hours, available_seats, prerequisites, schedule) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                code = excluded.code, \
                name = excluded.name, \
                credit_hours = excluded.credit_hours, \
                available_seats = excluded.available_seats, \
                prerequisites = excluded.prerequisites, \
                schedule = excluded.schedule",
        )
        .bind(&course.id)
        .bind(&course.code)
        .bind(&course.name)
        .bind(course.credit_hours)
        .bind(course.available_seats)
        .bind(&prerequisites)
        .bind(&schedule)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
