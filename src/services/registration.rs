use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Course, NewCourseRequest, NewStudentRequest, RegistrationResult, Student,
};
use crate::registry::Registry;
use crate::schedule;

/// Registration eligibility engine.
///
/// Rule checks short-circuit in a fixed order; tests depend on which failure
/// message wins when several rules are violated at once. Rule violations are
/// reported as `RegistrationResult`, never as errors.
pub struct RegistrationService {
    registry: Arc<dyn Registry>,
    // Serializes register/drop so two calls cannot both observe the last
    // seat. Reads stay lock-free.
    mutation: Mutex<()>,
}

impl RegistrationService {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            registry,
            mutation: Mutex::new(()),
        }
    }

    pub async fn get_course(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        self.registry.get_course(course_id).await
    }

    pub async fn get_student(&self, student_id: &str) -> Result<Option<Student>, AppError> {
        self.registry.get_student(student_id).await
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        self.registry.all_courses().await
    }

    pub async fn create_course(&self, req: NewCourseRequest) -> Result<Course, AppError> {
        let course = Course {
            id: Uuid::new_v4().to_string(),
            code: req.code,
            name: req.name,
            credit_hours: req.credit_hours,
            available_seats: req.available_seats,
            prerequisites: req.prerequisites,
            schedule: req.schedule,
        };
        self.registry.save_course(&course).await?;
        Ok(course)
    }

    pub async fn create_student(&self, req: NewStudentRequest) -> Result<Student, AppError> {
        let student = Student {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            completed_courses: req.completed_courses,
            current_courses: Vec::new(),
            max_credit_hours: req.max_credit_hours,
        };
        self.registry.save_student(&student).await?;
        Ok(student)
    }

    /// Register a student for a course.
    ///
    /// Check order is a contract: existence, duplicate enrollment,
    /// prerequisites, schedule conflict, seats, credit cap.
    pub async fn register_for_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<RegistrationResult, AppError> {
        let _guard = self.mutation.lock().await;

        let Some(mut student) = self.registry.get_student(student_id).await? else {
            return Ok(RegistrationResult::rejected(format!(
                "Student with ID {student_id} not found"
            )));
        };

        let Some(mut course) = self.registry.get_course(course_id).await? else {
            return Ok(RegistrationResult::rejected(format!(
                "Course with ID {course_id} not found"
            )));
        };

        if student.current_courses.iter().any(|id| id == course_id) {
            return Ok(RegistrationResult::rejected(format!(
                "Student is already registered for {}",
                course.code
            )));
        }

        let missing = missing_prerequisites(&student, &course);
        if !missing.is_empty() {
            let mut codes = Vec::with_capacity(missing.len());
            for prerequisite_id in &missing {
                // Resolve to the course code when the prerequisite exists in
                // the registry, otherwise report the raw id.
                let code = match self.registry.get_course(prerequisite_id).await? {
                    Some(prerequisite) => prerequisite.code,
                    None => prerequisite_id.clone(),
                };
                codes.push(code);
            }
            return Ok(RegistrationResult::rejected(format!(
                "Missing prerequisites: {}",
                codes.join(", ")
            )));
        }

        if self.has_schedule_conflict(&student, &course).await? {
            return Ok(RegistrationResult::rejected(format!(
                "Schedule conflict detected with course {}",
                course.code
            )));
        }

        if course.available_seats <= 0 {
            return Ok(RegistrationResult::rejected(format!(
                "No available seats for course {}",
                course.code
            )));
        }

        let current_hours = self.current_credit_hours(&student).await?;
        if current_hours + course.credit_hours > student.max_credit_hours {
            return Ok(RegistrationResult::rejected(format!(
                "Registering for this course would exceed the maximum of {} credit hours",
                student.max_credit_hours
            )));
        }

        student.current_courses.push(course_id.to_string());
        course.available_seats -= 1;
        self.registry.save_student(&student).await?;
        self.registry.save_course(&course).await?;

        info!(student = %student.id, course = %course.code, "registered");
        Ok(RegistrationResult::registered(
            format!("Successfully registered for {}", course.code),
            course,
        ))
    }

    /// Drop a course from a student's schedule, returning the seat.
    pub async fn drop_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<RegistrationResult, AppError> {
        let _guard = self.mutation.lock().await;

        let Some(mut student) = self.registry.get_student(student_id).await? else {
            return Ok(RegistrationResult::rejected(format!(
                "Student with ID {student_id} not found"
            )));
        };

        let Some(mut course) = self.registry.get_course(course_id).await? else {
            return Ok(RegistrationResult::rejected(format!(
                "Course with ID {course_id} not found"
            )));
        };

        let Some(position) = student
            .current_courses
            .iter()
            .position(|id| id == course_id)
        else {
            return Ok(RegistrationResult::rejected(format!(
                "Student is not registered for {}",
                course.code
            )));
        };

        student.current_courses.remove(position);
        course.available_seats += 1;
        self.registry.save_student(&student).await?;
        self.registry.save_course(&course).await?;

        info!(student = %student.id, course = %course.code, "dropped");
        Ok(RegistrationResult::completed(format!(
            "Successfully dropped {}",
            course.code
        )))
    }

    /// All courses the student could register for right now.
    ///
    /// Each candidate is judged against the same current-enrollment
    /// baseline, not cumulatively within the scan. Unknown students get an
    /// empty list, not an error. Results follow registry order.
    pub async fn get_eligible_courses(
        &self,
        student_id: &str,
    ) -> Result<Vec<Course>, AppError> {
        let Some(student) = self.registry.get_student(student_id).await? else {
            return Ok(Vec::new());
        };

        let baseline_hours = self.current_credit_hours(&student).await?;
        let mut eligible = Vec::new();

        for course in self.registry.all_courses().await? {
            if student.current_courses.iter().any(|id| *id == course.id) {
                continue;
            }
            if !missing_prerequisites(&student, &course).is_empty() {
                continue;
            }
            if course.available_seats <= 0 {
                continue;
            }
            if baseline_hours + course.credit_hours > student.max_credit_hours {
                continue;
            }
            eligible.push(course);
        }

        Ok(eligible)
    }

    async fn has_schedule_conflict(
        &self,
        student: &Student,
        candidate: &Course,
    ) -> Result<bool, AppError> {
        for enrolled_id in &student.current_courses {
            // Enrolled ids with no course behind them cannot conflict.
            let Some(enrolled) = self.registry.get_course(enrolled_id).await? else {
                continue;
            };
            for existing_slot in &enrolled.schedule {
                for candidate_slot in &candidate.schedule {
                    if schedule::slots_conflict(candidate_slot, existing_slot)? {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }

    /// Credit hours across current enrollment. Ids that do not resolve in
    /// the registry contribute zero, silently.
    async fn current_credit_hours(&self, student: &Student) -> Result<i32, AppError> {
        let mut total = 0;
        for course_id in &student.current_courses {
            if let Some(course) = self.registry.get_course(course_id).await? {
                total += course.credit_hours;
            }
        }
        Ok(total)
    }
}

/// Direct prerequisites the student has not completed. Not transitive; a
/// course listing itself is reported as missing like any other id.
fn missing_prerequisites(student: &Student, course: &Course) -> Vec<String> {
    course
        .prerequisites
        .iter()
        .filter(|id| !student.completed_courses.contains(id))
        .cloned()
        .collect()
}
