use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{Course, Student};

use super::Registry;

/// Zero-latency registry over in-process maps. Used in unit tests and for
/// demo setups; the business logic never knows which adapter it talks to.
#[derive(Default)]
pub struct InMemoryRegistry {
    students: RwLock<HashMap<String, Student>>,
    courses: RwLock<HashMap<String, Course>>,
    /// Course insertion order, so `all_courses` stays deterministic.
    course_order: RwLock<Vec<String>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(courses: Vec<Course>, students: Vec<Student>) -> Self {
        let order: Vec<String> = courses.iter().map(|c| c.id.clone()).collect();
        Self {
            students: RwLock::new(
                students.into_iter().map(|s| (s.id.clone(), s)).collect(),
            ),
            courses: RwLock::new(
                courses.into_iter().map(|c| (c.id.clone(), c)).collect(),
            ),
            course_order: RwLock::new(order),
        }
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn get_student(&self, id: &str) -> Result<Option<Student>, AppError> {
        Ok(self.students.read().await.get(id).cloned())
    }

    async fn get_course(&self, id: &str) -> Result<Option<Course>, AppError> {
        Ok(self.courses.read().await.get(id).cloned())
    }

    async fn all_courses(&self) -> Result<Vec<Course>, AppError> {
        let courses = self.courses.read().await;
        let order = self.course_order.read().await;
        Ok(order.iter().filter_map(|id| courses.get(id).cloned()).collect())
    }

    async fn save_student(&self, student: &Student) -> Result<(), AppError> {
        self.students
            .write()
            .await
            .insert(student.id.clone(), student.clone());
        Ok(())
    }

    async fn save_course(&self, course: &Course) -> Result<(), AppError> {
        let mut courses = self.courses.write().await;
        if courses.insert(course.id.clone(), course.clone()).is_none() {
            self.course_order.write().await.push(course.id.clone());
        }
        Ok(())
    }
}
