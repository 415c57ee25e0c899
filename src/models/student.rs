use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Ids of courses the student has passed. Read-only here.
    pub completed_courses: Vec<String>,
    /// Ids of courses the student is enrolled in this semester. Maintained
    /// by the registration service.
    pub current_courses: Vec<String>,
    /// Credit-hour cap per semester.
    pub max_credit_hours: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudentRequest {
    pub name: String,
    #[serde(default)]
    pub completed_courses: Vec<String>,
    pub max_credit_hours: i32,
}
