use serde::{Deserialize, Serialize};

use super::Course;

/// Outcome of a register or drop call. Business-rule failures land here with
/// `success: false`; only environment failures (store unreachable, corrupt
/// data) surface as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_course: Option<Course>,
}

impl RegistrationResult {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            registered_course: None,
        }
    }

    pub fn registered(message: impl Into<String>, course: Course) -> Self {
        Self {
            success: true,
            message: message.into(),
            registered_course: Some(course),
        }
    }

    /// Successful outcome without a course attached (drops).
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            registered_course: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub student_id: String,
    pub course_id: String,
}
