use serde::{Deserialize, Serialize};

/// Teaching weekday. Courses only meet Monday through Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// One meeting of a course. `location` is informational only and is not
/// consulted by conflict detection, so two courses in the same room at the
/// same time are not flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: Weekday,
    /// "HH:MM", 24-hour clock
    pub start_time: String,
    /// "HH:MM", 24-hour clock
    pub end_time: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    pub credit_hours: i32,
    /// Owned by the registration service: decremented on register,
    /// incremented on drop, never re-derived from enrollment lists.
    pub available_seats: i32,
    /// Ids of courses that must be completed first. Only direct
    /// prerequisites are checked, nothing transitive.
    pub prerequisites: Vec<String>,
    pub schedule: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub code: String,
    pub name: String,
    pub credit_hours: i32,
    pub available_seats: i32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub schedule: Vec<TimeSlot>,
}
