pub mod course;
pub mod registration;
pub mod student;

pub use course::{Course, NewCourseRequest, TimeSlot, Weekday};
pub use registration::{RegistrationRequest, RegistrationResult};
pub use student::{NewStudentRequest, Student};
