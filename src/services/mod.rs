pub mod exams;
pub mod registration;
pub mod supervisors;

pub use registration::RegistrationService;
