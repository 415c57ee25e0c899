pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRegistry;
pub use sqlite::SqliteRegistry;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Course, Student};

/// Data-access seam for the registration service.
///
/// "Not found" is a value (`Ok(None)`); only store failures use the error
/// channel. `all_courses` returns courses in a stable registry order.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn get_student(&self, id: &str) -> Result<Option<Student>, AppError>;
    async fn get_course(&self, id: &str) -> Result<Option<Course>, AppError>;
    async fn all_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn save_student(&self, student: &Student) -> Result<(), AppError>;
    async fn save_course(&self, course: &Course) -> Result<(), AppError>;
}
