//! Thin HTTP surface. Handlers delegate straight to the registration
//! service; rule outcomes come back as 200s with a `RegistrationResult`
//! payload, only environment failures map to error statuses.

use axum::Json;
use axum::extract::Path;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{id}", get(get_course))
        .route("/students", post(create_student))
        .route("/students/{id}", get(get_student))
        .route("/students/{id}/eligible-courses", get(eligible_courses))
        .route("/registrations", post(register))
        .route("/registrations/drop", post(drop_registration))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.service.list_courses().await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.service.list_courses().await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = state.service.create_course(req).await?;
    Ok(Json(course))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = state.service.get_course(&id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<NewStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let student = state.service.create_student(req).await?;
    Ok(Json(student))
}

async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let student = state.service.get_student(&id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(student))
}

async fn eligible_courses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.service.get_eligible_courses(&id).await?;
    Ok(Json(courses))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Json<RegistrationResult>, AppError> {
    let result = state
        .service
        .register_for_course(&req.student_id, &req.course_id)
        .await?;
    Ok(Json(result))
}

async fn drop_registration(
    State(state): State<AppState>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Json<RegistrationResult>, AppError> {
    let result = state
        .service
        .drop_course(&req.student_id, &req.course_id)
        .await?;
    Ok(Json(result))
}
