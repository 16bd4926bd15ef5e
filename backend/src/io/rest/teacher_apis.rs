//! # REST API for Teacher Profiles
//!
//! Provisioning of teachers and their declared weekly load.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tracing::{error, info};

use crate::domain::models::TeacherId;
use crate::io::rest::mappers::TeacherMapper;
use crate::AppState;
use shared::UpsertTeacherRequest;

/// Create a router for teacher related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/teachers/:teacher_id", get(get_teacher).put(upsert_teacher))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
) -> Response {
    info!("GET /api/teachers/{}", teacher_id);

    match state.teacher_repository.get_teacher(teacher_id).await {
        Ok(Some(teacher)) => {
            (StatusCode::OK, Json(TeacherMapper::to_dto(&teacher))).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Teacher not found").into_response(),
        Err(e) => {
            error!("Failed to get teacher {}: {}", teacher_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving teacher").into_response()
        }
    }
}

/// Create or replace a teacher profile
pub async fn upsert_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
    Json(request): Json<UpsertTeacherRequest>,
) -> Response {
    info!("PUT /api/teachers/{} - request: {:?}", teacher_id, request);

    let teacher = match TeacherMapper::to_domain(teacher_id, request) {
        Ok(teacher) => teacher,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match state.teacher_repository.store_teacher(&teacher).await {
        Ok(()) => (StatusCode::OK, Json(TeacherMapper::to_dto(&teacher))).into_response(),
        Err(e) => {
            error!("Failed to store teacher {}: {}", teacher_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store teacher").into_response()
        }
    }
}
