//! # REST API for Teacher Availability
//!
//! Endpoints behind the weekly availability grid: grid layout, loading a
//! teacher's availability, toggling cells, quota summaries and saving.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tracing::{error, info, warn};

use crate::domain::commands::availability::SaveAvailabilityCommand;
use crate::domain::errors::AvailabilityError;
use crate::domain::models::TeacherId;
use crate::io::rest::mappers::availability_mapper::AvailabilityMapper;
use crate::storage::traits::StorageError;
use crate::AppState;
use shared::{
    LoadAvailabilityResponse, SaveAvailabilityRequest, SummaryRequest, ToggleCellRequest,
    ToggleCellResponse,
};

/// Create a router for availability related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grid", get(get_grid))
        .route(
            "/teachers/:teacher_id/availability",
            get(load_availability).put(save_availability),
        )
        .route("/teachers/:teacher_id/availability/toggle", post(toggle_cell))
        .route("/teachers/:teacher_id/availability/summary", post(summarize_selection))
}

/// Translate a domain error into a status code and message
fn error_response(e: AvailabilityError) -> Response {
    match e {
        AvailabilityError::QuotaInsufficient { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
        }
        AvailabilityError::InvalidRange(_)
        | AvailabilityError::ForeignRecord { .. }
        | AvailabilityError::DuplicateRecord(_)
        | AvailabilityError::QuotaExceeded { .. } => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        AvailabilityError::TeacherNotFound(_) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        AvailabilityError::SaveFailed {
            failure,
            reloaded_records,
        } => {
            let (status, message) = match &failure.source {
                StorageError::Conflict { day, start, end, .. } => (
                    StatusCode::CONFLICT,
                    format!(
                        "Conflict: {} {}-{} overlaps an existing availability. Reload and try again.",
                        day, start, end
                    ),
                ),
                StorageError::Dependency { id, assignments } => (
                    StatusCode::CONFLICT,
                    format!(
                        "Availability {} is used by {} assignment(s) and cannot be removed.",
                        id, assignments
                    ),
                ),
                StorageError::NotFound(id) => (
                    StatusCode::CONFLICT,
                    format!(
                        "Availability {} is not among this teacher's records. Reload and try again.",
                        id
                    ),
                ),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, failure.to_string()),
            };
            let body = AvailabilityMapper::to_save_failure_response(
                &failure,
                reloaded_records.as_deref(),
                message,
            );
            (status, Json(body)).into_response()
        }
        AvailabilityError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error accessing availability storage",
        )
            .into_response(),
    }
}

/// Layout of the weekly grid
pub async fn get_grid(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/grid");
    Json(AvailabilityMapper::grid_to_dto(state.availability_service.grid()))
}

/// Load stored availability and the selection it covers
pub async fn load_availability(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
) -> Response {
    info!("GET /api/teachers/{}/availability", teacher_id);

    match state.availability_service.load_session(teacher_id).await {
        Ok(session) => {
            let summary = session.summary(state.availability_service.grid());
            let response = LoadAvailabilityResponse {
                teacher_id,
                required_weekly_hours: session.required_weekly_hours(),
                records: AvailabilityMapper::to_dto_list(session.prior_records()),
                selection: AvailabilityMapper::selection_to_dto(session.selection()),
                summary: AvailabilityMapper::summary_to_dto(&summary),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to load availability for teacher {}: {}", teacher_id, e);
            error_response(e)
        }
    }
}

/// Toggle one cell. A toggle blocked by the quota is not an error: the
/// selection comes back unchanged with a notice.
pub async fn toggle_cell(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
    Json(request): Json<ToggleCellRequest>,
) -> Response {
    info!(
        "POST /api/teachers/{}/availability/toggle - {} slot {}",
        teacher_id, request.day, request.slot_index
    );

    let service = &state.availability_service;
    let required = match service.get_required_weekly_hours(teacher_id).await {
        Ok(required) => required,
        Err(e) => return error_response(e),
    };

    let submitted = AvailabilityMapper::selection_to_domain(&request.selection, service.grid());
    let selection = match submitted {
        Ok(selection) => selection,
        Err(e) => return error_response(e.into()),
    };
    let (selection, blocked_notice) =
        match service.toggle_cell(&selection, required, request.day, request.slot_index) {
            Ok(toggled) => (toggled, None),
            Err(e @ AvailabilityError::QuotaExceeded { .. }) => {
                info!("Toggle blocked for teacher {}: {}", teacher_id, e);
                (selection, Some(e.to_string()))
            }
            Err(e) => {
                warn!("Invalid toggle for teacher {}: {}", teacher_id, e);
                return error_response(e);
            }
        };

    let summary = service.summarize(&selection, required);
    let response = ToggleCellResponse {
        selection: AvailabilityMapper::selection_to_dto(&selection),
        summary: AvailabilityMapper::summary_to_dto(&summary),
        blocked_notice,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Quota summary of an arbitrary selection
pub async fn summarize_selection(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
    Json(request): Json<SummaryRequest>,
) -> Response {
    info!("POST /api/teachers/{}/availability/summary", teacher_id);

    let service = &state.availability_service;
    match service.get_required_weekly_hours(teacher_id).await {
        Ok(required) => {
            match AvailabilityMapper::selection_to_domain(&request.selection, service.grid()) {
                Ok(selection) => {
                    let summary = service.summarize(&selection, required);
                    let dto = AvailabilityMapper::summary_to_dto(&summary);
                    (StatusCode::OK, Json(dto)).into_response()
                }
                Err(e) => error_response(e.into()),
            }
        }
        Err(e) => error_response(e),
    }
}

/// Save the selection against the records the session was loaded with
pub async fn save_availability(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
    Json(request): Json<SaveAvailabilityRequest>,
) -> Response {
    info!(
        "PUT /api/teachers/{}/availability - {} prior records",
        teacher_id,
        request.prior_records.len()
    );

    let prior_records = match AvailabilityMapper::to_domain_list(&request.prior_records) {
        Ok(records) => records,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    let service = &state.availability_service;
    let submitted = AvailabilityMapper::selection_to_domain(&request.selection, service.grid());
    let selection = match submitted {
        Ok(selection) => selection,
        Err(e) => return error_response(e.into()),
    };

    let command = SaveAvailabilityCommand {
        teacher_id,
        selection,
        prior_records,
    };

    match service.save(command).await {
        Ok(outcome) => {
            (StatusCode::OK, Json(AvailabilityMapper::to_save_response(&outcome))).into_response()
        }
        Err(e) => {
            error!("Failed to save availability for teacher {}: {}", teacher_id, e);
            error_response(e)
        }
    }
}
