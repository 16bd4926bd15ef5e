//! # REST API Interface Layer
//!
//! HTTP endpoints of the availability editor, nested under `/api`:
//!
//! - `GET  /grid`
//! - `GET  /teachers/:teacher_id`, `PUT /teachers/:teacher_id`
//! - `GET  /teachers/:teacher_id/availability`, `PUT /teachers/:teacher_id/availability`
//! - `POST /teachers/:teacher_id/availability/toggle`
//! - `POST /teachers/:teacher_id/availability/summary`
//!
//! Handlers translate DTOs through the mappers, call the domain services and
//! map domain errors to status codes.

use axum::Router;

use crate::AppState;

pub mod availability_apis;
pub mod mappers;
pub mod teacher_apis;

/// All API routes, to be nested under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(availability_apis::router())
        .merge(teacher_apis::router())
}
