//! # Availability Backend
//!
//! Backend of the weekly teaching-availability editor.
//!
//! ## Architecture
//!
//! ```text
//! Grid UI
//!     ↓
//! IO Layer (REST API, mappers)
//!     ↓
//! Domain Layer (grid, quota, compaction, reconciliation, services)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::reconciliation::MatchPolicy;
use crate::domain::time_grid::TimeGrid;
use crate::domain::AvailabilityService;
use crate::storage::{AvailabilityRepository, DbConnection, TeacherRepository};

pub type SqliteAvailabilityService = AvailabilityService<AvailabilityRepository, TeacherRepository>;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub availability_service: SqliteAvailabilityService,
    pub teacher_repository: TeacherRepository,
}

impl AppState {
    pub fn new(db: DbConnection, policy: MatchPolicy) -> Self {
        let availability = Arc::new(AvailabilityRepository::new(db.clone()));
        let teacher_repository = TeacherRepository::new(db);
        let availability_service = AvailabilityService::new(
            availability,
            Arc::new(teacher_repository.clone()),
            TimeGrid::default(),
            policy,
        );

        Self {
            availability_service,
            teacher_repository,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain model (match policy: {:?})", config.match_policy);
    Ok(AppState::new(db, config.match_policy))
}

/// Build the application router with CORS for the grid UI
pub fn create_router(state: AppState, allowed_origin: &str) -> Result<Router> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin '{}'", allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::router())
        .layer(cors)
        .with_state(state))
}
