use axum::{extract::State, http::StatusCode, Json};
use user_shared::api::{DbStateResponse, HealthResponse};

use crate::db::ReadyState;
use crate::error::AppError;
use crate::routes::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.store.check().await == ReadyState::Connected {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded".to_string(),
            }),
        )
    }
}

/// GET /api/dbstate
pub async fn db_state(State(state): State<AppState>) -> Result<Json<DbStateResponse>, AppError> {
    Ok(Json(DbStateResponse {
        ready_state: state.store.check().await.code(),
        uri: state.config.redacted_database_url()?,
    }))
}
