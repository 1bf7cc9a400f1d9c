use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use user_shared::{
    api::{CreateUserRequest, DeleteUserResponse, UpdateUserRequest},
    User,
};

use crate::error::AppError;
use crate::routes::AppState;

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = state.users.get(&id).await?;
    Ok(Json(user))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(req) = payload?;
    tracing::debug!(email = %req.email, "POST /api/users");

    let user = state.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(req) = payload?;
    tracing::debug!(user_id = %id, "PUT /api/users/:id");

    let user = state.users.update(&id, req).await?;
    Ok(Json(user))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, AppError> {
    tracing::debug!(user_id = %id, "DELETE /api/users/:id");

    state.users.delete(&id).await?;
    Ok(Json(DeleteUserResponse { success: true }))
}
