// src/handlers/permissions.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::permission::{SetPermissionsPayload, TabPermission},
};

// GET /api/permissions/{user_id}
#[utoipa::path(
    get,
    path = "/api/permissions/{user_id}",
    tag = "Permissions",
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Abas liberadas para o usuário", body = Vec<TabPermission>),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = app_state.permission_service.list(user_id).await?;
    Ok((StatusCode::OK, Json(permissions)))
}

// PUT /api/permissions/{user_id}
#[utoipa::path(
    put,
    path = "/api/permissions/{user_id}",
    tag = "Permissions",
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    request_body = SetPermissionsPayload,
    responses(
        (status = 200, description = "Conjunto de abas substituído", body = Vec<TabPermission>)
    ),
    security(("api_jwt" = []))
)]
pub async fn set_permissions(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<SetPermissionsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = app_state.permission_service
        .replace(user_id, payload.grants)
        .await?;
    Ok((StatusCode::OK, Json(permissions)))
}
