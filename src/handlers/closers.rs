// src/handlers/closers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        closer::{CloserListQuery, CloserWeight, ResetWeightsQuery, SetWeightPayload},
        funnel::BusinessUnit,
    },
};

// GET /api/closers/{bu}
#[utoipa::path(
    get,
    path = "/api/closers/{bu}",
    tag = "Closers",
    params(
        ("bu" = BusinessUnit, Path, description = "Unidade de negócio"),
        CloserListQuery
    ),
    responses(
        (status = 200, description = "Pesos dos closers da unidade no ano", body = Vec<CloserWeight>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_weights(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(bu): Path<BusinessUnit>,
    Query(query): Query<CloserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let weights = app_state.closer_service.list(bu, query.year).await?;
    Ok((StatusCode::OK, Json(weights)))
}

// PUT /api/closers/{bu}/weight
#[utoipa::path(
    put,
    path = "/api/closers/{bu}/weight",
    tag = "Closers",
    params(("bu" = BusinessUnit, Path, description = "Unidade de negócio")),
    request_body = SetWeightPayload,
    responses(
        (status = 200, description = "Pesos do mês após o ajuste (a dupla soma 100)", body = Vec<CloserWeight>),
        (status = 422, description = "Closer não pertence à unidade")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_weight(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(bu): Path<BusinessUnit>,
    Json(payload): Json<SetWeightPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let weights = app_state.closer_service
        .set_weight(bu, payload.month, payload.year, &payload.closer, payload.pct)
        .await?;

    Ok((StatusCode::OK, Json(weights)))
}

// POST /api/closers/{bu}/reset
#[utoipa::path(
    post,
    path = "/api/closers/{bu}/reset",
    tag = "Closers",
    params(
        ("bu" = BusinessUnit, Path, description = "Unidade de negócio"),
        ResetWeightsQuery
    ),
    responses(
        (status = 200, description = "Todos os meses do ano de volta ao split igualitário", body = Vec<CloserWeight>)
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_weights(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(bu): Path<BusinessUnit>,
    Query(query): Query<ResetWeightsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let weights = app_state.closer_service.reset(bu, query.year).await?;
    Ok((StatusCode::OK, Json(weights)))
}
