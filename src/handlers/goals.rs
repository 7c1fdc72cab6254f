// src/handlers/goals.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::goal::{
        BulkGoalPayload, BulkGoalResult, Goal, GoalListQuery, GoalMetric, ResolvedGoal,
        UpsertGoalPayload,
    },
    models::funnel::BusinessUnit,
};

// GET /api/goals
#[utoipa::path(
    get,
    path = "/api/goals",
    tag = "Goals",
    params(GoalListQuery),
    responses(
        (status = 200, description = "Metas persistidas da unidade no ano", body = Vec<Goal>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_goals(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<GoalListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let goals = app_state.goal_service.list(query.bu, query.year).await?;
    Ok((StatusCode::OK, Json(goals)))
}

#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ResolveGoalQuery {
    pub bu: BusinessUnit,
    pub month: i32,
    pub year: i32,
    pub metric: GoalMetric,
}

// GET /api/goals/resolve
#[utoipa::path(
    get,
    path = "/api/goals/resolve",
    tag = "Goals",
    params(ResolveGoalQuery),
    responses(
        (status = 200, description = "Meta resolvida pela prioridade persistida > plano > zero", body = ResolvedGoal)
    ),
    security(("api_jwt" = []))
)]
pub async fn resolve_goal(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ResolveGoalQuery>,
) -> Result<impl IntoResponse, AppError> {
    let resolved = app_state.goal_service
        .resolve_month_goal(query.bu, query.month, query.year, query.metric)
        .await?;
    Ok((StatusCode::OK, Json(resolved)))
}

// PUT /api/goals
#[utoipa::path(
    put,
    path = "/api/goals",
    tag = "Goals",
    request_body = UpsertGoalPayload,
    responses(
        (status = 200, description = "Meta gravada", body = Goal),
        (status = 422, description = "Sub-métricas somam acima do faturamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_goal(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<UpsertGoalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let goal = app_state.goal_service.upsert(payload).await?;
    Ok((StatusCode::OK, Json(goal)))
}

// POST /api/goals/bulk
#[utoipa::path(
    post,
    path = "/api/goals/bulk",
    tag = "Goals",
    request_body = BulkGoalPayload,
    responses(
        (status = 200, description = "Relatório por linha do lote (melhor esforço, sem rollback)", body = BulkGoalResult)
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_upsert_goals(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<BulkGoalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let result = app_state.goal_service.bulk_upsert(payload.goals).await?;
    Ok((StatusCode::OK, Json(result)))
}
