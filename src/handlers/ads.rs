// src/handlers/ads.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::ads::{AdsInsights, AdsQuery},
};

// GET /api/ads/insights
#[utoipa::path(
    get,
    path = "/api/ads/insights",
    tag = "Ads",
    params(AdsQuery),
    responses(
        (status = 200, description = "Métricas da conta no período (cache de 1h)", body = AdsInsights),
        (status = 502, description = "Falha ao consultar a Graph API")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_insights(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<AdsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let insights = app_state.ads_service
        .insights(&query.account_id, query.since, query.until)
        .await?;
    Ok((StatusCode::OK, Json(insights)))
}
