// src/handlers/funnel.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::funnel::{
        BusinessUnit, CardListing, CardsQuery, FunnelSeries, FunnelSummary, PeriodQuery,
        SeriesQuery, SheetPreview, SheetPreviewPayload,
    },
};

// "a,b" -> ["a", "b"]; vazio vira lista vazia (sem filtro).
fn parse_closers(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// GET /api/funnel/{bu}/summary
#[utoipa::path(
    get,
    path = "/api/funnel/{bu}/summary",
    tag = "Funnel",
    params(
        ("bu" = BusinessUnit, Path, description = "Unidade de negócio"),
        PeriodQuery
    ),
    responses(
        (status = 200, description = "Contagem, valor e atingimento de meta por indicador", body = FunnelSummary),
        (status = 400, description = "Período inválido"),
        (status = 502, description = "Falha ao buscar o espelho do CRM")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(bu): Path<BusinessUnit>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let closers = parse_closers(&query.closers);

    let summary = app_state.funnel_service
        .summary(bu, query.start, query.end, &closers)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/funnel/{bu}/series
#[utoipa::path(
    get,
    path = "/api/funnel/{bu}/series",
    tag = "Funnel",
    params(
        ("bu" = BusinessUnit, Path, description = "Unidade de negócio"),
        SeriesQuery
    ),
    responses(
        (status = 200, description = "Série do indicador em buckets diários, semanais ou mensais", body = FunnelSeries)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_series(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(bu): Path<BusinessUnit>,
    Query(query): Query<SeriesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let series = app_state.funnel_service
        .series(bu, query.indicator, query.start, query.end, query.grouping)
        .await?;

    Ok((StatusCode::OK, Json(series)))
}

// GET /api/funnel/{bu}/cards
#[utoipa::path(
    get,
    path = "/api/funnel/{bu}/cards",
    tag = "Funnel",
    params(
        ("bu" = BusinessUnit, Path, description = "Unidade de negócio"),
        CardsQuery
    ),
    responses(
        (status = 200, description = "Drill-down de cards na janela (inclui fases sem mapeamento)", body = Vec<CardListing>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cards(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(bu): Path<BusinessUnit>,
    Query(query): Query<CardsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let cards = app_state.funnel_service
        .cards(bu, query.start, query.end, query.indicator)
        .await?;

    Ok((StatusCode::OK, Json(cards)))
}

// POST /api/funnel/{bu}/preview
#[utoipa::path(
    post,
    path = "/api/funnel/{bu}/preview",
    tag = "Funnel",
    params(("bu" = BusinessUnit, Path, description = "Unidade de negócio")),
    request_body = SheetPreviewPayload,
    responses(
        (status = 200, description = "Funil calculado a partir das linhas cruas da planilha", body = SheetPreview),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn preview_sheet(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(bu): Path<BusinessUnit>,
    Json(payload): Json<SheetPreviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    let preview = app_state.funnel_service
        .sheet_preview(bu, &payload.rows, payload.start, payload.end)?;

    Ok((StatusCode::OK, Json(preview)))
}
