// src/models/plan.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Uma linha do plano derivado (projeção de funil reverso), por mês.
// Entrada somente leitura do reconciliador de metas.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanRow {
    pub month: i32,
    pub leads: i32,
    pub mqls: i32,
    pub rms: i32,
    pub rrs: i32,
    pub proposals: i32,
    pub sales: Decimal,
    pub investment: Decimal,
}
