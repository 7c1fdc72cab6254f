// src/models/goal.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::funnel::BusinessUnit;

// Métricas de meta persistidas por (unidade, mês, ano).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GoalMetric {
    // Faturamento total (linha de cima)
    Faturamento,
    // Sub-métricas monetárias
    Recorrente,
    Setup,
    Pontual,
    // Quantidade de indicador (ex: meta de vendas em unidades)
    Quantidade,
}

impl GoalMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalMetric::Faturamento => "faturamento",
            GoalMetric::Recorrente => "recorrente",
            GoalMetric::Setup => "setup",
            GoalMetric::Pontual => "pontual",
            GoalMetric::Quantidade => "quantidade",
        }
    }
}

// Uma meta como está no banco.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub business_unit: String,
    pub month: i32,
    pub year: i32,
    pub metric: String,
    pub value: Decimal,
    pub updated_at: DateTime<Utc>,
}

// Upsert de uma meta pela chave natural.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGoalPayload {
    pub business_unit: BusinessUnit,
    #[validate(range(min = 1, max = 12, message = "O mês deve estar entre 1 e 12."))]
    pub month: i32,
    #[validate(range(min = 2020, max = 2100, message = "Ano fora do intervalo suportado."))]
    pub year: i32,
    pub metric: GoalMetric,
    pub value: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkGoalPayload {
    #[validate(nested)]
    pub goals: Vec<UpsertGoalPayload>,
}

// Resultado por linha do upsert em lote (melhor esforço, sem rollback).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkGoalRowResult {
    pub business_unit: BusinessUnit,
    pub month: i32,
    pub year: i32,
    pub metric: GoalMetric,
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkGoalResult {
    pub applied: usize,
    pub failed: usize,
    pub rows: Vec<BulkGoalRowResult>,
}

// De onde saiu o valor da meta resolvida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GoalSource {
    Persisted,
    Derived,
    None,
}

// Meta resolvida pela ordem de prioridade (persistida > plano > zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGoal {
    pub value: Decimal,
    pub source: GoalSource,
}

impl ResolvedGoal {
    pub fn none() -> Self {
        ResolvedGoal { value: Decimal::ZERO, source: GoalSource::None }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct GoalListQuery {
    pub bu: BusinessUnit,
    pub year: i32,
}
