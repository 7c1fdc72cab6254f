// src/models/closer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Peso (%) de um closer na meta da unidade em um mês.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloserWeight {
    pub id: Uuid,
    pub business_unit: String,
    pub month: i32,
    pub year: i32,
    pub closer: String,
    pub pct: Decimal,
    pub updated_at: DateTime<Utc>,
}

// Edição de um peso. Em unidades com dupla de closers o complemento do
// parceiro é gravado na mesma operação.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetWeightPayload {
    #[validate(range(min = 1, max = 12, message = "O mês deve estar entre 1 e 12."))]
    pub month: i32,
    #[validate(range(min = 2020, max = 2100, message = "Ano fora do intervalo suportado."))]
    pub year: i32,
    #[validate(length(min = 1, message = "Informe o closer."))]
    pub closer: String,
    pub pct: Decimal,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CloserListQuery {
    pub year: i32,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ResetWeightsQuery {
    pub year: i32,
}
