// src/models/ads.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Métricas agregadas de campanha vindas da API de insights da Meta.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdsInsights {
    pub account_id: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub leads: u64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdsQuery {
    pub account_id: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
}
