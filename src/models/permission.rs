// src/models/permission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Uma aba do painel liberada (ou não) para um usuário.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TabPermission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tab: String,
    pub allowed: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TabGrant {
    pub tab: String,
    pub allowed: bool,
}

// Substitui o conjunto de permissões do usuário de uma vez.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPermissionsPayload {
    pub grants: Vec<TabGrant>,
}
