// src/db/plan_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{funnel::BusinessUnit, plan::PlanRow},
};

// O provider do plano derivado (projeção de funil reverso) é uma seam
// explícita: o reconciliador recebe a dependência, nunca a busca de um
// contexto ambiente.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    async fn monthly_plan(&self, unit: BusinessUnit, year: i32) -> Result<Vec<PlanRow>, AppError>;
}

#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanProvider for PlanRepository {
    async fn monthly_plan(&self, unit: BusinessUnit, year: i32) -> Result<Vec<PlanRow>, AppError> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT month, leads, mqls, rms, rrs, proposals, sales, investment
            FROM plan_rows
            WHERE business_unit = $1 AND year = $2
            ORDER BY month ASC
            "#,
        )
        .bind(unit.as_str())
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
