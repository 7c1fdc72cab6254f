// src/db/goal_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        funnel::BusinessUnit,
        goal::{Goal, GoalMetric},
    },
};

#[derive(Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Todas as metas da unidade no ano (a superfície de edição carrega
    // o ano inteiro de uma vez).
    pub async fn list_by_unit_year(
        &self,
        unit: BusinessUnit,
        year: i32,
    ) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT * FROM goals
            WHERE business_unit = $1 AND year = $2
            ORDER BY month ASC, metric ASC
            "#,
        )
        .bind(unit.as_str())
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    pub async fn get_value(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
        metric: GoalMetric,
    ) -> Result<Option<Decimal>, AppError> {
        let value: Option<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT value FROM goals
            WHERE business_unit = $1 AND month = $2 AND year = $3 AND metric = $4
            "#,
        )
        .bind(unit.as_str())
        .bind(month)
        .bind(year)
        .bind(metric.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(value.map(|(v,)| v))
    }

    // Metas de faturamento do ano inteiro, indexáveis por mês (uma ida
    // ao banco para a janela toda).
    pub async fn monetary_goals_for_year(
        &self,
        unit: BusinessUnit,
        year: i32,
        metric: GoalMetric,
    ) -> Result<Vec<(i32, Decimal)>, AppError> {
        let rows: Vec<(i32, Decimal)> = sqlx::query_as(
            r#"
            SELECT month, value FROM goals
            WHERE business_unit = $1 AND year = $2 AND metric = $3
            "#,
        )
        .bind(unit.as_str())
        .bind(year)
        .bind(metric.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // UPSERT pela chave natural (business_unit, month, year, metric).
    // Last-writer-wins, sem token de concorrência.
    pub async fn upsert(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
        metric: GoalMetric,
        value: Decimal,
    ) -> Result<Goal, AppError> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (business_unit, month, year, metric, value)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (business_unit, month, year, metric)
            DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(unit.as_str())
        .bind(month)
        .bind(year)
        .bind(metric.as_str())
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }
}
