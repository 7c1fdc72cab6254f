// src/db/closer_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    common::error::AppError,
    models::{closer::CloserWeight, funnel::BusinessUnit},
};

#[derive(Clone)]
pub struct CloserRepository {
    pool: PgPool,
}

impl CloserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_unit_year(
        &self,
        unit: BusinessUnit,
        year: i32,
    ) -> Result<Vec<CloserWeight>, AppError> {
        let weights = sqlx::query_as::<_, CloserWeight>(
            r#"
            SELECT * FROM closer_weights
            WHERE business_unit = $1 AND year = $2
            ORDER BY month ASC, closer ASC
            "#,
        )
        .bind(unit.as_str())
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(weights)
    }

    pub async fn get_month(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
    ) -> Result<Vec<CloserWeight>, AppError> {
        let weights = sqlx::query_as::<_, CloserWeight>(
            r#"
            SELECT * FROM closer_weights
            WHERE business_unit = $1 AND month = $2 AND year = $3
            ORDER BY closer ASC
            "#,
        )
        .bind(unit.as_str())
        .bind(month)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(weights)
    }

    // Grava os dois lados da dupla na MESMA transação: não existe
    // estado em que os pesos deixem de somar 100.
    pub async fn set_pair(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
        pair: [(&str, Decimal); 2],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (closer, pct) in pair {
            upsert_weight(&mut tx, unit, month, year, closer, pct).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn set_single(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
        closer: &str,
        pct: Decimal,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        upsert_weight(&mut tx, unit, month, year, closer, pct).await?;
        tx.commit().await?;
        Ok(())
    }

    // Reset do ano: split igualitário para todos os closers da unidade
    // em todos os meses, em uma escrita só.
    pub async fn reset_year(
        &self,
        unit: BusinessUnit,
        year: i32,
        closers: &[&str],
        pct: Decimal,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for month in 1..=12 {
            for closer in closers {
                upsert_weight(&mut tx, unit, month, year, closer, pct).await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn upsert_weight(
    tx: &mut Transaction<'_, Postgres>,
    unit: BusinessUnit,
    month: i32,
    year: i32,
    closer: &str,
    pct: Decimal,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO closer_weights (business_unit, month, year, closer, pct)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (business_unit, month, year, closer)
        DO UPDATE SET
            pct = EXCLUDED.pct,
            updated_at = NOW()
        "#,
    )
    .bind(unit.as_str())
    .bind(month)
    .bind(year)
    .bind(closer)
    .bind(pct)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
