// src/db/movement_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::funnel::{BusinessUnit, Movement, MovementRow},
};

// Lê o espelho do CRM (Pipefy) em Postgres. Somente leitura: o espelho
// é mantido por um sincronizador externo e é a fonte da verdade.
//
// Cada busca é uma tentativa única; falha vira SourceFetch e quem
// chamou decide reinvocar (refresh manual no painel).
#[derive(Clone)]
pub struct MovementRepository {
    crm_pool: PgPool,
}

impl MovementRepository {
    pub fn new(crm_pool: PgPool) -> Self {
        Self { crm_pool }
    }

    // Histórico COMPLETO de passagens de fase da unidade, sem recorte
    // de período: a primeira entrada de um card pode estar fora da
    // janela consultada e ainda assim manda na atribuição.
    pub async fn fetch_unit_history(&self, unit: BusinessUnit) -> Result<Vec<Movement>, AppError> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT
                card_id,
                phase,
                entered_at,
                exited_at,
                mrr,
                setup,
                pontual,
                educacao,
                revenue_tier,
                signed_at,
                loss_reason,
                responsible,
                owner
            FROM card_phase_history
            WHERE pipe = $1
            ORDER BY entered_at ASC, id ASC
            "#,
        )
        .bind(unit.as_str())
        .fetch_all(&self.crm_pool)
        .await
        .map_err(|e| AppError::SourceFetch(format!("espelho do CRM: {e}")))?;

        Ok(rows.into_iter().map(Movement::from).collect())
    }
}
