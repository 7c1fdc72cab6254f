// src/services/funnel_service.rs
//
// Orquestra o pipeline do funil: busca o histórico da unidade no
// espelho do CRM, deduplica por primeira entrada, agrega na janela e
// reconcilia com as metas. Tudo recomputado do zero a cada consulta,
// sem estado compartilhado entre requisições.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::MovementRepository,
    funnel::{aggregator, classifier, normalizer, units, FunnelIndex},
    models::funnel::{
        BusinessUnit, CardListing, FunnelSeries, FunnelSummary, Grouping, Indicator,
        IndicatorSummary, PreviewTotals, SheetPreview,
    },
    services::GoalService,
};

#[derive(Clone)]
pub struct FunnelService {
    movement_repo: MovementRepository,
    goal_service: GoalService,
}

impl FunnelService {
    pub fn new(movement_repo: MovementRepository, goal_service: GoalService) -> Self {
        Self { movement_repo, goal_service }
    }

    // Resumo da janela: contagem, valor, meta resolvida e atingimento
    // por indicador.
    pub async fn summary(
        &self,
        unit: BusinessUnit,
        start: NaiveDate,
        end: NaiveDate,
        selected_closers: &[String],
    ) -> Result<FunnelSummary, AppError> {
        if start > end {
            return Err(AppError::InvalidPeriod);
        }

        let cfg = units::config_for(unit);
        let index = self.build_index(unit, &cfg).await?;

        let mut indicators = Vec::with_capacity(Indicator::ALL.len());
        for indicator in Indicator::ALL {
            let (count, value) = aggregator::total(&index, &cfg, indicator, start, end);
            let goal = self
                .goal_service
                .window_goal(unit, indicator, start, end, selected_closers)
                .await?;

            // Atingimento: venda compara valor x meta monetária; os
            // demais comparam contagem x meta de quantidade.
            let actual = if indicator == Indicator::Venda { value } else { Decimal::from(count) };
            let attainment_pct = (goal.value > Decimal::ZERO)
                .then(|| actual * Decimal::ONE_HUNDRED / goal.value);

            indicators.push(IndicatorSummary {
                indicator,
                count,
                value,
                goal: goal.value,
                goal_source: goal.source,
                attainment_pct,
            });
        }

        Ok(FunnelSummary { business_unit: unit, start, end, indicators })
    }

    pub async fn series(
        &self,
        unit: BusinessUnit,
        indicator: Indicator,
        start: NaiveDate,
        end: NaiveDate,
        grouping: Grouping,
    ) -> Result<FunnelSeries, AppError> {
        if start > end {
            return Err(AppError::InvalidPeriod);
        }

        let cfg = units::config_for(unit);
        let index = self.build_index(unit, &cfg).await?;
        let buckets = aggregator::series(&index, &cfg, indicator, start, end, grouping);

        Ok(FunnelSeries { business_unit: unit, indicator, grouping, buckets })
    }

    // Drill-down. Com indicador: uma linha por primeira entrada na
    // janela (o que o agregado contou). Sem indicador: toda passagem de
    // fase na janela, inclusive fases sem mapeamento.
    pub async fn cards(
        &self,
        unit: BusinessUnit,
        start: NaiveDate,
        end: NaiveDate,
        indicator: Option<Indicator>,
    ) -> Result<Vec<CardListing>, AppError> {
        if start > end {
            return Err(AppError::InvalidPeriod);
        }

        let cfg = units::config_for(unit);
        let movements = self.movement_repo.fetch_unit_history(unit).await?;

        let listings = match indicator {
            Some(indicator) => {
                let index = FunnelIndex::build(&movements, &cfg);
                self.log_unmapped(unit, &index);
                let mut rows: Vec<CardListing> = index
                    .entries(indicator)
                    .filter(|m| {
                        let day = m.entered_at.date_naive();
                        day >= start && day <= end
                    })
                    .map(|m| CardListing {
                        card_id: m.card_id.clone(),
                        phase: m.phase.clone(),
                        indicator: Some(indicator),
                        entered_at: m.entered_at,
                        amounts: m.amounts,
                        revenue_tier: m.revenue_tier.clone(),
                        loss_reason: m.loss_reason.clone(),
                        responsible: m.responsible.clone(),
                        owner: m.owner.clone(),
                    })
                    .collect();
                rows.sort_by(|a, b| a.entered_at.cmp(&b.entered_at));
                rows
            }
            None => movements
                .iter()
                .filter(|m| {
                    let day = m.entered_at.date_naive();
                    day >= start && day <= end
                })
                .map(|m| CardListing {
                    card_id: m.card_id.clone(),
                    phase: m.phase.clone(),
                    indicator: classifier::label(&m.phase, &cfg),
                    entered_at: m.entered_at,
                    amounts: m.amounts,
                    revenue_tier: m.revenue_tier.clone(),
                    loss_reason: m.loss_reason.clone(),
                    responsible: m.responsible.clone(),
                    owner: m.owner.clone(),
                })
                .collect(),
        };

        Ok(listings)
    }

    // Prévia a partir de linhas cruas de planilha: normaliza, deduplica
    // e agrega com o mesmo motor do espelho. Sem metas e sem
    // persistência.
    pub fn sheet_preview(
        &self,
        unit: BusinessUnit,
        rows: &[serde_json::Value],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SheetPreview, AppError> {
        if start > end {
            return Err(AppError::InvalidPeriod);
        }

        let cfg = units::config_for(unit);
        let movements = normalizer::normalize_rows(rows);
        let index = FunnelIndex::build(&movements, &cfg);
        self.log_unmapped(unit, &index);

        let totals = Indicator::ALL
            .iter()
            .map(|&indicator| {
                let (count, value) = aggregator::total(&index, &cfg, indicator, start, end);
                PreviewTotals { indicator, count, value }
            })
            .collect();

        Ok(SheetPreview {
            business_unit: unit,
            normalized_rows: movements.len(),
            discarded_rows: rows.len().saturating_sub(movements.len()),
            unmapped_phases: index.unmapped_phases().iter().cloned().collect(),
            totals,
        })
    }

    async fn build_index(
        &self,
        unit: BusinessUnit,
        cfg: &units::SourceConfig,
    ) -> Result<FunnelIndex, AppError> {
        let movements = self.movement_repo.fetch_unit_history(unit).await?;
        let index = FunnelIndex::build(&movements, cfg);
        self.log_unmapped(unit, &index);
        Ok(index)
    }

    // O vocabulário de fases do CRM evolui: fase nova sem mapeamento é
    // sinalizada em log em vez de sumir em silêncio dos agregados.
    fn log_unmapped(&self, unit: BusinessUnit, index: &FunnelIndex) {
        for phase in index.unmapped_phases() {
            tracing::warn!(
                unidade = unit.as_str(),
                fase = %phase,
                "Fase do CRM sem mapeamento de indicador"
            );
        }
    }
}
