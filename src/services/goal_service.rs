// src/services/goal_service.rs
//
// Reconciliação de metas: fonte persistida > plano derivado > zero,
// rateio por dias na janela e filtro por closers selecionados.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{plan_repo::PlanProvider, CloserRepository, GoalRepository},
    funnel::{reconciler, splitter, units},
    models::{
        funnel::{BusinessUnit, Indicator},
        goal::{
            BulkGoalResult, BulkGoalRowResult, Goal, GoalMetric, GoalSource, ResolvedGoal,
            UpsertGoalPayload,
        },
        plan::PlanRow,
    },
};

#[derive(Clone)]
pub struct GoalService {
    goal_repo: GoalRepository,
    closer_repo: CloserRepository,
    // Dependência explícita: o plano derivado entra por aqui, nunca de
    // um estado compartilhado ambiente.
    plan_provider: Arc<dyn PlanProvider>,
}

impl GoalService {
    pub fn new(
        goal_repo: GoalRepository,
        closer_repo: CloserRepository,
        plan_provider: Arc<dyn PlanProvider>,
    ) -> Self {
        Self { goal_repo, closer_repo, plan_provider }
    }

    pub async fn list(&self, unit: BusinessUnit, year: i32) -> Result<Vec<Goal>, AppError> {
        self.goal_repo.list_by_unit_year(unit, year).await
    }

    // resolveGoal(bu, month, metric): persistida > 0 vence; senão o
    // plano derivado; senão zero. Sub-métricas sem valor persistido
    // derivam do faturamento resolvido pelo split padrão.
    pub async fn resolve_month_goal(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
        metric: GoalMetric,
    ) -> Result<ResolvedGoal, AppError> {
        if metric == GoalMetric::Faturamento {
            return self.resolve_faturamento(unit, month, year).await;
        }

        let persisted = self.goal_repo.get_value(unit, month, year, metric).await?;

        let derived = match metric {
            GoalMetric::Recorrente | GoalMetric::Setup | GoalMetric::Pontual => {
                let top = self.resolve_faturamento(unit, month, year).await?;
                let cfg = units::config_for(unit);
                (top.value > Decimal::ZERO)
                    .then(|| reconciler::sub_split(top.value, metric, cfg.single_ticket_only))
            }
            _ => None,
        };

        Ok(reconciler::resolve(persisted, derived))
    }

    async fn resolve_faturamento(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
    ) -> Result<ResolvedGoal, AppError> {
        let persisted = self
            .goal_repo
            .get_value(unit, month, year, GoalMetric::Faturamento)
            .await?;
        let derived = self.plan_sales(unit, month, year).await?;
        Ok(reconciler::resolve(persisted, derived))
    }

    // Meta do indicador para uma janela [start, end], mês a mês:
    // resolve, rateia pela sobreposição e (para a meta monetária de
    // venda) aplica o filtro de closers do mês.
    pub async fn window_goal(
        &self,
        unit: BusinessUnit,
        indicator: Indicator,
        start: NaiveDate,
        end: NaiveDate,
        selected_closers: &[String],
    ) -> Result<ResolvedGoal, AppError> {
        let months = reconciler::months_in_window(start, end);
        if months.is_empty() {
            return Ok(ResolvedGoal::none());
        }

        let plans = self.plans_for_years(unit, &months).await?;

        // Metas de faturamento do(s) ano(s) da janela, uma ida ao banco
        // por ano.
        let mut persisted_by_month: HashMap<(i32, i32), Decimal> = HashMap::new();
        if indicator == Indicator::Venda {
            let mut years: Vec<i32> = months.iter().map(|(y, _)| *y).collect();
            years.dedup();
            for year in years {
                let rows = self
                    .goal_repo
                    .monetary_goals_for_year(unit, year, GoalMetric::Faturamento)
                    .await?;
                for (month, value) in rows {
                    persisted_by_month.insert((year, month), value);
                }
            }
        }

        let mut total = Decimal::ZERO;
        let mut source = GoalSource::None;

        for (year, month) in months {
            let resolved = if indicator == Indicator::Venda {
                let persisted = persisted_by_month.get(&(year, month as i32)).copied();
                let derived = plan_value(&plans, year, month, indicator);
                reconciler::resolve(persisted, derived)
            } else {
                // Indicadores de contagem só têm o plano como fonte.
                reconciler::resolve(None, plan_value(&plans, year, month, indicator))
            };

            if resolved.source == GoalSource::None {
                continue;
            }

            let mut month_value =
                reconciler::prorate_month(resolved.value, year, month, start, end);

            if indicator == Indicator::Venda && !selected_closers.is_empty() {
                month_value = self
                    .apply_closer_filter(unit, month as i32, year, month_value, selected_closers)
                    .await?;
            }

            total += month_value;
            // Persistida em qualquer mês marca a janela como persistida.
            source = match (source, resolved.source) {
                (GoalSource::Persisted, _) | (_, GoalSource::Persisted) => GoalSource::Persisted,
                (GoalSource::Derived, _) | (_, GoalSource::Derived) => GoalSource::Derived,
                _ => GoalSource::None,
            };
        }

        Ok(ResolvedGoal { value: total, source })
    }

    // Upsert com a validação branda: as sub-métricas monetárias não
    // podem somar acima do faturamento da mesma chave. Bloqueia o save,
    // nunca corrige sozinho.
    pub async fn upsert(&self, payload: UpsertGoalPayload) -> Result<Goal, AppError> {
        self.validate_monetary_invariant(&payload).await?;
        self.goal_repo
            .upsert(payload.business_unit, payload.month, payload.year, payload.metric, payload.value)
            .await
    }

    // Lote em melhor esforço: uma escrita por linha, sem rollback.
    // Linhas que falham não impedem as demais; o chamador confere o
    // relatório e o estado final.
    pub async fn bulk_upsert(&self, goals: Vec<UpsertGoalPayload>) -> Result<BulkGoalResult, AppError> {
        let mut rows = Vec::with_capacity(goals.len());
        let mut applied = 0usize;
        let mut failed = 0usize;

        for payload in goals {
            let (business_unit, month, year, metric) =
                (payload.business_unit, payload.month, payload.year, payload.metric);

            let outcome = self.upsert(payload).await;
            match outcome {
                Ok(_) => {
                    applied += 1;
                    rows.push(BulkGoalRowResult {
                        business_unit, month, year, metric,
                        ok: true,
                        error: None,
                    });
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        unidade = business_unit.as_str(), month, year,
                        "Linha do lote de metas falhou: {}", e
                    );
                    rows.push(BulkGoalRowResult {
                        business_unit, month, year, metric,
                        ok: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(BulkGoalResult { applied, failed, rows })
    }

    async fn validate_monetary_invariant(&self, payload: &UpsertGoalPayload) -> Result<(), AppError> {
        use GoalMetric::*;
        if payload.metric == Quantidade {
            return Ok(());
        }

        let mut current: HashMap<GoalMetric, Decimal> = HashMap::new();
        for metric in [Faturamento, Recorrente, Setup, Pontual] {
            let value = self
                .goal_repo
                .get_value(payload.business_unit, payload.month, payload.year, metric)
                .await?
                .unwrap_or(Decimal::ZERO);
            current.insert(metric, value);
        }
        current.insert(payload.metric, payload.value);

        let top_line = current[&Faturamento];
        let sub_sum = current[&Recorrente] + current[&Setup] + current[&Pontual];

        // Sem faturamento cadastrado não há o que comparar.
        if top_line > Decimal::ZERO && sub_sum > top_line {
            let mut details = HashMap::new();
            details.insert(
                "value".to_string(),
                "sub_metrics_exceed_top_line".to_string(),
            );
            return Err(AppError::RuleViolation(details));
        }

        Ok(())
    }

    async fn plan_sales(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
    ) -> Result<Option<Decimal>, AppError> {
        let plan = self.plan_provider.monthly_plan(unit, year).await?;
        Ok(plan
            .iter()
            .find(|row| row.month == month)
            .map(|row| row.sales))
    }

    async fn plans_for_years(
        &self,
        unit: BusinessUnit,
        months: &[(i32, u32)],
    ) -> Result<HashMap<i32, Vec<PlanRow>>, AppError> {
        let mut plans = HashMap::new();
        for (year, _) in months {
            if !plans.contains_key(year) {
                let plan = self.plan_provider.monthly_plan(unit, *year).await?;
                plans.insert(*year, plan);
            }
        }
        Ok(plans)
    }

    async fn apply_closer_filter(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
        base: Decimal,
        selected: &[String],
    ) -> Result<Decimal, AppError> {
        let cfg = units::config_for(unit);

        let stored = self.closer_repo.get_month(unit, month, year).await?;
        let weights: Vec<(String, Decimal)> = if stored.is_empty() {
            // Sem pesos gravados, assume o split igualitário.
            let pct = splitter::default_split(cfg.closers.len());
            cfg.closers.iter().map(|c| (c.to_string(), pct)).collect()
        } else {
            stored.into_iter().map(|w| (w.closer, w.pct)).collect()
        };

        Ok(splitter::filtered_goal(base, &weights, selected))
    }
}

// Valor do plano derivado para um indicador em um mês.
fn plan_value(
    plans: &HashMap<i32, Vec<PlanRow>>,
    year: i32,
    month: u32,
    indicator: Indicator,
) -> Option<Decimal> {
    let row = plans
        .get(&year)?
        .iter()
        .find(|row| row.month == month as i32)?;

    let value = match indicator {
        Indicator::Leads => Decimal::from(row.leads),
        Indicator::Mql => Decimal::from(row.mqls),
        Indicator::Rm => Decimal::from(row.rms),
        Indicator::Rr => Decimal::from(row.rrs),
        Indicator::Proposta => Decimal::from(row.proposals),
        Indicator::Venda => row.sales,
    };
    Some(value)
}
