// src/funnel/reconciler.rs
//
// Resolução de metas: prioridade estrita entre fontes, rateio por dias
// de sobreposição e derivação das sub-métricas monetárias a partir da
// meta de faturamento.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::funnel::aggregator::last_day_of_month;
use crate::models::goal::{GoalMetric, GoalSource, ResolvedGoal};

// Prioridade: meta persistida > 0, senão valor do plano derivado > 0,
// senão zero. Nunca mistura as fontes para um mesmo mês.
pub fn resolve(persisted: Option<Decimal>, derived: Option<Decimal>) -> ResolvedGoal {
    if let Some(value) = persisted {
        if value > Decimal::ZERO {
            return ResolvedGoal { value, source: GoalSource::Persisted };
        }
    }
    if let Some(value) = derived {
        if value > Decimal::ZERO {
            return ResolvedGoal { value, source: GoalSource::Derived };
        }
    }
    ResolvedGoal::none()
}

// Meta de um mês ponderada pela fração dos dias do mês dentro da
// janela: goal * (dias de sobreposição / dias do mês).
pub fn prorate_month(
    goal: Decimal,
    year: i32,
    month: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Decimal {
    let overlap = overlap_days(year, month, start, end);
    if overlap == 0 {
        return Decimal::ZERO;
    }
    let total_days = i64::from(last_day_of_month(year, month).day());
    goal * Decimal::from(overlap) / Decimal::from(total_days)
}

pub fn overlap_days(year: i32, month: u32, start: NaiveDate, end: NaiveDate) -> i64 {
    let Some(month_start) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let month_end = last_day_of_month(year, month);

    let from = month_start.max(start);
    let to = month_end.min(end);
    if from > to {
        return 0;
    }
    (to - from).num_days() + 1
}

// Meses-calendário (ano, mês) tocados pela janela, em ordem.
pub fn months_in_window(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let mut out = Vec::new();
    if start > end {
        return out;
    }
    let (mut year, mut month) = (start.year(), start.month());
    loop {
        out.push((year, month));
        if year == end.year() && month == end.month() {
            break;
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    out
}

// Split padrão das sub-métricas quando só a meta de faturamento existe:
// 25% recorrente, 60% setup, 15% pontual. Unidades de ticket único
// caem 100% em pontual.
pub fn sub_split(top_line: Decimal, metric: GoalMetric, single_ticket_only: bool) -> Decimal {
    let pct = if single_ticket_only {
        match metric {
            GoalMetric::Pontual | GoalMetric::Faturamento => Decimal::ONE,
            _ => Decimal::ZERO,
        }
    } else {
        match metric {
            GoalMetric::Faturamento => Decimal::ONE,
            GoalMetric::Recorrente => Decimal::new(25, 2),
            GoalMetric::Setup => Decimal::new(60, 2),
            GoalMetric::Pontual => Decimal::new(15, 2),
            GoalMetric::Quantidade => Decimal::ZERO,
        }
    };
    top_line * pct
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn meta_persistida_vence_o_plano() {
        let got = resolve(Some(Decimal::new(500_000, 0)), Some(Decimal::new(320_000, 0)));
        assert_eq!(got.value, Decimal::new(500_000, 0));
        assert_eq!(got.source, GoalSource::Persisted);
    }

    #[test]
    fn persistida_zerada_cai_para_o_plano() {
        let got = resolve(Some(Decimal::ZERO), Some(Decimal::new(320_000, 0)));
        assert_eq!(got.value, Decimal::new(320_000, 0));
        assert_eq!(got.source, GoalSource::Derived);
    }

    #[test]
    fn sem_fonte_nenhuma_resolve_zero() {
        let got = resolve(None, None);
        assert_eq!(got.value, Decimal::ZERO);
        assert_eq!(got.source, GoalSource::None);

        let zeradas = resolve(Some(Decimal::ZERO), Some(Decimal::ZERO));
        assert_eq!(zeradas.source, GoalSource::None);
    }

    // 3.000.000 em um mês de 30 dias, janela cobrindo os 10 primeiros:
    // rateia para exatamente 1.000.000.
    #[test]
    fn rateio_de_dez_dias_em_trinta() {
        let got = prorate_month(
            Decimal::new(3_000_000, 0),
            2026,
            4, // abril tem 30 dias
            date(2026, 4, 1),
            date(2026, 4, 10),
        );
        assert_eq!(got, Decimal::new(1_000_000, 0));
    }

    #[test]
    fn mes_inteiro_dentro_da_janela_nao_rateia() {
        let goal = Decimal::new(900_000, 0);
        let got = prorate_month(goal, 2026, 2, date(2026, 1, 1), date(2026, 12, 31));
        assert_eq!(got, goal);
    }

    #[test]
    fn mes_fora_da_janela_rateia_para_zero() {
        let got = prorate_month(Decimal::new(100, 0), 2026, 7, date(2026, 1, 1), date(2026, 3, 31));
        assert_eq!(got, Decimal::ZERO);
    }

    #[test]
    fn meses_da_janela_incluem_as_pontas() {
        assert_eq!(
            months_in_window(date(2025, 11, 15), date(2026, 2, 3)),
            vec![(2025, 11), (2025, 12), (2026, 1), (2026, 2)]
        );
        assert_eq!(months_in_window(date(2026, 5, 1), date(2026, 5, 31)), vec![(2026, 5)]);
        assert!(months_in_window(date(2026, 2, 1), date(2026, 1, 1)).is_empty());
    }

    #[test]
    fn split_padrao_25_60_15() {
        let top = Decimal::new(100_000, 0);
        assert_eq!(sub_split(top, GoalMetric::Recorrente, false), Decimal::new(25_000, 0));
        assert_eq!(sub_split(top, GoalMetric::Setup, false), Decimal::new(60_000, 0));
        assert_eq!(sub_split(top, GoalMetric::Pontual, false), Decimal::new(15_000, 0));
    }

    #[test]
    fn unidade_de_ticket_unico_cai_tudo_em_pontual() {
        let top = Decimal::new(100_000, 0);
        assert_eq!(sub_split(top, GoalMetric::Pontual, true), top);
        assert_eq!(sub_split(top, GoalMetric::Recorrente, true), Decimal::ZERO);
        assert_eq!(sub_split(top, GoalMetric::Setup, true), Decimal::ZERO);
    }
}
