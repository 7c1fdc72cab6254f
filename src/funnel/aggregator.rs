// src/funnel/aggregator.rs
//
// Agrega o conjunto já deduplicado de primeiras entradas em totais e
// séries por período. Os buckets particionam a janela: um card excluído
// por ter entrado antes não reaparece em bucket nenhum.

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;

use crate::funnel::first_entry::FunnelIndex;
use crate::funnel::units::SourceConfig;
use crate::models::funnel::{Grouping, Indicator, SeriesBucket};

// Total de um indicador na janela [start, end], inclusiva nas duas
// pontas (o fim fecha no fim do dia).
pub fn total(
    index: &FunnelIndex,
    cfg: &SourceConfig,
    indicator: Indicator,
    start: NaiveDate,
    end: NaiveDate,
) -> (u64, Decimal) {
    let mut count = 0u64;
    let mut value = Decimal::ZERO;

    for movement in index.entries(indicator) {
        let day = movement.entered_at.date_naive();
        if day >= start && day <= end {
            count += 1;
            value += index.card_value(&movement.card_id, indicator, cfg);
        }
    }

    (count, value)
}

// Série do indicador agrupada em buckets diários, semanais (janelas
// fixas de 7 dias a partir de `start`, a última pode ser curta) ou
// mensais (meses-calendário recortados pela janela).
pub fn series(
    index: &FunnelIndex,
    cfg: &SourceConfig,
    indicator: Indicator,
    start: NaiveDate,
    end: NaiveDate,
    grouping: Grouping,
) -> Vec<SeriesBucket> {
    buckets(start, end, grouping)
        .into_iter()
        .map(|(bucket_start, bucket_end)| {
            let (count, value) = total(index, cfg, indicator, bucket_start, bucket_end);
            SeriesBucket { start: bucket_start, end: bucket_end, count, value }
        })
        .collect()
}

// Sub-janelas contíguas cobrindo exatamente [start, end].
pub fn buckets(start: NaiveDate, end: NaiveDate, grouping: Grouping) -> Vec<(NaiveDate, NaiveDate)> {
    if start > end {
        return Vec::new();
    }

    let mut out = Vec::new();
    match grouping {
        Grouping::Daily => {
            let mut day = start;
            while day <= end {
                out.push((day, day));
                let Some(next) = day.checked_add_days(Days::new(1)) else { break };
                day = next;
            }
        }
        Grouping::Weekly => {
            let mut cursor = start;
            while cursor <= end {
                let close = cursor
                    .checked_add_days(Days::new(6))
                    .map(|d| d.min(end))
                    .unwrap_or(end);
                out.push((cursor, close));
                let Some(next) = close.checked_add_days(Days::new(1)) else { break };
                cursor = next;
            }
        }
        Grouping::Monthly => {
            let mut cursor = start;
            while cursor <= end {
                let month_end = last_day_of_month(cursor.year(), cursor.month());
                let close = month_end.min(end);
                out.push((cursor, close));
                let Some(next) = close.checked_add_days(Days::new(1)) else { break };
                cursor = next;
            }
        }
    }
    out
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .expect("mês válido")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::first_entry::FunnelIndex;
    use crate::funnel::units::config_for;
    use crate::models::funnel::{BusinessUnit, MonetaryBreakdown, Movement};
    use chrono::{DateTime, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
            .and_utc()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn movement(card: &str, phase: &str, entered: DateTime<Utc>) -> Movement {
        Movement {
            card_id: card.to_string(),
            phase: phase.to_string(),
            entered_at: entered,
            exited_at: None,
            amounts: MonetaryBreakdown::default(),
            revenue_tier: None,
            signed_at: None,
            loss_reason: None,
            responsible: None,
            owner: None,
        }
    }

    // O cenário ponta a ponta do painel: MQL qualificado, reunião
    // marcada, no-show e remarcação. RM de janeiro conta 1, atribuído
    // ao dia 10.
    #[test]
    fn reentrada_de_rm_conta_uma_vez_no_mes() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let mut mql = movement("A", "MQL", at(2026, 1, 5));
        mql.revenue_tier = Some("Entre R$200 mil e R$350 mil".to_string());
        let movements = vec![
            mql,
            movement("A", "Reunião Marcada", at(2026, 1, 10)),
            movement("A", "Reunião Remarcada", at(2026, 1, 20)),
        ];
        let index = FunnelIndex::build(&movements, &cfg);

        let (count, _) = total(&index, &cfg, Indicator::Rm, date(2026, 1, 1), date(2026, 1, 31));
        assert_eq!(count, 1);

        // A atribuição fica no dia 10: a série diária confirma.
        let serie = series(
            &index,
            &cfg,
            Indicator::Rm,
            date(2026, 1, 1),
            date(2026, 1, 31),
            Grouping::Daily,
        );
        let day10 = serie.iter().find(|b| b.start == date(2026, 1, 10)).unwrap();
        let day20 = serie.iter().find(|b| b.start == date(2026, 1, 20)).unwrap();
        assert_eq!(day10.count, 1);
        assert_eq!(day20.count, 0);
    }

    #[test]
    fn soma_dos_buckets_mensais_bate_com_o_total() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let movements = vec![
            movement("A", "Novo Lead", at(2026, 1, 15)),
            movement("B", "Novo Lead", at(2026, 2, 3)),
            movement("C", "Novo Lead", at(2026, 2, 27)),
            movement("D", "Novo Lead", at(2026, 3, 9)),
            // Fora da janela: não entra em bucket nenhum.
            movement("E", "Novo Lead", at(2025, 12, 31)),
        ];
        let index = FunnelIndex::build(&movements, &cfg);

        let start = date(2026, 1, 10);
        let end = date(2026, 3, 20);
        let (total_count, _) = total(&index, &cfg, Indicator::Leads, start, end);

        let serie = series(&index, &cfg, Indicator::Leads, start, end, Grouping::Monthly);
        let bucket_sum: u64 = serie.iter().map(|b| b.count).sum();
        assert_eq!(bucket_sum, total_count);
        assert_eq!(total_count, 4);
    }

    #[test]
    fn janela_e_inclusiva_nas_duas_pontas() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let movements = vec![
            movement("A", "Novo Lead", at(2026, 1, 1)),
            movement("B", "Novo Lead", at(2026, 1, 31)),
        ];
        let index = FunnelIndex::build(&movements, &cfg);

        let (count, _) = total(&index, &cfg, Indicator::Leads, date(2026, 1, 1), date(2026, 1, 31));
        assert_eq!(count, 2);
    }

    #[test]
    fn buckets_semanais_sao_ancorados_no_inicio_da_janela() {
        // 1º de janeiro de 2026 é quinta-feira: as janelas de 7 dias
        // partem dela mesmo assim (não são semanas-calendário).
        let got = buckets(date(2026, 1, 1), date(2026, 1, 17), Grouping::Weekly);
        assert_eq!(
            got,
            vec![
                (date(2026, 1, 1), date(2026, 1, 7)),
                (date(2026, 1, 8), date(2026, 1, 14)),
                (date(2026, 1, 15), date(2026, 1, 17)), // última curta
            ]
        );
    }

    #[test]
    fn buckets_mensais_sao_recortados_pela_janela() {
        let got = buckets(date(2026, 1, 20), date(2026, 3, 10), Grouping::Monthly);
        assert_eq!(
            got,
            vec![
                (date(2026, 1, 20), date(2026, 1, 31)),
                (date(2026, 2, 1), date(2026, 2, 28)),
                (date(2026, 3, 1), date(2026, 3, 10)),
            ]
        );
    }

    #[test]
    fn valor_da_venda_soma_o_breakdown_mais_recente_por_card() {
        let cfg = config_for(BusinessUnit::O2Tax);
        let mut proposta = movement("A", "Proposta", at(2026, 1, 5));
        proposta.amounts.recurring = Decimal::new(2_000, 0);
        let mut venda = movement("A", "Ganho", at(2026, 1, 12));
        venda.amounts.recurring = Decimal::new(2_000, 0);
        venda.amounts.setup = Decimal::new(1_000, 0);
        venda.amounts.one_time = Decimal::new(500, 0);

        let index = FunnelIndex::build(&[proposta, venda], &cfg);
        let (count, value) = total(&index, &cfg, Indicator::Venda, date(2026, 1, 1), date(2026, 1, 31));
        assert_eq!(count, 1);
        assert_eq!(value, Decimal::new(3_500, 0));
    }

    #[test]
    fn janela_invertida_nao_gera_buckets() {
        assert!(buckets(date(2026, 2, 1), date(2026, 1, 1), Grouping::Daily).is_empty());
    }
}
