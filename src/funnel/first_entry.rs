// src/funnel/first_entry.rs
//
// Deduplicação por primeira entrada: um card conta para um indicador
// uma única vez, no timestamp da primeira passagem qualificada, nunca
// nas reentradas (os loops de "Reunião Remarcada"). Sempre computado
// sobre o histórico completo do card, não só sobre a janela consultada.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::funnel::classifier;
use crate::funnel::units::SourceConfig;
use crate::models::funnel::{Indicator, MonetaryBreakdown, Movement};

#[derive(Debug, Default)]
pub struct FunnelIndex {
    // (card, indicador) -> movimento da primeira entrada qualificada.
    first_entries: HashMap<(String, Indicator), Movement>,
    // card -> componentes monetários mais recentes conhecidos
    // (last-value-wins; ver DESIGN.md).
    latest_amounts: HashMap<String, (DateTime<Utc>, MonetaryBreakdown)>,
    // Fases observadas sem mapeamento. Sinalizadas em log, nunca
    // descartadas em silêncio.
    unmapped_phases: BTreeSet<String>,
}

impl FunnelIndex {
    pub fn build(movements: &[Movement], cfg: &SourceConfig) -> FunnelIndex {
        let mut index = FunnelIndex::default();

        for movement in movements {
            if cfg.indicators_for_phase(&movement.phase).is_none() && !movement.phase.is_empty() {
                index.unmapped_phases.insert(movement.phase.clone());
            }

            let indicators = classifier::classify(
                &movement.phase,
                movement.revenue_tier.as_deref(),
                movement.signed_at,
                cfg,
            );

            for indicator in indicators {
                let key = (movement.card_id.clone(), indicator);
                match index.first_entries.get(&key) {
                    // Empate de timestamp mantém o primeiro visto
                    // (ordem de chegada), para ser determinístico.
                    Some(existing) if existing.entered_at <= movement.entered_at => {}
                    _ => {
                        index.first_entries.insert(key, movement.clone());
                    }
                }
            }

            match index.latest_amounts.get(&movement.card_id) {
                Some((seen_at, _)) if *seen_at >= movement.entered_at => {}
                _ => {
                    index
                        .latest_amounts
                        .insert(movement.card_id.clone(), (movement.entered_at, movement.amounts));
                }
            }
        }

        index
    }

    pub fn entries(&self, indicator: Indicator) -> impl Iterator<Item = &Movement> {
        self.first_entries
            .iter()
            .filter(move |((_, ind), _)| *ind == indicator)
            .map(|(_, movement)| movement)
    }

    pub fn first_entry(&self, card_id: &str, indicator: Indicator) -> Option<&Movement> {
        self.first_entries
            .get(&(card_id.to_string(), indicator))
    }

    // Valor monetário de um card para fins de agregação: o breakdown
    // mais recente conhecido. Venda sem valor informado assume o ticket
    // padrão da unidade.
    pub fn card_value(&self, card_id: &str, indicator: Indicator, cfg: &SourceConfig) -> Decimal {
        let total = self
            .latest_amounts
            .get(card_id)
            .map(|(_, amounts)| amounts.total())
            .unwrap_or(Decimal::ZERO);

        if total == Decimal::ZERO && indicator == Indicator::Venda {
            return cfg.default_ticket;
        }
        total
    }

    pub fn unmapped_phases(&self) -> &BTreeSet<String> {
        &self.unmapped_phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::units::config_for;
    use crate::models::funnel::BusinessUnit;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_utc()
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

    #[test]
    fn reentrada_nao_conta_duas_vezes() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let movements = vec![
            movement("A", "Reunião Marcada", at(2026, 1, 10)),
            // no-show, remarcou: volta para a mesma etapa dez dias depois
            movement("A", "Reunião Remarcada", at(2026, 1, 20)),
        ];

        let index = FunnelIndex::build(&movements, &cfg);
        let entries: Vec<_> = index.entries(Indicator::Rm).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entered_at, at(2026, 1, 10));
    }

    #[test]
    fn primeira_entrada_usa_o_historico_completo() {
        // Card qualificou para RM no ano passado: visto neste ano, a
        // atribuição continua no ano passado, nunca reatribuída.
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let movements = vec![
            movement("B", "Reunião Marcada", at(2026, 2, 1)),
            movement("B", "Reunião Marcada", at(2025, 11, 3)),
        ];

        let index = FunnelIndex::build(&movements, &cfg);
        let first = index.first_entry("B", Indicator::Rm).unwrap();
        assert_eq!(first.entered_at, at(2025, 11, 3));
    }

    #[test]
    fn empate_de_timestamp_mantem_a_ordem_de_chegada() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let mut primeiro = movement("C", "Reunião Marcada", at(2026, 1, 5));
        primeiro.responsible = Some("rafael".to_string());
        let mut segundo = movement("C", "Reunião Remarcada", at(2026, 1, 5));
        segundo.responsible = Some("juliana".to_string());

        let index = FunnelIndex::build(&[primeiro, segundo], &cfg);
        let first = index.first_entry("C", Indicator::Rm).unwrap();
        assert_eq!(first.responsible.as_deref(), Some("rafael"));
    }

    #[test]
    fn quem_virou_mql_conta_retroativamente_como_lead() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let mut mql = movement("D", "MQL", at(2026, 1, 5));
        mql.revenue_tier = Some("Entre R$200 mil e R$350 mil".to_string());

        let index = FunnelIndex::build(&[mql], &cfg);

        let lead = index.first_entry("D", Indicator::Leads).unwrap();
        let mql_entry = index.first_entry("D", Indicator::Mql).unwrap();
        // Sem fase de lead separada, os dois timestamps são iguais.
        assert_eq!(lead.entered_at, mql_entry.entered_at);
    }

    #[test]
    fn lead_anterior_fica_com_o_timestamp_mais_antigo() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let lead = movement("E", "Novo Lead", at(2026, 1, 2));
        let mut mql = movement("E", "MQL", at(2026, 1, 8));
        mql.revenue_tier = Some("Acima de R$350 mil".to_string());

        let index = FunnelIndex::build(&[lead, mql], &cfg);

        let lead_entry = index.first_entry("E", Indicator::Leads).unwrap();
        let mql_entry = index.first_entry("E", Indicator::Mql).unwrap();
        assert_eq!(lead_entry.entered_at, at(2026, 1, 2));
        assert!(lead_entry.entered_at <= mql_entry.entered_at);
    }

    #[test]
    fn mql_abaixo_da_faixa_nao_gera_entrada_de_mql() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let mut mql = movement("F", "MQL", at(2026, 1, 5));
        mql.revenue_tier = Some("Até R$50 mil".to_string());

        let index = FunnelIndex::build(&[mql], &cfg);
        assert!(index.first_entry("F", Indicator::Mql).is_none());
        // Mas a fase ainda alimenta leads.
        assert!(index.first_entry("F", Indicator::Leads).is_some());
    }

    #[test]
    fn valor_do_card_usa_o_breakdown_mais_recente() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let mut antigo = movement("G", "Proposta Enviada", at(2026, 1, 10));
        antigo.amounts.recurring = Decimal::new(1_000, 0);
        let mut novo = movement("G", "Contrato Assinado", at(2026, 2, 1));
        novo.signed_at = NaiveDate::from_ymd_opt(2026, 2, 1);
        novo.amounts.recurring = Decimal::new(2_500, 0);
        novo.amounts.setup = Decimal::new(500, 0);

        let index = FunnelIndex::build(&[antigo, novo], &cfg);
        assert_eq!(
            index.card_value("G", Indicator::Venda, &cfg),
            Decimal::new(3_000, 0)
        );
    }

    #[test]
    fn venda_sem_valor_assume_ticket_padrao() {
        let cfg = config_for(BusinessUnit::O2Tax);
        let venda = movement("H", "Ganho", at(2026, 3, 10));

        let index = FunnelIndex::build(&[venda], &cfg);
        assert_eq!(
            index.card_value("H", Indicator::Venda, &cfg),
            cfg.default_ticket
        );
        // Para indicadores que não são venda, zero fica zero.
        assert_eq!(index.card_value("H", Indicator::Rm, &cfg), Decimal::ZERO);
    }

    #[test]
    fn fases_desconhecidas_sao_sinalizadas() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let movements = vec![movement("I", "Fase Recém Criada", at(2026, 1, 1))];

        let index = FunnelIndex::build(&movements, &cfg);
        assert!(index.unmapped_phases().contains("Fase Recém Criada"));
        assert!(index.entries(Indicator::Leads).next().is_none());
    }

    #[test]
    fn historico_vazio_gera_indice_vazio() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        let index = FunnelIndex::build(&[], &cfg);
        for indicator in Indicator::ALL {
            assert!(index.entries(indicator).next().is_none());
        }
    }
}
