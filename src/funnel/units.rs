// src/funnel/units.rs
//
// Uma unidade de negócio = uma configuração de fonte. O motor é um só;
// o que muda entre as unidades é o vocabulário de fases do CRM, o gate
// de faixa de faturamento do MQL, o ticket padrão e a dupla de closers.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::funnel::{BusinessUnit, Indicator};

// Faixas de faturamento declarado que qualificam um MQL. Abaixo disso a
// fase de MQL conta apenas como lead.
pub const QUALIFYING_TIERS: &[&str] = &[
    "Entre R$100 mil e R$200 mil",
    "Entre R$200 mil e R$350 mil",
    "Acima de R$350 mil",
];

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub unit: BusinessUnit,
    // Fase exata do CRM -> indicadores que ela alimenta. A fase de MQL
    // aparece também em Leads: quem virou MQL conta retroativamente
    // como lead, senão subcontamos leads pré-qualificados.
    pub phase_map: HashMap<&'static str, &'static [Indicator]>,
    pub qualifying_tiers: &'static [&'static str],
    // Se false, toda fase de MQL qualifica independente da faixa.
    pub has_revenue_tier_gate: bool,
    // Venda só conta com data de assinatura preenchida.
    pub requires_signature: bool,
    // Unidade de ticket único: metas monetárias caem 100% em "pontual".
    pub single_ticket_only: bool,
    // Valor assumido para uma venda sem componentes monetários informados.
    pub default_ticket: Decimal,
    pub closers: &'static [&'static str],
}

impl SourceConfig {
    pub fn indicators_for_phase(&self, phase: &str) -> Option<&'static [Indicator]> {
        self.phase_map.get(phase).copied()
    }

    pub fn tier_qualifies(&self, tier: Option<&str>) -> bool {
        if !self.has_revenue_tier_gate {
            return true;
        }
        match tier {
            Some(t) => self.qualifying_tiers.contains(&t),
            None => false,
        }
    }
}

const LEADS: &[Indicator] = &[Indicator::Leads];
const LEADS_MQL: &[Indicator] = &[Indicator::Leads, Indicator::Mql];
const RM: &[Indicator] = &[Indicator::Rm];
const RR: &[Indicator] = &[Indicator::Rr];
const PROPOSTA: &[Indicator] = &[Indicator::Proposta];
const VENDA: &[Indicator] = &[Indicator::Venda];

pub fn config_for(unit: BusinessUnit) -> SourceConfig {
    match unit {
        BusinessUnit::ModeloAtual => SourceConfig {
            unit,
            phase_map: HashMap::from([
                ("Novo Lead", LEADS),
                ("MQL", LEADS_MQL),
                ("Reunião Marcada", RM),
                ("Reunião Remarcada", RM),
                ("Reunião Realizada", RR),
                ("Proposta Enviada", PROPOSTA),
                ("Contrato Assinado", VENDA),
            ]),
            qualifying_tiers: QUALIFYING_TIERS,
            has_revenue_tier_gate: true,
            requires_signature: true,
            single_ticket_only: false,
            default_ticket: Decimal::new(4_500, 0),
            closers: &["rafael", "juliana"],
        },
        BusinessUnit::O2Tax => SourceConfig {
            unit,
            phase_map: HashMap::from([
                ("Base", LEADS),
                ("Triagem MQL", LEADS_MQL),
                ("Reunião Agendada", RM),
                ("Reunião Feita", RR),
                ("Proposta", PROPOSTA),
                ("Ganho", VENDA),
            ]),
            qualifying_tiers: QUALIFYING_TIERS,
            has_revenue_tier_gate: true,
            requires_signature: false,
            single_ticket_only: false,
            default_ticket: Decimal::new(12_000, 0),
            closers: &["marcos", "carla"],
        },
        BusinessUnit::Educacao => SourceConfig {
            unit,
            phase_map: HashMap::from([
                ("Inscrição", LEADS),
                ("MQL", LEADS_MQL),
                ("Agendamento", RM),
                ("Call Realizada", RR),
                ("Proposta Enviada", PROPOSTA),
                ("Matrícula", VENDA),
            ]),
            qualifying_tiers: QUALIFYING_TIERS,
            has_revenue_tier_gate: false,
            requires_signature: false,
            single_ticket_only: false,
            default_ticket: Decimal::new(1_800, 0),
            closers: &["paula"],
        },
        BusinessUnit::Bpo => SourceConfig {
            unit,
            phase_map: HashMap::from([
                ("Novo Lead", LEADS),
                ("MQL", LEADS_MQL),
                ("Reunião Marcada", RM),
                ("Reunião Realizada", RR),
                ("Proposta Enviada", PROPOSTA),
                ("Fechamento", VENDA),
            ]),
            qualifying_tiers: QUALIFYING_TIERS,
            has_revenue_tier_gate: true,
            requires_signature: false,
            single_ticket_only: true,
            default_ticket: Decimal::new(2_500, 0),
            closers: &["diego"],
        },
    }
}

// Checagem de carga: toda unidade precisa cobrir todos os indicadores.
// Se o vocabulário do CRM mudar e deixar um buraco, o servidor não sobe.
pub fn validate_configs() -> Result<(), String> {
    for unit in BusinessUnit::ALL {
        let cfg = config_for(unit);
        for indicator in Indicator::ALL {
            let covered = cfg
                .phase_map
                .values()
                .any(|inds| inds.contains(&indicator));
            if !covered {
                return Err(format!(
                    "Unidade {} não mapeia nenhuma fase para o indicador {:?}",
                    unit.as_str(),
                    indicator
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todas_as_unidades_cobrem_todos_os_indicadores() {
        assert!(validate_configs().is_ok());
    }

    #[test]
    fn fase_de_mql_tambem_alimenta_leads() {
        for unit in BusinessUnit::ALL {
            let cfg = config_for(unit);
            let mql_phases: Vec<_> = cfg
                .phase_map
                .iter()
                .filter(|(_, inds)| inds.contains(&Indicator::Mql))
                .collect();
            assert!(!mql_phases.is_empty());
            for (_, inds) in mql_phases {
                assert!(inds.contains(&Indicator::Leads));
            }
        }
    }

    #[test]
    fn gate_de_faixa_respeita_allow_list() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        assert!(cfg.tier_qualifies(Some("Entre R$200 mil e R$350 mil")));
        assert!(!cfg.tier_qualifies(Some("Até R$50 mil")));
        assert!(!cfg.tier_qualifies(None));

        // Educação não tem gate: qualquer faixa (ou nenhuma) qualifica.
        let edu = config_for(BusinessUnit::Educacao);
        assert!(edu.tier_qualifies(None));
        assert!(edu.tier_qualifies(Some("Até R$50 mil")));
    }
}
