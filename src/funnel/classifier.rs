// src/funnel/classifier.rs

use chrono::NaiveDate;

use crate::funnel::units::SourceConfig;
use crate::models::funnel::Indicator;

// Classifica uma passagem de fase nos indicadores que ela alimenta.
//
// Fase sem mapeamento retorna vazio: o movimento é ignorado pelo funil,
// mas continua visível no drill-down de cards. Regras adicionais:
// - MQL passa pelo gate de faixa de faturamento da unidade;
// - Venda pode exigir data de assinatura (cfg.requires_signature).
pub fn classify(
    phase: &str,
    revenue_tier: Option<&str>,
    signed_at: Option<NaiveDate>,
    cfg: &SourceConfig,
) -> Vec<Indicator> {
    let Some(mapped) = cfg.indicators_for_phase(phase) else {
        return Vec::new();
    };

    mapped
        .iter()
        .copied()
        .filter(|indicator| match indicator {
            Indicator::Mql => cfg.tier_qualifies(revenue_tier),
            Indicator::Venda => !cfg.requires_signature || signed_at.is_some(),
            _ => true,
        })
        .collect()
}

// Rótulo de indicador para listagens: o primeiro indicador mapeado da
// fase, sem aplicar os gates (um MQL abaixo da faixa ainda é exibido
// na etapa em que está).
pub fn label(phase: &str, cfg: &SourceConfig) -> Option<Indicator> {
    cfg.indicators_for_phase(phase)
        .and_then(|inds| inds.last().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::units::config_for;
    use crate::models::funnel::BusinessUnit;

    #[test]
    fn fase_sem_mapeamento_e_ignorada() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        assert!(classify("Fase Nova Do CRM", None, None, &cfg).is_empty());
    }

    #[test]
    fn mql_abaixo_da_faixa_vira_so_lead() {
        let cfg = config_for(BusinessUnit::ModeloAtual);

        let abaixo = classify("MQL", Some("Até R$50 mil"), None, &cfg);
        assert_eq!(abaixo, vec![Indicator::Leads]);

        let qualificado = classify("MQL", Some("Entre R$200 mil e R$350 mil"), None, &cfg);
        assert_eq!(qualificado, vec![Indicator::Leads, Indicator::Mql]);
    }

    #[test]
    fn venda_sem_assinatura_e_descartada_quando_exigida() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        assert!(classify("Contrato Assinado", None, None, &cfg).is_empty());

        let assinada = classify(
            "Contrato Assinado",
            None,
            NaiveDate::from_ymd_opt(2026, 3, 14),
            &cfg,
        );
        assert_eq!(assinada, vec![Indicator::Venda]);

        // O2-TAX não exige assinatura: "Ganho" basta.
        let o2 = config_for(BusinessUnit::O2Tax);
        assert_eq!(classify("Ganho", None, None, &o2), vec![Indicator::Venda]);
    }

    #[test]
    fn rotulo_usa_o_indicador_mais_profundo_da_fase() {
        let cfg = config_for(BusinessUnit::ModeloAtual);
        assert_eq!(label("MQL", &cfg), Some(Indicator::Mql));
        assert_eq!(label("Reunião Marcada", &cfg), Some(Indicator::Rm));
        assert_eq!(label("Fase Nova Do CRM", &cfg), None);
    }
}
