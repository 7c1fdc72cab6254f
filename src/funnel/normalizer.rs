// src/funnel/normalizer.rs
//
// Normaliza linhas heterogêneas de planilha (chave-valor, cabeçalhos em
// português e variáveis por fonte) no shape canônico `Movement`. As
// linhas do espelho do CRM já chegam tipadas do sqlx e convertem via
// From<MovementRow>; aqui é só o caminho da planilha.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::models::funnel::{MonetaryBreakdown, Movement};

const CARD_ID_KEYS: &[&str] = &["ID do Card", "Card", "ID"];
const PHASE_KEYS: &[&str] = &["Fase", "Etapa"];
const ENTERED_KEYS: &[&str] = &["Entrada", "Data de Entrada"];
const EXITED_KEYS: &[&str] = &["Saída", "Data de Saída"];
const MRR_KEYS: &[&str] = &["Valor MRR", "MRR"];
const SETUP_KEYS: &[&str] = &["Valor Setup", "Setup"];
const ONE_TIME_KEYS: &[&str] = &["Valor Pontual", "Pontual"];
const EDUCATION_KEYS: &[&str] = &["Valor Educação", "Educação"];
const TIER_KEYS: &[&str] = &["Faixa de Faturamento", "Faturamento Mensal"];
const SIGNED_KEYS: &[&str] = &["Data de Assinatura", "Assinatura"];
const LOSS_KEYS: &[&str] = &["Motivo de Perda", "Motivo da Perda"];
const RESPONSIBLE_KEYS: &[&str] = &["Responsável"];
const OWNER_KEYS: &[&str] = &["Dono", "Criado por"];

// Converte as linhas cruas; descarta (com warn) o que não tem card ou
// data de entrada legível. Campos monetários ausentes viram zero.
pub fn normalize_rows(rows: &[Value]) -> Vec<Movement> {
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(obj) = row.as_object() else {
            tracing::warn!("Linha de planilha não é um objeto, ignorada");
            continue;
        };

        let card_id = match first_string(obj, CARD_ID_KEYS) {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => {
                tracing::warn!("Linha de planilha sem ID de card, ignorada");
                continue;
            }
        };

        let phase = first_string(obj, PHASE_KEYS).unwrap_or_default();

        let entered_at = match first_string(obj, ENTERED_KEYS).as_deref().and_then(parse_timestamp) {
            Some(ts) => ts,
            None => {
                tracing::warn!(card = %card_id, "Linha sem data de entrada legível, ignorada");
                continue;
            }
        };

        let exited_at = first_string(obj, EXITED_KEYS)
            .as_deref()
            .and_then(parse_timestamp);

        let amounts = MonetaryBreakdown {
            recurring: first_money(obj, MRR_KEYS),
            setup: first_money(obj, SETUP_KEYS),
            one_time: first_money(obj, ONE_TIME_KEYS),
            education: first_money(obj, EDUCATION_KEYS),
        };

        out.push(Movement {
            card_id,
            phase,
            entered_at,
            exited_at,
            amounts,
            revenue_tier: first_string(obj, TIER_KEYS),
            signed_at: first_string(obj, SIGNED_KEYS).as_deref().and_then(parse_date),
            loss_reason: first_string(obj, LOSS_KEYS),
            responsible: first_string(obj, RESPONSIBLE_KEYS),
            owner: first_string(obj, OWNER_KEYS),
        });
    }

    out
}

fn first_string(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn first_money(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Decimal {
    for key in keys {
        match obj.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_f64().and_then(|f| Decimal::try_from(f).ok()) {
                    return v;
                }
            }
            Some(Value::String(s)) => {
                if let Some(v) = parse_money_br(s) {
                    return v;
                }
            }
            _ => {}
        }
    }
    Decimal::ZERO
}

// "R$ 12.345,67" -> 12345.67. Também aceita o formato já normalizado.
fn parse_money_br(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace("R$", "").replace(' ', "").replace('\u{a0}', "");
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.contains(',') {
        let normalized = cleaned.replace('.', "").replace(',', ".");
        return Decimal::from_str(&normalized).ok();
    }
    Decimal::from_str(&cleaned).ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    // Só a data: assume meia-noite.
    parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|n| n.and_utc())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normaliza_linha_com_cabecalhos_padrao() {
        let rows = vec![json!({
            "ID do Card": "783412",
            "Fase": "Reunião Marcada",
            "Entrada": "2026-01-10 14:30:00",
            "Saída": "2026-01-12 09:00:00",
            "Valor MRR": "R$ 3.500,00",
            "Faixa de Faturamento": "Entre R$200 mil e R$350 mil",
            "Responsável": "rafael"
        })];

        let movements = normalize_rows(&rows);
        assert_eq!(movements.len(), 1);
        let m = &movements[0];
        assert_eq!(m.card_id, "783412");
        assert_eq!(m.phase, "Reunião Marcada");
        assert_eq!(m.amounts.recurring, Decimal::new(3_500, 0));
        assert!(m.exited_at.is_some());
        assert_eq!(m.revenue_tier.as_deref(), Some("Entre R$200 mil e R$350 mil"));
    }

    #[test]
    fn aceita_cabecalhos_alternativos_e_data_br() {
        let rows = vec![json!({
            "Card": 99120,
            "Etapa": "Proposta Enviada",
            "Data de Entrada": "05/02/2026",
            "Pontual": 1500.5
        })];

        let movements = normalize_rows(&rows);
        assert_eq!(movements.len(), 1);
        let m = &movements[0];
        assert_eq!(m.card_id, "99120");
        assert_eq!(m.entered_at.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 5).unwrap());
        assert_eq!(m.amounts.one_time, Decimal::from_str("1500.5").unwrap());
        // Componentes ausentes ficam zerados, nunca None.
        assert_eq!(m.amounts.recurring, Decimal::ZERO);
    }

    #[test]
    fn descarta_linha_sem_card_ou_sem_entrada() {
        let rows = vec![
            json!({ "Fase": "MQL", "Entrada": "2026-01-01 00:00:00" }),
            json!({ "ID": "123", "Fase": "MQL", "Entrada": "sem data" }),
            json!("nem é objeto"),
        ];
        assert!(normalize_rows(&rows).is_empty());
    }
}
