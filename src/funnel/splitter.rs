// src/funnel/splitter.rs
//
// Divisão da meta da unidade entre closers. A parte pura: o clamp com
// complemento da dupla, o filtro por closers selecionados e o split
// padrão do reset. A persistência fica no repositório.

use rust_decimal::Decimal;

// Para unidades com dupla de closers: ajustar um lado sempre ajusta o
// outro. O clamp acontece antes do complemento, então a soma fecha em
// 100 em qualquer entrada.
pub fn balanced_pair(pct: Decimal) -> (Decimal, Decimal) {
    let clamped = clamp_pct(pct);
    (clamped, Decimal::ONE_HUNDRED - clamped)
}

pub fn clamp_pct(pct: Decimal) -> Decimal {
    pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

// Meta filtrada por closers selecionados: subconjunto estrito escala
// pela soma dos pesos; seleção vazia ou completa devolve a meta cheia.
pub fn filtered_goal(
    base_goal: Decimal,
    weights: &[(String, Decimal)],
    selected: &[String],
) -> Decimal {
    if selected.is_empty() || selected.len() >= weights.len() {
        return base_goal;
    }

    let selected_sum: Decimal = weights
        .iter()
        .filter(|(closer, _)| selected.contains(closer))
        .map(|(_, pct)| *pct)
        .sum();

    base_goal * selected_sum / Decimal::ONE_HUNDRED
}

// Split igualitário usado pelo reset (50/50 para a dupla).
pub fn default_split(closer_count: usize) -> Decimal {
    if closer_count == 0 {
        return Decimal::ZERO;
    }
    Decimal::ONE_HUNDRED / Decimal::from(closer_count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(closer: &str, pct: i64) -> (String, Decimal) {
        (closer.to_string(), Decimal::new(pct, 0))
    }

    #[test]
    fn a_dupla_sempre_soma_cem() {
        for pct in [0i64, 1, 37, 50, 99, 100] {
            let (a, b) = balanced_pair(Decimal::new(pct, 0));
            assert_eq!(a + b, Decimal::new(100, 0));
            assert_eq!(a, Decimal::new(pct, 0));
        }
    }

    #[test]
    fn fora_do_intervalo_e_clampado_antes_do_complemento() {
        let (a, b) = balanced_pair(Decimal::new(130, 0));
        assert_eq!(a, Decimal::new(100, 0));
        assert_eq!(b, Decimal::ZERO);

        let (a, b) = balanced_pair(Decimal::new(-15, 0));
        assert_eq!(a, Decimal::ZERO);
        assert_eq!(b, Decimal::new(100, 0));
    }

    #[test]
    fn subconjunto_estrito_escala_pela_soma_dos_pesos() {
        let weights = vec![w("rafael", 70), w("juliana", 30)];
        let base = Decimal::new(200_000, 0);

        let got = filtered_goal(base, &weights, &["rafael".to_string()]);
        assert_eq!(got, Decimal::new(140_000, 0));
    }

    #[test]
    fn selecao_vazia_ou_completa_devolve_a_meta_cheia() {
        let weights = vec![w("rafael", 70), w("juliana", 30)];
        let base = Decimal::new(200_000, 0);

        assert_eq!(filtered_goal(base, &weights, &[]), base);
        assert_eq!(
            filtered_goal(base, &weights, &["rafael".to_string(), "juliana".to_string()]),
            base
        );
    }

    #[test]
    fn split_padrao_do_reset() {
        assert_eq!(default_split(2), Decimal::new(50, 0));
        assert_eq!(default_split(0), Decimal::ZERO);
    }
}
