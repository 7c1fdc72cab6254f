// src/services/closer_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::CloserRepository,
    funnel::{splitter, units},
    models::{closer::CloserWeight, funnel::BusinessUnit},
};

#[derive(Clone)]
pub struct CloserService {
    repo: CloserRepository,
}

impl CloserService {
    pub fn new(repo: CloserRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, unit: BusinessUnit, year: i32) -> Result<Vec<CloserWeight>, AppError> {
        self.repo.list_by_unit_year(unit, year).await
    }

    // Edita o peso de um closer. Em unidade com dupla, o parceiro
    // recebe o complemento na mesma operação: os dois lados nunca
    // divergem de somar 100.
    pub async fn set_weight(
        &self,
        unit: BusinessUnit,
        month: i32,
        year: i32,
        closer: &str,
        pct: Decimal,
    ) -> Result<Vec<CloserWeight>, AppError> {
        let cfg = units::config_for(unit);

        if !cfg.closers.contains(&closer) {
            let mut details = std::collections::HashMap::new();
            details.insert("closer".to_string(), "unknown_closer".to_string());
            return Err(AppError::RuleViolation(details));
        }

        if cfg.closers.len() == 2 {
            let partner = cfg
                .closers
                .iter()
                .copied()
                .find(|c| *c != closer)
                .expect("dupla tem dois closers");
            let (own, complement) = splitter::balanced_pair(pct);
            self.repo
                .set_pair(unit, month, year, [(closer, own), (partner, complement)])
                .await?;
        } else {
            self.repo
                .set_single(unit, month, year, closer, splitter::clamp_pct(pct))
                .await?;
        }

        self.repo.get_month(unit, month, year).await
    }

    // Volta todos os meses do ano para o split igualitário, em uma
    // escrita em lote só.
    pub async fn reset(&self, unit: BusinessUnit, year: i32) -> Result<Vec<CloserWeight>, AppError> {
        let cfg = units::config_for(unit);
        let pct = splitter::default_split(cfg.closers.len());

        self.repo.reset_year(unit, year, cfg.closers, pct).await?;
        self.repo.list_by_unit_year(unit, year).await
    }
}
