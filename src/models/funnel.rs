// src/models/funnel.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// As unidades de negócio atendidas pelo painel. Cada uma vira uma
// configuração de fonte (ver funnel::units), nunca um fork de código.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessUnit {
    ModeloAtual,
    O2Tax,
    Educacao,
    Bpo,
}

impl BusinessUnit {
    pub const ALL: [BusinessUnit; 4] = [
        BusinessUnit::ModeloAtual,
        BusinessUnit::O2Tax,
        BusinessUnit::Educacao,
        BusinessUnit::Bpo,
    ];

    // Forma canônica usada como chave no banco (coluna business_unit).
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessUnit::ModeloAtual => "modelo-atual",
            BusinessUnit::O2Tax => "o2-tax",
            BusinessUnit::Educacao => "educacao",
            BusinessUnit::Bpo => "bpo",
        }
    }
}

// Indicadores do funil, na ordem do próprio funil.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Leads,
    Mql,
    Rm,
    Rr,
    Proposta,
    Venda,
}

impl Indicator {
    pub const ALL: [Indicator; 6] = [
        Indicator::Leads,
        Indicator::Mql,
        Indicator::Rm,
        Indicator::Rr,
        Indicator::Proposta,
        Indicator::Venda,
    ];
}

// Componentes monetários de um card. Zerado quando a fonte não informa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryBreakdown {
    pub recurring: Decimal,
    pub setup: Decimal,
    pub one_time: Decimal,
    pub education: Decimal,
}

impl MonetaryBreakdown {
    pub fn total(&self) -> Decimal {
        self.recurring + self.setup + self.one_time + self.education
    }
}

// Um registro de passagem de fase de um card do CRM. Somente leitura:
// a fonte (espelho do Pipefy ou planilha) é a autoridade.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub card_id: String,
    pub phase: String,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub amounts: MonetaryBreakdown,
    pub revenue_tier: Option<String>,
    pub signed_at: Option<NaiveDate>,
    pub loss_reason: Option<String>,
    pub responsible: Option<String>,
    pub owner: Option<String>,
}

// Linha crua do espelho do CRM no Postgres (tabela card_phase_history).
#[derive(Debug, Clone, FromRow)]
pub struct MovementRow {
    pub card_id: String,
    pub phase: String,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub mrr: Option<Decimal>,
    pub setup: Option<Decimal>,
    pub pontual: Option<Decimal>,
    pub educacao: Option<Decimal>,
    pub revenue_tier: Option<String>,
    pub signed_at: Option<NaiveDate>,
    pub loss_reason: Option<String>,
    pub responsible: Option<String>,
    pub owner: Option<String>,
}

impl From<MovementRow> for Movement {
    fn from(row: MovementRow) -> Self {
        Movement {
            card_id: row.card_id,
            phase: row.phase,
            entered_at: row.entered_at,
            exited_at: row.exited_at,
            amounts: MonetaryBreakdown {
                recurring: row.mrr.unwrap_or(Decimal::ZERO),
                setup: row.setup.unwrap_or(Decimal::ZERO),
                one_time: row.pontual.unwrap_or(Decimal::ZERO),
                education: row.educacao.unwrap_or(Decimal::ZERO),
            },
            revenue_tier: row.revenue_tier,
            signed_at: row.signed_at,
            loss_reason: row.loss_reason,
            responsible: row.responsible,
            owner: row.owner,
        }
    }
}

// Agrupamento temporal da série do funil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    Daily,
    Weekly,
    Monthly,
}

// 1. Resumo do funil (os cards do topo do painel)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub indicator: Indicator,
    pub count: u64,
    pub value: Decimal,
    pub goal: Decimal,
    pub goal_source: crate::models::goal::GoalSource,
    // Percentual de atingimento (atual / meta * 100); None quando não há meta.
    pub attainment_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelSummary {
    pub business_unit: BusinessUnit,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub indicators: Vec<IndicatorSummary>,
}

// 2. Série temporal de um indicador
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeriesBucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: u64,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelSeries {
    pub business_unit: BusinessUnit,
    pub indicator: Indicator,
    pub grouping: Grouping,
    pub buckets: Vec<SeriesBucket>,
}

// 3. Drill-down: listagem de cards, inclusive fases sem mapeamento
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardListing {
    pub card_id: String,
    pub phase: String,
    // None = fase sem mapeamento no funil (visível só aqui).
    pub indicator: Option<Indicator>,
    pub entered_at: DateTime<Utc>,
    pub amounts: MonetaryBreakdown,
    pub revenue_tier: Option<String>,
    pub loss_reason: Option<String>,
    pub responsible: Option<String>,
    pub owner: Option<String>,
}

// Prévia de planilha: o operador sobe as linhas cruas exportadas da
// planilha da unidade e vê o funil que elas produzem, antes de o
// espelho sincronizar.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetPreviewPayload {
    pub rows: Vec<serde_json::Value>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTotals {
    pub indicator: Indicator,
    pub count: u64,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetPreview {
    pub business_unit: BusinessUnit,
    pub normalized_rows: usize,
    pub discarded_rows: usize,
    pub unmapped_phases: Vec<String>,
    pub totals: Vec<PreviewTotals>,
}

// Parâmetros de consulta comuns das rotas do funil
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    // Filtro opcional de closers (separados por vírgula).
    pub closers: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SeriesQuery {
    pub indicator: Indicator,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub grouping: Grouping,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CardsQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub indicator: Option<Indicator>,
}
