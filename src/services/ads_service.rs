// src/services/ads_service.rs
//
// Proxy da API de insights da Meta com cache em memória por
// (conta, período) e TTL fixo de uma hora. Entrada expirada é tratada
// como miss; não há thread de limpeza.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{common::error::AppError, models::ads::AdsInsights};

const CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const GRAPH_BASE: &str = "https://graph.facebook.com/v19.0";

type CacheKey = (String, NaiveDate, NaiveDate);

#[derive(Clone)]
pub struct AdsService {
    client: reqwest::Client,
    access_token: String,
    cache: Arc<Mutex<HashMap<CacheKey, (Instant, AdsInsights)>>>,
}

// Shape cru da resposta do endpoint /insights.
#[derive(Debug, Deserialize)]
struct GraphInsightsResponse {
    data: Vec<GraphInsightsRow>,
}

#[derive(Debug, Deserialize)]
struct GraphInsightsRow {
    #[serde(default)]
    spend: Option<String>,
    #[serde(default)]
    impressions: Option<String>,
    #[serde(default)]
    clicks: Option<String>,
    #[serde(default)]
    actions: Option<Vec<GraphAction>>,
}

#[derive(Debug, Deserialize)]
struct GraphAction {
    action_type: String,
    value: String,
}

impl AdsService {
    pub fn new(client: reqwest::Client, access_token: String) -> Self {
        Self {
            client,
            access_token,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn insights(
        &self,
        account_id: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<AdsInsights, AppError> {
        let key = (account_id.to_string(), since, until);

        {
            let cache = self.cache.lock().await;
            if let Some((stored_at, insights)) = cache.get(&key) {
                if stored_at.elapsed() < CACHE_TTL {
                    return Ok(insights.clone());
                }
            }
        }

        let insights = self.fetch(account_id, since, until).await?;

        let mut cache = self.cache.lock().await;
        cache.insert(key, (Instant::now(), insights.clone()));

        Ok(insights)
    }

    async fn fetch(
        &self,
        account_id: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<AdsInsights, AppError> {
        let url = format!("{GRAPH_BASE}/act_{account_id}/insights");
        let time_range = format!(
            r#"{{"since":"{}","until":"{}"}}"#,
            since.format("%Y-%m-%d"),
            until.format("%Y-%m-%d")
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", "spend,impressions,clicks,actions"),
                ("time_range", time_range.as_str()),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: GraphInsightsResponse = response.json().await?;
        let row = body.data.into_iter().next();

        Ok(assemble_insights(account_id, since, until, row))
    }
}

fn assemble_insights(
    account_id: &str,
    since: NaiveDate,
    until: NaiveDate,
    row: Option<GraphInsightsRow>,
) -> AdsInsights {
    let row = row.unwrap_or(GraphInsightsRow {
        spend: None,
        impressions: None,
        clicks: None,
        actions: None,
    });

    // A Graph API devolve números como string.
    let leads: u64 = row
        .actions
        .unwrap_or_default()
        .iter()
        .filter(|a| a.action_type == "lead")
        .filter_map(|a| a.value.parse::<u64>().ok())
        .sum();

    AdsInsights {
        account_id: account_id.to_string(),
        since,
        until,
        spend: row.spend.and_then(|s| s.parse().ok()).unwrap_or(0.0),
        impressions: row.impressions.and_then(|s| s.parse().ok()).unwrap_or(0),
        clicks: row.clicks.and_then(|s| s.parse().ok()).unwrap_or(0),
        leads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monta_insights_a_partir_da_resposta_crua() {
        let row = GraphInsightsRow {
            spend: Some("1530.75".to_string()),
            impressions: Some("120000".to_string()),
            clicks: Some("3400".to_string()),
            actions: Some(vec![
                GraphAction { action_type: "lead".to_string(), value: "87".to_string() },
                GraphAction { action_type: "link_click".to_string(), value: "900".to_string() },
            ]),
        };

        let got = assemble_insights("123", date(2026, 1, 1), date(2026, 1, 31), Some(row));
        assert_eq!(got.spend, 1530.75);
        assert_eq!(got.impressions, 120_000);
        assert_eq!(got.leads, 87);
    }

    #[test]
    fn resposta_vazia_vira_zeros() {
        let got = assemble_insights("123", date(2026, 1, 1), date(2026, 1, 31), None);
        assert_eq!(got.spend, 0.0);
        assert_eq!(got.clicks, 0);
        assert_eq!(got.leads, 0);
    }
}
