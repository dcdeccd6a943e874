use std::time::Duration;

use potion_schemas::{AuditData, Cauldron, Market, OptimizationPlan};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::{AuditSource, FetchError};

pub const AUDIT_RUN_PATH: &str = "/api/audit/run";
pub const OPTIMIZATION_RUN_PATH: &str = "/api/optimization/run";
pub const CAULDRONS_PATH: &str = "/api/Information/cauldrons";
pub const MARKET_PATH: &str = "/api/Information/market";

/// reqwest-backed source talking to the audit service and the information
/// service. Each call is one GET; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct HttpAuditSource {
    http: reqwest::Client,
    audit_base_url: String,
    info_base_url: String,
}

impl HttpAuditSource {
    pub fn new(
        audit_base_url: impl Into<String>,
        info_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self::with_client(http, audit_base_url, info_base_url))
    }

    pub fn with_client(
        http: reqwest::Client,
        audit_base_url: impl Into<String>,
        info_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            audit_base_url: audit_base_url.into(),
            info_base_url: info_base_url.into(),
        }
    }

    fn audit_url(&self, path: &str) -> String {
        format!("{}{}", self.audit_base_url.trim_end_matches('/'), path)
    }

    fn info_url(&self, path: &str) -> String {
        format!("{}{}", self.info_base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        tracing::debug!(%url, "upstream GET");

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| FetchError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl AuditSource for HttpAuditSource {
    fn source_name(&self) -> &'static str {
        "http"
    }

    async fn fetch_audit_data(&self) -> Result<AuditData, FetchError> {
        self.get_json(self.audit_url(AUDIT_RUN_PATH)).await
    }

    async fn fetch_cauldrons(&self) -> Result<Vec<Cauldron>, FetchError> {
        self.get_json(self.info_url(CAULDRONS_PATH)).await
    }

    async fn fetch_market(&self) -> Result<Market, FetchError> {
        self.get_json(self.info_url(MARKET_PATH)).await
    }

    async fn fetch_optimization_plan(&self) -> Result<OptimizationPlan, FetchError> {
        self.get_json(self.audit_url(OPTIMIZATION_RUN_PATH)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slash() {
        let src = HttpAuditSource::with_client(
            reqwest::Client::new(),
            "http://localhost:8000/",
            "https://info.example",
        );
        assert_eq!(
            src.audit_url(AUDIT_RUN_PATH),
            "http://localhost:8000/api/audit/run"
        );
        assert_eq!(
            src.info_url(CAULDRONS_PATH),
            "https://info.example/api/Information/cauldrons"
        );
    }
}
