//! potion-source
//!
//! Retrieval boundary for the audit dashboard.
//!
//! - [`AuditSource`] is the pluggable accessor set the surfaces depend on.
//! - [`HttpAuditSource`] talks to the live audit and information services.
//! - [`StaticAuditSource`] serves fixed values (offline CLI input, tests).
//!
//! Audit data is mandatory: failures propagate. Reference data (cauldrons,
//! market) degrades to empty/none with a `warn` so reconciliation still runs.

mod error;
mod fixed;
mod http;

pub use error::{FetchError, AUDIT_SERVICE_HINT};
pub use fixed::StaticAuditSource;
pub use http::{
    HttpAuditSource, AUDIT_RUN_PATH, CAULDRONS_PATH, MARKET_PATH, OPTIMIZATION_RUN_PATH,
};

use potion_schemas::{AuditData, Cauldron, Market, OptimizationPlan};

/// Pluggable record source.
#[async_trait::async_trait]
pub trait AuditSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_audit_data(&self) -> Result<AuditData, FetchError>;

    async fn fetch_cauldrons(&self) -> Result<Vec<Cauldron>, FetchError>;

    async fn fetch_market(&self) -> Result<Market, FetchError>;

    async fn fetch_optimization_plan(&self) -> Result<OptimizationPlan, FetchError>;

    /// Cauldron list, or empty when the information service is down.
    async fn cauldrons_or_empty(&self) -> Vec<Cauldron> {
        match self.fetch_cauldrons().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(
                    source = self.source_name(),
                    error = %e,
                    "cauldron list unavailable; rows keyed by raw id"
                );
                Vec::new()
            }
        }
    }

    async fn market_or_none(&self) -> Option<Market> {
        match self.fetch_market().await {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(source = self.source_name(), error = %e, "market unavailable");
                None
            }
        }
    }
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone)]
pub struct DashboardInputs {
    pub audit: AuditData,
    pub cauldrons: Vec<Cauldron>,
    pub market: Option<Market>,
}

/// Fetch audit data, cauldrons and market concurrently.
///
/// Only the audit fetch can fail the load; the reference fetches degrade.
pub async fn load_dashboard(source: &dyn AuditSource) -> Result<DashboardInputs, FetchError> {
    let (audit, cauldrons, market) = tokio::join!(
        source.fetch_audit_data(),
        source.cauldrons_or_empty(),
        source.market_or_none(),
    );

    Ok(DashboardInputs {
        audit: audit?,
        cauldrons,
        market,
    })
}
