use potion_schemas::{AuditData, Cauldron, Market, OptimizationPlan};

use crate::{AuditSource, FetchError};

/// In-memory source. Accessors without a value report
/// [`FetchError::Unavailable`], which exercises the same degradation paths
/// as a dead upstream.
#[derive(Debug, Clone, Default)]
pub struct StaticAuditSource {
    audit: Option<AuditData>,
    cauldrons: Option<Vec<Cauldron>>,
    market: Option<Market>,
    plan: Option<OptimizationPlan>,
}

impl StaticAuditSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audit(mut self, audit: AuditData) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_cauldrons(mut self, cauldrons: Vec<Cauldron>) -> Self {
        self.cauldrons = Some(cauldrons);
        self
    }

    pub fn with_market(mut self, market: Market) -> Self {
        self.market = Some(market);
        self
    }

    pub fn with_plan(mut self, plan: OptimizationPlan) -> Self {
        self.plan = Some(plan);
        self
    }
}

fn present<T: Clone>(v: &Option<T>, what: &str) -> Result<T, FetchError> {
    v.clone()
        .ok_or_else(|| FetchError::Unavailable(what.to_string()))
}

#[async_trait::async_trait]
impl AuditSource for StaticAuditSource {
    fn source_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_audit_data(&self) -> Result<AuditData, FetchError> {
        present(&self.audit, "audit data")
    }

    async fn fetch_cauldrons(&self) -> Result<Vec<Cauldron>, FetchError> {
        present(&self.cauldrons, "cauldron list")
    }

    async fn fetch_market(&self) -> Result<Market, FetchError> {
        present(&self.market, "market")
    }

    async fn fetch_optimization_plan(&self) -> Result<OptimizationPlan, FetchError> {
        present(&self.plan, "optimization plan")
    }
}
