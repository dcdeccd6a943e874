//! Response types for potion-daemon HTTP endpoints.
//!
//! `Serialize + Deserialize` so tests can decode them. No logic here.

use serde::{Deserialize, Serialize};

use potion_reconcile::{ComparisonRow, SummaryReport, UnloggedDrainRow};
use potion_schemas::AuditSummary;

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// /v1/audit/*
// ---------------------------------------------------------------------------

/// Optional `?date=YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Upstream counters, unchanged.
    pub summary: AuditSummary,
    pub consistency: SummaryReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub date: String,
    pub rows: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnloggedResponse {
    pub date: String,
    pub rows: Vec<UnloggedDrainRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatesResponse {
    pub dates: Vec<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
