//! Axum router and all HTTP handlers for potion-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Every audit route fetches fresh upstream data, runs the
//! pure reconciliation step and returns JSON.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use potion_reconcile::{
    activity_dates, check_summary, compare_for_date, summary_for_display, unlogged_for_date,
};
use potion_schemas::{AuditData, AuditDate};
use potion_source::{FetchError, AUDIT_SERVICE_HINT};
use tracing::{info, warn};

use crate::{
    api_types::{
        ComparisonResponse, DateQuery, DatesResponse, ErrorResponse, HealthResponse,
        SummaryResponse, UnloggedResponse,
    },
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/audit/summary", get(audit_summary))
        .route("/v1/audit/comparison", get(audit_comparison))
        .route("/v1/audit/unlogged", get(audit_unlogged))
        .route("/v1/audit/dates", get(audit_dates))
        .route("/v1/cauldrons", get(cauldrons))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Handler failure mapped onto an HTTP status.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// Audit service unreachable or answered badly.
    Upstream(FetchError),
    /// Unparseable `date` query.
    BadDate(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upstream(e) => {
                warn!(error = %e, "audit fetch failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse {
                        error: e.to_string(),
                        hint: Some(AUDIT_SERVICE_HINT.to_string()),
                    }),
                )
                    .into_response()
            }
            ApiError::BadDate(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: msg,
                    hint: None,
                }),
            )
                .into_response(),
        }
    }
}

fn resolve_date(st: &AppState, q: &DateQuery) -> Result<AuditDate, ApiError> {
    match q.date.as_deref() {
        Some(raw) => AuditDate::parse(raw).map_err(|e| ApiError::BadDate(e.to_string())),
        None => Ok(AuditDate::today_in(st.timezone)),
    }
}

async fn fetch_audit(st: &AppState) -> Result<AuditData, ApiError> {
    st.source.fetch_audit_data().await.map_err(ApiError::Upstream)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/audit/summary
// ---------------------------------------------------------------------------

pub(crate) async fn audit_summary(
    State(st): State<Arc<AppState>>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let data = fetch_audit(&st).await?;
    let consistency = check_summary(&data);
    if !consistency.is_consistent() {
        info!(
            findings = consistency.findings.len(),
            "upstream summary drifts from record lists"
        );
    }

    Ok(Json(SummaryResponse {
        summary: summary_for_display(&data).clone(),
        consistency,
    }))
}

// ---------------------------------------------------------------------------
// GET /v1/audit/comparison?date=YYYY-MM-DD
// ---------------------------------------------------------------------------

pub(crate) async fn audit_comparison(
    State(st): State<Arc<AppState>>,
    Query(q): Query<DateQuery>,
) -> Result<Json<ComparisonResponse>, ApiError> {
    let date = resolve_date(&st, &q)?;
    let (data, cauldrons) = tokio::join!(fetch_audit(&st), st.source.cauldrons_or_empty());
    let rows = compare_for_date(&data?, &cauldrons, &date);

    info!(date = %date, rows = rows.len(), "comparison served");
    Ok(Json(ComparisonResponse {
        date: date.to_string(),
        rows,
    }))
}

// ---------------------------------------------------------------------------
// GET /v1/audit/unlogged?date=YYYY-MM-DD
// ---------------------------------------------------------------------------

pub(crate) async fn audit_unlogged(
    State(st): State<Arc<AppState>>,
    Query(q): Query<DateQuery>,
) -> Result<Json<UnloggedResponse>, ApiError> {
    let date = resolve_date(&st, &q)?;
    let (data, cauldrons) = tokio::join!(fetch_audit(&st), st.source.cauldrons_or_empty());
    let rows = unlogged_for_date(&data?, &cauldrons, &date);

    info!(date = %date, rows = rows.len(), "unlogged drains served");
    Ok(Json(UnloggedResponse {
        date: date.to_string(),
        rows,
    }))
}

// ---------------------------------------------------------------------------
// GET /v1/audit/dates
// ---------------------------------------------------------------------------

pub(crate) async fn audit_dates(
    State(st): State<Arc<AppState>>,
) -> Result<Json<DatesResponse>, ApiError> {
    let data = fetch_audit(&st).await?;
    Ok(Json(DatesResponse {
        dates: activity_dates(&data),
    }))
}

// ---------------------------------------------------------------------------
// GET /v1/cauldrons
// ---------------------------------------------------------------------------

/// Reference list; `[]` when the information service is down.
pub(crate) async fn cauldrons(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(st.source.cauldrons_or_empty().await))
}
