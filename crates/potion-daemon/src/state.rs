//! Shared state for potion-daemon handlers.
//!
//! Read-only after boot: handlers re-fetch from the source on every request
//! and keep nothing between requests.

use std::sync::Arc;

use chrono_tz::Tz;
use potion_source::AuditSource;
use serde::{Deserialize, Serialize};

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    pub source: Arc<dyn AuditSource>,
    /// Zone used to pick "today" when a request has no `date`.
    pub timezone: Tz,
}

impl AppState {
    pub fn new(source: Arc<dyn AuditSource>, timezone: Tz) -> Self {
        Self {
            build: BuildInfo {
                service: "potion-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            source,
            timezone,
        }
    }
}
