use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::LoadedConfig;

pub const ENV_AUDIT_URL: &str = "POTION_AUDIT_URL";
pub const ENV_INFO_URL: &str = "POTION_INFO_URL";
pub const ENV_TIMEZONE: &str = "POTION_TIMEZONE";
pub const ENV_DAEMON_ADDR: &str = "POTION_DAEMON_ADDR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSection {
    /// Base of the audit service (`/api/audit/run`, `/api/optimization/run`).
    pub audit_base_url: String,
    /// Base of the information service (`/api/Information/...`).
    pub info_base_url: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            audit_base_url: "http://localhost:8000".to_string(),
            info_base_url: "https://hackutd2025.eog.systems".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    /// IANA zone used to pick "today" when no date is given.
    pub timezone: String,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSection {
    pub addr: String,
}

impl Default for DaemonSection {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8899".to_string(),
        }
    }
}

/// Typed view of the merged config. Missing keys take their defaults;
/// keys this struct does not know are left to the unused-key report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub upstream: UpstreamSection,
    pub dashboard: DashboardSection,
    pub daemon: DaemonSection,
}

impl DashboardConfig {
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        serde_json::from_value(loaded.config_json.clone())
            .context("config does not match the dashboard layout")
    }

    /// Apply `POTION_*` overrides. `lookup` is usually `std::env::var(..).ok()`;
    /// blank values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_AUDIT_URL) {
            self.upstream.audit_base_url = v;
        }
        if let Some(v) = get(ENV_INFO_URL) {
            self.upstream.info_base_url = v;
        }
        if let Some(v) = get(ENV_TIMEZONE) {
            self.dashboard.timezone = v;
        }
        if let Some(v) = get(ENV_DAEMON_ADDR) {
            self.daemon.addr = v;
        }
    }

    /// Files, then process environment.
    pub fn load(paths: &[&str]) -> Result<(LoadedConfig, Self)> {
        let loaded = crate::load_layered_yaml(paths)?;
        let mut cfg = Self::from_loaded(&loaded)?;
        cfg.apply_env_overrides(|k| std::env::var(k).ok());
        Ok((loaded, cfg))
    }

    pub fn timezone(&self) -> Result<Tz> {
        let name = self.dashboard.timezone.trim();
        name.parse::<Tz>()
            .map_err(|e| anyhow!("invalid dashboard.timezone '{name}': {e}"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs.max(1))
    }

    pub fn daemon_addr(&self) -> Result<SocketAddr> {
        self.daemon
            .addr
            .trim()
            .parse()
            .with_context(|| format!("invalid daemon.addr '{}'", self.daemon.addr))
    }
}
