//! Command handler modules for the potion CLI.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod audit;
pub mod plan;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use potion_config::{report_unused_keys, DashboardConfig, Surface, UnusedKeyPolicy};
use potion_schemas::{AuditData, AuditDate, Cauldron, OptimizationPlan};
use potion_source::{AuditSource, HttpAuditSource, StaticAuditSource, AUDIT_SERVICE_HINT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;

/// Where records come from and how to print them. Built once in `main`.
pub struct Ctx {
    pub source: Box<dyn AuditSource>,
    pub timezone: Tz,
    pub json: bool,
}

/// Offline inputs. Any file given switches the whole run to offline mode;
/// accessors without a file then behave like a dead upstream.
#[derive(Debug, Default)]
pub struct OfflineFiles {
    pub audit_file: Option<String>,
    pub cauldrons_file: Option<String>,
    pub plan_file: Option<String>,
}

impl OfflineFiles {
    fn any(&self) -> bool {
        self.audit_file.is_some() || self.cauldrons_file.is_some() || self.plan_file.is_some()
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Layered config (defaults when no paths), env overrides, unused-key warning.
pub fn load_config(config_paths: &[String]) -> Result<DashboardConfig> {
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let (loaded, cfg) = DashboardConfig::load(&path_refs)?;

    let report = report_unused_keys(Surface::Cli, &loaded.config_json, UnusedKeyPolicy::Warn)?;
    for p in &report.unused_leaf_pointers {
        tracing::warn!(pointer = %p, "config key not read by the CLI");
    }
    tracing::debug!(config_hash = %loaded.config_hash, "config loaded");
    Ok(cfg)
}

pub fn build_source(cfg: &DashboardConfig, files: &OfflineFiles) -> Result<Box<dyn AuditSource>> {
    if !files.any() {
        let http = HttpAuditSource::new(
            cfg.upstream.audit_base_url.clone(),
            cfg.upstream.info_base_url.clone(),
            cfg.timeout(),
        )?;
        return Ok(Box::new(http));
    }

    let mut src = StaticAuditSource::new();
    if let Some(p) = &files.audit_file {
        src = src.with_audit(read_json_file::<AuditData>(p)?);
    }
    if let Some(p) = &files.cauldrons_file {
        src = src.with_cauldrons(read_json_file::<Vec<Cauldron>>(p)?);
    }
    if let Some(p) = &files.plan_file {
        src = src.with_plan(read_json_file::<OptimizationPlan>(p)?);
    }
    Ok(Box::new(src))
}

/// Read a JSON file, tolerating a UTF-8 BOM (files saved on Windows).
pub fn read_json_file<T: DeserializeOwned>(path: &str) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("read file failed: {}", path))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    let raw = std::str::from_utf8(bytes).with_context(|| format!("{path} must be UTF-8 text"))?;
    serde_json::from_str(raw.trim()).with_context(|| format!("{path} does not hold the expected JSON"))
}

/// `--date` if given, otherwise today in the configured zone.
pub fn resolve_date(date: Option<&str>, tz: Tz) -> Result<AuditDate> {
    match date {
        Some(raw) => Ok(AuditDate::parse(raw)?),
        None => Ok(AuditDate::today_in(tz)),
    }
}

pub async fn fetch_audit(ctx: &Ctx) -> Result<AuditData> {
    ctx.source
        .fetch_audit_data()
        .await
        .with_context(|| format!("failed to fetch audit data; {AUDIT_SERVICE_HINT}"))
}

pub fn print_json<T: Serialize>(v: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize output json failed")?;
    println!("{s}");
    Ok(())
}
