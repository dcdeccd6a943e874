//! potion-config
//!
//! Layered YAML configuration for the audit dashboard surfaces.
//!
//! - YAML documents are deep-merged in order; later layers override earlier.
//! - The merged document is rendered as canonical JSON and hashed (SHA-256),
//!   so two surfaces started from the same files report the same hash.
//! - [`DashboardConfig`] is the typed view, with defaults for every key and
//!   `POTION_*` environment overrides applied last.
//! - [`report_unused_keys`] flags leaves the running surface never reads.

mod consumption;
mod dashboard;

pub use consumption::{report_unused_keys, Surface, UnusedKeyPolicy, UnusedKeyReport};
pub use dashboard::{
    DaemonSection, DashboardConfig, DashboardSection, UpstreamSection, ENV_AUDIT_URL,
    ENV_DAEMON_ADDR, ENV_INFO_URL, ENV_TIMEZONE,
};

use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for (i, raw) in yaml_docs.iter().enumerate() {
        // An empty file is an empty layer, not `null` overriding everything.
        if raw.trim().is_empty() {
            continue;
        }
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merge_layer(&mut merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Overlay one layer. Maps merge key by key; any other value replaces.
fn merge_layer(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, v) in layer_map {
                merge_layer(base_map.entry(key).or_insert(Value::Null), v);
            }
        }
        (slot, v) => *slot = v,
    }
}

/// Compact JSON. `serde_json::Map` is key-sorted here (no `preserve_order`),
/// so key order in the source YAML never reaches the hash.
fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(v).context("canonical json serialize failed")
}
