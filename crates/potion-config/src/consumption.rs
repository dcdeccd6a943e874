use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which binary is reading the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Cli,
    Daemon,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Cli => "CLI",
            Surface::Daemon => "DAEMON",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    pub surface: String,
    /// Consumed JSON-pointer prefixes (sorted, unique).
    pub consumed_prefixes: Vec<String>,
    /// Leaf pointers not under any consumed prefix (sorted).
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

impl Surface {
    /// Key paths this surface reads. Everything below a listed path counts
    /// as read: `["upstream"]` covers `/upstream/timeout_secs`.
    pub fn consumed_paths(&self) -> &'static [&'static [&'static str]] {
        match self {
            // DashboardConfig::upstream + DashboardConfig::dashboard
            Surface::Cli => &[&["upstream"], &["dashboard", "timezone"]],
            Surface::Daemon => &[
                &["upstream"],
                &["dashboard", "timezone"],
                &["daemon", "addr"],
            ],
        }
    }
}

/// Unused-key report for a surface.
/// `Fail` errors when anything is unused; `Warn` always returns the report.
pub fn report_unused_keys(
    surface: Surface,
    config_json: &Value,
    policy: UnusedKeyPolicy,
) -> Result<UnusedKeyReport> {
    let read = surface.consumed_paths();

    let mut path: Vec<String> = Vec::new();
    let mut unused: Vec<String> = Vec::new();
    collect_unread(config_json, &mut path, read, &mut unused);
    unused.sort();

    let mut consumed_prefixes: Vec<String> = read
        .iter()
        .map(|segments| to_pointer(segments.iter().copied()))
        .collect();
    consumed_prefixes.sort();

    let report = UnusedKeyReport {
        surface: surface.as_str().to_string(),
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        let first: Vec<&str> = report
            .unused_leaf_pointers
            .iter()
            .take(12)
            .map(String::as_str)
            .collect();
        bail!(
            "CONFIG_UNUSED_KEYS (surface={}): {} config key(s) not read; remove them: {}",
            report.surface,
            report.unused_leaf_pointers.len(),
            first.join(", ")
        );
    }

    Ok(report)
}

fn is_read(path: &[String], read: &[&[&str]]) -> bool {
    read.iter().any(|r| {
        path.len() >= r.len() && r.iter().zip(path).all(|(want, got)| *want == got.as_str())
    })
}

/// Depth-first walk that stops at read subtrees. Empty maps and arrays hold
/// no leaves.
fn collect_unread(v: &Value, path: &mut Vec<String>, read: &[&[&str]], out: &mut Vec<String>) {
    if is_read(path, read) {
        return;
    }
    match v {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(key.clone());
                collect_unread(child, path, read, out);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                path.push(i.to_string());
                collect_unread(child, path, read, out);
                path.pop();
            }
        }
        _ => out.push(to_pointer(path.iter().map(String::as_str))),
    }
}

/// RFC 6901 pointer; the root is "/".
fn to_pointer<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let p: String = segments
        .map(|s| format!("/{}", s.replace('~', "~0").replace('/', "~1")))
        .collect();
    if p.is_empty() {
        "/".to_string()
    } else {
        p
    }
}
