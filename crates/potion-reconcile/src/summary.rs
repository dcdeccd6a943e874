use potion_schemas::{AuditData, AuditEntryKind, AuditSummary};

use crate::{DerivedCounters, SummaryFinding, SummaryReport, SummaryStatus};

/// Allowed gap (liters) between the upstream loss total and the daily rows.
/// Upstream rounds the total to two decimals.
pub const MISSING_VOLUME_TOLERANCE: f64 = 0.01;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Counters as supplied upstream. They are displayed unchanged.
pub fn summary_for_display(data: &AuditData) -> &AuditSummary {
    &data.summary
}

/// Recompute what the record lists can tell us about the counters.
pub fn derive_counters(data: &AuditData) -> DerivedCounters {
    let mut out = DerivedCounters {
        mismatches: data.mismatched_tickets.len() as u64,
        ..DerivedCounters::default()
    };

    let mut missing = 0.0;
    for e in &data.daily_audit {
        match e.kind {
            AuditEntryKind::UnloggedDrain => {
                out.unlogged_drain_entries += 1;
                missing += e.volume;
            }
            AuditEntryKind::UnderReported => {
                out.under_reported_entries += 1;
                missing += e.volume;
            }
            AuditEntryKind::OverReported => out.over_reported_entries += 1,
            _ => {}
        }
    }
    out.potentially_missing_potion = round2(missing);
    out
}

/// Check the upstream counters against the record lists.
///
/// Identities, checked in this order:
/// 1. `detected_events == matches + mismatches + unlogged_drains`
/// 2. `mismatches == mismatched ticket rows`
/// 3. `unlogged_drains >= unlogged-drain daily rows`
/// 4. `mismatches >= under-reported + over-reported daily rows`
/// 5. `recovered_previous_day <= matches + mismatches`
/// 6. `potentially_missing_potion` within [`MISSING_VOLUME_TOLERANCE`] of the daily rows
///
/// Never fails; drift is reported, not raised.
pub fn check_summary(data: &AuditData) -> SummaryReport {
    let s = &data.summary;
    let derived = derive_counters(data);
    let mut findings: Vec<SummaryFinding> = Vec::new();

    // 1) Every detected event is matched, mismatched or unlogged.
    let accounted = s
        .matches
        .saturating_add(s.mismatches)
        .saturating_add(s.unlogged_drains);
    if s.detected_events != accounted {
        findings.push(SummaryFinding::DetectedEventsUnbalanced {
            detected_events: s.detected_events,
            matches: s.matches,
            mismatches: s.mismatches,
            unlogged_drains: s.unlogged_drains,
        });
    }

    // 2) One ticket row per mismatch.
    if s.mismatches != derived.mismatches {
        findings.push(SummaryFinding::MismatchCountDrift {
            reported: s.mismatches,
            derived: derived.mismatches,
        });
    }

    // 3) Daily rows group one or more drains per (date, cauldron).
    if s.unlogged_drains < derived.unlogged_drain_entries {
        findings.push(SummaryFinding::UnloggedBelowEntries {
            reported: s.unlogged_drains,
            entries: derived.unlogged_drain_entries,
        });
    }

    // 4) Same grouping for under/over-reported rows.
    let reporting_entries = derived.under_reported_entries + derived.over_reported_entries;
    if s.mismatches < reporting_entries {
        findings.push(SummaryFinding::MismatchesBelowEntries {
            reported: s.mismatches,
            entries: reporting_entries,
        });
    }

    // 5) A recovery is a match or mismatch found on the previous day.
    let paired = s.matches.saturating_add(s.mismatches);
    if s.recovered_previous_day > paired {
        findings.push(SummaryFinding::RecoveredExceedsPaired {
            recovered: s.recovered_previous_day,
            paired,
        });
    }

    // 6) Loss total.
    let gap = (s.potentially_missing_potion - derived.potentially_missing_potion).abs();
    if gap > MISSING_VOLUME_TOLERANCE + 1e-9 {
        findings.push(SummaryFinding::MissingVolumeDrift {
            reported: s.potentially_missing_potion,
            derived: derived.potentially_missing_potion,
        });
    }

    let status = if findings.is_empty() {
        SummaryStatus::Consistent
    } else {
        SummaryStatus::Drift
    };

    SummaryReport {
        status,
        derived,
        findings,
    }
}
