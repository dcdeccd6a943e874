use std::fmt;

use serde::{Deserialize, Serialize};

/// One bar pair of the "reported vs actual" chart.
///
/// `cauldron_id` carries the display key: the cauldron's name when the
/// reference list knows it, otherwise the raw id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub cauldron_id: String,
    /// Liters claimed by courier tickets.
    pub reported: f64,
    /// Liters detected by sensors (ticketed + unlogged).
    pub actual: f64,
}

impl ComparisonRow {
    pub fn new(cauldron_id: impl Into<String>, reported: f64, actual: f64) -> Self {
        Self {
            cauldron_id: cauldron_id.into(),
            reported,
            actual,
        }
    }
}

/// One bar of the unlogged-drain chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnloggedDrainRow {
    pub cauldron_id: String,
    pub unlogged: f64,
}

/// Counters recomputed locally from the record lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedCounters {
    /// Number of mismatched-ticket rows.
    pub mismatches: u64,
    pub unlogged_drain_entries: u64,
    pub under_reported_entries: u64,
    pub over_reported_entries: u64,
    /// Σ volume of unlogged-drain and under-reported entries, rounded to 0.01 L.
    pub potentially_missing_potion: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Consistent,
    Drift,
}

/// A broken identity between the upstream counters and the record lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryFinding {
    /// `detected_events != matches + mismatches + unlogged_drains`.
    DetectedEventsUnbalanced {
        detected_events: u64,
        matches: u64,
        mismatches: u64,
        unlogged_drains: u64,
    },
    /// `mismatches` differs from the number of mismatched-ticket rows.
    MismatchCountDrift { reported: u64, derived: u64 },
    /// Fewer unlogged drains than unlogged-drain daily rows.
    UnloggedBelowEntries { reported: u64, entries: u64 },
    /// Fewer mismatches than under/over-reported daily rows.
    MismatchesBelowEntries { reported: u64, entries: u64 },
    /// More previous-day recoveries than paired tickets.
    RecoveredExceedsPaired { recovered: u64, paired: u64 },
    /// Loss total disagrees with the daily rows beyond tolerance.
    MissingVolumeDrift { reported: f64, derived: f64 },
}

impl fmt::Display for SummaryFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryFinding::DetectedEventsUnbalanced {
                detected_events,
                matches,
                mismatches,
                unlogged_drains,
            } => write!(
                f,
                "detected_events={detected_events} != matches={matches} + \
                 mismatches={mismatches} + unlogged_drains={unlogged_drains}"
            ),
            SummaryFinding::MismatchCountDrift { reported, derived } => write!(
                f,
                "mismatches={reported} but {derived} mismatched ticket row(s)"
            ),
            SummaryFinding::UnloggedBelowEntries { reported, entries } => write!(
                f,
                "unlogged_drains={reported} below {entries} unlogged-drain daily row(s)"
            ),
            SummaryFinding::MismatchesBelowEntries { reported, entries } => write!(
                f,
                "mismatches={reported} below {entries} under/over-reported daily row(s)"
            ),
            SummaryFinding::RecoveredExceedsPaired { recovered, paired } => write!(
                f,
                "recovered_previous_day={recovered} exceeds {paired} paired ticket(s)"
            ),
            SummaryFinding::MissingVolumeDrift { reported, derived } => write!(
                f,
                "potentially_missing_potion={reported} but daily rows sum to {derived}"
            ),
        }
    }
}

/// Result of [`crate::check_summary`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub status: SummaryStatus,
    pub derived: DerivedCounters,
    /// In identity order; empty when consistent.
    pub findings: Vec<SummaryFinding>,
}

impl SummaryReport {
    pub fn is_consistent(&self) -> bool {
        self.status == SummaryStatus::Consistent
    }
}
