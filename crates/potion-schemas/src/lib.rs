//! potion-schemas
//!
//! Wire shapes consumed from the upstream audit and information services.
//!
//! Everything here is a request-scoped value object: decoded once per fetch,
//! read by the reconciliation engine, then dropped. No behavior beyond
//! decoding and a few derived accessors lives in this crate.

mod date;
mod lenient;
mod plan;

pub use date::{AuditDate, DateParseError};
pub use plan::{OptimizationPlan, RouteStep, Witch};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Daily audit entries
// ---------------------------------------------------------------------------

/// Classification attached to a daily audit row by the upstream auditor.
///
/// Upstream emits human labels (`"Unlogged Drain"`, `"Under-reported"`, ...).
/// Labels that are not recognised are kept verbatim in [`AuditEntryKind::Other`]
/// so they round-trip, but they never satisfy any reconciliation rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditEntryKind {
    UnloggedDrain,
    UnderReported,
    OverReported,
    Match,
    GhostTicket,
    RecoveredPreviousDay,
    Other(String),
}

impl AuditEntryKind {
    /// Map an upstream label to a kind. Matching is exact (no case folding).
    pub fn from_label(label: &str) -> Self {
        match label {
            "Unlogged Drain" | "UnloggedDrain" => Self::UnloggedDrain,
            "Under-reported" | "UnderReported" => Self::UnderReported,
            "Over-reported" | "OverReported" => Self::OverReported,
            "Match" => Self::Match,
            "Ghost Ticket" | "GhostTicket" => Self::GhostTicket,
            "Recovered Previous Day" | "RecoveredPreviousDay" => Self::RecoveredPreviousDay,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical upstream label.
    pub fn label(&self) -> &str {
        match self {
            Self::UnloggedDrain => "Unlogged Drain",
            Self::UnderReported => "Under-reported",
            Self::OverReported => "Over-reported",
            Self::Match => "Match",
            Self::GhostTicket => "Ghost Ticket",
            Self::RecoveredPreviousDay => "Recovered Previous Day",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl Default for AuditEntryKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl Serialize for AuditEntryKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for AuditEntryKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::string(deserializer)?;
        Ok(Self::from_label(&raw))
    }
}

/// One detected discrepancy or confirmed event for one cauldron on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAuditEntry {
    /// Calendar date `YYYY-MM-DD`. `None` when upstream omitted it.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cauldron_id: String,
    #[serde(rename = "type", default)]
    pub kind: AuditEntryKind,
    /// Liters.
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: f64,
}

impl DailyAuditEntry {
    pub fn new(
        date: impl Into<String>,
        cauldron_id: impl Into<String>,
        kind: AuditEntryKind,
        volume: f64,
    ) -> Self {
        Self {
            date: Some(date.into()),
            cauldron_id: cauldron_id.into(),
            kind,
            volume,
        }
    }
}

// ---------------------------------------------------------------------------
// Mismatched tickets
// ---------------------------------------------------------------------------

/// Which side of a ticket/sensor disagreement the courier landed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TicketDirection {
    /// Ticket claims more than the sensors saw drained.
    OverReported,
    /// Ticket claims less than the sensors saw drained.
    UnderReported,
    Other(String),
}

impl TicketDirection {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Over-reported" | "OverReported" => Self::OverReported,
            "Under-reported" | "UnderReported" => Self::UnderReported,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::OverReported => "Over-reported",
            Self::UnderReported => "Under-reported",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl Default for TicketDirection {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl Serialize for TicketDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TicketDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::string(deserializer)?;
        Ok(Self::from_label(&raw))
    }
}

/// A courier ticket whose reported volume disagreed with the sensor-detected
/// drain it was matched against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchedTicket {
    #[serde(default, deserialize_with = "lenient::string")]
    pub ticket_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cauldron_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub courier_id: String,
    /// Liters as reported by the courier.
    #[serde(default, deserialize_with = "lenient::number")]
    pub ticket_volume: f64,
    /// Liters as measured by the sensors.
    #[serde(default, deserialize_with = "lenient::number")]
    pub detected_volume: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub difference: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub abs_difference: f64,
    #[serde(default)]
    pub direction: TicketDirection,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
}

impl MismatchedTicket {
    /// Ticket with derived fields filled from the two volumes.
    pub fn new(
        ticket_id: impl Into<String>,
        cauldron_id: impl Into<String>,
        courier_id: impl Into<String>,
        ticket_volume: f64,
        detected_volume: f64,
        date: impl Into<String>,
    ) -> Self {
        let difference = detected_volume - ticket_volume;
        let mut ticket = Self {
            ticket_id: ticket_id.into(),
            cauldron_id: cauldron_id.into(),
            courier_id: courier_id.into(),
            ticket_volume,
            detected_volume,
            difference,
            abs_difference: difference.abs(),
            direction: TicketDirection::default(),
            date: Some(date.into()),
        };
        ticket.direction = ticket.expected_direction();
        ticket
    }

    /// `detected_volume - ticket_volume`, computed from the volumes rather
    /// than trusting the `difference` field.
    pub fn signed_gap(&self) -> f64 {
        self.detected_volume - self.ticket_volume
    }

    /// Direction implied by the two volumes.
    pub fn expected_direction(&self) -> TicketDirection {
        if self.ticket_volume > self.detected_volume {
            TicketDirection::OverReported
        } else {
            TicketDirection::UnderReported
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + payload
// ---------------------------------------------------------------------------

/// Scalar counters computed by the upstream auditor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    #[serde(default)]
    pub detected_events: u64,
    #[serde(default)]
    pub matches: u64,
    #[serde(default)]
    pub mismatches: u64,
    #[serde(default)]
    pub unlogged_drains: u64,
    #[serde(default)]
    pub ghost_tickets: u64,
    #[serde(default)]
    pub recovered_previous_day: u64,
    /// Liters attributable to loss (unlogged drains + under-reporting).
    #[serde(default, deserialize_with = "lenient::number")]
    pub potentially_missing_potion: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_fill_rate_per_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_drain_rate_per_min: Option<f64>,
}

/// Per-cauldron level snapshot forwarded by the auditor. Pass-through only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauldronStatus {
    #[serde(default, deserialize_with = "lenient::string")]
    pub cauldron_id: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_level: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_volume: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fill_rate_per_min: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub drain_rate_per_min: f64,
    #[serde(default)]
    pub time_to_overflow_min: Option<f64>,
}

/// Full response of the audit run endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditData {
    pub summary: AuditSummary,
    #[serde(default)]
    pub daily_audit: Vec<DailyAuditEntry>,
    #[serde(default)]
    pub mismatched_tickets: Vec<MismatchedTicket>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cauldron_status: Vec<CauldronStatus>,
}

impl AuditData {
    pub fn empty() -> Self {
        Self {
            summary: AuditSummary::default(),
            daily_audit: Vec::new(),
            mismatched_tickets: Vec::new(),
            cauldron_status: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Static collection point. Only `id` and `name` matter to reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cauldron {
    /// Empty when upstream omitted it; such records name nothing.
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub max_volume: f64,
}

impl Cauldron {
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: 0.0,
            longitude: 0.0,
            max_volume: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_labels_and_aliases() {
        assert_eq!(
            AuditEntryKind::from_label("Unlogged Drain"),
            AuditEntryKind::UnloggedDrain
        );
        assert_eq!(
            AuditEntryKind::from_label("UnloggedDrain"),
            AuditEntryKind::UnloggedDrain
        );
        assert_eq!(
            AuditEntryKind::from_label("Under-reported"),
            AuditEntryKind::UnderReported
        );
        // exact match only
        assert_eq!(
            AuditEntryKind::from_label("unlogged drain"),
            AuditEntryKind::Other("unlogged drain".to_string())
        );
    }

    #[test]
    fn unknown_kind_round_trips_verbatim() {
        let e: DailyAuditEntry = serde_json::from_str(
            r#"{"date":"2025-10-30","cauldron_id":"c1","type":"Spilled","volume":3}"#,
        )
        .unwrap();
        assert_eq!(e.kind, AuditEntryKind::Other("Spilled".to_string()));
        let back = serde_json::to_value(&e).unwrap();
        assert_eq!(back["type"], "Spilled");
    }

    #[test]
    fn ticket_new_fills_derived_fields() {
        let t = MismatchedTicket::new("TK1", "c1", "C001", 600.0, 543.2, "2025-10-30");
        assert_eq!(t.direction, TicketDirection::OverReported);
        assert!(t.difference < 0.0);
        assert_eq!(t.abs_difference, t.difference.abs());

        let u = MismatchedTicket::new("TK2", "c1", "C001", 300.0, 320.7, "2025-10-30");
        assert_eq!(u.direction, TicketDirection::UnderReported);
        assert_eq!(u.signed_gap(), 320.7 - 300.0);
    }

    #[test]
    fn ticket_with_blank_fields_still_decodes() {
        let t: MismatchedTicket = serde_json::from_str(
            r#"{"ticket_id":"TK9","cauldron_id":"c2","courier_id":"",
                "ticket_volume":"","detected_volume":null,"direction":""}"#,
        )
        .unwrap();
        assert_eq!(t.ticket_volume, 0.0);
        assert_eq!(t.detected_volume, 0.0);
        assert_eq!(t.date, None);
        assert_eq!(t.direction, TicketDirection::Other(String::new()));
    }

    #[test]
    fn audit_payload_decodes_upstream_shape() {
        let raw = r#"{
            "summary": {
                "detected_events": 534, "matches": 101, "mismatches": 42,
                "unlogged_drains": 391, "ghost_tickets": 6,
                "recovered_previous_day": 4,
                "average_fill_rate_per_min": 0.01234,
                "potentially_missing_potion": 1612.08
            },
            "cauldron_status": [
                {"cauldron_id": "cauldron_001", "current_level": 412.5,
                 "max_volume": 1000, "fill_rate_per_min": 0.1,
                 "drain_rate_per_min": 5.2, "time_to_overflow_min": null}
            ],
            "daily_audit": [
                {"date": "2025-10-30", "cauldron_id": "cauldron_005",
                 "type": "Unlogged Drain", "volume": 45.66}
            ],
            "mismatched_tickets": [
                {"ticket_id": "TK12346", "cauldron_id": "cauldron_003",
                 "courier_id": "C001", "ticket_volume": 300,
                 "detected_volume": 320.7, "difference": -20.7,
                 "abs_difference": 20.7, "direction": "Under-reported",
                 "date": "2025-10-30"}
            ]
        }"#;

        let data: AuditData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.summary.detected_events, 534);
        assert_eq!(data.summary.average_fill_rate_per_min, Some(0.01234));
        assert_eq!(data.summary.average_drain_rate_per_min, None);
        assert_eq!(data.daily_audit[0].kind, AuditEntryKind::UnloggedDrain);
        assert_eq!(data.mismatched_tickets[0].ticket_volume, 300.0);
        assert_eq!(data.cauldron_status[0].time_to_overflow_min, None);
    }

    #[test]
    fn payload_without_lists_decodes_as_empty() {
        let data: AuditData = serde_json::from_str(r#"{"summary": {}}"#).unwrap();
        assert!(data.daily_audit.is_empty());
        assert!(data.mismatched_tickets.is_empty());
        assert_eq!(data.summary, AuditSummary::default());
    }

    #[test]
    fn cauldron_list_survives_record_without_id() {
        let list: Vec<Cauldron> = serde_json::from_str(
            r#"[
              {"id": "c1", "name": "Alpha", "max_volume": 1000},
              {"name": "Nameless", "latitude": 33.1},
              {"id": null, "name": null},
              {"id": "c2", "name": "Beta"}
            ]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].id, "c1");
        assert_eq!(list[1].id, "");
        assert_eq!(list[2], Cauldron::named("", ""));
        assert_eq!(list[3].name, "Beta");
    }

    #[test]
    fn payload_without_summary_is_rejected() {
        let err = serde_json::from_str::<AuditData>(r#"{"error": "boom"}"#);
        assert!(err.is_err());
    }
}
