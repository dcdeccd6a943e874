//! Decoding the audit payload the way the upstream actually sends it.
//!
//! Upstream serializes NaN as `null`, fills missing ticket fields with `""`
//! and may omit `date` entirely. None of that fails the decode; the bad
//! fields fall back to empty values.

use potion_schemas::{AuditData, AuditEntryKind, TicketDirection};

const PAYLOAD: &str = r#"{
  "summary": {
    "detected_events": 10,
    "matches": 5,
    "mismatches": 2,
    "unlogged_drains": 3,
    "ghost_tickets": 1,
    "recovered_previous_day": 1,
    "potentially_missing_potion": 66.09,
    "average_fill_rate_per_min": 1.7,
    "average_drain_rate_per_min": null
  },
  "daily_audit": [
    {"date": "2025-10-30", "cauldron_id": "cauldron_001", "type": "Unlogged Drain", "volume": 45.66},
    {"date": "2025-10-30", "cauldron_id": "cauldron_002", "type": "Under-reported", "volume": null},
    {"cauldron_id": "cauldron_003", "type": "Over-reported", "volume": "15.0"}
  ],
  "mismatched_tickets": [
    {"ticket_id": "TK12346", "cauldron_id": "cauldron_002", "courier_id": "C001",
     "ticket_volume": 300.0, "detected_volume": 320.43, "difference": 20.43,
     "abs_difference": 20.43, "direction": "Under-reported", "date": "2025-10-30"},
    {"ticket_id": "TK12347", "cauldron_id": "", "courier_id": "",
     "ticket_volume": "", "detected_volume": 0, "difference": "",
     "abs_difference": "", "direction": "", "date": ""}
  ],
  "cauldron_status": [
    {"cauldron_id": "cauldron_001", "current_level": 512.3, "max_volume": 1000,
     "fill_rate_per_min": 1.2, "drain_rate_per_min": 9.5, "time_to_overflow_min": null}
  ]
}"#;

#[test]
fn live_payload_decodes_with_fallbacks() {
    let data: AuditData = serde_json::from_str(PAYLOAD).unwrap();

    assert_eq!(data.summary.detected_events, 10);
    assert_eq!(data.summary.average_fill_rate_per_min, Some(1.7));
    assert_eq!(data.summary.average_drain_rate_per_min, None);

    let entries = &data.daily_audit;
    assert_eq!(entries[0].kind, AuditEntryKind::UnloggedDrain);
    assert_eq!(entries[1].volume, 0.0, "null volume falls back to zero");
    assert_eq!(entries[2].date, None);
    assert_eq!(entries[2].volume, 15.0, "numeric strings are accepted");

    let blank = &data.mismatched_tickets[1];
    assert_eq!(blank.cauldron_id, "");
    assert_eq!(blank.ticket_volume, 0.0);
    assert_eq!(blank.date, None, "blank date is no date");
    assert_eq!(blank.direction, TicketDirection::Other(String::new()));

    assert_eq!(data.cauldron_status[0].time_to_overflow_min, None);
}

#[test]
fn re_encoding_keeps_upstream_labels() {
    let data: AuditData = serde_json::from_str(PAYLOAD).unwrap();
    let v = serde_json::to_value(&data).unwrap();
    assert_eq!(v["daily_audit"][0]["type"], "Unlogged Drain");
    assert_eq!(v["daily_audit"][1]["type"], "Under-reported");
    assert_eq!(v["mismatched_tickets"][0]["direction"], "Under-reported");
}
