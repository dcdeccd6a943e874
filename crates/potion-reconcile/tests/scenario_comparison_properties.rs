//! Properties of the daily comparison that must hold for any input:
//! determinism, suppression, additivity, unlogged-drain isolation,
//! date filtering and graceful degradation without reference data.

use potion_reconcile::*;
use potion_schemas::{AuditData, AuditDate, AuditEntryKind, Cauldron, DailyAuditEntry, MismatchedTicket};

const DAY: &str = "2025-10-30";

fn day() -> AuditDate {
    AuditDate::parse(DAY).unwrap()
}

/// A busy day across five cauldrons, two of them unknown to the reference list.
fn busy_day() -> (AuditData, Vec<Cauldron>) {
    let cauldrons = vec![
        Cauldron::named("cauldron_001", "Crimson Brew"),
        Cauldron::named("cauldron_002", "Azure Elixir"),
        Cauldron::named("cauldron_003", "Verdant Tonic"),
    ];

    let mut data = AuditData::empty();
    data.mismatched_tickets = vec![
        MismatchedTicket::new("TK1", "cauldron_001", "C001", 120.0, 131.25, DAY),
        MismatchedTicket::new("TK2", "cauldron_001", "C002", 80.5, 70.0, DAY),
        MismatchedTicket::new("TK3", "cauldron_011", "C004", 600.0, 543.2, DAY),
        MismatchedTicket::new("TK4", "cauldron_002", "C003", 50.0, 61.0, "2025-10-29"),
    ];
    data.daily_audit = vec![
        DailyAuditEntry::new(DAY, "cauldron_003", AuditEntryKind::UnloggedDrain, 12.5),
        DailyAuditEntry::new(DAY, "cauldron_007", AuditEntryKind::UnderReported, 20.43),
        DailyAuditEntry::new(DAY, "cauldron_009", AuditEntryKind::UnloggedDrain, 7.75),
        DailyAuditEntry::new("2025-10-29", "cauldron_002", AuditEntryKind::UnloggedDrain, 100.5),
    ];
    (data, cauldrons)
}

#[test]
fn repeated_runs_are_identical() {
    let (data, cauldrons) = busy_day();
    let first = compare_for_date(&data, &cauldrons, &day());
    for _ in 0..10 {
        assert_eq!(compare_for_date(&data, &cauldrons, &day()), first);
    }
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&compare_for_date(&data, &cauldrons, &day())).unwrap()
    );
}

#[test]
fn no_row_is_all_zero() {
    let (data, cauldrons) = busy_day();
    let rows = compare_for_date(&data, &cauldrons, &day());
    assert!(!rows.is_empty());
    for r in &rows {
        assert!(r.reported > 0.0 || r.actual > 0.0, "all-zero row emitted: {r:?}");
    }
    // cauldron_002 only has activity on another day.
    assert!(rows.iter().all(|r| r.cauldron_id != "Azure Elixir"));
}

#[test]
fn same_day_tickets_are_additive() {
    let (data, cauldrons) = busy_day();
    let rows = compare_for_date(&data, &cauldrons, &day());
    let crimson = rows.iter().find(|r| r.cauldron_id == "Crimson Brew").unwrap();
    assert_eq!(crimson.reported, 0.0 + 120.0 + 80.5);
    assert_eq!(crimson.actual, 0.0 + 131.25 + 70.0);
}

#[test]
fn unlogged_drains_never_touch_reported() {
    let (mut data, cauldrons) = busy_day();
    let before = compare_for_date(&data, &cauldrons, &day());

    data.daily_audit.push(DailyAuditEntry::new(
        DAY,
        "cauldron_001",
        AuditEntryKind::UnloggedDrain,
        33.0,
    ));
    let after = compare_for_date(&data, &cauldrons, &day());

    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.cauldron_id, a.cauldron_id);
        assert_eq!(b.reported, a.reported);
    }
    let crimson = after.iter().find(|r| r.cauldron_id == "Crimson Brew").unwrap();
    assert_eq!(crimson.actual, 0.0 + 131.25 + 70.0 + 33.0);
}

#[test]
fn other_day_records_do_not_leak_into_active_cauldron() {
    let (mut data, cauldrons) = busy_day();
    data.mismatched_tickets.push(MismatchedTicket::new(
        "TK9",
        "cauldron_003",
        "C001",
        999.0,
        999.0,
        "2025-10-31",
    ));

    let rows = compare_for_date(&data, &cauldrons, &day());
    let verdant = rows.iter().find(|r| r.cauldron_id == "Verdant Tonic").unwrap();
    assert_eq!(verdant.reported, 0.0);
    assert_eq!(verdant.actual, 12.5);
}

#[test]
fn empty_reference_list_keys_by_raw_id() {
    let (data, cauldrons) = busy_day();
    let named = compare_for_date(&data, &cauldrons, &day());
    let raw = compare_for_date(&data, &[], &day());

    assert_eq!(named.len(), raw.len());
    let mut keys: Vec<&str> = raw.iter().map(|r| r.cauldron_id.as_str()).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["cauldron_001", "cauldron_003", "cauldron_009", "cauldron_011"]
    );
}

#[test]
fn unknown_ids_keep_raw_key_next_to_named_rows() {
    let (data, cauldrons) = busy_day();
    let rows = compare_for_date(&data, &cauldrons, &day());
    let keys: Vec<&str> = rows.iter().map(|r| r.cauldron_id.as_str()).collect();
    assert_eq!(
        keys,
        vec!["Crimson Brew", "Verdant Tonic", "cauldron_011", "cauldron_009"]
    );
}

#[test]
fn empty_inputs_yield_empty_output() {
    let data = AuditData::empty();
    assert!(compare_for_date(&data, &[], &day()).is_empty());
    assert!(unlogged_for_date(&data, &[], &day()).is_empty());
    assert!(activity_dates(&data).is_empty());
}

#[test]
fn decoded_payload_with_broken_ticket_still_reconciles() {
    let raw = r#"{
        "summary": {"detected_events": 0},
        "daily_audit": [
            {"date": "2025-10-30", "cauldron_id": "c1", "type": "Unlogged Drain", "volume": 45.66}
        ],
        "mismatched_tickets": [
            {"ticket_id": "TK1", "cauldron_id": "c1", "courier_id": "C1",
             "ticket_volume": 300, "detected_volume": 320.7},
            {"ticket_id": "TK2", "cauldron_id": "c1", "courier_id": "C1",
             "ticket_volume": "", "detected_volume": 10, "date": "2025-10-30"}
        ]
    }"#;
    let data: AuditData = serde_json::from_str(raw).unwrap();
    let rows = compare_for_date(&data, &[Cauldron::named("c1", "Alpha")], &day());
    assert_eq!(rows, vec![ComparisonRow::new("Alpha", 0.0, 10.0 + 45.66)]);
}

#[test]
fn reference_record_without_id_keeps_other_names() {
    let cauldrons: Vec<Cauldron> = serde_json::from_str(
        r#"[
            {"id": "c1", "name": "Alpha"},
            {"name": "Orphan"}
        ]"#,
    )
    .unwrap();

    let mut data = AuditData::empty();
    data.daily_audit = vec![DailyAuditEntry::new(DAY, "c1", AuditEntryKind::UnloggedDrain, 45.66)];

    let rows = compare_for_date(&data, &cauldrons, &day());
    assert_eq!(rows, vec![ComparisonRow::new("Alpha", 0.0, 45.66)]);
    assert_eq!(CauldronDirectory::from_cauldrons(&cauldrons).known_ids().len(), 1);
}
