use std::collections::{BTreeMap, BTreeSet};

use potion_schemas::{AuditData, AuditDate, AuditEntryKind, Cauldron};

use crate::{CauldronDirectory, ComparisonRow, UnloggedDrainRow};

/// Per-cauldron accumulator.
struct Slot {
    cauldron_id: String,
    reported: f64,
    actual: f64,
}

/// Accumulators in insertion order: known cauldrons first (reference order),
/// then ids first seen in the records.
struct Ledger {
    slots: Vec<Slot>,
    index: BTreeMap<String, usize>,
}

impl Ledger {
    fn seeded(dir: &CauldronDirectory) -> Self {
        let mut ledger = Self {
            slots: Vec::with_capacity(dir.len()),
            index: BTreeMap::new(),
        };
        for id in dir.known_ids() {
            ledger.slot(id);
        }
        ledger
    }

    fn slot(&mut self, cauldron_id: &str) -> &mut Slot {
        let i = match self.index.get(cauldron_id) {
            Some(&i) => i,
            None => {
                self.slots.push(Slot {
                    cauldron_id: cauldron_id.to_string(),
                    reported: 0.0,
                    actual: 0.0,
                });
                let i = self.slots.len() - 1;
                self.index.insert(cauldron_id.to_string(), i);
                i
            }
        };
        &mut self.slots[i]
    }
}

/// Rule A: tickets on `date` add their ticket volume to `reported` and their
/// detected volume to `actual`.
fn apply_tickets(ledger: &mut Ledger, data: &AuditData, date: &AuditDate) {
    for t in &data.mismatched_tickets {
        if t.cauldron_id.is_empty() || !date.matches(t.date.as_deref()) {
            continue;
        }
        let slot = ledger.slot(&t.cauldron_id);
        slot.reported += t.ticket_volume;
        slot.actual += t.detected_volume;
    }
}

/// Rule B: unlogged drains on `date` add to `actual` only.
fn apply_unlogged_drains(ledger: &mut Ledger, data: &AuditData, date: &AuditDate) {
    for e in &data.daily_audit {
        if e.kind != AuditEntryKind::UnloggedDrain
            || e.cauldron_id.is_empty()
            || !date.matches(e.date.as_deref())
        {
            continue;
        }
        ledger.slot(&e.cauldron_id).actual += e.volume;
    }
}

/// Reported-vs-actual rows for one calendar day.
///
/// - Tickets (Rule A) feed both sides; unlogged drains (Rule B) feed
///   `actual` only.
/// - Under/over-reported daily rows are summary signals and are not applied.
/// - Rows where both sides are zero are dropped.
/// - Records with a missing date or cauldron id contribute nothing.
pub fn compare_for_date(
    data: &AuditData,
    cauldrons: &[Cauldron],
    date: &AuditDate,
) -> Vec<ComparisonRow> {
    let dir = CauldronDirectory::from_cauldrons(cauldrons);
    compare_for_date_with_directory(data, &dir, date)
}

/// [`compare_for_date`] with a caller-held directory.
pub fn compare_for_date_with_directory(
    data: &AuditData,
    dir: &CauldronDirectory,
    date: &AuditDate,
) -> Vec<ComparisonRow> {
    let mut ledger = Ledger::seeded(dir);
    apply_tickets(&mut ledger, data, date);
    apply_unlogged_drains(&mut ledger, data, date);

    ledger
        .slots
        .into_iter()
        .filter(|s| s.reported > 0.0 || s.actual > 0.0)
        .map(|s| ComparisonRow {
            cauldron_id: dir.display_name(&s.cauldron_id).to_string(),
            reported: s.reported,
            actual: s.actual,
        })
        .collect()
}

/// Unlogged-drain totals per cauldron for one day, ignoring tickets.
pub fn unlogged_for_date(
    data: &AuditData,
    cauldrons: &[Cauldron],
    date: &AuditDate,
) -> Vec<UnloggedDrainRow> {
    let dir = CauldronDirectory::from_cauldrons(cauldrons);
    unlogged_for_date_with_directory(data, &dir, date)
}

/// [`unlogged_for_date`] with a caller-held directory.
pub fn unlogged_for_date_with_directory(
    data: &AuditData,
    dir: &CauldronDirectory,
    date: &AuditDate,
) -> Vec<UnloggedDrainRow> {
    let mut ledger = Ledger::seeded(dir);
    apply_unlogged_drains(&mut ledger, data, date);

    ledger
        .slots
        .into_iter()
        .filter(|s| s.actual > 0.0)
        .map(|s| UnloggedDrainRow {
            cauldron_id: dir.display_name(&s.cauldron_id).to_string(),
            unlogged: s.actual,
        })
        .collect()
}

/// Distinct record dates (entries and tickets), ascending.
pub fn activity_dates(data: &AuditData) -> Vec<String> {
    let mut dates: BTreeSet<&str> = BTreeSet::new();
    for e in &data.daily_audit {
        if let Some(d) = e.date.as_deref() {
            dates.insert(d);
        }
    }
    for t in &data.mismatched_tickets {
        if let Some(d) = t.date.as_deref() {
            dates.insert(d);
        }
    }
    dates.into_iter().map(str::to_string).collect()
}
