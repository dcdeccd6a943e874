//! `potion audit ...` handlers.
//!
//! Each handler fetches once, runs the pure reconciliation step and prints
//! either `key=value` lines or JSON (`--json`).

use anyhow::Result;
use potion_reconcile::{
    activity_dates, check_summary, compare_for_date, summary_for_display, unlogged_for_date,
};
use serde_json::json;

use super::{fetch_audit, print_json, resolve_date, Ctx};

/// `potion audit summary`
pub async fn summary(ctx: &Ctx) -> Result<()> {
    let data = fetch_audit(ctx).await?;
    let s = summary_for_display(&data);
    let report = check_summary(&data);

    if ctx.json {
        return print_json(&json!({ "summary": s, "consistency": report }));
    }

    println!("detected_events={}", s.detected_events);
    println!("matches={}", s.matches);
    println!("mismatches={}", s.mismatches);
    println!("unlogged_drains={}", s.unlogged_drains);
    println!("ghost_tickets={}", s.ghost_tickets);
    println!("recovered_previous_day={}", s.recovered_previous_day);
    println!(
        "potentially_missing_potion={:.2}",
        s.potentially_missing_potion
    );
    println!(
        "consistency={}",
        if report.is_consistent() {
            "consistent"
        } else {
            "drift"
        }
    );
    for f in &report.findings {
        println!("finding={}", f);
    }
    Ok(())
}

/// `potion audit compare [--date D]`
pub async fn compare(ctx: &Ctx, date: Option<String>) -> Result<()> {
    let date = resolve_date(date.as_deref(), ctx.timezone)?;
    let (data, cauldrons) = tokio::join!(fetch_audit(ctx), ctx.source.cauldrons_or_empty());
    let rows = compare_for_date(&data?, &cauldrons, &date);

    if ctx.json {
        return print_json(&json!({ "date": date, "rows": rows }));
    }

    println!("date={} rows={}", date, rows.len());
    for r in &rows {
        println!(
            "cauldron={} reported={:.2} actual={:.2}",
            r.cauldron_id, r.reported, r.actual
        );
    }
    Ok(())
}

/// `potion audit unlogged [--date D]`
pub async fn unlogged(ctx: &Ctx, date: Option<String>) -> Result<()> {
    let date = resolve_date(date.as_deref(), ctx.timezone)?;
    let (data, cauldrons) = tokio::join!(fetch_audit(ctx), ctx.source.cauldrons_or_empty());
    let rows = unlogged_for_date(&data?, &cauldrons, &date);

    if ctx.json {
        return print_json(&json!({ "date": date, "rows": rows }));
    }

    println!("date={} rows={}", date, rows.len());
    for r in &rows {
        println!("cauldron={} unlogged={:.2}", r.cauldron_id, r.unlogged);
    }
    Ok(())
}

/// `potion audit dates`
pub async fn dates(ctx: &Ctx) -> Result<()> {
    let data = fetch_audit(ctx).await?;
    let dates = activity_dates(&data);

    if ctx.json {
        return print_json(&json!({ "dates": dates }));
    }

    for d in &dates {
        println!("date={}", d);
    }
    Ok(())
}
