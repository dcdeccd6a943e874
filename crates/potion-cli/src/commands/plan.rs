//! `potion plan show`: print the courier routing plan as received.

use anyhow::{Context, Result};

use super::{print_json, Ctx};

pub async fn show(ctx: &Ctx) -> Result<()> {
    let plan = ctx
        .source
        .fetch_optimization_plan()
        .await
        .context("failed to fetch optimization plan")?;

    if ctx.json {
        return print_json(&plan);
    }

    println!(
        "simulation_start={} num_witches={} market_nodes={}",
        plan.simulation_start,
        plan.num_witches,
        plan.market_nodes.join(",")
    );
    for w in &plan.witches {
        println!(
            "witch={} steps={} collected={:.2} remaining_capacity={:.2}",
            w.id,
            w.route.len(),
            w.total_collected(),
            w.remaining_capacity
        );
        for step in &w.route {
            println!(
                "  step={} node={} volume={:.2} start={} end={}",
                step.kind_label(),
                step.node_id(),
                step.volume(),
                step.start(),
                step.end()
            );
        }
    }
    Ok(())
}
