//! Courier routing plan produced by the external optimizer.
//!
//! Consumed as opaque structured data: nothing in this workspace schedules
//! or re-plans routes. Route steps are a sum type discriminated by the
//! explicit `type` tag.

use serde::{Deserialize, Serialize};

use crate::lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteStep {
    Collect {
        cauldron_id: String,
        #[serde(default, deserialize_with = "lenient::number")]
        amount: f64,
        start: String,
        end: String,
        #[serde(default, deserialize_with = "lenient::number")]
        travel_min: f64,
    },
    MarketUnload {
        market_node: String,
        #[serde(default, deserialize_with = "lenient::number")]
        amount_unloaded: f64,
        start: String,
        end: String,
        #[serde(default, deserialize_with = "lenient::number")]
        travel_min: f64,
    },
}

impl RouteStep {
    /// Node the witch is at while performing this step.
    pub fn node_id(&self) -> &str {
        match self {
            RouteStep::Collect { cauldron_id, .. } => cauldron_id,
            RouteStep::MarketUnload { market_node, .. } => market_node,
        }
    }

    /// Liters collected or unloaded.
    pub fn volume(&self) -> f64 {
        match self {
            RouteStep::Collect { amount, .. } => *amount,
            RouteStep::MarketUnload {
                amount_unloaded, ..
            } => *amount_unloaded,
        }
    }

    pub fn start(&self) -> &str {
        match self {
            RouteStep::Collect { start, .. } | RouteStep::MarketUnload { start, .. } => start,
        }
    }

    pub fn end(&self) -> &str {
        match self {
            RouteStep::Collect { end, .. } | RouteStep::MarketUnload { end, .. } => end,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            RouteStep::Collect { .. } => "collect",
            RouteStep::MarketUnload { .. } => "market_unload",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Witch {
    pub id: u32,
    #[serde(default)]
    pub current_node: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub remaining_capacity: f64,
    #[serde(default)]
    pub route: Vec<RouteStep>,
}

impl Witch {
    pub fn total_collected(&self) -> f64 {
        self.route
            .iter()
            .filter(|s| matches!(s, RouteStep::Collect { .. }))
            .map(RouteStep::volume)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPlan {
    #[serde(default)]
    pub simulation_start: String,
    #[serde(default)]
    pub num_witches: u32,
    #[serde(default)]
    pub witches: Vec<Witch>,
    #[serde(default)]
    pub market_nodes: Vec<String>,
    /// Forecast block forwarded as-is.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub forecast_summary: serde_json::Value,
}
