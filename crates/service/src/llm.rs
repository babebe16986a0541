//! # Plan Generation Collaborator
//!
//! Text-generation seam producing challenge plans and KPIs. Called
//! synchronously at challenge creation; callers degrade on failure and
//! never retry here.

use async_trait::async_trait;
use error::Result;
use serde_json::{json, Value};

/// Produces challenge plans and KPI definitions
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Produce an ordered JSON list of plan steps for a challenge description
    async fn generate_plan(&self, description: &str) -> Result<Value>;

    /// Produce a KPI description and structured metrics for a challenge
    async fn generate_kpi(&self, name: &str, steps: &Value) -> Result<(String, Value)>;
}

/// Deterministic stand-in for an LLM-backed generator
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPlanner;

#[async_trait]
impl PlanGenerator for HeuristicPlanner {
    async fn generate_plan(&self, description: &str) -> Result<Value> {
        Ok(json!([
            format!("Clarify the goal: {description}"),
            "Break the goal into weekly milestones",
            "Review progress at the end of each week",
        ]))
    }

    async fn generate_kpi(&self, name: &str, steps: &Value) -> Result<(String, Value)> {
        let step_count = steps.as_array().map_or(0, Vec::len);
        Ok((
            format!("Weekly completion rate for '{name}'"),
            json!({
                "target_steps": step_count,
                "unit": "steps/week",
            }),
        ))
    }
}
