//! Batch orchestrator: heterogeneous task lists with per-task failure
//! isolation.
//!
//! Serves both batch endpoints (extract-multi and render-extract-multi).
//! Tasks run strictly sequentially in input order: each render task owns
//! a dedicated browser process, and unconstrained concurrency would
//! exhaust process and memory limits. One task's failure never prevents
//! subsequent tasks from running; its record carries the classified error
//! instead of a result. Batch tasks bypass the shared cache (see
//! DESIGN.md).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use pluck_client::{extract_css, extract_xpath};
use pluck_core::Error;

use crate::context::AppContext;
use crate::ops::render_extract::render;

/// A recognized extraction task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExtractionTask {
    Css { url: String, selector: String },
    Xpath { url: String, xpath: String },
    Render { url: String, selector: String },
}

/// Input for the batch endpoints. Tasks arrive as raw JSON so a malformed
/// entry degrades to a per-task error record instead of failing the whole
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchParams {
    pub tasks: Vec<Value>,
}

/// One record per input task, at the matching index: the task as
/// submitted, plus either its result or its classified error.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub task: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run every task in input order, collecting an order-preserving record
/// sequence. Only a malformed request (non-array tasks) fails before this
/// is reached; nothing inside the batch aborts it.
pub async fn run_batch_impl(ctx: &AppContext, params: BatchParams) -> Vec<TaskOutcome> {
    let mut outcomes = Vec::with_capacity(params.tasks.len());

    for (index, raw) in params.tasks.into_iter().enumerate() {
        let outcome = match parse_task(&raw) {
            Ok(task) => match run_task(ctx, task).await {
                Ok(values) => TaskOutcome { task: raw, result: Some(values), error: None },
                Err(e) => {
                    tracing::debug!(index, error = %e, "batch task failed");
                    TaskOutcome { task: raw, result: None, error: Some(e.to_string()) }
                }
            },
            Err(e) => TaskOutcome { task: raw, result: None, error: Some(e.to_string()) },
        };
        outcomes.push(outcome);
    }

    outcomes
}

fn parse_task(raw: &Value) -> Result<ExtractionTask, Error> {
    match raw.get("type").and_then(Value::as_str) {
        Some("css") | Some("xpath") | Some("render") => serde_json::from_value(raw.clone())
            .map_err(|e| Error::InvalidInput(e.to_string())),
        Some(other) => Err(Error::UnknownTaskType(other.to_string())),
        None => Err(Error::UnknownTaskType("missing type tag".into())),
    }
}

async fn run_task(ctx: &AppContext, task: ExtractionTask) -> Result<Vec<String>, Error> {
    match task {
        ExtractionTask::Css { url, selector } => {
            let body = ctx.fetcher.fetch(&url).await?;
            extract_css(&body, &selector)
        }
        ExtractionTask::Xpath { url, xpath } => {
            let body = ctx.fetcher.fetch(&url).await?;
            extract_xpath(&body, &xpath)
        }
        ExtractionTask::Render { url, selector } => render(ctx, &url, &selector).await,
    }
}
