//! Run record data types.
//!
//! Timestamps are RFC 3339 strings throughout so records round-trip through
//! JSON without a schema. A `RunRecord` is immutable once finalized.

use serde::{Deserialize, Serialize};

pub type TestId = String;

/// Identity block of a test run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestInfo {
    pub name: String,
    pub version: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Execution window and terminal status of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionInfo {
    pub test_id: TestId,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub duration_s: f64,
    pub status: RunStatus,
    pub environment: String,
}

/// Terminal (or in-flight) status of a whole run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Running,
    Pass,
    Fail,
    Aborted,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Pending => "PENDING",
            RunStatus::Running => "RUNNING",
            RunStatus::Pass => "PASS",
            RunStatus::Fail => "FAIL",
            RunStatus::Aborted => "ABORTED",
        };
        f.write_str(s)
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Pass,
    Fail,
}

/// Extremes observed across one monitoring window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorStats {
    pub speed_rpm_min: f64,
    pub speed_rpm_max: f64,
    pub temperature_c_max: f64,
}

/// Plain-text failure detail attached to a failed step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureDetail {
    pub error: String,
}

/// Immutable record of one executed step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepResult {
    /// Step kind name (e.g. "set_speed", "monitor").
    pub step: String,
    pub description: String,
    pub status: StepStatus,
    pub started_at: String,
    pub ended_at: String,
    /// Echo of the step as scripted, for the report reader.
    #[serde(default)]
    pub input_params: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<MonitorStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_details: Option<FailureDetail>,
}

/// Running pass/fail tally and overall verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub overall_result: RunStatus,
    pub passed_steps: usize,
    pub failed_steps: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Aggregate metrics across all monitoring windows of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunMetrics {
    pub max_temperature_c: f64,
    pub avg_speed_rpm: f64,
    pub test_duration_s: f64,
}

/// Finalized result of one full sequence execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub test_info: TestInfo,
    pub execution_info: ExecutionInfo,
    pub summary: RunSummary,
    #[serde(default)]
    pub steps: Vec<StepResult>,
    #[serde(default)]
    pub metrics: RunMetrics,
}
