//! Report builder: start -> add step results -> finish.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{
    ExecutionInfo, RunMetrics, RunRecord, RunStatus, RunSummary, StepResult, StepStatus, TestInfo,
};

const REPORT_VERSION: &str = "1.0";
const ENVIRONMENT: &str = "SIMULATION";

/// Accumulates one run's results and finalizes them exactly once.
///
/// `finish` consumes the builder, so a finalized `RunRecord` can never be
/// amended afterwards.
pub struct ReportBuilder {
    record: RunRecord,
    started: DateTime<Utc>,
}

impl ReportBuilder {
    /// Begin a fresh run record with a generated `test_<8 hex>` identifier.
    pub fn start(name: &str, description: Option<&str>, author: &str) -> Self {
        let started = Utc::now();
        let test_id = format!("test_{}", &Uuid::new_v4().simple().to_string()[..8]);

        let record = RunRecord {
            test_info: TestInfo {
                name: name.to_string(),
                version: REPORT_VERSION.to_string(),
                author: author.to_string(),
                description: description.map(str::to_string),
            },
            execution_info: ExecutionInfo {
                test_id,
                started_at: started.to_rfc3339(),
                ended_at: None,
                duration_s: 0.0,
                status: RunStatus::Running,
                environment: ENVIRONMENT.to_string(),
            },
            summary: RunSummary {
                overall_result: RunStatus::Running,
                passed_steps: 0,
                failed_steps: 0,
                failure_reason: None,
            },
            steps: Vec::new(),
            metrics: RunMetrics::default(),
        };

        Self { record, started }
    }

    pub fn test_id(&self) -> &str {
        &self.record.execution_info.test_id
    }

    /// Append a completed step result and update the running tally.
    /// Results are never reordered or removed.
    pub fn add_step_result(&mut self, result: StepResult) {
        match result.status {
            StepStatus::Pass => self.record.summary.passed_steps += 1,
            StepStatus::Fail => self.record.summary.failed_steps += 1,
        }
        self.record.steps.push(result);
    }

    /// Stamp the end time, final status, and aggregate metrics, yielding the
    /// immutable record.
    pub fn finish(
        mut self,
        status: RunStatus,
        failure_reason: Option<String>,
        max_temperature_c: f64,
        avg_speed_rpm: f64,
    ) -> RunRecord {
        let ended = Utc::now();
        let duration_s = (ended - self.started).num_milliseconds() as f64 / 1000.0;

        self.record.execution_info.ended_at = Some(ended.to_rfc3339());
        self.record.execution_info.duration_s = duration_s;
        self.record.execution_info.status = status;

        self.record.summary.overall_result = status;
        self.record.summary.failure_reason = failure_reason;

        self.record.metrics = RunMetrics {
            max_temperature_c,
            avg_speed_rpm,
            test_duration_s: duration_s,
        };

        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureDetail;

    fn step(status: StepStatus) -> StepResult {
        StepResult {
            step: "wait".to_string(),
            description: "test step".to_string(),
            status,
            started_at: Utc::now().to_rfc3339(),
            ended_at: Utc::now().to_rfc3339(),
            input_params: serde_json::json!({ "step": "wait", "duration_s": 1.0 }),
            observed: None,
            failure_details: match status {
                StepStatus::Pass => None,
                StepStatus::Fail => Some(FailureDetail {
                    error: "boom".to_string(),
                }),
            },
        }
    }

    #[test]
    fn builder_counts_and_finalizes() {
        let mut builder = ReportBuilder::start("Spin Up", Some("basic run"), "bench");
        assert!(builder.test_id().starts_with("test_"));
        assert_eq!(builder.test_id().len(), "test_".len() + 8);

        builder.add_step_result(step(StepStatus::Pass));
        builder.add_step_result(step(StepStatus::Pass));
        builder.add_step_result(step(StepStatus::Fail));

        let record = builder.finish(
            RunStatus::Fail,
            Some("Speed violation".to_string()),
            61.2,
            1450.0,
        );

        assert_eq!(record.summary.passed_steps, 2);
        assert_eq!(record.summary.failed_steps, 1);
        assert_eq!(record.summary.overall_result, RunStatus::Fail);
        assert_eq!(record.execution_info.status, RunStatus::Fail);
        assert!(record.execution_info.ended_at.is_some());
        assert!(record.execution_info.duration_s >= 0.0);
        assert_eq!(record.metrics.max_temperature_c, 61.2);
        assert_eq!(record.metrics.avg_speed_rpm, 1450.0);
        assert_eq!(record.metrics.test_duration_s, record.execution_info.duration_s);
        assert_eq!(record.steps.len(), 3);
    }

    #[test]
    fn pass_run_has_no_failure_reason() {
        let builder = ReportBuilder::start("OK", None, "bench");
        let record = builder.finish(RunStatus::Pass, None, 40.0, 900.0);
        assert_eq!(record.summary.overall_result, RunStatus::Pass);
        assert!(record.summary.failure_reason.is_none());
        assert_eq!(record.test_info.version, "1.0");
        assert_eq!(record.execution_info.environment, "SIMULATION");
    }

    #[test]
    fn status_serializes_screaming() {
        let json = serde_json::to_string(&RunStatus::Aborted).unwrap();
        assert_eq!(json, "\"ABORTED\"");
        let json = serde_json::to_string(&StepStatus::Pass).unwrap();
        assert_eq!(json, "\"PASS\"");
    }
}
