//! Sequence runner: ordered step execution against a live controller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use mb_control::MotorController;
use mb_model::MotorSnapshot;
use mb_results::{
    FailureDetail, MonitorStats, ReportBuilder, RunRecord, RunStatus, StepResult, StepStatus,
};

use crate::error::Violation;
use crate::schema::{Criteria, SequenceDef, StepDef, StepKind};

/// Telemetry sampling interval inside monitor windows (seconds).
pub const SAMPLE_PERIOD_S: f64 = 0.1;

/// Informational progress notice emitted after each executed step.
#[derive(Debug, Clone)]
pub struct RunProgress {
    /// Zero-based index of the step just executed.
    pub index: usize,
    /// Total step count in the sequence.
    pub total: usize,
    pub description: String,
}

/// Cooperative abort signal, checked once per step boundary.
///
/// A `wait` or `monitor` step in progress runs to completion (or to its own
/// failure) before the abort is observed.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run-wide telemetry accumulator, owned by one run and never shared
/// across runs. Feeds the final aggregate metrics.
#[derive(Debug, Default)]
pub struct RunStats {
    speed_samples: Vec<f64>,
    max_temperature_c: f64,
}

impl RunStats {
    pub fn record(&mut self, speed_rpm: f64, temperature_c: f64) {
        self.speed_samples.push(speed_rpm);
        self.max_temperature_c = self.max_temperature_c.max(temperature_c);
    }

    pub fn sample_count(&self) -> usize {
        self.speed_samples.len()
    }

    pub fn max_temperature_c(&self) -> f64 {
        self.max_temperature_c
    }

    /// Average speed across every sample of every monitor window, zero when
    /// nothing was sampled.
    pub fn avg_speed_rpm(&self) -> f64 {
        if self.speed_samples.is_empty() {
            return 0.0;
        }
        self.speed_samples.iter().sum::<f64>() / self.speed_samples.len() as f64
    }
}

/// Executes sequence definitions against one controller, synchronously, on
/// the calling thread.
pub struct SequenceRunner<'c> {
    controller: &'c MotorController,
    abort: AbortHandle,
}

impl<'c> SequenceRunner<'c> {
    pub fn new(controller: &'c MotorController) -> Self {
        Self {
            controller,
            abort: AbortHandle::new(),
        }
    }

    /// Handle for requesting an abort from another thread.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Execute every step in order and return the finalized run record.
    ///
    /// Always yields a complete record: a violation marks the run FAIL (and
    /// soft-stops the motor), an abort request marks it ABORTED, and steps
    /// executed up to that point are recorded either way.
    pub fn run(
        &self,
        def: &SequenceDef,
        mut progress: Option<&mut dyn FnMut(RunProgress)>,
    ) -> RunRecord {
        let info = &def.test_info;
        let mut builder =
            ReportBuilder::start(&info.name, info.description.as_deref(), &info.author);
        tracing::info!(test_id = builder.test_id(), name = %info.name, "run started");

        let mut stats = RunStats::default();
        let total = def.sequence.len();
        let mut status = RunStatus::Pass;
        let mut failure_reason = None;

        for (index, step) in def.sequence.iter().enumerate() {
            if self.abort.is_aborted() {
                tracing::warn!(index, "abort requested, skipping remaining steps");
                status = RunStatus::Aborted;
                failure_reason = Some("User aborted".to_string());
                break;
            }

            let description = step
                .description
                .clone()
                .unwrap_or_else(|| format!("Step {}", index + 1));
            tracing::info!(step = step.kind_name(), %description, "executing step");

            let started_at = Utc::now();
            let outcome = self.execute_step(step, &mut stats);
            let ended_at = Utc::now();

            // The result is recorded before a violation propagates, so a
            // failed run still carries its failing step.
            let (step_status, observed, failure_details) = match &outcome {
                Ok(observed) => (StepStatus::Pass, observed.clone(), None),
                Err(violation) => (
                    StepStatus::Fail,
                    None,
                    Some(FailureDetail {
                        error: violation.to_string(),
                    }),
                ),
            };
            builder.add_step_result(StepResult {
                step: step.kind_name().to_string(),
                description: description.clone(),
                status: step_status,
                started_at: started_at.to_rfc3339(),
                ended_at: ended_at.to_rfc3339(),
                input_params: step.params_json(),
                observed,
                failure_details,
            });

            if let Some(cb) = progress.as_deref_mut() {
                cb(RunProgress {
                    index,
                    total,
                    description,
                });
            }

            if let Err(violation) = outcome {
                tracing::error!(%violation, "criteria violation, soft-stopping motor");
                self.controller.stop_motor();
                status = RunStatus::Fail;
                failure_reason = Some(violation.to_string());
                break;
            }
        }

        tracing::info!(?status, "run complete");
        builder.finish(
            status,
            failure_reason,
            stats.max_temperature_c(),
            stats.avg_speed_rpm(),
        )
    }

    /// Dispatch one step. Only `monitor` can fail or return observed data.
    fn execute_step(
        &self,
        step: &StepDef,
        stats: &mut RunStats,
    ) -> Result<Option<MonitorStats>, Violation> {
        match &step.kind {
            StepKind::StartMotor => {
                self.controller.start_motor();
                Ok(None)
            }
            StepKind::SetSpeed { rpm } => {
                self.controller.set_target_speed(*rpm);
                Ok(None)
            }
            StepKind::ApplyLoad { load_nm } => {
                self.controller.set_load(*load_nm);
                Ok(None)
            }
            StepKind::RemoveLoad => {
                self.controller.set_load(0.0);
                Ok(None)
            }
            StepKind::StopMotor => {
                self.controller.stop_motor();
                Ok(None)
            }
            StepKind::Wait { duration_s } => {
                tracing::info!(duration_s, "waiting");
                thread::sleep(step_duration(*duration_s));
                Ok(None)
            }
            StepKind::Monitor {
                duration_s,
                criteria,
            } => self.monitor(*duration_s, criteria, stats).map(Some),
            StepKind::EndTest => {
                tracing::info!("end of sequence");
                Ok(None)
            }
        }
    }

    /// Poll telemetry for the window, enforcing bounds on every sample.
    ///
    /// Samples are fed to the run-wide accumulator before the bound check,
    /// so the offending sample is part of the aggregate metrics.
    fn monitor(
        &self,
        duration_s: f64,
        criteria: &Criteria,
        stats: &mut RunStats,
    ) -> Result<MonitorStats, Violation> {
        tracing::info!(duration_s, ?criteria, "monitoring telemetry");
        let deadline = Instant::now() + step_duration(duration_s);

        let mut speed_min = f64::INFINITY;
        let mut speed_max = f64::NEG_INFINITY;
        let mut temp_max = f64::NEG_INFINITY;

        while Instant::now() < deadline {
            let snapshot = self.controller.get_status();

            stats.record(snapshot.speed_rpm, snapshot.temperature_c);
            speed_min = speed_min.min(snapshot.speed_rpm);
            speed_max = speed_max.max(snapshot.speed_rpm);
            temp_max = temp_max.max(snapshot.temperature_c);

            check_criteria(criteria, &snapshot)?;

            thread::sleep(Duration::from_secs_f64(SAMPLE_PERIOD_S));
        }

        tracing::info!(speed_min, speed_max, temp_max, "monitor window passed");
        Ok(MonitorStats {
            speed_rpm_min: speed_min,
            speed_rpm_max: speed_max,
            temperature_c_max: temp_max,
        })
    }
}

/// Step durations as a `Duration`, collapsing negative, non-finite, or
/// overlong values to zero.
///
/// `load_sequence` rejects such durations up front, but `run` accepts any
/// `SequenceDef`, so the runner must not panic on one that skipped
/// validation.
fn step_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

/// Check one telemetry sample against the configured bounds.
fn check_criteria(criteria: &Criteria, snapshot: &MotorSnapshot) -> Result<(), Violation> {
    if let Some(bounds) = &criteria.speed_rpm {
        if let Some(min) = bounds.min
            && snapshot.speed_rpm < min
        {
            return Err(Violation::SpeedBelowMin {
                value: snapshot.speed_rpm,
                min,
            });
        }
        if let Some(max) = bounds.max
            && snapshot.speed_rpm > max
        {
            return Err(Violation::SpeedAboveMax {
                value: snapshot.speed_rpm,
                max,
            });
        }
    }
    if let Some(bounds) = &criteria.temperature_c
        && let Some(max) = bounds.max
        && snapshot.temperature_c > max
    {
        return Err(Violation::TemperatureAboveMax {
            value: snapshot.temperature_c,
            max,
        });
    }
    Ok(())
}
