//! Sequence definition schema.
//!
//! Field names (`step`, `description`, `rpm`, `load_nm`, `duration_s`,
//! `criteria.speed_rpm.{min,max}`, `criteria.temperature_c.max`) are the
//! wire contract for any script-producing collaborator.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A parsed test script: identity block plus an ordered step list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SequenceDef {
    pub test_info: TestInfoDef,
    #[serde(default)]
    pub sequence: Vec<StepDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestInfoDef {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_author() -> String {
    "Unknown".to_string()
}

/// One scripted instruction: a human-readable description plus the
/// kind-specific parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: StepKind,
}

/// Closed set of step kinds. Unknown kinds fail deserialization, so a
/// malformed script is rejected before any step executes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepKind {
    StartMotor,
    SetSpeed {
        rpm: f64,
    },
    ApplyLoad {
        load_nm: f64,
    },
    RemoveLoad,
    StopMotor,
    Wait {
        #[serde(default = "default_wait_s")]
        duration_s: f64,
    },
    Monitor {
        #[serde(default = "default_monitor_s")]
        duration_s: f64,
        #[serde(default)]
        criteria: Criteria,
    },
    EndTest,
}

fn default_wait_s() -> f64 {
    1.0
}

fn default_monitor_s() -> f64 {
    5.0
}

/// Optional numeric bounds checked against every monitor sample.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Criteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_rpm: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<Bounds>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl StepDef {
    /// Step kind name as recorded in results (matches the YAML tag).
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            StepKind::StartMotor => "start_motor",
            StepKind::SetSpeed { .. } => "set_speed",
            StepKind::ApplyLoad { .. } => "apply_load",
            StepKind::RemoveLoad => "remove_load",
            StepKind::StopMotor => "stop_motor",
            StepKind::Wait { .. } => "wait",
            StepKind::Monitor { .. } => "monitor",
            StepKind::EndTest => "end_test",
        }
    }

    /// Echo of the step as scripted, for report recording.
    pub fn params_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl SequenceDef {
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        let def: SequenceDef = serde_yaml::from_str(yaml)?;
        Ok(def)
    }

    /// Structural checks beyond what serde enforces.
    pub fn validate(&self) -> EngineResult<()> {
        if self.test_info.name.trim().is_empty() {
            return Err(EngineError::Validation {
                what: "test_info.name must not be empty".to_string(),
            });
        }
        for (i, step) in self.sequence.iter().enumerate() {
            match &step.kind {
                StepKind::Wait { duration_s } | StepKind::Monitor { duration_s, .. }
                    if *duration_s <= 0.0 =>
                {
                    return Err(EngineError::Validation {
                        what: format!("step {}: duration_s must be positive", i + 1),
                    });
                }
                StepKind::Monitor { criteria, .. } => {
                    for bounds in [&criteria.speed_rpm, &criteria.temperature_c]
                        .into_iter()
                        .flatten()
                    {
                        if let (Some(min), Some(max)) = (bounds.min, bounds.max)
                            && min > max
                        {
                            return Err(EngineError::Validation {
                                what: format!("step {}: criteria min exceeds max", i + 1),
                            });
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Load and validate a sequence definition from a YAML file.
pub fn load_sequence(path: &Path) -> EngineResult<SequenceDef> {
    let content =
        std::fs::read_to_string(path).map_err(|source| EngineError::SequenceFileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let def = SequenceDef::from_yaml_str(&content)?;
    def.validate()?;
    Ok(def)
}
