//! Report storage API: one pretty-printed JSON file per finalized run.

use chrono::DateTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::RunRecord;
use crate::{ResultsError, ResultsResult};

#[derive(Clone)]
pub struct ReportStore {
    root_dir: PathBuf,
}

impl ReportStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> ResultsResult<Self> {
        let root_dir = root_dir.into();
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Persist a finalized record as `report_<name>_<YYYYMMDD_HHMMSS>.json`
    /// and return the filename.
    pub fn save(&self, record: &RunRecord) -> ResultsResult<String> {
        let safe_name = record.test_info.name.replace(' ', "_");
        let stamp = DateTime::parse_from_rfc3339(&record.execution_info.started_at)
            .map(|t| t.format("%Y%m%d_%H%M%S").to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let filename = format!("report_{safe_name}_{stamp}.json");

        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.root_dir.join(&filename), json)?;
        Ok(filename)
    }

    pub fn load(&self, filename: &str) -> ResultsResult<RunRecord> {
        let path = self.root_dir.join(filename);
        if !path.exists() {
            return Err(ResultsError::ReportNotFound {
                filename: filename.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        let record = serde_json::from_str(&content)?;
        Ok(record)
    }

    /// Sorted filenames of all stored reports.
    pub fn list(&self) -> ResultsResult<Vec<String>> {
        let mut filenames = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.path().is_file() && name.starts_with("report_") && name.ends_with(".json") {
                filenames.push(name);
            }
        }
        filenames.sort();
        Ok(filenames)
    }
}
