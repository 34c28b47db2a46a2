//! Aggregate run reports and their JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ExamAssessment;
use crate::statistics::{RosterStats, WorkerStats};

/// A student that could not be assessed at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentFailure {
    pub student_email: String,
    pub error: String,
}

/// Everything produced by one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the run finished.
    pub created_at: DateTime<Utc>,
    /// Identifier of the exam that was assessed.
    pub exam_id: String,
    /// Judge model used for every feature judgment.
    pub model: String,
    /// Workers the scheduler ran with.
    pub num_workers: usize,
    /// Completed assessments, sorted by student identity.
    pub assessments: Vec<ExamAssessment>,
    /// Students whose assessment failed entirely.
    #[serde(default)]
    pub failures: Vec<AssessmentFailure>,
    pub stats: RosterStats,
    #[serde(default)]
    pub worker_stats: Vec<WorkerStats>,
    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
}

impl AggregateReport {
    /// Save the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report previously written by [`AggregateReport::save_json`].
    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse report {}", path.display()))
    }
}
