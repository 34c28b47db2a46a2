//! Filesystem result store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use examforge_core::model::ExamAssessment;
use examforge_core::traits::{ResultStore, SavedPaths};

use crate::summary::render_summary;

/// Stores each assessment under `{root}/{email}/`, as pretty-printed
/// `assessment.json` plus a human-readable `summary.txt`. Writes are
/// idempotent: re-assessing a student overwrites both files.
pub struct FsResultStore {
    root: PathBuf,
}

impl FsResultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one student, keyed by canonical identity.
    pub fn student_dir(&self, email: &str) -> PathBuf {
        self.root.join(email)
    }

    /// Load a previously persisted assessment, if any.
    pub fn load(&self, email: &str) -> Result<Option<ExamAssessment>> {
        let path = self.student_dir(email).join("assessment.json");
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let assessment = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(assessment))
    }
}

impl ResultStore for FsResultStore {
    fn persist(&self, assessment: &ExamAssessment) -> Result<SavedPaths> {
        let dir = self.student_dir(&assessment.student_email);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let assessment_path = dir.join("assessment.json");
        let json = serde_json::to_string_pretty(assessment)
            .context("failed to serialize assessment")?;
        std::fs::write(&assessment_path, json)
            .with_context(|| format!("failed to write {}", assessment_path.display()))?;

        let summary_path = dir.join("summary.txt");
        std::fs::write(&summary_path, render_summary(assessment))
            .with_context(|| format!("failed to write {}", summary_path.display()))?;

        debug!(student = %assessment.student_email, dir = %dir.display(), "persisted assessment");
        Ok(SavedPaths {
            assessment: assessment_path,
            summary: summary_path,
        })
    }
}
