//! Parallel batch scheduling.
//!
//! Splits the roster into contiguous batches, runs one worker task per
//! batch, and folds the results into a single aggregate report. Workers are
//! joined in index order so report assembly is deterministic; assessments
//! are then sorted by student identity regardless of which worker produced
//! them.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessor::Assessor;
use crate::catalog::ExamCatalog;
use crate::model::{ExamAssessment, StudentRecord};
use crate::report::{AggregateReport, AssessmentFailure};
use crate::statistics::{RosterStats, WorkerStats};

/// Observer for per-student progress. Implementations must be cheap; they
/// are called from worker tasks.
pub trait ProgressReporter: Send + Sync {
    fn student_started(&self, worker_id: usize, email: &str);
    fn student_finished(&self, worker_id: usize, email: &str, percentage: f64);
    fn student_failed(&self, worker_id: usize, email: &str, error: &str);
}

/// Reporter that ignores everything.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn student_started(&self, _worker_id: usize, _email: &str) {}
    fn student_finished(&self, _worker_id: usize, _email: &str, _percentage: f64) {}
    fn student_failed(&self, _worker_id: usize, _email: &str, _error: &str) {}
}

/// Split items into at most `workers` contiguous batches of near-equal size.
pub fn partition<T: Clone>(items: &[T], workers: usize) -> Vec<Vec<T>> {
    let workers = workers.max(1);
    if items.is_empty() {
        return Vec::new();
    }
    let chunk = items.len().div_ceil(workers);
    items.chunks(chunk).map(<[T]>::to_vec).collect()
}

/// Runs a full roster through an [`Assessor`] with a fixed worker pool.
pub struct BatchScheduler {
    assessor: Assessor,
    num_workers: usize,
}

impl BatchScheduler {
    pub fn new(assessor: Assessor, num_workers: usize) -> Self {
        Self {
            assessor,
            num_workers: num_workers.max(1),
        }
    }

    /// Assess every student in the catalog. Individual student or worker
    /// failures are recorded in the report; only setup errors abort the run.
    pub async fn run(
        &self,
        catalog: Arc<ExamCatalog>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<AggregateReport> {
        let started = Instant::now();
        let batches = partition(&catalog.roster.students, self.num_workers);
        info!(
            students = catalog.roster.students.len(),
            workers = batches.len(),
            "starting batch run"
        );

        let mut handles = Vec::with_capacity(batches.len());
        for (worker_id, batch) in batches.into_iter().enumerate() {
            let assessor = self.assessor.clone();
            let catalog = Arc::clone(&catalog);
            let reporter = Arc::clone(&reporter);
            handles.push((
                worker_id,
                batch.iter().map(|s| s.email.clone()).collect::<Vec<_>>(),
                tokio::spawn(async move {
                    run_worker(worker_id, batch, assessor, catalog, reporter).await
                }),
            ));
        }

        let mut assessments = Vec::new();
        let mut failures = Vec::new();
        let mut worker_stats = Vec::new();

        for (worker_id, batch_emails, handle) in handles {
            match handle.await {
                Ok((mut done, stats)) => {
                    assessments.append(&mut done);
                    worker_stats.push(stats);
                }
                Err(join_err) => {
                    warn!(worker_id, error = %join_err, "worker task failed");
                    for email in &batch_emails {
                        reporter.student_failed(worker_id, email, "worker task failed");
                        failures.push(AssessmentFailure {
                            student_email: email.clone(),
                            error: format!("worker task failed: {join_err}"),
                        });
                    }
                    worker_stats.push(WorkerStats {
                        worker_id,
                        assigned: batch_emails.len(),
                        completed: 0,
                        failed: batch_emails.len(),
                        mean_score: 0.0,
                        mean_percentage: 0.0,
                        duration_ms: 0,
                    });
                }
            }
        }

        assessments.sort_by(|a, b| a.student_email.cmp(&b.student_email));
        let stats = RosterStats::compute(&assessments);

        Ok(AggregateReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            exam_id: catalog.roster.exam_id.clone(),
            model: self.assessor.config().model.clone(),
            num_workers: self.num_workers,
            assessments,
            failures,
            stats,
            worker_stats,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

async fn run_worker(
    worker_id: usize,
    batch: Vec<StudentRecord>,
    assessor: Assessor,
    catalog: Arc<ExamCatalog>,
    reporter: Arc<dyn ProgressReporter>,
) -> (Vec<ExamAssessment>, WorkerStats) {
    let started = Instant::now();
    let assigned = batch.len();
    let mut done = Vec::with_capacity(assigned);

    for student in batch {
        reporter.student_started(worker_id, &student.email);
        let assessment = assessor.assess_student(&catalog, &student).await;
        reporter.student_finished(worker_id, &student.email, assessment.percentage);
        done.push(assessment);
    }

    let (mean_score, mean_percentage) = if done.is_empty() {
        (0.0, 0.0)
    } else {
        let n = done.len() as f64;
        (
            crate::scoring::round2(done.iter().map(|a| a.calculated_score).sum::<f64>() / n),
            crate::scoring::round1(done.iter().map(|a| a.percentage).sum::<f64>() / n),
        )
    };
    let stats = WorkerStats {
        worker_id,
        assigned,
        completed: done.len(),
        failed: assigned - done.len(),
        mean_score,
        mean_percentage,
        duration_ms: started.elapsed().as_millis() as u64,
    };
    (done, stats)
}
