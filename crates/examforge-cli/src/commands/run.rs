//! The `examforge run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use examforge_core::assessor::Assessor;
use examforge_core::report::AggregateReport;
use examforge_core::scheduler::{BatchScheduler, ProgressReporter};
use examforge_core::traits::ResultStore;
use examforge_report::{render_aggregate, FsResultStore};

use super::RunContext;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn student_started(&self, worker_id: usize, email: &str) {
        eprintln!("  [worker {worker_id}] assessing {email}");
    }

    fn student_finished(&self, worker_id: usize, email: &str, percentage: f64) {
        eprintln!("  [worker {worker_id}] done {email} ({percentage}%)");
    }

    fn student_failed(&self, worker_id: usize, email: &str, error: &str) {
        eprintln!("  [worker {worker_id}] FAILED {email}: {error}");
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    date: String,
    exams_dir: Option<PathBuf>,
    solutions_dir: Option<PathBuf>,
    provider: Option<String>,
    model: Option<String>,
    workers: Option<usize>,
    temperature: Option<f64>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let ctx = RunContext::new(
        config_path,
        provider,
        model,
        workers,
        temperature,
        exams_dir,
        solutions_dir,
        output,
    )?;

    // Judge first: missing credentials must abort before any loading work.
    let judge = ctx.judge()?;

    let (catalog, missing) = ctx.load_catalog(&date)?;
    for id in &missing {
        eprintln!("Warning: question {id} has no checklist; its answers will not be scored");
    }
    eprintln!(
        "Assessing {} students x {} questions with {} ({} workers)",
        catalog.roster.students.len(),
        catalog.questions().len(),
        ctx.config.default_model,
        ctx.config.workers,
    );
    eprintln!();

    let store: Arc<dyn ResultStore> = Arc::new(FsResultStore::new(ctx.config.output_dir.clone()));
    let assessor = Assessor::new(judge, Some(store), ctx.assessor_config());
    let scheduler = BatchScheduler::new(assessor, ctx.config.workers);

    let report = scheduler
        .run(Arc::new(catalog), Arc::new(ConsoleReporter))
        .await?;

    print_summary(&report);

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let json_path = ctx.config.output_dir.join(format!("report-{timestamp}.json"));
    report.save_json(&json_path)?;
    let text_path = ctx.config.output_dir.join(format!("report-{timestamp}.txt"));
    std::fs::write(&text_path, render_aggregate(&report))?;
    eprintln!("Report saved to: {}", json_path.display());
    eprintln!("Text report: {}", text_path.display());

    if !report.failures.is_empty() {
        eprintln!("\n{} student(s) failed to assess.", report.failures.len());
    }

    Ok(())
}

fn print_summary(report: &AggregateReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Student", "Score", "Max", "Percent", "Reference", "Errors"]);

    for assessment in &report.assessments {
        let errors = assessment
            .assessments
            .iter()
            .filter(|q| q.status == examforge_core::model::QuestionStatus::Error)
            .count();
        let reference = assessment
            .reference_grades
            .as_ref()
            .map(|r| format!("{}", r.total))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&assessment.student_email),
            Cell::new(format!("{}", assessment.calculated_score)),
            Cell::new(format!("{}", assessment.max_score)),
            Cell::new(format!("{}%", assessment.percentage)),
            Cell::new(reference),
            Cell::new(format!("{errors}")),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "score mean {} (min {}, max {}) | mean {}% | {}ms",
        report.stats.mean_score,
        report.stats.min_score,
        report.stats.max_score,
        report.stats.mean_percentage,
        report.duration_ms
    );
}
