//! The `examforge assess` command: one student, printed to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use examforge_core::assessor::Assessor;
use examforge_core::matcher;
use examforge_core::traits::ResultStore;
use examforge_report::{render_summary, FsResultStore};

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    student_query: String,
    date: String,
    exams_dir: Option<PathBuf>,
    solutions_dir: Option<PathBuf>,
    provider: Option<String>,
    model: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let ctx = super::RunContext::new(
        config_path,
        provider,
        model,
        None,
        None,
        exams_dir,
        solutions_dir,
        output,
    )?;

    let judge = ctx.judge()?;
    let (catalog, missing) = ctx.load_catalog(&date)?;
    for id in &missing {
        eprintln!("Warning: question {id} has no checklist; its answers will not be scored");
    }

    let student = matcher::resolve(&student_query, &catalog.roster.students)
        .map_err(anyhow::Error::from)?
        .clone();

    let store = Arc::new(FsResultStore::new(ctx.config.output_dir.clone()));
    let assessor = Assessor::new(
        judge,
        Some(Arc::clone(&store) as Arc<dyn ResultStore>),
        ctx.assessor_config(),
    );

    let assessment = assessor.assess_student(&catalog, &student).await;
    println!("{}", render_summary(&assessment));
    eprintln!(
        "Saved to: {}",
        store.student_dir(&assessment.student_email).display()
    );

    Ok(())
}
