//! The `examforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examforge_core::catalog::validate_catalog;

pub fn execute(
    date: String,
    exams_dir: Option<PathBuf>,
    solutions_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let ctx = super::RunContext::new(
        config_path,
        None,
        None,
        None,
        None,
        exams_dir,
        solutions_dir,
        None,
    )?;

    let (catalog, missing) = ctx.load_catalog(&date)?;
    println!(
        "Exam {}: {} questions, {} students",
        catalog.roster.exam_id,
        catalog.questions().len(),
        catalog.roster.students.len()
    );

    let warnings = validate_catalog(&catalog, &missing);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All documents valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
