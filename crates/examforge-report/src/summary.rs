//! Human-readable rendering of assessments and run reports.

use examforge_core::model::{ExamAssessment, QuestionResult, QuestionStatus};
use examforge_core::report::AggregateReport;

const RULE: &str = "============================================================";

/// Render the per-student summary written next to `assessment.json`.
pub fn render_summary(assessment: &ExamAssessment) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Exam assessment for {}\n", assessment.student_email));
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Score: {} / {} ({}%)\n",
        assessment.calculated_score, assessment.max_score, assessment.percentage
    ));
    out.push_str(&format!("Scoring system: {}\n", assessment.scoring_system));

    if let Some(reference) = &assessment.reference_grades {
        let delta = assessment.calculated_score - reference.total;
        out.push_str(&format!(
            "Reference grade: {} (delta {:+.2})\n",
            reference.total, delta
        ));
    }
    out.push('\n');

    for result in &assessment.assessments {
        render_question(&mut out, result, assessment.reference_grades.as_ref());
    }

    out
}

fn render_question(
    out: &mut String,
    result: &QuestionResult,
    reference: Option<&examforge_core::model::ReferenceGrades>,
) {
    out.push_str(&format!(
        "Question {} [{}] — {}\n",
        result.question_number, result.question_id, result.status
    ));
    out.push_str(&format!("  Score: {} / {}\n", result.score, result.max_score));

    if let Some(grade) = reference.and_then(|r| r.per_question.get(&result.question_number)) {
        out.push_str(&format!("  Reference: {grade}\n"));
    }

    match result.status {
        QuestionStatus::NoResponse => {
            out.push_str("  (no response)\n");
        }
        QuestionStatus::Error => {
            if let Some(error) = &result.error {
                out.push_str(&format!("  Error: {error}\n"));
            }
        }
        QuestionStatus::Assessed => {
            if let Some(breakdown) = &result.breakdown {
                out.push_str(&format!("  Breakdown: {breakdown}\n"));
            }
            for verdict in &result.feature_verdicts {
                let mark = if verdict.satisfied {
                    "✓ OK     "
                } else {
                    "✗ MISSING"
                };
                out.push_str(&format!(
                    "  {mark} [{}] {} — {}\n",
                    verdict.feature_type, verdict.feature, verdict.motivation
                ));
            }
        }
    }
    out.push('\n');
}

/// Render the aggregate run report as plain text.
pub fn render_aggregate(report: &AggregateReport) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Batch run {} — exam {}\n", report.id, report.exam_id));
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Model: {} | workers: {} | duration: {}ms\n",
        report.model, report.num_workers, report.duration_ms
    ));
    out.push_str(&format!(
        "Students assessed: {} | failed: {}\n",
        report.stats.students_assessed,
        report.failures.len()
    ));
    out.push_str(&format!(
        "Score mean/min/max: {} / {} / {}\n",
        report.stats.mean_score, report.stats.min_score, report.stats.max_score
    ));
    out.push_str(&format!(
        "Percentage mean/min/max: {} / {} / {}\n",
        report.stats.mean_percentage, report.stats.min_percentage, report.stats.max_percentage
    ));
    if report.stats.question_errors > 0 {
        out.push_str(&format!(
            "Question-level errors: {}\n",
            report.stats.question_errors
        ));
    }
    out.push('\n');

    for worker in &report.worker_stats {
        out.push_str(&format!(
            "worker {}: {}/{} completed, mean {} ({}%), {}ms\n",
            worker.worker_id,
            worker.completed,
            worker.assigned,
            worker.mean_score,
            worker.mean_percentage,
            worker.duration_ms
        ));
    }

    if !report.failures.is_empty() {
        out.push('\n');
        out.push_str("Failures:\n");
        for failure in &report.failures {
            out.push_str(&format!("  {} — {}\n", failure.student_email, failure.error));
        }
    }

    out.push('\n');
    for assessment in &report.assessments {
        out.push_str(&format!(
            "  {:<40} {:>6} / {:<6} ({}%)\n",
            assessment.student_email,
            assessment.calculated_score,
            assessment.max_score,
            assessment.percentage
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use examforge_core::model::{
        ExamQuestion, FeatureType, FeatureVerdict, ReferenceGrades, SCORING_SYSTEM_LABEL,
    };
    use examforge_core::scoring::score_features;

    fn assessment() -> ExamAssessment {
        let question = ExamQuestion {
            number: 1,
            id: "CI-1".into(),
            text: "Explain CI.".into(),
            score: Some(3.0),
        };
        let verdicts = vec![
            FeatureVerdict {
                feature: "mentions automation".into(),
                feature_type: FeatureType::Core,
                satisfied: true,
                motivation: "automation is described".into(),
            },
            FeatureVerdict {
                feature: "names a CI tool".into(),
                feature_type: FeatureType::ImportantDetail,
                satisfied: false,
                motivation: "no tool is named".into(),
            },
        ];
        let outcome = score_features(&verdicts, question.max_score());
        let result = QuestionResult {
            question_number: 1,
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            status: QuestionStatus::Assessed,
            score: outcome.score,
            max_score: question.max_score(),
            breakdown: Some(outcome.breakdown),
            statistics: outcome.stats,
            feature_verdicts: verdicts,
            error: None,
            student_response: Some("CI automates builds".into()),
        };

        ExamAssessment {
            student_email: "alice@university.edu".into(),
            calculated_score: result.score,
            max_score: 3.0,
            percentage: 70.0,
            scoring_system: SCORING_SYSTEM_LABEL.into(),
            assessments: vec![result],
            reference_grades: Some(ReferenceGrades {
                total: 2.5,
                per_question: [(1, 2.5)].into_iter().collect(),
            }),
        }
    }

    #[test]
    fn summary_has_header_and_verdict_marks() {
        let text = render_summary(&assessment());
        assert!(text.contains("Exam assessment for alice@university.edu"));
        assert!(text.contains("Scoring system: 70% Core + 30% Important_Details"));
        assert!(text.contains("✓ OK"));
        assert!(text.contains("✗ MISSING"));
        assert!(text.contains("names a CI tool"));
    }

    #[test]
    fn summary_shows_reference_delta() {
        let text = render_summary(&assessment());
        assert!(text.contains("Reference grade: 2.5"));
        assert!(text.contains("delta"));
        assert!(text.contains("Reference: 2.5"));
    }

    #[test]
    fn summary_renders_no_response() {
        let mut a = assessment();
        a.assessments = vec![QuestionResult::no_response(&ExamQuestion {
            number: 2,
            id: "VC-1".into(),
            text: String::new(),
            score: Some(2.0),
        })];
        let text = render_summary(&a);
        assert!(text.contains("(no response)"));
    }
}
