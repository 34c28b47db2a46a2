//! Aggregate statistics over completed assessments.

use serde::{Deserialize, Serialize};

use crate::model::ExamAssessment;
use crate::scoring::{round1, round2};

/// Distribution of total scores and percentages across a set of assessed
/// students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStats {
    pub students_assessed: usize,
    /// Mean of per-student total scores, rounded to 2 decimals.
    pub mean_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// Mean of per-student percentages, rounded to 1 decimal.
    pub mean_percentage: f64,
    pub min_percentage: f64,
    pub max_percentage: f64,
    /// Total questions that errored across all students.
    pub question_errors: usize,
}

impl RosterStats {
    pub fn compute(assessments: &[ExamAssessment]) -> Self {
        if assessments.is_empty() {
            return Self {
                students_assessed: 0,
                mean_score: 0.0,
                min_score: 0.0,
                max_score: 0.0,
                mean_percentage: 0.0,
                min_percentage: 0.0,
                max_percentage: 0.0,
                question_errors: 0,
            };
        }

        let (score_sum, score_min, score_max) =
            spread(assessments.iter().map(|a| a.calculated_score));
        let (pct_sum, pct_min, pct_max) = spread(assessments.iter().map(|a| a.percentage));
        let question_errors = assessments
            .iter()
            .flat_map(|a| &a.assessments)
            .filter(|q| q.status == crate::model::QuestionStatus::Error)
            .count();

        let n = assessments.len() as f64;
        Self {
            students_assessed: assessments.len(),
            mean_score: round2(score_sum / n),
            min_score: round2(score_min),
            max_score: round2(score_max),
            mean_percentage: round1(pct_sum / n),
            min_percentage: round1(pct_min),
            max_percentage: round1(pct_max),
            question_errors,
        }
    }
}

fn spread(values: impl Iterator<Item = f64>) -> (f64, f64, f64) {
    values.fold((0.0, f64::INFINITY, f64::NEG_INFINITY), |(sum, min, max), v| {
        (sum + v, min.min(v), max.max(v))
    })
}

/// Timing and throughput for one scheduler worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerStats {
    /// Worker index, 0-based, stable across the run.
    pub worker_id: usize,
    /// Students this worker was assigned.
    pub assigned: usize,
    /// Students that completed successfully.
    pub completed: usize,
    /// Students that failed.
    pub failed: usize,
    /// Mean total score across this worker's completed students, rounded
    /// to 2 decimals. Zero when nothing completed.
    pub mean_score: f64,
    /// Mean percentage across this worker's completed students, rounded to
    /// 1 decimal. Zero when nothing completed.
    pub mean_percentage: f64,
    /// Wall-clock time this worker spent, in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExamAssessment, SCORING_SYSTEM_LABEL};

    fn assessment(score: f64, percentage: f64) -> ExamAssessment {
        ExamAssessment {
            student_email: "s@x.edu".into(),
            calculated_score: score,
            max_score: 10.0,
            percentage,
            scoring_system: SCORING_SYSTEM_LABEL.into(),
            assessments: Vec::new(),
            reference_grades: None,
        }
    }

    #[test]
    fn empty_set_is_all_zeroes() {
        let stats = RosterStats::compute(&[]);
        assert_eq!(stats.students_assessed, 0);
        assert_eq!(stats.mean_score, 0.0);
        assert_eq!(stats.mean_percentage, 0.0);
    }

    #[test]
    fn mean_min_max() {
        let stats = RosterStats::compute(&[
            assessment(5.0, 50.0),
            assessment(7.0, 70.0),
            assessment(9.0, 90.0),
        ]);
        assert_eq!(stats.students_assessed, 3);
        assert_eq!(stats.mean_score, 7.0);
        assert_eq!(stats.min_score, 5.0);
        assert_eq!(stats.max_score, 9.0);
        assert_eq!(stats.mean_percentage, 70.0);
        assert_eq!(stats.min_percentage, 50.0);
        assert_eq!(stats.max_percentage, 90.0);
    }

    #[test]
    fn means_are_rounded() {
        let stats = RosterStats::compute(&[
            assessment(5.0, 50.0),
            assessment(5.1, 51.0),
            assessment(5.1, 51.0),
        ]);
        assert_eq!(stats.mean_score, 5.07);
        assert_eq!(stats.mean_percentage, 50.7);
    }
}
