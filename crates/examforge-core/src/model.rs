//! Core data model types for examforge.
//!
//! These are the fundamental types that the entire examforge system uses
//! to represent exam questions, checklists, student records, and results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoreStats;

/// The answer text students submit when they leave a question blank.
pub const UNANSWERED_SENTINEL: &str = "-";

/// Maximum score for questions whose document row does not specify one.
pub const DEFAULT_MAX_SCORE: f64 = 3.0;

/// Label describing how exam totals are weighted, attached to every
/// persisted assessment.
pub const SCORING_SYSTEM_LABEL: &str = "70% Core + 30% Important_Details";

/// Returns `true` if the given answer text counts as "no answer".
pub fn is_unanswered(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == UNANSWERED_SENTINEL
}

/// Weight class of a checklist feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    /// Essential element of a correct answer.
    Core,
    /// Detail that enriches an answer but is not essential.
    ImportantDetail,
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Core => write!(f, "core"),
            FeatureType::ImportantDetail => write!(f, "important detail"),
        }
    }
}

impl FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "core" => Ok(FeatureType::Core),
            "important detail" | "important_detail" | "important" => {
                Ok(FeatureType::ImportantDetail)
            }
            other => Err(format!("unknown feature type: {other}")),
        }
    }
}

/// One checkable expectation within a question's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Weight class.
    pub kind: FeatureType,
    /// What the judge should look for in the answer.
    pub description: String,
}

/// Ordered checklist of expected features for one question.
///
/// Iteration order is fixed: all core items first, then important details,
/// each group in document order. Verdict attribution depends on this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checklist {
    /// Essential elements, in document order.
    #[serde(default)]
    pub core: Vec<String>,
    /// Important details, in document order.
    #[serde(default)]
    pub details_important: Vec<String>,
}

impl Checklist {
    /// Enumerate features in judgment order.
    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        let core = self.core.iter().map(|d| Feature {
            kind: FeatureType::Core,
            description: d.clone(),
        });
        let important = self.details_important.iter().map(|d| Feature {
            kind: FeatureType::ImportantDetail,
            description: d.clone(),
        });
        core.chain(important)
    }

    pub fn len(&self) -> usize {
        self.core.len() + self.details_important.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty() && self.details_important.is_empty()
    }
}

/// One question as it appears on a given exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamQuestion {
    /// Position on the exam, 1-based.
    pub number: u32,
    /// Stable catalog identifier (e.g. "CI-5").
    pub id: String,
    /// Display text.
    #[serde(default)]
    pub text: String,
    /// Maximum score, when the exam document specifies one. Absent scores
    /// fall back to [`DEFAULT_MAX_SCORE`] and may be filled in from a
    /// question bank.
    #[serde(default)]
    pub score: Option<f64>,
}

impl ExamQuestion {
    /// Maximum score for this question.
    pub fn max_score(&self) -> f64 {
        self.score.unwrap_or(DEFAULT_MAX_SCORE)
    }
}

/// Externally supplied grades used only for reporting comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceGrades {
    /// Total grade from the external gradebook.
    pub total: f64,
    /// Per-question grades keyed by question number.
    #[serde(default)]
    pub per_question: BTreeMap<u32, f64>,
}

/// One student's roster entry: identity plus raw responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Canonical identity.
    pub email: String,
    /// Raw answer text keyed by question number. Entries may still hold the
    /// unanswered sentinel; normalization happens at assessment time.
    #[serde(default)]
    pub responses: BTreeMap<u32, String>,
    /// When the attempt started, verbatim from the source document.
    #[serde(default)]
    pub started: Option<String>,
    /// When the attempt completed.
    #[serde(default)]
    pub completed: Option<String>,
    /// Time taken, verbatim.
    #[serde(default)]
    pub time_taken: Option<String>,
    /// Reference grades for comparison, never used for scoring.
    #[serde(default)]
    pub reference_grades: Option<ReferenceGrades>,
}

impl StudentRecord {
    /// The answer text for a question, or `None` if absent or unanswered.
    pub fn answer(&self, question_number: u32) -> Option<&str> {
        self.responses
            .get(&question_number)
            .map(String::as_str)
            .filter(|t| !is_unanswered(t))
    }

    /// Number of questions this student actually answered.
    pub fn answered_count(&self) -> usize {
        self.responses.values().filter(|t| !is_unanswered(t)).count()
    }
}

/// A fully loaded exam: questions plus the eligible student roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRoster {
    /// Identifier derived from the source documents.
    pub exam_id: String,
    /// Questions in exam order.
    pub questions: Vec<ExamQuestion>,
    /// Students in document order. Only finished attempts are included.
    pub students: Vec<StudentRecord>,
}

/// Outcome classification for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    /// The student did not answer; the judge was never consulted.
    NoResponse,
    /// Every feature was judged and the answer was scored.
    Assessed,
    /// The checklist was unavailable or a judgment call failed.
    Error,
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionStatus::NoResponse => write!(f, "no_response"),
            QuestionStatus::Assessed => write!(f, "assessed"),
            QuestionStatus::Error => write!(f, "error"),
        }
    }
}

/// A judge's decision for one feature of one answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVerdict {
    /// The feature description that was judged.
    pub feature: String,
    /// Weight class of the feature.
    pub feature_type: FeatureType,
    /// Whether the feature is present in the answer.
    pub satisfied: bool,
    /// The judge's rationale.
    pub motivation: String,
}

/// Result of assessing one question for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_number: u32,
    pub question_id: String,
    #[serde(default)]
    pub question_text: String,
    pub status: QuestionStatus,
    /// Always within `0.0..=max_score`, rounded to 2 decimals.
    pub score: f64,
    pub max_score: f64,
    /// Human-readable score derivation. Present only when assessed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<String>,
    /// Per-group statistics. Present only when assessed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ScoreStats>,
    /// Verdicts in checklist order. Empty unless assessed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_verdicts: Vec<FeatureVerdict>,
    /// Failure description. Present only on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The raw answer that was judged. Absent for NoResponse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_response: Option<String>,
}

impl QuestionResult {
    /// Result for an unanswered question.
    pub fn no_response(question: &ExamQuestion) -> Self {
        Self {
            question_number: question.number,
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            status: QuestionStatus::NoResponse,
            score: 0.0,
            max_score: question.max_score(),
            breakdown: None,
            statistics: None,
            feature_verdicts: Vec::new(),
            error: None,
            student_response: None,
        }
    }

    /// Result for a question whose assessment failed.
    pub fn error(question: &ExamQuestion, message: impl Into<String>) -> Self {
        Self {
            question_number: question.number,
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            status: QuestionStatus::Error,
            score: 0.0,
            max_score: question.max_score(),
            breakdown: None,
            statistics: None,
            feature_verdicts: Vec::new(),
            error: Some(message.into()),
            student_response: None,
        }
    }
}

/// A student's complete exam assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamAssessment {
    /// Canonical student identity.
    pub student_email: String,
    /// Sum of per-question scores.
    pub calculated_score: f64,
    /// Sum of per-question maximum scores.
    pub max_score: f64,
    /// `round(100 * calculated / max, 1)`, or 0 when max is 0.
    pub percentage: f64,
    /// How scores were weighted (see [`SCORING_SYSTEM_LABEL`]).
    pub scoring_system: String,
    /// One result per exam question, in exam order.
    pub assessments: Vec<QuestionResult>,
    /// External grades attached for comparison only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_grades: Option<ReferenceGrades>,
}
