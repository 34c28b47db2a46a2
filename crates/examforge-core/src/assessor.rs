//! Per-student assessment.
//!
//! Walks one student through every exam question, consulting the feature
//! judge for each checklist item. Retry and timeout policy lives here, at
//! the orchestration layer; judge implementations stay single-shot.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::catalog::ExamCatalog;
use crate::error::JudgeError;
use crate::model::{
    Checklist, ExamAssessment, ExamQuestion, FeatureVerdict, QuestionResult, QuestionStatus,
    StudentRecord, SCORING_SYSTEM_LABEL,
};
use crate::scoring::{round1, round2, score_features};
use crate::traits::{FeatureJudge, JudgeRequest, ResultStore};

/// Cap on the doubling retry backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Knobs for one assessment run.
#[derive(Debug, Clone)]
pub struct AssessorConfig {
    /// Judge model identifier.
    pub model: String,
    /// Sampling temperature for judgments.
    pub temperature: f64,
    /// Token budget per judgment.
    pub max_tokens: u32,
    /// Hard deadline for a single judge call.
    pub judge_timeout: Duration,
    /// Retries after the first attempt, for transient failures only.
    pub max_retries: u32,
    /// Base delay before the first retry; doubles per attempt.
    pub retry_delay: Duration,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.1,
            max_tokens: 8000,
            judge_timeout: Duration::from_secs(120),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Assesses students one question at a time.
#[derive(Clone)]
pub struct Assessor {
    judge: Arc<dyn FeatureJudge>,
    store: Option<Arc<dyn ResultStore>>,
    config: AssessorConfig,
}

impl Assessor {
    pub fn new(
        judge: Arc<dyn FeatureJudge>,
        store: Option<Arc<dyn ResultStore>>,
        config: AssessorConfig,
    ) -> Self {
        Self {
            judge,
            store,
            config,
        }
    }

    pub fn config(&self) -> &AssessorConfig {
        &self.config
    }

    /// Assess every question for one student and persist the result if a
    /// store is configured. Question-level failures are recorded in the
    /// assessment rather than propagated; persistence failures are logged
    /// and swallowed so a full run is never lost to one bad write.
    pub async fn assess_student(
        &self,
        catalog: &ExamCatalog,
        student: &StudentRecord,
    ) -> ExamAssessment {
        info!(student = %student.email, "assessing student");

        let mut results = Vec::with_capacity(catalog.questions().len());
        for question in catalog.questions() {
            let result = self
                .assess_question(
                    question,
                    catalog.checklist(&question.id),
                    student.answer(question.number),
                )
                .await;
            results.push(result);
        }

        let calculated: f64 = results.iter().map(|r| r.score).sum();
        let max: f64 = results.iter().map(|r| r.max_score).sum();
        let percentage = if max > 0.0 {
            round1(calculated / max * 100.0)
        } else {
            0.0
        };

        let assessment = ExamAssessment {
            student_email: student.email.clone(),
            calculated_score: round2(calculated),
            max_score: max,
            percentage,
            scoring_system: SCORING_SYSTEM_LABEL.to_string(),
            assessments: results,
            reference_grades: student.reference_grades.clone(),
        };

        if let Some(store) = &self.store {
            if let Err(err) = store.persist(&assessment) {
                warn!(student = %student.email, error = %err, "failed to persist assessment");
            }
        }

        assessment
    }

    /// Assess one question. The judge is consulted only when the student
    /// answered and a non-empty checklist exists.
    pub async fn assess_question(
        &self,
        question: &ExamQuestion,
        checklist: Option<&Checklist>,
        answer: Option<&str>,
    ) -> QuestionResult {
        let Some(answer) = answer else {
            debug!(question = %question.id, "no response");
            return QuestionResult::no_response(question);
        };

        let Some(checklist) = checklist else {
            return QuestionResult::error(question, format!("no checklist for {}", question.id));
        };

        let mut verdicts = Vec::with_capacity(checklist.len());
        for feature in checklist.features() {
            let request = JudgeRequest {
                model: self.config.model.clone(),
                question_text: question.text.clone(),
                feature_type: feature.kind,
                feature: feature.description.clone(),
                answer: answer.to_string(),
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            };

            match self.judge_with_retry(&request).await {
                Ok(verdict) => verdicts.push(FeatureVerdict {
                    feature: feature.description,
                    feature_type: feature.kind,
                    satisfied: verdict.satisfied,
                    motivation: verdict.motivation,
                }),
                Err(err) => {
                    warn!(question = %question.id, error = %err, "feature judgment failed");
                    return QuestionResult::error(
                        question,
                        format!("judgment failed for '{}': {err}", feature.description),
                    );
                }
            }
        }

        let outcome = score_features(&verdicts, question.max_score());
        QuestionResult {
            question_number: question.number,
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            status: QuestionStatus::Assessed,
            score: outcome.score,
            max_score: question.max_score(),
            breakdown: Some(outcome.breakdown),
            statistics: outcome.stats,
            feature_verdicts: verdicts,
            error: None,
            student_response: Some(answer.to_string()),
        }
    }

    /// Call the judge with a deadline, retrying transient failures with a
    /// doubling backoff. Permanent failures (bad credentials, unknown
    /// model) abort immediately. A rate-limit retry hint from the judge
    /// overrides the computed backoff.
    async fn judge_with_retry(&self, request: &JudgeRequest) -> Result<crate::traits::Verdict> {
        let mut delay = self.config.retry_delay;

        for attempt in 0..=self.config.max_retries {
            let outcome =
                tokio::time::timeout(self.config.judge_timeout, self.judge.judge(request)).await;

            let err = match outcome {
                Ok(Ok(verdict)) => return Ok(verdict),
                Ok(Err(err)) => err,
                Err(_elapsed) => {
                    JudgeError::Timeout(self.config.judge_timeout.as_secs()).into()
                }
            };

            let judge_err = err.downcast_ref::<JudgeError>();
            if judge_err.is_some_and(JudgeError::is_permanent) {
                return Err(err);
            }
            if attempt == self.config.max_retries {
                return Err(err);
            }

            let wait = judge_err
                .and_then(JudgeError::retry_after_ms)
                .map(Duration::from_millis)
                .unwrap_or(delay)
                .min(MAX_BACKOFF);
            warn!(
                attempt = attempt + 1,
                wait_ms = wait.as_millis() as u64,
                error = %err,
                "judge call failed, retrying"
            );
            tokio::time::sleep(wait).await;
            delay = (delay * 2).min(MAX_BACKOFF);
        }

        unreachable!("retry loop always returns")
    }
}
