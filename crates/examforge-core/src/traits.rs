//! Core trait definitions for feature judges and result stores.
//!
//! The async judge trait is implemented by the `examforge-providers` crate;
//! the result store by `examforge-report`.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::JudgeError;
use crate::model::{ExamAssessment, FeatureType};

// ---------------------------------------------------------------------------
// Feature judge trait
// ---------------------------------------------------------------------------

/// Trait for external oracles that decide whether a feature is present in a
/// student's answer. Implementations must not retry internally; retry policy
/// belongs to the orchestrator.
#[async_trait]
pub trait FeatureJudge: Send + Sync {
    /// Human-readable judge backend name (e.g. "groq").
    fn name(&self) -> &str;

    /// Judge one feature of one answer.
    async fn judge(&self, request: &JudgeRequest) -> anyhow::Result<Verdict>;

    /// List models this backend can use.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to judge a single feature of a single answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeRequest {
    /// Model identifier (e.g. "llama-3.3-70b-versatile").
    pub model: String,
    /// The exam question display text.
    pub question_text: String,
    /// Weight class of the feature under judgment.
    pub feature_type: FeatureType,
    /// The feature description to look for.
    pub feature: String,
    /// The student's answer text.
    pub answer: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens for the judgment.
    pub max_tokens: u32,
}

/// A judge's structured decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the feature is present in the answer.
    pub satisfied: bool,
    /// Explanation of why the feature is present or not.
    pub motivation: String,
}

/// Information about an available judge model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Backend name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Result store trait
// ---------------------------------------------------------------------------

/// Durable persistence for per-student assessments.
///
/// Must be idempotent: persisting twice for the same identity overwrites.
pub trait ResultStore: Send + Sync {
    /// Persist one assessment, keyed by canonical student identity.
    fn persist(&self, assessment: &ExamAssessment) -> anyhow::Result<SavedPaths>;
}

/// Where an assessment was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPaths {
    /// Full JSON assessment.
    pub assessment: PathBuf,
    /// Human-readable summary.
    pub summary: PathBuf,
}

// ---------------------------------------------------------------------------
// Judge prompt
// ---------------------------------------------------------------------------

/// System prompt for judge backends.
pub const JUDGE_SYSTEM_PROMPT: &str = "You are an exam grader. You check whether one expected feature \
is present in a student's answer. Respond ONLY with a JSON object of the form \
{\"satisfied\": true|false, \"motivation\": \"...\"}. Do not include markdown \
formatting or any text outside the JSON object.";

/// Build the user prompt for one feature judgment.
pub fn build_judge_prompt(request: &JudgeRequest) -> String {
    format!(
        "Exam question:\n{question}\n\n\
         A perfect answer contains this {kind} feature, which should be present:\n\
         {feature}\n\n\
         Student answer:\n{answer}\n\n\
         Decide whether the feature is actually present in the student answer. \
         Reply with a JSON object: {{\"satisfied\": true|false, \"motivation\": \"why\"}}.",
        question = request.question_text,
        kind = request.feature_type,
        feature = request.feature,
        answer = request.answer,
    )
}

/// Parse a judge reply into a [`Verdict`].
///
/// Judges are instructed to reply with bare JSON, but models wrap replies
/// in markdown fences or prose often enough that we extract the outermost
/// JSON object before parsing.
pub fn parse_verdict_content(content: &str) -> Result<Verdict, JudgeError> {
    let trimmed = content.trim();
    let candidate = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };
    serde_json::from_str(candidate)
        .map_err(|e| JudgeError::MalformedVerdict(format!("{e}: {trimmed}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_all_parts() {
        let request = JudgeRequest {
            model: "m".into(),
            question_text: "What is CI?".into(),
            feature_type: FeatureType::Core,
            feature: "mentions automated builds".into(),
            answer: "CI builds the code on every push".into(),
            temperature: 0.1,
            max_tokens: 512,
        };
        let prompt = build_judge_prompt(&request);
        assert!(prompt.contains("What is CI?"));
        assert!(prompt.contains("mentions automated builds"));
        assert!(prompt.contains("CI builds the code on every push"));
        assert!(prompt.contains("core feature"));
    }

    #[test]
    fn prompt_names_feature_type() {
        let request = JudgeRequest {
            model: "m".into(),
            question_text: "q".into(),
            feature_type: FeatureType::ImportantDetail,
            feature: "f".into(),
            answer: "a".into(),
            temperature: 0.0,
            max_tokens: 128,
        };
        assert!(build_judge_prompt(&request).contains("important detail feature"));
    }

    #[test]
    fn verdict_parses_bare_json() {
        let verdict =
            parse_verdict_content(r#"{"satisfied": true, "motivation": "it is there"}"#).unwrap();
        assert!(verdict.satisfied);
        assert_eq!(verdict.motivation, "it is there");
    }

    #[test]
    fn verdict_parses_fenced_json() {
        let content = "```json\n{\"satisfied\": false, \"motivation\": \"missing\"}\n```";
        let verdict = parse_verdict_content(content).unwrap();
        assert!(!verdict.satisfied);
    }

    #[test]
    fn verdict_rejects_prose() {
        let err = parse_verdict_content("the feature is present, I think").unwrap_err();
        assert!(matches!(err, JudgeError::MalformedVerdict(_)));
    }
}
