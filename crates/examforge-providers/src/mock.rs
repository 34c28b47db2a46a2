//! Mock judge for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use examforge_core::traits::{FeatureJudge, JudgeRequest, ModelInfo, Verdict};

/// A mock judge for testing the assessment engine without real API calls.
///
/// Verdicts are selected by matching configured substrings against the
/// student answer; anything else gets the default verdict.
pub struct MockJudge {
    /// Map of answer substring → satisfied.
    rules: HashMap<String, bool>,
    /// Verdict when no rule matches.
    default_satisfied: bool,
    call_count: AtomicU32,
    last_request: Mutex<Option<JudgeRequest>>,
}

impl MockJudge {
    /// Judge that satisfies features whose configured substring appears in
    /// the answer.
    pub fn new(rules: HashMap<String, bool>) -> Self {
        Self {
            rules,
            default_satisfied: false,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Judge that always returns the same verdict.
    pub fn with_fixed_verdict(satisfied: bool) -> Self {
        Self {
            rules: HashMap::new(),
            default_satisfied: satisfied,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<JudgeRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeatureJudge for MockJudge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn judge(&self, request: &JudgeRequest) -> anyhow::Result<Verdict> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let satisfied = self
            .rules
            .iter()
            .find(|(key, _)| request.answer.contains(key.as_str()))
            .map(|(_, &v)| v)
            .unwrap_or(self.default_satisfied);

        Ok(Verdict {
            satisfied,
            motivation: if satisfied {
                format!("the answer covers '{}'", request.feature)
            } else {
                format!("the answer does not cover '{}'", request.feature)
            },
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examforge_core::model::FeatureType;

    fn request(answer: &str) -> JudgeRequest {
        JudgeRequest {
            model: "mock-model".into(),
            question_text: "q".into(),
            feature_type: FeatureType::Core,
            feature: "mentions pipelines".into(),
            answer: answer.into(),
            temperature: 0.0,
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn fixed_verdict() {
        let judge = MockJudge::with_fixed_verdict(true);
        let verdict = judge.judge(&request("anything")).await.unwrap();
        assert!(verdict.satisfied);
        assert_eq!(judge.call_count(), 1);
    }

    #[tokio::test]
    async fn substring_rules() {
        let mut rules = HashMap::new();
        rules.insert("pipeline".to_string(), true);
        rules.insert("vague".to_string(), false);
        let judge = MockJudge::new(rules);

        let hit = judge.judge(&request("a build pipeline runs")).await.unwrap();
        assert!(hit.satisfied);

        let miss = judge.judge(&request("something vague")).await.unwrap();
        assert!(!miss.satisfied);

        let fallthrough = judge.judge(&request("unrelated")).await.unwrap();
        assert!(!fallthrough.satisfied);
        assert_eq!(judge.call_count(), 3);
    }

    #[tokio::test]
    async fn records_last_request() {
        let judge = MockJudge::with_fixed_verdict(true);
        judge.judge(&request("recorded")).await.unwrap();
        let last = judge.last_request().unwrap();
        assert_eq!(last.answer, "recorded");
    }
}
