//! Groq API judge implementation.
//!
//! Groq exposes an OpenAI-compatible chat completions endpoint; only the
//! base URL and the model catalog differ.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use examforge_core::traits::{
    build_judge_prompt, parse_verdict_content, FeatureJudge, JudgeRequest, ModelInfo, Verdict,
    JUDGE_SYSTEM_PROMPT,
};

use crate::error::JudgeError;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Short aliases accepted on the command line for Groq-hosted models.
pub fn resolve_model_alias(name: &str) -> &str {
    match name {
        "llama" | "llama-3.3" | "llama-70b" => "llama-3.3-70b-versatile",
        "llama-8b" => "llama-3.1-8b-instant",
        "gpt-oss" => "openai/gpt-oss-120b",
        "qwen" => "qwen/qwen3-32b",
        "kimi" => "moonshotai/kimi-k2-instruct",
        other => other,
    }
}

/// Groq-hosted judge.
pub struct GroqJudge {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqJudge {
    pub fn new(api_key: &str, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl FeatureJudge for GroqJudge {
    fn name(&self) -> &str {
        "groq"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn judge(&self, request: &JudgeRequest) -> anyhow::Result<Verdict> {
        let body = ChatRequest {
            model: resolve_model_alias(&request.model).to_string(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: JUDGE_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_judge_prompt(request),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JudgeError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    JudgeError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(JudgeError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(JudgeError::ModelNotFound(request.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: ChatResponse = response.json().await.map_err(|e| JudgeError::ApiError {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;

        let content = api_response
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();
        Ok(parse_verdict_content(content)?)
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "llama-3.3-70b-versatile".into(),
                name: "Llama 3.3 70B Versatile".into(),
                provider: "groq".into(),
                max_context: 131_072,
            },
            ModelInfo {
                id: "llama-3.1-8b-instant".into(),
                name: "Llama 3.1 8B Instant".into(),
                provider: "groq".into(),
                max_context: 131_072,
            },
            ModelInfo {
                id: "openai/gpt-oss-120b".into(),
                name: "GPT-OSS 120B".into(),
                provider: "groq".into(),
                max_context: 131_072,
            },
            ModelInfo {
                id: "qwen/qwen3-32b".into(),
                name: "Qwen3 32B".into(),
                provider: "groq".into(),
                max_context: 131_072,
            },
            ModelInfo {
                id: "moonshotai/kimi-k2-instruct".into(),
                name: "Kimi K2 Instruct".into(),
                provider: "groq".into(),
                max_context: 131_072,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examforge_core::model::FeatureType;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> JudgeRequest {
        JudgeRequest {
            model: "llama-3.3-70b-versatile".into(),
            question_text: "Explain CI.".into(),
            feature_type: FeatureType::Core,
            feature: "mentions automation".into(),
            answer: "CI automates builds on every push".into(),
            temperature: 0.1,
            max_tokens: 8000,
        }
    }

    #[tokio::test]
    async fn successful_judgment() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {
                "content": "{\"satisfied\": true, \"motivation\": \"automation is mentioned\"}",
                "role": "assistant"
            }, "index": 0}]
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let judge = GroqJudge::new("test-key", Some(server.uri()));
        let verdict = judge.judge(&request()).await.unwrap();
        assert!(verdict.satisfied);
        assert!(verdict.motivation.contains("automation"));
    }

    #[tokio::test]
    async fn fenced_reply_still_parses() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {
                "content": "```json\n{\"satisfied\": false, \"motivation\": \"not present\"}\n```",
                "role": "assistant"
            }, "index": 0}]
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let judge = GroqJudge::new("key", Some(server.uri()));
        let verdict = judge.judge(&request()).await.unwrap();
        assert!(!verdict.satisfied);
    }

    #[tokio::test]
    async fn rate_limit_maps_to_typed_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let judge = GroqJudge::new("key", Some(server.uri()));
        let err = judge.judge(&request()).await.unwrap_err();
        let judge_err = err.downcast_ref::<JudgeError>().unwrap();
        assert_eq!(judge_err.retry_after_ms(), Some(7000));
    }

    #[tokio::test]
    async fn auth_failure_is_permanent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let judge = GroqJudge::new("bad-key", Some(server.uri()));
        let err = judge.judge(&request()).await.unwrap_err();
        let judge_err = err.downcast_ref::<JudgeError>().unwrap();
        assert!(judge_err.is_permanent());
    }

    #[tokio::test]
    async fn prose_reply_is_malformed() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "Yes, I believe so.", "role": "assistant"}, "index": 0}]
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let judge = GroqJudge::new("key", Some(server.uri()));
        let err = judge.judge(&request()).await.unwrap_err();
        let judge_err = err.downcast_ref::<JudgeError>().unwrap();
        assert!(matches!(judge_err, JudgeError::MalformedVerdict(_)));
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(resolve_model_alias("llama"), "llama-3.3-70b-versatile");
        assert_eq!(resolve_model_alias("gpt-oss"), "openai/gpt-oss-120b");
        assert_eq!(resolve_model_alias("custom-model"), "custom-model");
    }
}
