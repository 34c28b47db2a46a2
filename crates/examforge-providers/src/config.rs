//! Judge configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examforge_core::traits::FeatureJudge;

use crate::groq::GroqJudge;
use crate::openai::OpenAiJudge;

/// Configuration for a single judge backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Groq {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Groq {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Groq")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
        }
    }
}

/// Top-level examforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamforgeConfig {
    /// Judge backend configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default judge backend to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default judge model.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for judgments.
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Token budget per judgment.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Max retries on transient judge errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Worker tasks for batch runs.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Directory holding exam documents.
    #[serde(default = "default_exams_dir")]
    pub exams_dir: PathBuf,
    /// Directory holding per-question checklist files.
    #[serde(default = "default_solutions_dir")]
    pub solutions_dir: PathBuf,
    /// Output directory for assessments and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_provider() -> String {
    "groq".to_string()
}
fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}
fn default_temperature() -> f64 {
    0.1
}
fn default_max_tokens() -> u32 {
    8000
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_workers() -> usize {
    3
}
fn default_exams_dir() -> PathBuf {
    PathBuf::from("./exams")
}
fn default_solutions_dir() -> PathBuf {
    PathBuf::from("./solutions")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./evaluations")
}

impl Default for ExamforgeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            workers: default_workers(),
            exams_dir: default_exams_dir(),
            solutions_dir: default_solutions_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Groq { api_key, base_url } => ProviderConfig::Groq {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examforge.toml` in the current directory
/// 2. `~/.config/examforge/config.toml`
///
/// Environment variable overrides: `GROQ_API_KEY`, `EXAMFORGE_OPENAI_KEY`.
pub fn load_config() -> Result<ExamforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examforge.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ExamforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamforgeConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        config
            .providers
            .entry("groq".into())
            .or_insert(ProviderConfig::Groq {
                api_key: String::new(),
                base_url: None,
            });
        if let Some(ProviderConfig::Groq { api_key, .. }) = config.providers.get_mut("groq") {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("EXAMFORGE_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let Some(ProviderConfig::OpenAI { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examforge"))
}

/// Create a judge instance from its configuration.
///
/// Fails fast on an empty API key so a batch run never starts with
/// credentials that every call would reject.
pub fn create_judge(name: &str, config: &ProviderConfig) -> Result<Box<dyn FeatureJudge>> {
    match config {
        ProviderConfig::Groq { api_key, base_url } => {
            if api_key.is_empty() {
                anyhow::bail!("no API key configured for judge '{name}' (set GROQ_API_KEY)");
            }
            Ok(Box::new(GroqJudge::new(api_key, base_url.clone())))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            if api_key.is_empty() {
                anyhow::bail!(
                    "no API key configured for judge '{name}' (set EXAMFORGE_OPENAI_KEY)"
                );
            }
            Ok(Box::new(OpenAiJudge::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMFORGE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_EXAMFORGE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_EXAMFORGE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_EXAMFORGE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = ExamforgeConfig::default();
        assert_eq!(config.default_provider, "groq");
        assert_eq!(config.default_model, "llama-3.3-70b-versatile");
        assert_eq!(config.default_temperature, 0.1);
        assert_eq!(config.max_tokens, 8000);
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
[providers.groq]
type = "groq"
api_key = "gsk-test"

[providers.openai]
type = "openai"
api_key = "sk-openai"

default_provider = "groq"
default_model = "llama-3.3-70b-versatile"
"#;
        let config: ExamforgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert!(matches!(
            config.providers.get("groq"),
            Some(ProviderConfig::Groq { .. })
        ));
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::Groq {
            api_key: "gsk-secret".into(),
            base_url: None,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("gsk-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let config = ProviderConfig::Groq {
            api_key: String::new(),
            base_url: None,
        };
        let err = create_judge("groq", &config).err().unwrap();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
