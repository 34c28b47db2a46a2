//! examforge-providers: feature judge backends.
//!
//! Implements the `FeatureJudge` trait for the Groq and OpenAI chat APIs,
//! plus a scriptable mock judge for exercising the assessment engine
//! without real API calls.

pub mod config;
pub mod error;
pub mod groq;
pub mod mock;
pub mod openai;

pub use config::{create_judge, load_config, ExamforgeConfig, ProviderConfig};
pub use error::JudgeError;
