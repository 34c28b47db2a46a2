pub mod assess;
pub mod init;
pub mod list_models;
pub mod run;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use examforge_core::assessor::AssessorConfig;
use examforge_core::catalog::{ExamCatalog, QuestionBank};
use examforge_core::parser::{exam_paths_for_date, load_exam};
use examforge_core::traits::FeatureJudge;
use examforge_providers::config::{create_judge, load_config_from, ExamforgeConfig};

/// Config plus command-line overrides, resolved once per invocation.
pub(crate) struct RunContext {
    pub config: ExamforgeConfig,
    pub provider_name: String,
}

impl RunContext {
    pub fn new(
        config_path: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        workers: Option<usize>,
        temperature: Option<f64>,
        exams_dir: Option<PathBuf>,
        solutions_dir: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = load_config_from(config_path.as_deref())?;
        if let Some(model) = model {
            config.default_model = model;
        }
        if let Some(workers) = workers {
            anyhow::ensure!(workers >= 1, "workers must be at least 1");
            config.workers = workers;
        }
        if let Some(temperature) = temperature {
            anyhow::ensure!(
                (0.0..=2.0).contains(&temperature),
                "temperature must be between 0.0 and 2.0"
            );
            config.default_temperature = temperature;
        }
        if let Some(dir) = exams_dir {
            config.exams_dir = dir;
        }
        if let Some(dir) = solutions_dir {
            config.solutions_dir = dir;
        }
        if let Some(dir) = output {
            config.output_dir = dir;
        }
        let provider_name = provider.unwrap_or_else(|| config.default_provider.clone());
        Ok(Self {
            config,
            provider_name,
        })
    }

    /// Build the configured judge, failing before any work starts when the
    /// backend is unknown or has no credentials.
    pub fn judge(&self) -> Result<Arc<dyn FeatureJudge>> {
        let provider_config = self.config.providers.get(&self.provider_name).ok_or_else(|| {
            anyhow::anyhow!(
                "judge backend '{}' not found in config. Available: {:?}",
                self.provider_name,
                self.config.providers.keys().collect::<Vec<_>>()
            )
        })?;
        Ok(Arc::from(create_judge(&self.provider_name, provider_config)?))
    }

    pub fn assessor_config(&self) -> AssessorConfig {
        AssessorConfig {
            model: self.config.default_model.clone(),
            temperature: self.config.default_temperature,
            max_tokens: self.config.max_tokens,
            max_retries: self.config.max_retries,
            retry_delay: Duration::from_millis(self.config.retry_delay_ms),
            ..AssessorConfig::default()
        }
    }

    /// Load the exam documents for a date and resolve their checklists.
    /// Returns the catalog plus the question ids without a checklist.
    ///
    /// When the solutions directory carries a `catalog.toml` question bank,
    /// question ids are resolved through it and default weights replaced
    /// with the bank's.
    pub fn load_catalog(&self, date: &str) -> Result<(ExamCatalog, Vec<String>)> {
        let paths = exam_paths_for_date(&self.config.exams_dir, date);
        let mut roster = load_exam(&paths)?;

        let bank_path = self.config.solutions_dir.join("catalog.toml");
        if bank_path.exists() {
            let bank = QuestionBank::load(&bank_path)?;
            bank.apply_to_roster(&mut roster)?;
        }

        ExamCatalog::assemble(roster, &self.config.solutions_dir)
    }
}
