//! The `examforge list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use examforge_providers::create_judge;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = examforge_providers::config::load_config_from(config_path.as_deref())?;

    let mut found_any = false;

    for (name, provider_config) in &config.providers {
        if let Some(filter) = &provider_filter {
            if name != filter {
                continue;
            }
        }

        let judge = create_judge(name, provider_config)?;
        let models = judge.available_models();

        if !models.is_empty() {
            found_any = true;
            println!("Judge backend: {name}");
            for model in &models {
                println!(
                    "  {} — {} ({}K context)",
                    model.id,
                    model.name,
                    model.max_context / 1000,
                );
            }
            println!();
        }
    }

    if !found_any {
        println!("No judge backends configured. Run `examforge init` to create a config file.");
    }

    Ok(())
}
