//! The `palabras list-models` command.

use anyhow::Result;

use palabras_core::loader::load_models;
use palabras_providers::ollama::OllamaProvider;
use palabras_providers::ProviderConfig;

use super::CommonArgs;

pub async fn execute(installed: bool, common: CommonArgs) -> Result<()> {
    let config = common.load_config()?;
    let models = load_models(&config.suite_paths().models)?;

    println!("Model list ({}):", models.len());
    for model in &models {
        let state = if model.active { "active" } else { "inactive" };
        println!("  {} ({state})", model.name);
    }

    if installed {
        let ProviderConfig::Ollama { base_url } = &config.generator else {
            anyhow::bail!("--installed needs an ollama generator; configured: {:?}", config.generator);
        };
        let provider = OllamaProvider::new(base_url)?;
        let available = provider.list_models().await?;

        println!("\nInstalled on {base_url} ({}):", available.len());
        for name in &available {
            println!("  {name}");
        }

        let missing: Vec<_> = models
            .iter()
            .filter(|m| m.active && !available.contains(&m.name))
            .map(|m| m.name.as_str())
            .collect();
        if !missing.is_empty() {
            println!("\nActive but not installed: {}", missing.join(", "));
        }
    }

    Ok(())
}
