use crate::cli::app::GenerateArgs;
use anyhow::{Context, Result};
use spyq_core::llm::{LlmConfig, ProviderManager};
use spyq_core::synthesis::{GenerationEngine, GenerationRequest};
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_CONFIG_FILE: &str = "spyq.toml";

pub async fn execute(args: GenerateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let manager = ProviderManager::from_config(&config);
    if manager.is_empty() {
        warn!("no providers are configured; generation will fail");
    }

    let engine = GenerationEngine::new(manager);
    let request = GenerationRequest::new(&args.request)
        .with_max_iterations(args.iterations)
        .with_fast_mode(args.fast);

    let output = engine
        .generate(request)
        .await
        .with_context(|| format!("generation failed for request: {}", args.request))?;

    info!(
        iterations = output.iterations_used,
        quality_score = output.quality_score,
        issues = output.issues.len(),
        "generation complete"
    );
    for issue in &output.issues {
        warn!("{issue}");
    }

    match args.output {
        Some(path) => {
            std::fs::write(&path, &output.generated_code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} ({} lines)", path.display(), output.generated_code.lines().count());
        }
        None => println!("{}", output.generated_code),
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<LlmConfig> {
    match config_path {
        Some(path) => LlmConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default.exists() {
                LlmConfig::from_file(&default)
                    .with_context(|| format!("failed to load {DEFAULT_CONFIG_FILE}"))
            } else {
                warn!("{DEFAULT_CONFIG_FILE} not found, using empty provider configuration");
                Ok(LlmConfig::default())
            }
        }
    }
}
