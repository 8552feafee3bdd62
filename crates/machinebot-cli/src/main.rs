mod cli;
mod repl;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use machinebot_core::config::{BotConfig, ConfigProvider, FileConfigProvider};
use machinebot_core::logging::log_file_path;
use machinebot_core::{
    create_provider, ensure_model, CancellationToken, ConsoleLogger, FileLogger, Logger,
    OllamaClient, Orchestrator, ProviderModelConfig, ProvisionOutcome, ToolFilter, ToolRegistry,
};

use crate::cli::CliArgs;
use crate::repl::{ctrl_c, print_banner, run_session, ProgressObserver};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let logger: Arc<dyn Logger> = if args.verbose {
        Arc::new(ConsoleLogger::new())
    } else {
        Arc::new(FileLogger::new("cli"))
    };

    // Load config
    let config_provider = match &args.config {
        Some(path) => FileConfigProvider::new(path),
        None => FileConfigProvider::user(),
    };
    let mut config = config_provider
        .load()
        .await
        .with_context(|| format!("failed to load configuration from {}", config_provider.path().display()))?;
    args.apply_overrides(&mut config);

    if args.show_config {
        println!("{}", config_provider.export_json().context("failed to export configuration")?);
        return Ok(());
    }
    if args.save_config {
        if let Some(backup) = config_provider.backup().context("failed to back up configuration")? {
            println!("Previous configuration saved to {}", backup.display());
        }
        config_provider
            .save(&config)
            .await
            .with_context(|| format!("failed to write {}", config_provider.path().display()))?;
        println!("Configuration written to {}", config_provider.path().display());
        return Ok(());
    }
    logger.info(&format!(
        "[cli] provider={} model={} config={}",
        config.model.provider,
        config.model.name,
        config_provider.path().display()
    ));

    let filter = ToolFilter::from_settings(&config.tools);
    let registry = Arc::new(
        ToolRegistry::builtin(&config.tools, &filter).context("failed to build tool registry")?,
    );

    // Handle --list-tools
    if args.list_tools {
        println!("{}", registry.descriptions());
        return Ok(());
    }

    if config.uses_ollama() {
        prepare_ollama_model(&config, Arc::clone(&logger)).await?;
    }

    let mut model = ProviderModelConfig::new(config.model.name.clone());
    if let Some(key) = &config.model.api_key {
        model = model.with_api_key(key.clone());
    }
    if let Some(base) = &config.model.api_base {
        model = model.with_api_base(base.clone());
    }

    let provider = create_provider(&config.model.provider, Arc::clone(&logger));
    let mut bot = Orchestrator::new(provider, model, registry, Arc::clone(&logger))
        .with_options(config.model.stream_options())
        .with_cancel_token(CancellationToken::new())
        .with_observer(Arc::new(ProgressObserver));

    let mut stdout = std::io::stdout();
    print_banner(&mut stdout, &config.model.provider, &config.model.name)?;

    run_session(
        &mut bot,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        logger.as_ref(),
        ctrl_c,
    )
    .await?;

    if !args.verbose {
        println!("Debug log: {}", log_file_path().display());
    }
    Ok(())
}

/// Make sure the configured model exists on the Ollama server
async fn prepare_ollama_model(config: &BotConfig, logger: Arc<dyn Logger>) -> Result<()> {
    let client = OllamaClient::new(config.provisioning_host().to_string(), Arc::clone(&logger));

    if config.provisioning.auto_pull {
        println!(
            "Checking for model '{}' (pulling it if missing may take a few minutes on first run)...",
            config.model.name
        );
    }

    let outcome = ensure_model(
        &client,
        &config.model.name,
        config.provisioning.auto_pull,
        logger.as_ref(),
    )
    .await
    .with_context(|| {
        format!(
            "could not prepare model '{}' on {}; make sure Ollama is running (ollama serve)",
            config.model.name,
            client.host()
        )
    })?;

    if outcome == ProvisionOutcome::Pulled {
        println!("Model '{}' ready!", config.model.name);
    }
    Ok(())
}
