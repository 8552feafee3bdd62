use std::path::PathBuf;

use clap::Parser;
use machinebot_core::BotConfig;

/// Chat with a local model about the machine it runs on.
///
/// The model can look up CPU, memory, disk, network, process, battery and
/// uptime information through built-in tools.
#[derive(Parser, Debug)]
#[command(name = "machinebot", version, about = "A local AI assistant that knows about your system")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/machinebot/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// LLM provider: ollama, openai, anthropic, gemini, ... (overrides config)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name (overrides config)
    #[arg(long)]
    pub model: Option<String>,

    /// API base URL (overrides config)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Do not pull a missing Ollama model at startup
    #[arg(long)]
    pub no_pull: bool,

    /// Log to the terminal instead of the debug log file
    #[arg(long, short)]
    pub verbose: bool,

    /// Print the available tools and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Print the configuration file as JSON and exit
    #[arg(long, conflicts_with = "save_config")]
    pub show_config: bool,

    /// Write the effective configuration back to the config file and exit
    #[arg(long)]
    pub save_config: bool,
}

impl CliArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut BotConfig) {
        if let Some(provider) = &self.provider {
            config.model.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.model.name = model.clone();
        }
        if let Some(api_base) = &self.api_base {
            config.model.api_base = Some(api_base.clone());
        }
        if self.no_pull {
            config.provisioning.auto_pull = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_config_alone() {
        let args = CliArgs::try_parse_from(["machinebot"]).unwrap();
        let mut config = BotConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config, BotConfig::default());
        assert!(!args.verbose);
        assert!(!args.list_tools);
        assert!(!args.show_config);
        assert!(!args.save_config);
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::try_parse_from([
            "machinebot",
            "--provider",
            "openai",
            "--model",
            "gpt-4o-mini",
            "--api-base",
            "http://proxy:8080/v1/",
            "--no-pull",
            "-v",
        ])
        .unwrap();

        let mut config = BotConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.model.provider, "openai");
        assert_eq!(config.model.name, "gpt-4o-mini");
        assert_eq!(config.model.api_base.as_deref(), Some("http://proxy:8080/v1/"));
        assert!(!config.provisioning.auto_pull);
        assert!(args.verbose);
    }

    #[test]
    fn test_config_path() {
        let args = CliArgs::try_parse_from(["machinebot", "--config", "/tmp/bot.yaml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/bot.yaml")));
    }

    #[test]
    fn test_config_commands() {
        let args = CliArgs::try_parse_from(["machinebot", "--save-config", "--model", "qwen2.5"]).unwrap();
        assert!(args.save_config);
        assert_eq!(args.model.as_deref(), Some("qwen2.5"));

        let args = CliArgs::try_parse_from(["machinebot", "--show-config"]).unwrap();
        assert!(args.show_config);

        assert!(CliArgs::try_parse_from(["machinebot", "--show-config", "--save-config"]).is_err());
    }
}
