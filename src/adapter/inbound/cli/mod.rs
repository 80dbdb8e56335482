//! CLI module graph and command dispatch.

pub mod bot;
pub mod check;
pub mod command;
pub mod output;
pub mod paths;
pub mod run;
pub mod strategy;

use std::path::Path;

use command::{CheckCommand, Cli, Commands};
use output::OutputConfig;

use crate::error::Result;
use crate::infrastructure::bootstrap::App;
use crate::infrastructure::config::logging::LoggingConfig;
use crate::infrastructure::config::settings::Config;

/// Load the configuration named by `--config`, applying `--database`.
///
/// A missing file yields the defaults.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(database) = &cli.database {
        config.database.clone_from(database);
        config.validate()?;
    }
    if !config.uses_memory_store() {
        paths::ensure_parent(Path::new(&config.database))?;
    }
    Ok(config)
}

/// Log level for management commands, driven by `-v`.
fn management_logging(verbose: u8) -> LoggingConfig {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    LoggingConfig::default().with_overrides(Some(level), false)
}

/// Run the parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose), cli.color);

    if let Commands::Run(args) = &cli.command {
        return run::execute(&cli, args).await;
    }

    management_logging(cli.verbose).init();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Check(CheckCommand::Config) => {
            check::config::execute_config(&cli.config, &config)
        }
        Commands::Check(CheckCommand::Telegram(args)) => {
            let app = App::build(config)?;
            check::telegram::execute_telegram(&app.config, &app.catalog, args.bot).await
        }
        Commands::Bot(command) => {
            let app = App::build(config)?;
            bot::execute(&app.catalog, command).await
        }
        Commands::Strategy(command) => {
            let app = App::build(config)?;
            strategy::execute(&app.catalog, command).await
        }
        Commands::Run(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn verbosity_raises_management_log_level() {
        assert_eq!(management_logging(0).level, "warn");
        assert_eq!(management_logging(1).level, "info");
        assert_eq!(management_logging(3).level, "debug");
    }

    #[test]
    fn database_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database = \"from-file.db\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "roasbot",
            "--config",
            path.to_str().unwrap(),
            "--database",
            ":memory:",
            "bot",
            "list",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert!(config.uses_memory_store());
    }
}
