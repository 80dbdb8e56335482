//! Command-line interface definitions.
//!
//! Defines the CLI structure for the roasbot application using `clap`.
//! The CLI runs the signal pipeline, manages bots and strategies in the
//! configuration store, and performs diagnostic checks.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::paths;

/// Game-outcome pattern detection with Telegram signal dispatch
#[derive(Parser, Debug)]
#[command(name = "roasbot")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Override the database path (":memory:" for an in-process store).
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the roasbot CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the signal pipeline, reading outcome events from stdin
    Run(RunArgs),

    /// Manage bots
    #[command(subcommand)]
    Bot(BotCommand),

    /// Manage strategies and their results
    #[command(subcommand)]
    Strategy(StrategyCommand),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `roasbot bot`.
#[derive(Subcommand, Debug)]
pub enum BotCommand {
    /// Register a new bot.
    Add(BotAddArgs),
    /// List all bots, newest first.
    List,
    /// Update selected fields of a bot.
    Update(BotUpdateArgs),
    /// Delete a bot with its strategies and results.
    Remove(IdArg),
}

/// Subcommands for `roasbot strategy`.
#[derive(Subcommand, Debug)]
pub enum StrategyCommand {
    /// Attach a strategy to a bot.
    Add(StrategyAddArgs),
    /// List the strategies of a bot.
    List(StrategyListArgs),
    /// Update selected fields of a strategy.
    Update(StrategyUpdateArgs),
    /// Delete a strategy and its results.
    Remove(IdArg),
    /// Zero the counters of a strategy.
    Reset(IdArg),
    /// Resolve a dispatched signal as win, win-gale, or loss.
    Resolve(ResolveArgs),
    /// Show recent dispatched signals of a strategy.
    History(HistoryArgs),
}

/// Subcommands for `roasbot check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file.
    Config,
    /// Verify a bot's Telegram token and send a test message.
    Telegram(TelegramCheckArgs),
}

/// Arguments for the `run` subcommand.
///
/// All optional fields override the corresponding configuration file values.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Start a background poller per active bot.
    #[arg(long)]
    pub poll: bool,

    /// Feed pollers from the bundled outcome simulator.
    #[arg(long)]
    pub simulate: bool,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Log signals instead of sending them through Telegram.
    #[arg(long)]
    pub no_telegram: bool,
}

/// A record id argument.
#[derive(Args, Debug)]
pub struct IdArg {
    pub id: i32,
}

/// Arguments for `bot add`.
#[derive(Args, Debug)]
pub struct BotAddArgs {
    pub name: String,

    /// Game type, e.g. aviator or mines.
    #[arg(long, default_value = "aviator")]
    pub game_type: String,

    /// Casino site label.
    #[arg(long)]
    pub site: Option<String>,

    /// Telegram bot token.
    #[arg(long)]
    pub token: Option<String>,

    /// Telegram chat id or @channel. Group ids are negative.
    #[arg(long, allow_hyphen_values = true)]
    pub chat: Option<String>,

    /// Create the bot disabled.
    #[arg(long)]
    pub inactive: bool,
}

/// Arguments for `bot update`.
#[derive(Args, Debug)]
pub struct BotUpdateArgs {
    pub id: i32,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub game_type: Option<String>,

    #[arg(long)]
    pub site: Option<String>,

    #[arg(long)]
    pub token: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub chat: Option<String>,

    /// Enable or disable the bot.
    #[arg(long)]
    pub active: Option<bool>,
}

/// Arguments for `strategy add`.
#[derive(Args, Debug)]
pub struct StrategyAddArgs {
    /// Owning bot id.
    #[arg(long)]
    pub bot: i32,

    #[arg(long)]
    pub name: String,

    /// Pattern identifier: low-mults, high-mults, or a sequence like R-R-G.
    #[arg(long)]
    pub pattern: String,

    /// Required run length.
    #[arg(long, default_value_t = 3)]
    pub need: u32,

    /// Action label shown in messages.
    #[arg(long, default_value = "")]
    pub action: String,

    /// Custom message template (disables the default message).
    #[arg(long)]
    pub message: Option<String>,

    /// Window start, HH:MM.
    #[arg(long)]
    pub start: Option<String>,

    /// Window end, HH:MM.
    #[arg(long)]
    pub end: Option<String>,

    /// Create the strategy disabled.
    #[arg(long)]
    pub inactive: bool,
}

/// Arguments for `strategy list`.
#[derive(Args, Debug)]
pub struct StrategyListArgs {
    /// Owning bot id.
    #[arg(long)]
    pub bot: i32,
}

/// Arguments for `strategy update`.
#[derive(Args, Debug)]
pub struct StrategyUpdateArgs {
    pub id: i32,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub pattern: Option<String>,

    #[arg(long)]
    pub need: Option<u32>,

    #[arg(long)]
    pub action: Option<String>,

    /// Custom message template (disables the default message).
    #[arg(long)]
    pub message: Option<String>,

    /// Switch back to the default message.
    #[arg(long, conflicts_with = "message")]
    pub default_message: bool,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,

    /// Enable or disable the strategy.
    #[arg(long)]
    pub active: Option<bool>,
}

/// Arguments for `strategy resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Game result id reported when the signal was dispatched.
    pub result_id: i32,

    /// win, win-gale, or loss.
    pub outcome: String,
}

/// Arguments for `strategy history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    pub id: i32,

    /// Maximum number of entries.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

/// Arguments for `check telegram`.
#[derive(Args, Debug)]
pub struct TelegramCheckArgs {
    /// Bot whose credentials are tested.
    #[arg(long)]
    pub bot: i32,
}
