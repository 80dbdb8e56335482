//! Handlers for `roasbot strategy`.

use serde_json::json;
use tabled::Tabled;

use super::command::{
    HistoryArgs, ResolveArgs, StrategyAddArgs, StrategyCommand, StrategyUpdateArgs,
};
use super::output;
use crate::application::catalog::Catalog;
use crate::domain::{
    BotId, GameResult, NewStrategy, Resolution, Strategy, StrategyId, StrategyPatch,
};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct StrategyRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pattern")]
    pattern: String,
    #[tabled(rename = "Need")]
    need: u32,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Signals")]
    signals: i32,
    #[tabled(rename = "W/L")]
    record: String,
    #[tabled(rename = "Accuracy")]
    accuracy: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&Strategy> for StrategyRow {
    fn from(strategy: &Strategy) -> Self {
        let counters = &strategy.counters;
        Self {
            id: strategy.id.get(),
            name: strategy.name.clone(),
            pattern: strategy.pattern.clone(),
            need: strategy.need,
            window: window_label(strategy),
            signals: counters.total_signals,
            record: format!("{}/{}", counters.wins, counters.losses),
            accuracy: format!("{}%", counters.accuracy_percent()),
            active: if strategy.is_active { "yes" } else { "no" },
        }
    }
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Stage")]
    stage: &'static str,
    #[tabled(rename = "Sent")]
    sent: String,
    #[tabled(rename = "Resolution")]
    resolution: &'static str,
}

impl From<&GameResult> for ResultRow {
    fn from(result: &GameResult) -> Self {
        Self {
            id: result.id,
            stage: result.stage.as_str(),
            sent: result.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            resolution: result.resolution.map_or("pending", Resolution::as_str),
        }
    }
}

fn window_label(strategy: &Strategy) -> String {
    match (&strategy.start_time, &strategy.end_time) {
        (None, None) => "always".to_string(),
        (start, end) => format!(
            "{}-{}",
            start.as_deref().unwrap_or("00:00"),
            end.as_deref().unwrap_or("23:59")
        ),
    }
}

fn print_strategy(command: &str, verb: &str, strategy: &Strategy) {
    if output::is_json() {
        output::json_output(json!({ "command": command, "strategy": strategy }));
        return;
    }
    output::success(&format!("{verb} strategy {} ({})", strategy.id, strategy.name));
    output::field("Bot", strategy.bot_id);
    output::field("Pattern", format!("{} x{}", strategy.pattern, strategy.need));
    output::field("Window", window_label(strategy));
    output::field("Signals", strategy.counters.total_signals);
    if output::verbosity() > 0 {
        let c = &strategy.counters;
        output::field("Wins", format!("{} ({} gale)", c.wins, c.wins_with_gale));
        output::field("Losses", c.losses);
    }
}

/// Execute a strategy subcommand.
pub async fn execute(catalog: &Catalog, command: &StrategyCommand) -> Result<()> {
    match command {
        StrategyCommand::Add(args) => add(catalog, args).await,
        StrategyCommand::List(args) => list(catalog, BotId::new(args.bot)).await,
        StrategyCommand::Update(args) => update(catalog, args).await,
        StrategyCommand::Remove(arg) => {
            catalog.remove_strategy(StrategyId::new(arg.id)).await?;
            if output::is_json() {
                output::json_output(json!({ "command": "strategy.remove", "id": arg.id }));
            } else {
                output::success(&format!("Removed strategy {}", arg.id));
            }
            Ok(())
        }
        StrategyCommand::Reset(arg) => {
            let strategy = catalog.reset_strategy(StrategyId::new(arg.id)).await?;
            print_strategy("strategy.reset", "Reset", &strategy);
            Ok(())
        }
        StrategyCommand::Resolve(args) => resolve(catalog, args).await,
        StrategyCommand::History(args) => history(catalog, args).await,
    }
}

async fn add(catalog: &Catalog, args: &StrategyAddArgs) -> Result<()> {
    let strategy = catalog
        .add_strategy(NewStrategy {
            bot_id: BotId::new(args.bot),
            name: args.name.clone(),
            pattern: args.pattern.clone(),
            need: args.need,
            action: args.action.clone(),
            use_default_message: args.message.is_none(),
            custom_message: args.message.clone(),
            start_time: args.start.clone(),
            end_time: args.end.clone(),
            is_active: !args.inactive,
        })
        .await?;
    print_strategy("strategy.add", "Added", &strategy);
    Ok(())
}

async fn list(catalog: &Catalog, bot_id: BotId) -> Result<()> {
    let strategies = catalog.strategies(bot_id).await?;
    if output::is_json() {
        output::json_output(json!({
            "command": "strategy.list",
            "bot_id": bot_id,
            "strategies": strategies,
        }));
        return Ok(());
    }

    output::section(&format!("Strategies of bot {bot_id}"));
    output::table(
        strategies.iter().map(StrategyRow::from).collect(),
        "no strategies configured",
    );
    Ok(())
}

async fn update(catalog: &Catalog, args: &StrategyUpdateArgs) -> Result<()> {
    let use_default_message = if args.default_message {
        Some(true)
    } else if args.message.is_some() {
        Some(false)
    } else {
        None
    };
    let patch = StrategyPatch {
        name: args.name.clone(),
        pattern: args.pattern.clone(),
        need: args.need,
        action: args.action.clone(),
        use_default_message,
        custom_message: args.message.clone(),
        start_time: args.start.clone(),
        end_time: args.end.clone(),
        is_active: args.active,
    };
    let strategy = catalog.update_strategy(StrategyId::new(args.id), patch).await?;
    print_strategy("strategy.update", "Updated", &strategy);
    Ok(())
}

async fn resolve(catalog: &Catalog, args: &ResolveArgs) -> Result<()> {
    let resolution = Resolution::parse(&args.outcome).ok_or_else(|| {
        Error::Validation(format!(
            "outcome: expected win, win-gale or loss, got {:?}",
            args.outcome
        ))
    })?;
    let result = catalog.resolve(args.result_id, resolution).await?;
    let strategy = catalog.strategy(result.strategy_id).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "strategy.resolve",
            "result": result,
            "counters": strategy.counters,
        }));
        return Ok(());
    }
    output::success(&format!(
        "Resolved result {} as {}",
        result.id,
        resolution.as_str()
    ));
    output::field("Strategy", &strategy.name);
    output::field("Accuracy", format!("{}%", strategy.counters.accuracy_percent()));
    Ok(())
}

async fn history(catalog: &Catalog, args: &HistoryArgs) -> Result<()> {
    let results = catalog.history(StrategyId::new(args.id), args.limit).await?;
    if output::is_json() {
        output::json_output(json!({
            "command": "strategy.history",
            "strategy_id": args.id,
            "results": results,
        }));
        return Ok(());
    }

    output::section(&format!("Signals of strategy {}", args.id));
    output::table(
        results.iter().map(ResultRow::from).collect(),
        "no signals dispatched yet",
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::StrategyBuilder;

    #[test]
    fn window_label_fills_open_bounds() {
        let always = StrategyBuilder::new(1, 1).build();
        assert_eq!(window_label(&always), "always");

        let mut evening = StrategyBuilder::new(1, 1).window("18:00", "20:00").build();
        assert_eq!(window_label(&evening), "18:00-20:00");
        evening.end_time = None;
        assert_eq!(window_label(&evening), "18:00-23:59");
    }

    #[test]
    fn row_shows_record_and_accuracy() {
        let mut strategy = StrategyBuilder::new(3, 1).build();
        strategy.counters.wins = 3;
        strategy.counters.losses = 1;
        let row = StrategyRow::from(&strategy);
        assert_eq!(row.record, "3/1");
        assert_eq!(row.accuracy, "75%");
    }
}
