//! Handler for the `run` command.
//!
//! Reads newline-delimited JSON requests from stdin and writes one JSON
//! response per line to stdout:
//!
//! ```text
//! {"op":"outcome","bot_id":1,"value":1.7}
//! {"op":"stats","game_type":"aviator"}
//! ```

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::command::{Cli, RunArgs};
use super::load_config;
use crate::error::Result;
use crate::infrastructure::bootstrap::App;
use crate::port::inbound::signal::{ErrorBody, OutcomeRequest, SignalService};

/// One line of input.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    Outcome(OutcomeRequest),
    Stats { game_type: String },
}

fn error_line(body: &ErrorBody) -> serde_json::Value {
    json!({ "ok": false, "error": body })
}

/// Handle one request line and build its response.
pub async fn handle_line(service: &dyn SignalService, line: &str) -> serde_json::Value {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            return error_line(&ErrorBody {
                kind: "invalid_request".to_string(),
                message: e.to_string(),
            })
        }
    };

    match request {
        Request::Outcome(outcome) => match service.ingest(outcome).await {
            Ok(report) => json!({ "ok": true, "report": report }),
            Err(e) => {
                debug!(kind = e.kind(), error = %e, "Outcome rejected");
                error_line(&ErrorBody::from(&e))
            }
        },
        Request::Stats { game_type } => {
            json!({ "ok": true, "stats": service.summary(&game_type) })
        }
    }
}

/// Serve requests until input ends or shutdown is signalled.
///
/// A request already read is answered before shutdown is honoured.
pub async fn serve<R, W>(
    service: &dyn SignalService,
    reader: R,
    mut writer: W,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    loop {
        if *shutdown.borrow() {
            break;
        }
        let line = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(service, &line).await;
        writer.write_all(response.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Execute the run command.
pub async fn execute(cli: &Cli, args: &RunArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    if args.poll || args.simulate {
        config.poller.enabled = true;
    }
    if args.simulate {
        config.poller.simulate = true;
    }
    if args.no_telegram {
        config.telegram.enabled = false;
    }
    config.logging = config
        .logging
        .clone()
        .with_overrides(args.log_level.as_deref(), args.json_logs);
    config.init_logging();

    let app = App::build(config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %app.config.database,
        messenger = app.messenger.name(),
        "roasbot ready"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    {
        let shutdown_tx = Arc::clone(&shutdown_tx);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        });
    }

    let pollers = app.start_pollers(&shutdown_rx).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    serve(
        app.dispatcher.as_ref(),
        stdin,
        tokio::io::stdout(),
        shutdown_rx.clone(),
    )
    .await?;

    if !pollers.is_empty() {
        let mut waiter = shutdown_rx;
        // Input closed; pollers keep running until interrupted.
        while !*waiter.borrow() {
            if waiter.changed().await.is_err() {
                break;
            }
        }
    }
    let _ = shutdown_tx.send(true);
    for handle in pollers {
        if let Err(e) = handle.await {
            warn!(error = %e, "Poller task failed");
        }
    }

    info!("roasbot stopped");
    Ok(())
}
