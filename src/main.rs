use clap::Parser;

use roasbot::adapter::inbound::cli::command::Cli;
use roasbot::adapter::inbound::cli::{self, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = cli::execute(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
