use anyhow::Result;
use clap::Parser;
use terminal_drift::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    terminal_drift::run(cli).await
}
