use clap::Parser;
use empathy_gateway::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::ClearCache(args) => cli::clear_cache::run(args).await,
    }
}
