mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use rosterbox::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    rosterbox::observability::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let config = Config::load_with(args.config)?;
            rosterbox::api::run(config, args.address).await?
        }
    }

    Ok(())
}
