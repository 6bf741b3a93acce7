//! bim-setup CLI binary entry point.

use bim_setup::cli::{commands, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Login => commands::handle_login(config, cli.no_browser).await,
        Commands::Fetch(args) => {
            commands::handle_read(config, cli.no_browser, &args.template, &args.params, true).await
        }
        Commands::Get(args) => {
            commands::handle_read(config, cli.no_browser, &args.template, &args.params, false).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
