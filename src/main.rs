//! Tile game server - a minimal remote command interpreter.

use std::sync::Arc;

use tilegame_server::cli::Cli;
use tilegame_server::commands::builtin_registry;
use tilegame_server::config::Config;
use tilegame_server::error::Result;
use tilegame_server::interpreter::Interpreter;
use tilegame_server::{console, logging, server};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let registry = Arc::new(builtin_registry(config.game.grid_size));
    let interpreter = Interpreter::new(registry);

    if cli.serve {
        let listener = server::bind(config.server.bind).await?;
        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("shutdown requested");
                    signal.cancel();
                }
                Err(e) => warn!("Cannot listen for shutdown signal: {e}"),
            }
        });
        server::serve(listener, interpreter, &config.server, shutdown).await
    } else {
        let stdin = BufReader::new(tokio::io::stdin());
        let handled = console::run_console(&interpreter, stdin, tokio::io::stdout()).await?;
        debug!(commands = handled, "input closed");
        Ok(())
    }
}
