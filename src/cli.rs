//! Command-line argument parsing for the tile game server.

use crate::config::Config;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

const GUIDE: &str = "\
Reads commands, type-checks their arguments, and runs the matching game
operation. Each line of input is one command.

Command syntax:
  name(arg1, arg2, ...)        whitespace is ignored everywhere
  {\"Name\": \"add\", \"Params\": [2, 3]}   structured form for scripts
  help                         list every operation and its signature

Errors are reported as one line prefixed with \"Parser:\" (malformed
command) or \"Caller:\" (unknown operation, wrong argument count or type).

By default commands are read from stdin. With --serve the server accepts
WebSocket clients instead and answers every message on the same socket.";

/// Remote command interpreter for the tile game core.
#[derive(Parser, Debug)]
#[command(name = "tileserver")]
#[command(version, about, long_about = GUIDE)]
pub struct Cli {
    /// Run the WebSocket server instead of reading commands from stdin
    #[arg(long)]
    pub serve: bool,

    /// Address to listen on (overrides the config file)
    #[arg(short = 'b', long, value_name = "HOST:PORT", env = "TILESERVER_BIND")]
    pub bind: Option<SocketAddr>,

    /// Side length of the game grid (overrides the config file)
    #[arg(long, value_name = "TILES")]
    pub grid_size: Option<usize>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "tilegame_server=trace" (defaults to RUST_LOG, then "info")
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(grid_size) = self.grid_size {
            config.game.grid_size = grid_size;
        }
    }
}
