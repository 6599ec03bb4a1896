use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mercury_config::POLL_INTERVAL_RANGE;

/// Mercury: follow a Discord user's presence from the terminal.
#[derive(Parser, Debug)]
#[command(name = "mercury", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `mercury_presence=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a status line on every presence change until Ctrl-C.
    Watch {
        /// Discord user id; defaults to `presence.user_id` from the config.
        #[arg(short, long)]
        user: Option<String>,

        /// Stay on REST polling; never open the push socket.
        #[arg(long)]
        no_live: bool,

        /// Poll interval in seconds: 0 disables polling, otherwise 5-3600.
        #[arg(long, value_parser = parse_poll_interval)]
        poll: Option<u32>,
    },

    /// Fetch several users once and print the snapshots as JSON.
    Fetch {
        /// Discord user ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print the effective configuration as JSON.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Same bounds as `presence.poll_interval` in the config file.
fn parse_poll_interval(value: &str) -> Result<u32, String> {
    let secs: u32 = value.parse().map_err(|e| format!("{e}"))?;
    if secs == 0 || POLL_INTERVAL_RANGE.contains(&secs) {
        Ok(secs)
    } else {
        Err(format!(
            "{secs} is out of range: use 0 to disable polling or {}-{} seconds",
            POLL_INTERVAL_RANGE.start(),
            POLL_INTERVAL_RANGE.end()
        ))
    }
}
