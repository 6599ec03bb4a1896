mod cli;
mod render;
mod settings;

use std::time::Duration;

use chrono::Utc;
use mercury_common::{MercuryError, Result};
use mercury_config::{LogLevel, MercuryConfig};
use mercury_presence::{fetch_many, LanyardRestClient, PresenceSync};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};

fn init_logging(cli_directive: Option<&str>, config_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = cli_directive.unwrap_or(config_level.directive());
        EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("Invalid log directive {directive:?}: {e}");
            EnvFilter::new(LogLevel::default().directive())
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Load config before logging so its level can seed the filter.
    let (config, config_error) = match mercury_config::load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) if args.config.is_some() => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(2);
        }
        Err(e) => (MercuryConfig::default(), Some(e)),
    };

    init_logging(args.log_level.as_deref(), config.logging.level);
    tracing::info!("Mercury v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if let Err(e) = run(args, config).await {
        tracing::error!(error = %e, "Mercury failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args, config: MercuryConfig) -> Result<()> {
    match args.command {
        Command::Watch {
            user,
            no_live,
            poll,
        } => watch(&config, user, no_live, poll).await,
        Command::Fetch { ids } => fetch(&config, ids).await,
        Command::Config => {
            println!("{}", mercury_config::config_to_json(&config));
            Ok(())
        }
    }
}

async fn watch(
    config: &MercuryConfig,
    user: Option<String>,
    no_live: bool,
    poll: Option<u32>,
) -> Result<()> {
    let user_id = user.unwrap_or_else(|| config.presence.user_id.clone());
    if user_id.trim().is_empty() {
        return Err(MercuryError::Other(
            "no user id: pass --user or set presence.user_id in the config".into(),
        ));
    }

    let sync = PresenceSync::new(user_id, settings::sync_config(config, poll))?;
    let mut rx = sync.subscribe();

    let state = sync.start().await;
    let mut last_line = render::status_line(&state, Utc::now());
    println!("{last_line}");
    if let Some(diagnostic) = render::diagnostic_line(&state) {
        println!("{diagnostic}");
    }

    if config.presence.live && !no_live && !sync.subscribe_live() {
        tracing::info!("Live presence unavailable, staying on REST polling");
    }

    rx.borrow_and_update();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                let line = render::status_line(&state, Utc::now());
                if line != last_line {
                    println!("{line}");
                    if let Some(diagnostic) = render::diagnostic_line(&state) {
                        println!("{diagnostic}");
                    }
                    last_line = line;
                }
            }
        }
    }

    sync.stop().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn fetch(config: &MercuryConfig, ids: Vec<String>) -> Result<()> {
    let timeout = Duration::from_secs(u64::from(config.presence.request_timeout));
    let api = LanyardRestClient::new(&config.presence.api_base, timeout)?;
    let results = fetch_many(&api, &ids, timeout).await;

    let json = serde_json::to_string_pretty(&results)
        .map_err(|e| MercuryError::Serialization(e.to_string()))?;
    println!("{json}");
    Ok(())
}
