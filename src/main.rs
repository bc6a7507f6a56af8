#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
mod arg_parse;
mod common;
mod config;
mod cycle;
mod error;
mod news;
mod sender;
mod storage;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    arg_parse::CmdArgs,
    config::{AppConfig, Credentials},
    cycle::Controller,
    error::{ConfigError, PersistError, ProviderError, TimestampError},
    news::prelude::*,
    sender::Sender,
    storage::Storage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        warn!(error = %e, "no .env file loaded, using the process environment");
    }

    let args = CmdArgs::parse(std::env::args().collect())?;
    let config = AppConfig::from_file(&args.config)?;
    let credentials = Credentials::from_env(!args.dry_run)?;

    let sender = config.get_sender(credentials.bot_token.as_deref());
    if let Sender::Telegram(telegram) = &sender {
        let account = telegram.authorize().await?;
        info!(account = %account, "authorized on Telegram");
        if config.telegram.chat_ids.is_empty() {
            warn!("telegram.chat_ids is empty, nothing will be delivered");
        }
    }

    let storage = Storage::new(config.get_history_file());
    info!(
        history = %storage.path().display(),
        queries = ?config.news.query_list,
        "starting"
    );
    let controller = Controller::new(
        NaverFetcher::new(&credentials.naver)?,
        sender,
        storage,
        &config.news,
    );

    if args.once {
        let report = controller.run_cycle().await;
        info!(?report, "single cycle done");
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested, finishing the current cycle");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // keep the sender alive so polling goes on without a shutdown hook
                error!(error = %e, "could not listen for the shutdown signal");
                std::future::pending::<()>().await;
            }
        }
    });

    controller.run(shutdown_rx).await;
    Ok(())
}
