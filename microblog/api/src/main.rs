use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use common::context::{Context, Handler};
use common::logging;
use common::signal::SignalHandler;
use microblog_core::database::{MemoryDatabase, PgDatabase};
use microblog_core::Database;
use tokio::{select, time};

use crate::config::AppConfig;
use crate::global::GlobalState;

mod api;
mod config;
mod global;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> Result<()> {
	let config = AppConfig::parse()?;

	logging::init(&config.logging.level, config.logging.mode)?;

	if let Some(file) = &config.config_file {
		tracing::info!(file = file, "loaded config from file");
	}

	tracing::debug!("config: {:#?}", config);

	if config.database.uri.starts_with("memory://") {
		tracing::warn!("using in-memory storage, nothing will be persisted");
		return start(config, Arc::new(MemoryDatabase::new())).await;
	}

	let db = PgDatabase::connect(&config.database.uri, config.database.max_connections)
		.await
		.context("failed to connect to database")?;

	if config.database.migrate {
		db.migrate().await.context("failed to run migrations")?;
		tracing::info!("migrations applied");
	}

	start(config, Arc::new(db)).await
}

async fn start<D: Database>(config: AppConfig, db: Arc<D>) -> Result<()> {
	let (ctx, handler) = Context::new();

	let global = Arc::new(GlobalState::new(config, db, ctx));

	let api_future = tokio::spawn(api::run(global.clone()));

	let mut signal_handler = SignalHandler::shutdown()?;

	select! {
		r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
		_ = signal_handler.recv() => tracing::info!("shutting down"),
	}

	// We cannot have a context in scope when we cancel the handler, otherwise it will deadlock.
	drop(global);

	shutdown(handler, &mut signal_handler).await;

	Ok(())
}

async fn shutdown(handler: Handler, signal_handler: &mut SignalHandler) {
	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = handler.cancel() => tracing::info!("shutting down"),
	}
}
