// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pantry server binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pantry_server::{create_app_state, create_router};
use pantry_server_config::LogFormat;
use pantry_server_db::SessionStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Pantry server - invitation-based user registration.
#[derive(Parser, Debug)]
#[command(name = "pantry-server", about = "Pantry sign-up server", version)]
struct Args {
	/// Path to a TOML config file (default: /etc/pantry/server.toml)
	#[arg(long, env = "PANTRY_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!(
			"pantry-server version: {}\nPlatform:              {}-{}",
			env!("CARGO_PKG_VERSION"),
			std::env::consts::OS,
			std::env::consts::ARCH,
		);
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => pantry_server_config::load_config_with_file(path)?,
		None => pantry_server_config::load_config()?,
	};

	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);
	match config.logging.format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting pantry-server"
	);

	let pool =
		pantry_server_db::create_pool(&config.database.url, config.database.max_connections).await?;
	pantry_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config).await?;

	let session_repo = state.session_repo.clone();
	let cleanup = tokio::spawn(async move {
		let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
		loop {
			interval.tick().await;
			if let Err(e) = session_repo.delete_expired_sessions().await {
				tracing::warn!(error = %e, "expired session cleanup failed");
			}
		}
	});

	let audit_service = state.audit_service.clone();

	let mut app = create_router(state).layer(TraceLayer::new_for_http());
	if config.http.cors_permissive {
		tracing::warn!("permissive CORS enabled");
		app = app.layer(CorsLayer::permissive());
	}

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	cleanup.abort();
	tracing::info!(
		pending = audit_service.pending(),
		"draining audit queue"
	);
	audit_service.shutdown().await;
	tracing::info!("Server shutdown complete");
	Ok(())
}
