// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use pantry_server_audit::AuditError;
use pantry_server_auth::AuthError;
use pantry_server_config::ConfigError;
use pantry_server_db::DbError;
use thiserror::Error;

/// Errors raised while starting the server.
///
/// Request handling never produces these; handlers answer with
/// [`pantry_server_api::ErrorResponse`] bodies instead.
#[derive(Debug, Error)]
pub enum ServerError {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("database error: {0}")]
	Database(#[from] DbError),

	#[error("audit setup failed: {0}")]
	Audit(#[from] AuditError),

	#[error("bootstrap admin failed: {0}")]
	Bootstrap(#[from] AuthError),

	#[error("background task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
}
