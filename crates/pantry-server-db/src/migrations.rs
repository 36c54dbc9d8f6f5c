// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Embedded schema migrations.
//!
//! Every statement uses `IF NOT EXISTS`, so running the full set on each
//! startup is safe.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const MIGRATIONS: &[(&str, &str)] = &[
	("001_users", include_str!("../migrations/001_users.sql")),
	("002_sign_ups", include_str!("../migrations/002_sign_ups.sql")),
	("003_sessions", include_str!("../migrations/003_sessions.sql")),
	("004_audit_logs", include_str!("../migrations/004_audit_logs.sql")),
];

#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for (name, sql) in MIGRATIONS {
		for stmt in sql.split(';').filter(|s| !is_blank(s)) {
			sqlx::query(stmt).execute(pool).await?;
		}
		tracing::debug!(migration = name, "migration applied");
	}
	tracing::info!(count = MIGRATIONS.len(), "database migrations complete");
	Ok(())
}

/// True for chunks holding only whitespace and `--` comments.
fn is_blank(chunk: &str) -> bool {
	chunk
		.lines()
		.map(str::trim)
		.all(|line| line.is_empty() || line.starts_with("--"))
}
