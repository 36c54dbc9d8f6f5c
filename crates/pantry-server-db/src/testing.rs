// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pools for tests, with the full schema applied.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::migrations::run_migrations;

/// In-memory database. One connection, since every `:memory:` connection
/// would otherwise be a separate database.
pub async fn create_test_pool() -> SqlitePool {
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.unwrap();
	run_migrations(&pool).await.unwrap();
	pool
}

/// File-backed database for tests that need several concurrent connections.
pub async fn create_file_test_pool(dir: &std::path::Path) -> SqlitePool {
	let url = format!("sqlite:{}", dir.join("test.db").display());
	let pool = crate::pool::create_pool(&url, 8).await.unwrap();
	run_migrations(&pool).await.unwrap();
	pool
}
