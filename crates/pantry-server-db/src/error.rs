// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
	match e {
		sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
		_ => false,
	}
}

pub(crate) fn parse_timestamp(
	value: &str,
	column: &str,
) -> Result<chrono::DateTime<chrono::Utc>> {
	chrono::DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&chrono::Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}
