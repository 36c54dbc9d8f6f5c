// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session repository. Only SHA-256 hashes of session tokens are stored.

use async_trait::async_trait;
use chrono::Utc;
use pantry_server_auth::{Session, SessionId, User};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::error::{parse_timestamp, DbError};
use crate::user::parse_user_row;

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError>;
	async fn get_session_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<(Session, User)>, DbError>;
	async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError>;
	async fn delete_expired_sessions(&self) -> Result<u64, DbError>;
}

#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, session, token_hash), fields(session_id = %session.id, user_id = %session.user_id))]
	pub async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(session.id.to_string())
		.bind(session.user_id.to_string())
		.bind(token_hash)
		.bind(session.created_at.to_rfc3339())
		.bind(session.expires_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!("session created");
		Ok(())
	}

	/// Resolve a token hash to its session and owning user.
	///
	/// Expired sessions are returned as-is; the caller decides what to do.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn get_session_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<(Session, User)>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT s.id AS session_id, s.created_at AS session_created_at, s.expires_at,
			       u.id, u.username, u.full_name, u.email, u.is_admin, u.created_at, u.updated_at
			FROM sessions s
			JOIN users u ON u.id = s.user_id
			WHERE s.token_hash = ?
			"#,
		)
		.bind(token_hash)
		.fetch_optional(&self.pool)
		.await?;

		match row {
			Some(row) => {
				let user = parse_user_row(&row)?;
				let session = parse_session_columns(&row, &user)?;
				Ok(Some((session, user)))
			}
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self), fields(session_id = %id))]
	pub async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self))]
	pub async fn delete_expired_sessions(&self) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
			.bind(Utc::now().to_rfc3339())
			.execute(&self.pool)
			.await?;

		let removed = result.rows_affected();
		if removed > 0 {
			tracing::info!(removed, "expired sessions removed");
		}
		Ok(removed)
	}
}

#[async_trait]
impl SessionStore for SessionRepository {
	async fn create_session(&self, session: &Session, token_hash: &str) -> Result<(), DbError> {
		self.create_session(session, token_hash).await
	}

	async fn get_session_by_token_hash(
		&self,
		token_hash: &str,
	) -> Result<Option<(Session, User)>, DbError> {
		self.get_session_by_token_hash(token_hash).await
	}

	async fn delete_session(&self, id: &SessionId) -> Result<bool, DbError> {
		self.delete_session(id).await
	}

	async fn delete_expired_sessions(&self) -> Result<u64, DbError> {
		self.delete_expired_sessions().await
	}
}

fn parse_session_columns(row: &SqliteRow, user: &User) -> Result<Session, DbError> {
	let id: String = row.get("session_id");
	let created_at: String = row.get("session_created_at");
	let expires_at: String = row.get("expires_at");

	Ok(Session {
		id: id
			.parse::<SessionId>()
			.map_err(|e| DbError::Internal(format!("Invalid session id: {e}")))?,
		user_id: user.id,
		created_at: parse_timestamp(&created_at, "created_at")?,
		expires_at: parse_timestamp(&expires_at, "expires_at")?,
	})
}
