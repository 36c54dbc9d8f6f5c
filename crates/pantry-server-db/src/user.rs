// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.
//!
//! Emails are stored normalized (see [`pantry_server_auth::normalize_email`]);
//! lookups normalize their input the same way.

use async_trait::async_trait;
use chrono::Utc;
use pantry_server_auth::{normalize_email, NewUser, User, UserCredentials, UserId};
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::Row;

use crate::error::{is_unique_violation, parse_timestamp, DbError};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: &NewUser) -> Result<User, DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn get_credentials_by_email(&self, email: &str)
		-> Result<Option<UserCredentials>, DbError>;
	async fn count_users(&self) -> Result<i64, DbError>;
}

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a user.
	///
	/// Returns `DbError::Conflict` if the email or username is already taken.
	#[tracing::instrument(skip(self, user), fields(email = %user.email, is_admin = user.is_admin))]
	pub async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
		let mut conn = self.pool.acquire().await?;
		insert_user(&mut *conn, user).await
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, full_name, email, is_admin, created_at, updated_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_user_row).transpose()
	}

	/// Look up a user and their password hash for login.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_credentials_by_email(
		&self,
		email: &str,
	) -> Result<Option<UserCredentials>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, full_name, email, is_admin, created_at, updated_at, password_hash
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(normalize_email(email))
		.fetch_optional(&self.pool)
		.await?;

		match row {
			Some(row) => Ok(Some(UserCredentials {
				user: parse_user_row(&row)?,
				password_hash: row.get("password_hash"),
			})),
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_users(&self) -> Result<i64, DbError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
		self.create_user(user).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_credentials_by_email(
		&self,
		email: &str,
	) -> Result<Option<UserCredentials>, DbError> {
		self.get_credentials_by_email(email).await
	}

	async fn count_users(&self) -> Result<i64, DbError> {
		self.count_users().await
	}
}

/// Insert on an existing connection so sign-up redemption can run it inside
/// its transaction.
pub(crate) async fn insert_user(
	conn: &mut SqliteConnection,
	user: &NewUser,
) -> Result<User, DbError> {
	let id = UserId::generate();
	let now = Utc::now();

	let result = sqlx::query(
		r#"
		INSERT INTO users (
			id, username, full_name, email, password_hash, is_admin, created_at, updated_at
		) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(id.to_string())
	.bind(&user.username)
	.bind(&user.full_name)
	.bind(&user.email)
	.bind(&user.password_hash)
	.bind(user.is_admin)
	.bind(now.to_rfc3339())
	.bind(now.to_rfc3339())
	.execute(&mut *conn)
	.await;

	match result {
		Ok(_) => {}
		Err(e) if is_unique_violation(&e) => {
			return Err(DbError::Conflict(conflict_message(&e)));
		}
		Err(e) => return Err(e.into()),
	}

	tracing::debug!(user_id = %id, "user created");

	Ok(User {
		id,
		username: user.username.clone(),
		full_name: user.full_name.clone(),
		email: user.email.clone(),
		is_admin: user.is_admin,
		created_at: now,
		updated_at: now,
	})
}

fn conflict_message(e: &sqlx::Error) -> String {
	let detail = match e {
		sqlx::Error::Database(db_err) => db_err.message().to_string(),
		_ => String::new(),
	};
	if detail.contains("users.username") {
		"username is already taken".to_string()
	} else {
		"email is already registered".to_string()
	}
}

pub(crate) fn parse_user_row(row: &SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(User {
		id: id
			.parse::<UserId>()
			.map_err(|e| DbError::Internal(format!("Invalid user id: {e}")))?,
		username: row.get("username"),
		full_name: row.get("full_name"),
		email: row.get("email"),
		is_admin: row.get("is_admin"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	fn new_user(email: &str) -> NewUser {
		NewUser::new("Alice Example", email, "$argon2id$stub".to_string(), false)
	}

	#[tokio::test]
	async fn create_then_get_by_id() {
		let repo = UserRepository::new(create_test_pool().await);
		let created = repo.create_user(&new_user("alice@example.com")).await.unwrap();

		let fetched = repo.get_user_by_id(&created.id).await.unwrap().unwrap();
		assert_eq!(fetched, created);
		assert_eq!(repo.count_users().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn duplicate_email_is_conflict() {
		let repo = UserRepository::new(create_test_pool().await);
		repo.create_user(&new_user("alice@example.com")).await.unwrap();

		let result = repo.create_user(&new_user("ALICE@example.com")).await;
		match result {
			Err(DbError::Conflict(msg)) => assert!(msg.contains("email")),
			other => panic!("expected conflict, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn duplicate_username_is_conflict() {
		let repo = UserRepository::new(create_test_pool().await);
		repo.create_user(&new_user("a@example.com").with_username(Some("alice".into())))
			.await
			.unwrap();

		let result = repo
			.create_user(&new_user("b@example.com").with_username(Some("alice".into())))
			.await;
		match result {
			Err(DbError::Conflict(msg)) => assert!(msg.contains("username")),
			other => panic!("expected conflict, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn credentials_lookup_normalizes_email() {
		let repo = UserRepository::new(create_test_pool().await);
		let created = repo.create_user(&new_user("alice@example.com")).await.unwrap();

		let creds = repo
			.get_credentials_by_email("  Alice@Example.com ")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(creds.user.id, created.id);
		assert_eq!(creds.password_hash, "$argon2id$stub");

		assert!(repo
			.get_credentials_by_email("nobody@example.com")
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn missing_user_is_none() {
		let repo = UserRepository::new(create_test_pool().await);
		assert!(repo
			.get_user_by_id(&UserId::generate())
			.await
			.unwrap()
			.is_none());
	}
}
