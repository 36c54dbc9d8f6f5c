// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-up token repository.
//!
//! A row in `sign_ups` is an open invitation. Redemption removes the row and
//! inserts the user in one transaction: the `DELETE ... RETURNING` either
//! claims the row or finds nothing, so two concurrent redemptions of the same
//! token cannot both create a user. If the insert fails the transaction rolls
//! back and the token stays open.

use async_trait::async_trait;
use pantry_server_auth::{NewUser, SignUpToken, User};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::error::{is_unique_violation, parse_timestamp, DbError};
use crate::user::insert_user;

/// A successful redemption: the consumed token and the account it created.
#[derive(Debug, Clone)]
pub struct Redemption {
	pub sign_up: SignUpToken,
	pub user: User,
}

#[async_trait]
pub trait SignUpStore: Send + Sync {
	async fn list_sign_ups(&self) -> Result<Vec<SignUpToken>, DbError>;
	async fn get_sign_up(&self, token: &str) -> Result<Option<SignUpToken>, DbError>;
	async fn create_sign_up(&self, sign_up: &SignUpToken) -> Result<(), DbError>;
	async fn delete_sign_up(&self, token: &str) -> Result<Option<SignUpToken>, DbError>;
	async fn redeem_sign_up(
		&self,
		token: &str,
		user: NewUser,
	) -> Result<Option<Redemption>, DbError>;
}

#[derive(Clone)]
pub struct SignUpRepository {
	pool: SqlitePool,
}

impl SignUpRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// All open tokens, oldest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_sign_ups(&self) -> Result<Vec<SignUpToken>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT token, name, admin, created_at
			FROM sign_ups
			ORDER BY created_at ASC, rowid ASC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_sign_up_row).collect()
	}

	#[tracing::instrument(skip(self, token))]
	pub async fn get_sign_up(&self, token: &str) -> Result<Option<SignUpToken>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT token, name, admin, created_at
			FROM sign_ups
			WHERE token = ?
			"#,
		)
		.bind(token)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(parse_sign_up_row).transpose()
	}

	/// Returns `DbError::Conflict` if the token value already exists.
	#[tracing::instrument(skip(self, sign_up), fields(name = %sign_up.name, admin = sign_up.admin))]
	pub async fn create_sign_up(&self, sign_up: &SignUpToken) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			INSERT INTO sign_ups (token, name, admin, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(&sign_up.token)
		.bind(&sign_up.name)
		.bind(sign_up.admin)
		.bind(sign_up.created_at.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => {
				tracing::debug!("sign-up token created");
				Ok(())
			}
			Err(e) if is_unique_violation(&e) => Err(DbError::Conflict(
				"sign-up token already exists".to_string(),
			)),
			Err(e) => Err(e.into()),
		}
	}

	/// Remove `token`, returning the row that was removed, if any.
	///
	/// A single `DELETE ... RETURNING`, so the returned row is exactly the one
	/// this call removed even when a redemption races it.
	#[tracing::instrument(skip(self, token))]
	pub async fn delete_sign_up(&self, token: &str) -> Result<Option<SignUpToken>, DbError> {
		let row = sqlx::query(
			r#"
			DELETE FROM sign_ups
			WHERE token = ?
			RETURNING token, name, admin, created_at
			"#,
		)
		.bind(token)
		.fetch_optional(&self.pool)
		.await?;

		let deleted = row.as_ref().map(parse_sign_up_row).transpose()?;
		tracing::debug!(deleted = deleted.is_some(), "sign-up token delete");
		Ok(deleted)
	}

	/// Consume `token` and create `user` with the token's admin flag.
	///
	/// `user.is_admin` is overwritten. Returns `Ok(None)` if the token does not
	/// exist (or was consumed concurrently); nothing is written in that case.
	#[tracing::instrument(skip(self, token, user), fields(email = %user.email))]
	pub async fn redeem_sign_up(
		&self,
		token: &str,
		mut user: NewUser,
	) -> Result<Option<Redemption>, DbError> {
		let mut tx = self.pool.begin().await?;

		let row = sqlx::query(
			r#"
			DELETE FROM sign_ups
			WHERE token = ?
			RETURNING token, name, admin, created_at
			"#,
		)
		.bind(token)
		.fetch_optional(&mut *tx)
		.await?;

		let Some(row) = row else {
			tx.rollback().await?;
			tracing::debug!("sign-up token not found");
			return Ok(None);
		};
		let sign_up = parse_sign_up_row(&row)?;

		user.is_admin = sign_up.admin;
		// Dropping `tx` on error rolls back, restoring the token.
		let user = insert_user(&mut *tx, &user).await?;

		tx.commit().await?;

		tracing::info!(user_id = %user.id, admin = user.is_admin, "sign-up token redeemed");
		Ok(Some(Redemption { sign_up, user }))
	}
}

#[async_trait]
impl SignUpStore for SignUpRepository {
	async fn list_sign_ups(&self) -> Result<Vec<SignUpToken>, DbError> {
		self.list_sign_ups().await
	}

	async fn get_sign_up(&self, token: &str) -> Result<Option<SignUpToken>, DbError> {
		self.get_sign_up(token).await
	}

	async fn create_sign_up(&self, sign_up: &SignUpToken) -> Result<(), DbError> {
		self.create_sign_up(sign_up).await
	}

	async fn delete_sign_up(&self, token: &str) -> Result<Option<SignUpToken>, DbError> {
		self.delete_sign_up(token).await
	}

	async fn redeem_sign_up(
		&self,
		token: &str,
		user: NewUser,
	) -> Result<Option<Redemption>, DbError> {
		self.redeem_sign_up(token, user).await
	}
}

fn parse_sign_up_row(row: &SqliteRow) -> Result<SignUpToken, DbError> {
	let created_at: String = row.get("created_at");
	Ok(SignUpToken {
		token: row.get("token"),
		name: row.get("name"),
		admin: row.get("admin"),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_file_test_pool, create_test_pool};
	use crate::user::UserRepository;
	use proptest::prelude::*;
	use std::sync::Arc;

	fn registration(email: &str) -> NewUser {
		NewUser::new("New Person", email, "$argon2id$stub".to_string(), false)
	}

	#[tokio::test]
	async fn created_tokens_are_listed_oldest_first() {
		let repo = SignUpRepository::new(create_test_pool().await);
		let first = SignUpToken::new("First", false);
		let second = SignUpToken::new("Second", true);
		repo.create_sign_up(&first).await.unwrap();
		repo.create_sign_up(&second).await.unwrap();

		let listed = repo.list_sign_ups().await.unwrap();
		assert_eq!(listed.len(), 2);
		assert_eq!(listed[0].token, first.token);
		assert_eq!(listed[1].token, second.token);
		assert!(listed[1].admin);
	}

	#[tokio::test]
	async fn get_returns_stored_fields() {
		let repo = SignUpRepository::new(create_test_pool().await);
		let token = SignUpToken::new("Alice", true);
		repo.create_sign_up(&token).await.unwrap();

		let fetched = repo.get_sign_up(&token.token).await.unwrap().unwrap();
		assert_eq!(fetched.name, "Alice");
		assert!(fetched.admin);
		assert!(repo.get_sign_up("missing").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn duplicate_token_is_conflict() {
		let repo = SignUpRepository::new(create_test_pool().await);
		let token = SignUpToken::new("Alice", false);
		repo.create_sign_up(&token).await.unwrap();

		assert!(matches!(
			repo.create_sign_up(&token).await,
			Err(DbError::Conflict(_))
		));
	}

	#[tokio::test]
	async fn delete_returns_removed_row_once() {
		let repo = SignUpRepository::new(create_test_pool().await);
		let token = SignUpToken::new("Alice", false);
		repo.create_sign_up(&token).await.unwrap();

		let removed = repo.delete_sign_up(&token.token).await.unwrap().unwrap();
		assert_eq!(removed.name, "Alice");
		assert_eq!(removed.token, token.token);
		assert!(repo.delete_sign_up(&token.token).await.unwrap().is_none());
		assert!(repo.delete_sign_up("never-existed").await.unwrap().is_none());
		assert!(repo.list_sign_ups().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn delete_after_redemption_returns_nothing() {
		let repo = SignUpRepository::new(create_test_pool().await);
		let token = SignUpToken::new("Bob", false);
		repo.create_sign_up(&token).await.unwrap();

		repo.redeem_sign_up(&token.token, registration("bob@example.com"))
			.await
			.unwrap()
			.unwrap();

		assert!(repo.delete_sign_up(&token.token).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn redeem_copies_admin_flag_and_consumes_token() {
		let pool = create_test_pool().await;
		let repo = SignUpRepository::new(pool.clone());
		let token = SignUpToken::new("Admin Invite", true);
		repo.create_sign_up(&token).await.unwrap();

		let redemption = repo
			.redeem_sign_up(&token.token, registration("new@example.com"))
			.await
			.unwrap()
			.unwrap();

		assert!(redemption.user.is_admin);
		assert_eq!(redemption.sign_up.name, "Admin Invite");
		assert!(repo.get_sign_up(&token.token).await.unwrap().is_none());

		let users = UserRepository::new(pool);
		assert_eq!(users.count_users().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn redeem_ignores_caller_admin_flag() {
		let repo = SignUpRepository::new(create_test_pool().await);
		let token = SignUpToken::new("Plain", false);
		repo.create_sign_up(&token).await.unwrap();

		let mut user = registration("sneaky@example.com");
		user.is_admin = true;
		let redemption = repo
			.redeem_sign_up(&token.token, user)
			.await
			.unwrap()
			.unwrap();
		assert!(!redemption.user.is_admin);
	}

	#[tokio::test]
	async fn redeem_unknown_token_creates_nothing() {
		let pool = create_test_pool().await;
		let repo = SignUpRepository::new(pool.clone());

		let result = repo
			.redeem_sign_up("nope", registration("x@example.com"))
			.await
			.unwrap();
		assert!(result.is_none());
		assert_eq!(UserRepository::new(pool).count_users().await.unwrap(), 0);
	}

	#[tokio::test]
	async fn failed_user_insert_keeps_token_open() {
		let pool = create_test_pool().await;
		let users = UserRepository::new(pool.clone());
		users
			.create_user(&registration("taken@example.com"))
			.await
			.unwrap();

		let repo = SignUpRepository::new(pool);
		let token = SignUpToken::new("Retry", false);
		repo.create_sign_up(&token).await.unwrap();

		let result = repo
			.redeem_sign_up(&token.token, registration("taken@example.com"))
			.await;
		assert!(matches!(result, Err(DbError::Conflict(_))));
		assert!(repo.get_sign_up(&token.token).await.unwrap().is_some());

		let redemption = repo
			.redeem_sign_up(&token.token, registration("fresh@example.com"))
			.await
			.unwrap();
		assert!(redemption.is_some());
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_redemption_creates_one_user() {
		let dir = tempfile::tempdir().unwrap();
		let pool = create_file_test_pool(dir.path()).await;
		let repo = Arc::new(SignUpRepository::new(pool.clone()));
		let token = SignUpToken::new("Race", false);
		repo.create_sign_up(&token).await.unwrap();

		let mut handles = Vec::new();
		for i in 0..8 {
			let repo = Arc::clone(&repo);
			let value = token.token.clone();
			handles.push(tokio::spawn(async move {
				repo.redeem_sign_up(&value, registration(&format!("racer{i}@example.com")))
					.await
			}));
		}

		let mut redeemed = 0;
		for handle in handles {
			if let Ok(Some(_)) = handle.await.unwrap() {
				redeemed += 1;
			}
		}

		assert_eq!(redeemed, 1);
		assert_eq!(UserRepository::new(pool).count_users().await.unwrap(), 1);
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(16))]

		#[test]
		fn every_created_token_is_listed(names in proptest::collection::vec("[A-Za-z ]{1,20}", 1..8)) {
			let rt = tokio::runtime::Runtime::new().unwrap();
			rt.block_on(async {
				let repo = SignUpRepository::new(create_test_pool().await);
				let mut created = Vec::new();
				for name in &names {
					let token = SignUpToken::new(name.clone(), false);
					repo.create_sign_up(&token).await.unwrap();
					created.push(token.token);
				}

				let listed: Vec<String> = repo
					.list_sign_ups()
					.await
					.unwrap()
					.into_iter()
					.map(|t| t.token)
					.collect();
				assert_eq!(listed, created);
			});
		}
	}
}
