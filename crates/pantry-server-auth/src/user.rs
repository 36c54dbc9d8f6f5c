// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A stored user. The password hash is deliberately not part of this type;
/// see [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub username: Option<String>,
	pub full_name: String,
	pub email: String,
	pub is_admin: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
	pub username: Option<String>,
	pub full_name: String,
	pub email: String,
	pub password_hash: String,
	pub is_admin: bool,
}

impl NewUser {
	/// Build a user, normalizing the email and dropping a blank username.
	pub fn new(
		full_name: impl Into<String>,
		email: &str,
		password_hash: String,
		is_admin: bool,
	) -> Self {
		Self {
			username: None,
			full_name: full_name.into().trim().to_string(),
			email: normalize_email(email),
			password_hash,
			is_admin,
		}
	}

	pub fn with_username(mut self, username: Option<String>) -> Self {
		self.username = username
			.map(|u| u.trim().to_string())
			.filter(|u| !u.is_empty());
		self
	}
}

/// A user together with their stored password hash, used only at login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
	pub user: User,
	pub password_hash: String,
}

/// Emails are compared case-insensitively; store them trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
	email.trim().to_lowercase()
}
