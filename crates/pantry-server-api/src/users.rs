// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use pantry_server_auth::User;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserResponse {
	pub id: String,
	pub username: Option<String>,
	pub full_name: String,
	pub email: String,
	pub admin: bool,
	pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
	fn from(user: User) -> Self {
		Self {
			id: user.id.to_string(),
			username: user.username,
			full_name: user.full_name,
			email: user.email,
			admin: user.is_admin,
			created_at: user.created_at,
		}
	}
}
