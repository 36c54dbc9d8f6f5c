// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-up token request and response types.

use chrono::{DateTime, Utc};
use pantry_common_config::SecretString;
use pantry_server_auth::SignUpToken;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateSignUpRequest {
	/// Label for the invitation, usually who it is for.
	pub name: String,
	/// Whether the user created from this token is an administrator.
	#[serde(default)]
	pub admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SignUpTokenResponse {
	pub token: String,
	pub name: String,
	pub admin: bool,
	pub created_at: DateTime<Utc>,
}

impl From<SignUpToken> for SignUpTokenResponse {
	fn from(sign_up: SignUpToken) -> Self {
		Self {
			token: sign_up.token,
			name: sign_up.name,
			admin: sign_up.admin,
			created_at: sign_up.created_at,
		}
	}
}

/// Registration details supplied together with a sign-up token.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RedeemSignUpRequest {
	pub full_name: String,
	pub email: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = Password))]
	pub password: SecretString,
	#[serde(default)]
	pub username: Option<String>,
}
