// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use pantry_common_config::SecretString;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
	pub email: String,
	#[cfg_attr(feature = "openapi", schema(value_type = String, format = Password))]
	pub password: SecretString,
}

/// Returned once at login. Only a hash of `token` is kept server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginResponse {
	pub token: String,
	pub expires_at: DateTime<Utc>,
}
