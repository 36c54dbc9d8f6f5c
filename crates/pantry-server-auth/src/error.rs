// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
	#[error("authentication required")]
	AuthenticationRequired,

	#[error("invalid credentials")]
	InvalidCredentials,

	#[error("session expired")]
	SessionExpired,

	/// The sign-up token does not exist (never issued, revoked, or already
	/// redeemed).
	#[error("invalid sign-up token")]
	InvalidSignUpToken,

	#[error("insufficient permissions")]
	InsufficientPermissions,

	#[error("password hashing error: {0}")]
	HashingError(String),
}

impl AuthError {
	pub fn is_internal(&self) -> bool {
		matches!(self, AuthError::HashingError(_))
	}

	pub fn status_code(&self) -> u16 {
		match self {
			AuthError::AuthenticationRequired
			| AuthError::InvalidCredentials
			| AuthError::SessionExpired
			| AuthError::InvalidSignUpToken => 401,
			AuthError::InsufficientPermissions => 403,
			AuthError::HashingError(_) => 500,
		}
	}
}
