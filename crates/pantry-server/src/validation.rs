// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request body validation for API handlers.

use pantry_server_api::{CreateSignUpRequest, LoginRequest, RedeemSignUpRequest};
use pantry_server_auth::sign_up::MAX_SIGN_UP_NAME_LEN;

pub const MAX_USERNAME_LEN: usize = 64;

/// A rejected field, rendered as a 400 `{error, message}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
	pub error: String,
	pub message: String,
}

impl ValidationError {
	fn invalid_field(field: &str, message: impl Into<String>) -> Self {
		Self {
			error: format!("invalid_{field}"),
			message: message.into(),
		}
	}
}

/// Token names are labels for humans: non-blank and at most 100 characters.
pub fn validate_sign_up_name(name: &str) -> Result<(), ValidationError> {
	let trimmed = name.trim();
	if trimmed.is_empty() {
		return Err(ValidationError::invalid_field("name", "Name must not be empty"));
	}
	if trimmed.chars().count() > MAX_SIGN_UP_NAME_LEN {
		return Err(ValidationError::invalid_field(
			"name",
			format!("Name must be at most {MAX_SIGN_UP_NAME_LEN} characters"),
		));
	}
	Ok(())
}

pub fn validate_create_sign_up(req: &CreateSignUpRequest) -> Result<(), ValidationError> {
	validate_sign_up_name(&req.name)
}

/// Loose shape check: something on both sides of a single `@`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
	let email = email.trim();
	match email.split_once('@') {
		Some((local, domain))
			if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
		{
			Ok(())
		}
		_ => Err(ValidationError::invalid_field(
			"email",
			"Email must be a valid address",
		)),
	}
}

/// Any non-empty password is accepted; strength rules are left to operators.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
	if password.is_empty() {
		return Err(ValidationError::invalid_field(
			"password",
			"Password must not be empty",
		));
	}
	Ok(())
}

/// Usernames are optional; when present they are ASCII letters, digits,
/// `_`, `-` or `.`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username.is_empty() || username.len() > MAX_USERNAME_LEN {
		return Err(ValidationError::invalid_field(
			"username",
			format!("Username must be 1 to {MAX_USERNAME_LEN} characters"),
		));
	}
	if !username
		.chars()
		.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
	{
		return Err(ValidationError::invalid_field(
			"username",
			"Username may only contain letters, digits, '_', '-' and '.'",
		));
	}
	Ok(())
}

pub fn validate_redeem(req: &RedeemSignUpRequest) -> Result<(), ValidationError> {
	if req.full_name.trim().is_empty() {
		return Err(ValidationError::invalid_field(
			"full_name",
			"Full name must not be empty",
		));
	}
	validate_email(&req.email)?;
	validate_password(req.password.expose())?;
	if let Some(username) = &req.username {
		validate_username(username)?;
	}
	Ok(())
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ValidationError> {
	validate_email(&req.email)?;
	validate_password(req.password.expose())
}
