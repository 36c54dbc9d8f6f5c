// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration: sessions and the first admin account.

use pantry_common_config::SecretString;
use serde::Deserialize;

const DEFAULT_SESSION_TTL_HOURS: u64 = 24 * 7;
const DEFAULT_SESSION_COOKIE: &str = "pantry_session";

/// Account created at startup when the users table is empty.
///
/// Without it a fresh install has nobody able to mint sign-up tokens.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
	pub email: String,
	pub full_name: String,
	pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub session_ttl_hours: u64,
	pub session_cookie_name: String,
	pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub session_ttl_hours: Option<u64>,
	#[serde(default)]
	pub session_cookie_name: Option<String>,
	#[serde(default)]
	pub admin_email: Option<String>,
	#[serde(default)]
	pub admin_full_name: Option<String>,
	#[serde(default)]
	pub admin_password: Option<SecretString>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.session_ttl_hours.is_some() {
			self.session_ttl_hours = other.session_ttl_hours;
		}
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
		if other.admin_email.is_some() {
			self.admin_email = other.admin_email;
		}
		if other.admin_full_name.is_some() {
			self.admin_full_name = other.admin_full_name;
		}
		if other.admin_password.is_some() {
			self.admin_password = other.admin_password;
		}
	}

	/// The bootstrap admin is only configured when both email and password are
	/// present.
	pub fn finalize(self) -> AuthConfig {
		let bootstrap_admin = match (self.admin_email, self.admin_password) {
			(Some(email), Some(password)) => Some(BootstrapAdmin {
				email,
				full_name: self
					.admin_full_name
					.unwrap_or_else(|| "Administrator".to_string()),
				password,
			}),
			_ => None,
		};

		AuthConfig {
			session_ttl_hours: self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS),
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
			bootstrap_admin,
		}
	}
}
